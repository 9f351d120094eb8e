use console::style;
use spendsort_lib::{ReviewSession, Result, SqliteDatabase, TerminalReviewer};

pub fn handle_review_command(db: &mut SqliteDatabase, user: &str, limit: Option<u32>) -> Result<()> {
    let session = ReviewSession::start(db, user, limit)?;

    if session.is_complete() {
        println!("{}", style("No uncategorized transactions").green());
        return Ok(());
    }

    println!(
        "{} {} transactions to review",
        style("→").cyan(),
        style(session.remaining()).bold()
    );

    let mut reviewer = TerminalReviewer::new();
    let summary = session.run(&mut reviewer)?;
    reviewer.show_summary(&summary)?;

    Ok(())
}
