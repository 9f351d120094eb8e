use clap::Subcommand;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use spendsort_lib::{Category, Database, LearnOutcome, Result, RuleSet, SqliteDatabase};
use std::path::{Path, PathBuf};

use crate::util::format_timestamp;

#[derive(Subcommand)]
pub enum RulesCommands {
    #[command(about = "Show rules in priority order")]
    Show,

    #[command(about = "Write rules to a TOML file")]
    Export {
        #[arg(help = "Destination TOML file")]
        path: PathBuf,
    },

    #[command(about = "Replace rules with the contents of a TOML file")]
    Import {
        #[arg(help = "Source TOML file")]
        path: PathBuf,
    },

    #[command(about = "Restore the default starter rules")]
    Reset {
        #[arg(long, help = "Do not ask for confirmation")]
        yes: bool,
    },

    #[command(about = "Learn a keyword from a description")]
    Learn {
        #[arg(help = "Category: essentials, investments or unnecessary_spending")]
        category: String,

        #[arg(help = "Transaction description to learn from")]
        description: String,
    },
}

pub fn handle_rules_command(db: &mut SqliteDatabase, user: &str, action: RulesCommands) -> Result<()> {
    match action {
        RulesCommands::Show => show_rules(db, user),
        RulesCommands::Export { path } => export_rules(db, user, &path),
        RulesCommands::Import { path } => import_rules(db, user, &path),
        RulesCommands::Reset { yes } => reset_rules(db, user, yes),
        RulesCommands::Learn { category, description } => {
            learn_rule(db, user, &category, &description)
        }
    }
}

fn show_rules(db: &mut SqliteDatabase, user: &str) -> Result<()> {
    let rule_set = db.get_or_create_rule_set(user)?;

    println!(
        "\n{} for {}",
        style("Rules").bold().cyan(),
        style(user).bold()
    );
    println!(
        "Last updated: {}\n",
        style(format_timestamp(&rule_set.last_updated())).dim()
    );

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        Cell::new("Priority").fg(Color::Cyan),
        Cell::new("Category").fg(Color::Cyan),
        Cell::new("Keywords").fg(Color::Cyan),
    ]);

    for (idx, rule) in rule_set.rules().iter().enumerate() {
        table.add_row(vec![
            Cell::new(idx + 1),
            Cell::new(rule.category().label()),
            Cell::new(rule.keywords().join(", ")),
        ]);
    }

    println!("{}", table);
    println!("  {} keywords across {} rules", rule_set.keyword_count(), rule_set.rules().len());

    Ok(())
}

fn export_rules(db: &mut SqliteDatabase, user: &str, path: &Path) -> Result<()> {
    let rule_set = db.get_or_create_rule_set(user)?;
    rule_set.save_to_file(path)?;
    println!("{} Rules exported to {}", style("✓").green(), path.display());
    Ok(())
}

fn import_rules(db: &mut SqliteDatabase, user: &str, path: &Path) -> Result<()> {
    let rule_set = RuleSet::from_file(path)?;
    db.save_rule_set(user, &rule_set)?;
    log::info!("Replaced rules for {} from {}", user, path.display());
    println!(
        "{} Imported {} rules ({} keywords) from {}",
        style("✓").green(),
        rule_set.rules().len(),
        rule_set.keyword_count(),
        path.display()
    );
    Ok(())
}

fn reset_rules(db: &mut SqliteDatabase, user: &str, yes: bool) -> Result<()> {
    if !yes {
        let confirm = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Replace all learned rules for '{}' with the defaults?", user))
            .default(false)
            .interact()?;
        if !confirm {
            println!("{}", style("Cancelled").yellow());
            return Ok(());
        }
    }

    db.save_rule_set(user, &RuleSet::default_seed())?;
    println!("{} Rules reset to defaults", style("✓").green());
    Ok(())
}

fn learn_rule(db: &mut SqliteDatabase, user: &str, category: &str, description: &str) -> Result<()> {
    let category: Category = category.parse()?;
    let mut rule_set = db.get_or_create_rule_set(user)?;
    let outcome = rule_set.learn(description, category);

    match outcome {
        LearnOutcome::Ignored => {
            println!(
                "{} Nothing to learn from {:?}",
                style("!").yellow(),
                description
            );
            return Ok(());
        }
        LearnOutcome::AlreadyKnown => {
            println!("{} Already known for {}", style("→").cyan(), category);
        }
        LearnOutcome::Added | LearnOutcome::NewRule => {
            println!(
                "{} Learned '{}' as {}",
                style("✓").green(),
                spendsort_lib::normalize_keyword(description),
                style(category).bold()
            );
        }
    }

    db.save_rule_set(user, &rule_set)?;
    Ok(())
}
