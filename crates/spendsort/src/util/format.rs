use chrono::{DateTime, Local, Utc};

/// Dollar amount with thousands separators, e.g. `$1,204.10`. Negative
/// amounts keep their sign in front of the currency symbol.
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, digit) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    let local: DateTime<Local> = DateTime::from(*dt);
    local.format("%Y-%m-%d %H:%M:%S").to_string()
}
