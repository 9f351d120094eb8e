pub mod format;
pub mod progress;

pub use format::{format_currency, format_timestamp};
pub use progress::create_spinner;
