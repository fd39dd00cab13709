pub mod hosts;
pub mod import;
pub mod remove;

use chrono::{DateTime, Utc};

/// Render an optional timestamp for tables
pub(crate) fn format_time(ts: Option<DateTime<Utc>>) -> String {
    match ts {
        Some(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "-".to_string(),
    }
}
