pub mod inspect;
pub mod show;
pub mod upload;

use anyhow::Result;
use chrono::{Datelike, NaiveDate, Weekday};

/// All week-level operations take the Monday the week starts on.
pub fn require_monday(week_start: NaiveDate) -> Result<()> {
    if week_start.weekday() != Weekday::Mon {
        anyhow::bail!(
            "--week-start must be a Monday; {} is a {}",
            week_start,
            week_start.weekday()
        );
    }
    Ok(())
}
