use chrono::{Datelike, NaiveDate};

/// Latest year whose wage statistics are expected to be published on `today`.
///
/// Figures for a year appear in October of the following year.
pub fn default_year(today: NaiveDate) -> i32 {
    if today.month() < 10 {
        today.year() - 2
    } else {
        today.year() - 1
    }
}

pub fn output_filename(year: i32) -> String {
    format!("NetCompensation_{year}.csv")
}
