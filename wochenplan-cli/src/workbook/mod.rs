//! Workbook access layer
//!
//! Loads an xlsx planning workbook into name-keyed in-memory grids and
//! provides the cell coercions and header locators the derivation passes
//! are built on. Everything past the initial file open is total: malformed
//! cells and missing structure degrade to absent values, never errors.

pub mod cell;
pub mod loader;
pub mod locate;

pub use loader::{Grid, Workbook};

#[cfg(test)]
pub(crate) mod testgrid {
    //! Helpers for building synthetic grids in tests.

    use calamine::{Data, ExcelDateTime, ExcelDateTimeType};
    use chrono::NaiveDate;

    pub fn s(text: &str) -> Data {
        Data::String(text.to_string())
    }

    pub fn f(value: f64) -> Data {
        Data::Float(value)
    }

    pub fn e() -> Data {
        Data::Empty
    }

    /// Native date cell (Excel 1900 serial system).
    pub fn d(date: NaiveDate) -> Data {
        let epoch = NaiveDate::from_ymd_opt(1899, 12, 30).unwrap();
        let serial = (date - epoch).num_days() as f64;
        Data::DateTime(ExcelDateTime::new(
            serial,
            ExcelDateTimeType::DateTime,
            false,
        ))
    }

    /// Native time-of-day cell (fraction of a day).
    pub fn t(hours: u32, minutes: u32) -> Data {
        let serial = f64::from(hours * 60 + minutes) / 1440.0;
        Data::DateTime(ExcelDateTime::new(
            serial,
            ExcelDateTimeType::DateTime,
            false,
        ))
    }

    /// Elapsed-time cell, may exceed 24 hours (e.g. monthly target hours).
    pub fn dur(hours: u32, minutes: u32) -> Data {
        let serial = f64::from(hours * 60 + minutes) / 1440.0;
        Data::DateTime(ExcelDateTime::new(
            serial,
            ExcelDateTimeType::TimeDelta,
            false,
        ))
    }
}
