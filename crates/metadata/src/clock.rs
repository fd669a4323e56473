use chrono::{Local, NaiveDateTime};

use crate::error::ProviderError;
use crate::traits::WallClock;

/// `YYYY-MM-DD HH:MM:SS`, every component zero-padded.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_timestamp(at: &NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// The machine's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalWallClock;

impl WallClock for LocalWallClock {
    fn now(&self) -> Result<NaiveDateTime, ProviderError> {
        Ok(Local::now().naive_local())
    }
}
