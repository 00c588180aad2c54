//! This module contains types describing what was read from the PSU.

use core::fmt;

use strum_macros::EnumIter;

/// Whether a read should insist on the genuine Dell header.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum HeaderMode {
    /// Reject any payload not starting with `DELL00AC`.
    Strict,
    /// Accept any header. Most third party bricks need this.
    #[default]
    Lenient,
}

/// Whether a [`PsuReader`](crate::PsuReader) has ever completed a read.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    /// No read has succeeded yet, the decoded values are all zero.
    #[default]
    NoData,
    /// At least one read succeeded. The values are from the latest success,
    /// which is not necessarily the latest attempt.
    HasData,
}

/// The rating a PSU reports about itself.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PsuRating {
    /// Rated output power in watts.
    pub watts: u16,
    /// Output voltage in millivolts.
    pub millivolts: u16,
    /// Maximum output current in milliamps.
    pub milliamps: u16,
}

impl fmt::Display for PsuRating {
    /// Formats as e.g. `180W 19.5V 9.2A`. The PSU only reports tenths, so one decimal place is shown.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}W {}.{}V {}.{}A",
            self.watts,
            self.millivolts / 1000,
            (self.millivolts % 1000) / 100,
            self.milliamps / 1000,
            (self.milliamps % 1000) / 100,
        )
    }
}
