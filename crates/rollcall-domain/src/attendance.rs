//! Attendance ledger types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Outcome recorded for a student in one period.
///
/// Wire format: `"Present"`, `"Absent"`, `"Withheld"` (same spelling in JSON and the
/// `attendance_records.status` column). New records are always `Present`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AttendanceStatus {
    #[default]
    Present,
    Absent,
    Withheld,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown attendance status: {0}")]
pub struct ParseStatusError(pub String);

impl AttendanceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Present => "Present",
            Self::Absent => "Absent",
            Self::Withheld => "Withheld",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Present" => Ok(Self::Present),
            "Absent" => Ok(Self::Absent),
            "Withheld" => Ok(Self::Withheld),
            _ => Err(ParseStatusError(s.to_owned())),
        }
    }
}
