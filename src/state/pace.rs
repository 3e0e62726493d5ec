//! Pace value (minutes:seconds per kilometer)

use std::{fmt, str::FromStr};

use serde::Serialize;

use super::SteppableValue;

/// A running pace, always normalized so that `seconds` stays in `0..=59`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Pace {
    minutes: u32,
    seconds: u8,
}

impl Pace {
    /// Slowest representable pace
    pub const MAX: Pace = Pace { minutes: u32::MAX, seconds: 59 };

    /// Create a pace, carrying any overflowing seconds into minutes
    pub fn new(minutes: u32, seconds: u32) -> Self {
        match minutes.checked_add(seconds / 60) {
            Some(minutes) => Self {
                minutes,
                seconds: (seconds % 60) as u8,
            },
            None => Self::MAX,
        }
    }

    /// Create a pace from a total number of seconds
    pub fn from_total_seconds(total: u64) -> Self {
        match u32::try_from(total / 60) {
            Ok(minutes) => Self {
                minutes,
                seconds: (total % 60) as u8,
            },
            Err(_) => Self::MAX,
        }
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn seconds(&self) -> u8 {
        self.seconds
    }

    pub fn total_seconds(&self) -> u64 {
        u64::from(self.minutes) * 60 + u64::from(self.seconds)
    }

    pub fn is_zero(&self) -> bool {
        self.minutes == 0 && self.seconds == 0
    }
}

impl SteppableValue for Pace {
    /// One second slower; 59 seconds carries into the next minute
    fn increment(&self) -> Self {
        if self.seconds == 59 {
            if self.minutes == u32::MAX {
                return *self;
            }
            Self {
                minutes: self.minutes + 1,
                seconds: 0,
            }
        } else {
            Self {
                minutes: self.minutes,
                seconds: self.seconds + 1,
            }
        }
    }

    /// One second faster; floors at 0:00 and borrows a minute at :00
    fn decrement(&self) -> Self {
        if self.is_zero() {
            *self
        } else if self.seconds == 0 {
            Self {
                minutes: self.minutes - 1,
                seconds: 59,
            }
        } else {
            Self {
                minutes: self.minutes,
                seconds: self.seconds - 1,
            }
        }
    }
}

impl Default for Pace {
    fn default() -> Self {
        Self::new(5, 30)
    }
}

impl fmt::Display for Pace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.minutes, self.seconds)
    }
}

/// Error returned when a pace string is not of the form `M:SS`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsePaceError {
    MissingSeparator,
    InvalidMinutes(String),
    InvalidSeconds(String),
    SecondsOutOfRange(u32),
}

impl fmt::Display for ParsePaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsePaceError::MissingSeparator => write!(f, "expected a pace like 5:30"),
            ParsePaceError::InvalidMinutes(raw) => write!(f, "invalid minutes: '{}'", raw),
            ParsePaceError::InvalidSeconds(raw) => write!(f, "invalid seconds: '{}'", raw),
            ParsePaceError::SecondsOutOfRange(secs) => {
                write!(f, "seconds must be between 0 and 59, got {}", secs)
            }
        }
    }
}

impl std::error::Error for ParsePaceError {}

impl FromStr for Pace {
    type Err = ParsePaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (minutes, seconds) = s
            .trim()
            .split_once(':')
            .ok_or(ParsePaceError::MissingSeparator)?;

        let minutes: u32 = minutes
            .parse()
            .map_err(|_| ParsePaceError::InvalidMinutes(minutes.to_string()))?;
        let seconds: u32 = seconds
            .parse()
            .map_err(|_| ParsePaceError::InvalidSeconds(seconds.to_string()))?;

        if seconds > 59 {
            return Err(ParsePaceError::SecondsOutOfRange(seconds));
        }

        Ok(Self::new(minutes, seconds))
    }
}
