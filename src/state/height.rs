//! Height value in centimeters

use std::fmt;

use serde::Serialize;

use super::SteppableValue;

/// Body height in whole centimeters.
///
/// There is no lower or upper bound at this layer, unlike [`super::Pace`]
/// which floors at 0:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Height(i64);

impl Height {
    pub fn new(centimeters: i64) -> Self {
        Self(centimeters)
    }

    pub fn centimeters(&self) -> i64 {
        self.0
    }
}

impl SteppableValue for Height {
    fn increment(&self) -> Self {
        Self(self.0.saturating_add(1))
    }

    fn decrement(&self) -> Self {
        Self(self.0.saturating_sub(1))
    }
}

impl Default for Height {
    fn default() -> Self {
        Self(170)
    }
}

impl From<i64> for Height {
    fn from(centimeters: i64) -> Self {
        Self(centimeters)
    }
}

impl fmt::Display for Height {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} cm", self.0)
    }
}
