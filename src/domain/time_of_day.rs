use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Time-of-day category a dish or meal is tagged with.
///
/// Declaration order is the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeOfDay {
    #[serde(alias = "Morgen")]
    Morning,
    #[serde(alias = "Vormittag")]
    MidMorning,
    #[serde(alias = "Mittag")]
    Noon,
    #[serde(alias = "Nachmittag")]
    Afternoon,
    #[serde(alias = "früher Abend")]
    EarlyEvening,
    #[serde(alias = "Abend")]
    Evening,
    #[serde(alias = "Nacht")]
    Night,
    #[serde(alias = "k.A.")]
    Unspecified,
}

impl TimeOfDay {
    pub const ALL: [TimeOfDay; 8] = [
        TimeOfDay::Morning,
        TimeOfDay::MidMorning,
        TimeOfDay::Noon,
        TimeOfDay::Afternoon,
        TimeOfDay::EarlyEvening,
        TimeOfDay::Evening,
        TimeOfDay::Night,
        TimeOfDay::Unspecified,
    ];

    /// Wire and storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::MidMorning => "mid-morning",
            TimeOfDay::Noon => "noon",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::EarlyEvening => "early-evening",
            TimeOfDay::Evening => "evening",
            TimeOfDay::Night => "night",
            TimeOfDay::Unspecified => "unspecified",
        }
    }

    fn german_label(self) -> &'static str {
        match self {
            TimeOfDay::Morning => "Morgen",
            TimeOfDay::MidMorning => "Vormittag",
            TimeOfDay::Noon => "Mittag",
            TimeOfDay::Afternoon => "Nachmittag",
            TimeOfDay::EarlyEvening => "früher Abend",
            TimeOfDay::Evening => "Abend",
            TimeOfDay::Night => "Nacht",
            TimeOfDay::Unspecified => "k.A.",
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown time of day: {0}")]
pub struct UnknownTimeOfDay(pub String);

impl FromStr for TimeOfDay {
    type Err = UnknownTimeOfDay;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeOfDay::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s) || t.german_label() == s)
            .ok_or_else(|| UnknownTimeOfDay(s.to_string()))
    }
}
