use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum InsightTrack {
    SpaceWeather,
    Acoustics,
    Electromagnetism,
}

/// Ordered by rank: `Breakthrough` is the highest.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum InsightPriority {
    Ambient,
    Notable,
    Significant,
    Breakthrough,
}

impl InsightPriority {
    pub fn rank(&self) -> u8 {
        match self {
            InsightPriority::Ambient => 0,
            InsightPriority::Notable => 1,
            InsightPriority::Significant => 2,
            InsightPriority::Breakthrough => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InsightPriority::Ambient => "ambient",
            InsightPriority::Notable => "notable",
            InsightPriority::Significant => "significant",
            InsightPriority::Breakthrough => "breakthrough",
        }
    }
}

impl fmt::Display for InsightPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One narrated fact. Never mutated after the narrator creates it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    /// Id of the rule that produced it; dedupe works on this.
    pub id: String,
    pub track: InsightTrack,
    pub priority: InsightPriority,
    pub headline: String,
    pub explanation: String,
    pub data_connection: String,
    pub sound_connection: String,
    pub created_at: DateTime<Utc>,
}
