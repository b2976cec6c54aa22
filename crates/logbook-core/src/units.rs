use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    Rowing,
    Running,
    Cycling,
    Walking,
    Swimming,
    Elliptical,
    WeightTraining,
    Other,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rowing => "ROWING",
            Self::Running => "RUNNING",
            Self::Cycling => "CYCLING",
            Self::Walking => "WALKING",
            Self::Swimming => "SWIMMING",
            Self::Elliptical => "ELLIPTICAL",
            Self::WeightTraining => "WEIGHT_TRAINING",
            Self::Other => "OTHER",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ROWING" => Ok(Self::Rowing),
            "RUNNING" => Ok(Self::Running),
            "CYCLING" => Ok(Self::Cycling),
            "WALKING" => Ok(Self::Walking),
            "SWIMMING" => Ok(Self::Swimming),
            "ELLIPTICAL" => Ok(Self::Elliptical),
            "WEIGHT_TRAINING" => Ok(Self::WeightTraining),
            "OTHER" => Ok(Self::Other),
            other => Err(CoreError::invalid_argument(format!(
                "Unknown activity type: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DurationUnits {
    Seconds,
    Minutes,
    Hours,
}

impl DurationUnits {
    /// Seconds in one unit.
    pub fn seconds(&self) -> f64 {
        match self {
            Self::Seconds => 1.0,
            Self::Minutes => 60.0,
            Self::Hours => 3600.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DistanceUnits {
    Meters,
    Kilometers,
    Miles,
}

impl DistanceUnits {
    /// Meters in one unit.
    pub fn meters(&self) -> f64 {
        match self {
            Self::Meters => 1.0,
            Self::Kilometers => 1000.0,
            Self::Miles => 1609.344,
        }
    }
}
