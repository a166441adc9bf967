//! Training record vocabulary.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::UnknownVariant;

/// Kind of course an employee attended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseType {
    Training,
    Certification,
}

/// Outcome of a course. Free-form: any value may follow any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingStatus {
    #[default]
    InProgress,
    Completed,
    Failed,
}

impl CourseType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Training => "training",
            Self::Certification => "certification",
        }
    }
}

impl TrainingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl FromStr for CourseType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "training" => Ok(Self::Training),
            "certification" => Ok(Self::Certification),
            _ => Err(UnknownVariant {
                kind: "course type",
                value: s.to_owned(),
            }),
        }
    }
}

impl FromStr for TrainingStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(UnknownVariant {
                kind: "training status",
                value: s.to_owned(),
            }),
        }
    }
}
