//! Ticket vocabulary.
//!
//! Storage format: snake_case strings (`"in_progress"`, `"rejected"`, ...).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::UnknownVariant;

/// What the employee is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketType {
    Request,
    Issue,
}

/// Progress of a ticket.
///
/// No transition order is enforced: a responder may move a ticket from any
/// status to any other, including reopening a closed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Closed,
}

/// Admin decision on a ticket, independent of [`TicketStatus`].
///
/// `Unset` means no decision has been made yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketApproval {
    #[default]
    Unset,
    Approved,
    Rejected,
}

impl TicketType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::Issue => "issue",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Request => "Request",
            Self::Issue => "Issue",
        }
    }
}

impl TicketStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Closed => "closed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::Closed => "Closed",
        }
    }
}

impl TicketApproval {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unset => "unset",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl FromStr for TicketType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "request" => Ok(Self::Request),
            "issue" => Ok(Self::Issue),
            _ => Err(UnknownVariant {
                kind: "ticket type",
                value: s.to_owned(),
            }),
        }
    }
}

impl FromStr for TicketStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "in_progress" => Ok(Self::InProgress),
            "closed" => Ok(Self::Closed),
            _ => Err(UnknownVariant {
                kind: "ticket status",
                value: s.to_owned(),
            }),
        }
    }
}

impl FromStr for TicketApproval {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unset" => Ok(Self::Unset),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(UnknownVariant {
                kind: "ticket approval",
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for TicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
