//! The escalation ladder shared by both tracks.
//!
//! Every track walks the same five rungs in the same order:
//!   Initial → Reminder1 → Reminder2 → Reminder3 → Final
//! Only the first four carry a counterpart response. Final is closed
//! by the track's terminal flag instead.

use crate::{
    error::{CaseError, CaseResult},
    types::Timestamp,
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Initial,
    Reminder1,
    Reminder2,
    Reminder3,
    Final,
}

impl Level {
    /// All rungs, in ladder order.
    pub const ALL: [Level; 5] = [
        Level::Initial,
        Level::Reminder1,
        Level::Reminder2,
        Level::Reminder3,
        Level::Final,
    ];

    /// The rungs that expect a response before escalating.
    pub const RESPONSIVE: [Level; 4] = [
        Level::Initial,
        Level::Reminder1,
        Level::Reminder2,
        Level::Reminder3,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Initial   => "initial",
            Self::Reminder1 => "reminder1",
            Self::Reminder2 => "reminder2",
            Self::Reminder3 => "reminder3",
            Self::Final     => "final",
        }
    }

    /// Reminder ordinal (1..=3), None for Initial and Final.
    pub fn reminder_number(self) -> Option<u8> {
        match self {
            Self::Reminder1 => Some(1),
            Self::Reminder2 => Some(2),
            Self::Reminder3 => Some(3),
            Self::Initial | Self::Final => None,
        }
    }

    pub fn accepts_response(self) -> bool {
        self != Self::Final
    }

    pub fn next(self) -> Option<Level> {
        Self::ALL.get(self.index() + 1).copied()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Level {
    type Err = CaseError;

    fn from_str(s: &str) -> CaseResult<Self> {
        Self::ALL
            .into_iter()
            .find(|level| level.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CaseError::InvalidInput(format!("unknown level '{s}'")))
    }
}

/// The counterpart's answer at a level: customer stance on the branch
/// track, member-bank feedback on the member-bank track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Response {
    Yes,
    No,
}

impl Response {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No  => "no",
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Response {
    type Err = CaseError;

    fn from_str(s: &str) -> CaseResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" => Ok(Self::Yes),
            "no"  => Ok(Self::No),
            other => Err(CaseError::InvalidInput(format!(
                "response must be 'yes' or 'no', got '{other}'"
            ))),
        }
    }
}

/// What has happened at one level of one track.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelRecord {
    pub sent: bool,
    pub sent_at: Option<Timestamp>,
    pub response: Option<Response>,
}

impl LevelRecord {
    pub fn is_awaiting_response(&self) -> bool {
        self.sent && self.response.is_none()
    }

    /// Checks the per-record invariants:
    /// response present ⇒ sent, and sentAt present ⇔ sent.
    pub fn check(&self, level: Level) -> Result<(), String> {
        if self.sent != self.sent_at.is_some() {
            return Err(format!("{level}: sent and sentAt disagree"));
        }
        if self.response.is_some() && !self.sent {
            return Err(format!("{level}: response recorded on an unsent notice"));
        }
        if self.response.is_some() && !level.accepts_response() {
            return Err(format!("{level}: final level cannot carry a response"));
        }
        Ok(())
    }
}
