//! Case status deriver: evaluator output to a display badge.
//!
//! A pure lookup: no dates, no raw flags. Everything it needs is in the
//! `EvalResult` produced by `evaluator::evaluate`.

use crate::{
    evaluator::{evaluate, EvalResult},
    level::Level,
    track::{Track, TrackKind},
};
use serde::{Deserialize, Serialize};

pub const LABEL_NEW: &str = "New";
pub const LABEL_INITIAL_SENT: &str = "Initial Notice Sent";
pub const LABEL_BUSINESS_CONSIDERATION: &str = "Business Consideration";
pub const LABEL_MIS_UPDATED: &str = "MIS Updated";
pub const LABEL_REVIEWED: &str = "Reviewed / Feedback Received";

/// Ordered: Informational < Warning < Success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Informational,
    Warning,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusTag {
    pub label: String,
    pub severity: Severity,
}

impl StatusTag {
    fn new(label: impl Into<String>, severity: Severity) -> Self {
        Self {
            label: label.into(),
            severity,
        }
    }
}

/// Badge for a track, evaluated on the spot.
pub fn status_of(track: &Track, kind: TrackKind) -> StatusTag {
    status_for(&evaluate(track), kind)
}

/// Badge for an already evaluated track.
pub fn status_for(result: &EvalResult, kind: TrackKind) -> StatusTag {
    if result.is_complete {
        return StatusTag::new(LABEL_REVIEWED, Severity::Success);
    }

    match result.current_level {
        Level::Initial if result.awaiting_response => {
            StatusTag::new(LABEL_INITIAL_SENT, Severity::Informational)
        }
        Level::Initial => StatusTag::new(LABEL_NEW, Severity::Informational),
        Level::Reminder1 | Level::Reminder2 | Level::Reminder3 => {
            let n = result.current_level.reminder_number().unwrap_or_default();
            StatusTag::new(format!("{} Reminder Sent", ordinal(n)), Severity::Warning)
        }
        Level::Final => match kind {
            TrackKind::Branch     => StatusTag::new(LABEL_BUSINESS_CONSIDERATION, Severity::Warning),
            TrackKind::MemberBank => StatusTag::new(LABEL_MIS_UPDATED, Severity::Warning),
        },
    }
}

fn ordinal(n: u8) -> String {
    let suffix = match n {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}
