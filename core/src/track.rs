//! Tracks and the two operations permitted to change them.
//!
//! RULE: `mark_sent` and `record_response` are the only code paths that
//! set `sent`, `sentAt` or `response`. Both take the track by reference
//! and return a new value; a rejected call leaves the input untouched.
//! Neither computes the current level for the caller; re-run
//! `evaluator::evaluate` on the result.

use crate::{
    error::{CaseError, CaseResult},
    evaluator::evaluate,
    level::{Level, LevelRecord, Response},
    types::Timestamp,
};
use serde::{Deserialize, Serialize};
use std::{fmt, ops::Index, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackKind {
    Branch,
    MemberBank,
}

impl TrackKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Branch     => "branch",
            Self::MemberBank => "member_bank",
        }
    }

    /// Domain name of the terminal flag that closes the Final level.
    pub fn terminal_flag_name(self) -> &'static str {
        match self {
            Self::Branch     => "submittedForConsideration",
            Self::MemberBank => "misUpdated",
        }
    }

    /// Domain name of the per-level response.
    pub fn response_name(self) -> &'static str {
        match self {
            Self::Branch     => "customerStance",
            Self::MemberBank => "feedback",
        }
    }
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for TrackKind {
    type Err = CaseError;

    fn from_str(s: &str) -> CaseResult<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "branch"                      => Ok(Self::Branch),
            "member_bank" | "memberbank"  => Ok(Self::MemberBank),
            other => Err(CaseError::InvalidInput(format!("unknown track '{other}'"))),
        }
    }
}

/// One escalation ladder: a record per level, indexed by `Level`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub kind: TrackKind,
    levels: [LevelRecord; 5],
}

impl Track {
    /// A fresh track: every level unsent.
    pub fn new(kind: TrackKind) -> Self {
        Self {
            kind,
            levels: [LevelRecord::default(); 5],
        }
    }

    pub fn record(&self, level: Level) -> &LevelRecord {
        &self.levels[level.index()]
    }

    pub fn records(&self) -> impl Iterator<Item = (Level, &LevelRecord)> {
        Level::ALL.into_iter().zip(self.levels.iter())
    }

    /// `submittedForConsideration` on the branch track, `misUpdated` on
    /// the member-bank track. Stored as the Final level's sent state.
    pub fn terminal_flag(&self) -> bool {
        self.record(Level::Final).sent
    }

    /// Verifies that the stored records describe a state reachable
    /// through `mark_sent`/`record_response`.
    pub fn check_invariants(&self) -> CaseResult<()> {
        let mut reachable = true;
        for (level, record) in self.records() {
            record
                .check(level)
                .map_err(|e| CaseError::InvalidInput(format!("{} track, {e}", self.kind)))?;
            if record.sent && !reachable {
                return Err(CaseError::InvalidInput(format!(
                    "{} track, {level}: sent without the previous level escalating",
                    self.kind
                )));
            }
            reachable = record.sent && record.response == Some(Response::No);
        }
        Ok(())
    }

    fn record_mut(&mut self, level: Level) -> &mut LevelRecord {
        &mut self.levels[level.index()]
    }
}

impl Index<Level> for Track {
    type Output = LevelRecord;

    fn index(&self, level: Level) -> &LevelRecord {
        self.record(level)
    }
}

/// Dispatch the notice at `level`.
///
/// Only the evaluator's current level may be marked. Marking an already
/// sent current level again returns the track unchanged, so `sentAt`
/// keeps its first value.
pub fn mark_sent(track: &Track, level: Level, now: Timestamp) -> CaseResult<Track> {
    let state = evaluate(track);
    if level != state.current_level {
        return Err(CaseError::transition(
            track.kind,
            level,
            format!("current level is {}", state.current_level),
        ));
    }

    let mut next = track.clone();
    let record = next.record_mut(level);
    if !record.sent {
        record.sent = true;
        record.sent_at = Some(now);
    }
    Ok(next)
}

/// Record the counterpart's answer at `level`.
pub fn record_response(track: &Track, level: Level, response: Response) -> CaseResult<Track> {
    if !level.accepts_response() {
        return Err(CaseError::InvalidInput(format!(
            "{} track: the final level has no {}",
            track.kind,
            track.kind.response_name()
        )));
    }

    let stored = track.record(level);
    if !stored.sent {
        return Err(CaseError::transition(
            track.kind,
            level,
            "cannot answer a notice that was not sent",
        ));
    }
    if stored.response == Some(response) {
        return Ok(track.clone());
    }

    let current = evaluate(track).current_level;
    if level < current {
        return Err(CaseError::transition(
            track.kind,
            level,
            format!("already escalated to {current}"),
        ));
    }

    let mut next = track.clone();
    next.record_mut(level).response = Some(response);
    Ok(next)
}
