//! Read-side projections for the update form, detail timeline and list.
//!
//! Each projection is plain data derived from the evaluator; none of them
//! re-reads raw flags to decide where a track is.

use crate::{
    case::Case,
    engine::CaseView,
    evaluator::{evaluate, EvalResult},
    level::{Level, Response},
    status::StatusTag,
    track::{Track, TrackKind},
    types::{Amount, CaseId, Timestamp},
};
use serde::{Deserialize, Serialize};

/// What the update form may do with one level's input group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelAccess {
    /// Not reachable yet.
    Locked,
    /// The notice at this level can be marked sent.
    AwaitingSend,
    /// Sent; the response field is editable.
    AwaitingResponse,
    /// History: shown with its stored timestamp and answer.
    ReadOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelView {
    pub level: Level,
    pub access: LevelAccess,
    pub sent_at: Option<Timestamp>,
    pub response: Option<Response>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateForm {
    pub branch: Vec<LevelView>,
    pub member_bank: Vec<LevelView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub track: TrackKind,
    pub level: Level,
    pub sent_at: Timestamp,
    pub response: Option<Response>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseListRow {
    pub case_id: CaseId,
    pub ftdh_number: String,
    pub transaction_amount: Amount,
    pub badge: StatusTag,
}

/// Per-level access for one track. A closed track is entirely locked.
pub fn level_views(track: &Track, open: bool) -> Vec<LevelView> {
    let state = evaluate(track);
    track
        .records()
        .map(|(level, record)| LevelView {
            level,
            access: if open { access_for(level, &state) } else { LevelAccess::Locked },
            sent_at: record.sent_at,
            response: record.response,
        })
        .collect()
}

fn access_for(level: Level, state: &EvalResult) -> LevelAccess {
    if level < state.current_level {
        LevelAccess::ReadOnly
    } else if level > state.current_level {
        LevelAccess::Locked
    } else if state.is_complete {
        LevelAccess::ReadOnly
    } else if state.awaiting_response {
        LevelAccess::AwaitingResponse
    } else {
        LevelAccess::AwaitingSend
    }
}

pub fn update_form(case: &Case, member_bank_open: bool) -> UpdateForm {
    UpdateForm {
        branch: level_views(case.branch(), true),
        member_bank: level_views(case.member_bank(), member_bank_open),
    }
}

/// Every dispatched notice on both tracks, oldest first.
pub fn timeline(case: &Case) -> Vec<TimelineEntry> {
    let mut entries: Vec<TimelineEntry> = [case.branch(), case.member_bank()]
        .into_iter()
        .flat_map(|track| {
            track.records().filter_map(move |(level, record)| {
                record.sent_at.map(|sent_at| TimelineEntry {
                    track: track.kind,
                    level,
                    sent_at,
                    response: record.response,
                })
            })
        })
        .collect();
    entries.sort_by(|a, b| {
        a.sent_at
            .cmp(&b.sent_at)
            .then(a.track.cmp(&b.track))
            .then(a.level.cmp(&b.level))
    });
    entries
}

pub fn list_row(case: &Case, view: &CaseView) -> CaseListRow {
    CaseListRow {
        case_id: case.id,
        ftdh_number: case.attributes.ftdh_number.clone(),
        transaction_amount: case.attributes.transaction_amount,
        badge: view.overall_badge.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::{mark_sent, record_response};
    use chrono::{TimeZone, Utc};

    fn at(day: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap()
    }

    fn accesses(views: &[LevelView]) -> Vec<LevelAccess> {
        views.iter().map(|v| v.access).collect()
    }

    #[test]
    fn fresh_track_unlocks_only_initial() {
        let views = level_views(&Track::new(TrackKind::Branch), true);
        assert_eq!(
            accesses(&views),
            [
                LevelAccess::AwaitingSend,
                LevelAccess::Locked,
                LevelAccess::Locked,
                LevelAccess::Locked,
                LevelAccess::Locked,
            ]
        );
    }

    #[test]
    fn escalated_levels_become_read_only() {
        let track = Track::new(TrackKind::Branch);
        let track = mark_sent(&track, Level::Initial, at(1)).unwrap();
        let track = record_response(&track, Level::Initial, Response::No).unwrap();
        let track = mark_sent(&track, Level::Reminder1, at(4)).unwrap();

        let views = level_views(&track, true);
        assert_eq!(views[0].access, LevelAccess::ReadOnly);
        assert_eq!(views[0].sent_at, Some(at(1)));
        assert_eq!(views[1].access, LevelAccess::AwaitingResponse);
        assert_eq!(views[2].access, LevelAccess::Locked);
    }

    #[test]
    fn closed_track_is_fully_locked() {
        let views = level_views(&Track::new(TrackKind::MemberBank), false);
        assert!(views.iter().all(|v| v.access == LevelAccess::Locked));
    }

    #[test]
    fn completed_level_is_read_only() {
        let track = Track::new(TrackKind::MemberBank);
        let track = mark_sent(&track, Level::Initial, at(1)).unwrap();
        let track = record_response(&track, Level::Initial, Response::Yes).unwrap();
        let views = level_views(&track, true);
        assert_eq!(views[0].access, LevelAccess::ReadOnly);
        assert_eq!(views[1].access, LevelAccess::Locked);
    }
}
