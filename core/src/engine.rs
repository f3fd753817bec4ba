//! The dual-track case engine: the one authority every surface queries.
//!
//! The wizard, the update form, the list view and the detail view all
//! read case state through this type. It composes two single-track
//! evaluations and owns the only cross-track rule:
//!
//!   The member-bank track stays closed until the branch track has
//!   progressed far enough (see `MemberBankGate`). Any member-bank
//!   operation attempted while closed fails with PreconditionNotMet.
//!
//! RULES:
//!   - Track mutators never know about the gate; the engine checks it first.
//!   - Every operation takes a case by reference and returns a new case.
//!   - A rejected operation leaves the caller's case unchanged.

use crate::{
    case::{Case, DisputeAttributes},
    clock::{Clock, SystemClock},
    command::CaseCommand,
    config::{EngineConfig, MemberBankGate},
    error::{CaseError, CaseResult},
    evaluator::{evaluate, EvalResult},
    level::{Level, Response},
    projection::{self, CaseListRow, TimelineEntry, UpdateForm},
    status::{status_for, StatusTag},
    track::{self, TrackKind},
};
use serde::{Deserialize, Serialize};

/// Everything the list and detail views need about a case's progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseView {
    pub branch: EvalResult,
    pub member_bank: EvalResult,
    /// Badge of the branch track, the record of truth for the list view.
    pub overall_badge: StatusTag,
    pub member_bank_badge: StatusTag,
    pub member_bank_available: bool,
}

pub struct CaseEngine<C: Clock = SystemClock> {
    pub config: EngineConfig,
    clock:      C,
}

impl CaseEngine<SystemClock> {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> CaseEngine<C> {
    pub fn with_clock(config: EngineConfig, clock: C) -> Self {
        Self { config, clock }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Create a case with a fresh id and both tracks at Initial.
    pub fn open_case(&self, attributes: DisputeAttributes) -> Case {
        let case = Case::new(uuid::Uuid::new_v4(), attributes, self.clock.now());
        log::info!(
            "case {} opened for {}",
            case.id,
            case.attributes.ftdh_number
        );
        case
    }

    pub fn evaluate(&self, case: &Case, kind: TrackKind) -> EvalResult {
        evaluate(case.track(kind))
    }

    pub fn case_view(&self, case: &Case) -> CaseView {
        let branch = evaluate(case.branch());
        let member_bank = evaluate(case.member_bank());
        let view = CaseView {
            overall_badge: status_for(&branch, TrackKind::Branch),
            member_bank_badge: status_for(&member_bank, TrackKind::MemberBank),
            member_bank_available: self.gate_open(&branch),
            branch,
            member_bank,
        };
        log::debug!(
            "case {} view: branch={:?} member_bank={:?} gate_open={}",
            case.id,
            view.branch,
            view.member_bank,
            view.member_bank_available
        );
        view
    }

    /// Whether member-bank operations are currently permitted.
    pub fn member_bank_available(&self, case: &Case) -> bool {
        self.gate_open(&evaluate(case.branch()))
    }

    pub fn mark_sent(&self, case: &Case, kind: TrackKind, level: Level) -> CaseResult<Case> {
        self.apply(case, CaseCommand::MarkSent { track: kind, level })
    }

    pub fn record_response(
        &self,
        case: &Case,
        kind: TrackKind,
        level: Level,
        response: Response,
    ) -> CaseResult<Case> {
        self.apply(
            case,
            CaseCommand::RecordResponse {
                track: kind,
                level,
                response,
            },
        )
    }

    /// Run one command against a case. The single entry point for every
    /// track change.
    pub fn apply(&self, case: &Case, command: CaseCommand) -> CaseResult<Case> {
        let kind = command.track();
        let outcome = self.check_gate(case, kind).and_then(|_| {
            let current = case.track(kind);
            match command {
                CaseCommand::MarkSent { level, .. } => {
                    track::mark_sent(current, level, self.clock.now())
                }
                CaseCommand::RecordResponse { level, response, .. } => {
                    track::record_response(current, level, response)
                }
            }
        });

        match outcome {
            Ok(updated) => {
                let next = case.with_track(updated);
                log::info!(
                    "case {}: {} accepted on {kind} track, now at {:?}",
                    case.id,
                    command.name(),
                    evaluate(next.track(kind))
                );
                Ok(next)
            }
            Err(e) => {
                log::warn!("case {}: {} rejected: {e}", case.id, command.name());
                Err(e)
            }
        }
    }

    pub fn update_form(&self, case: &Case) -> UpdateForm {
        projection::update_form(case, self.member_bank_available(case))
    }

    pub fn timeline(&self, case: &Case) -> Vec<TimelineEntry> {
        projection::timeline(case)
    }

    pub fn list_rows(&self, cases: &[Case]) -> Vec<CaseListRow> {
        cases
            .iter()
            .map(|case| projection::list_row(case, &self.case_view(case)))
            .collect()
    }

    fn check_gate(&self, case: &Case, kind: TrackKind) -> CaseResult<()> {
        if kind == TrackKind::Branch {
            return Ok(());
        }
        let branch = evaluate(case.branch());
        if self.gate_open(&branch) {
            return Ok(());
        }
        let needed = match self.config.member_bank_gate {
            MemberBankGate::AfterBranchEscalated => "escalated past initial or resolved",
            MemberBankGate::AfterBranchExhausted => "escalated to final",
        };
        Err(CaseError::PreconditionNotMet(format!(
            "member-bank track opens once the branch track is {needed}; branch is at {}",
            branch.current_level
        )))
    }

    fn gate_open(&self, branch: &EvalResult) -> bool {
        match self.config.member_bank_gate {
            MemberBankGate::AfterBranchEscalated => {
                branch.current_level != Level::Initial || branch.is_complete
            }
            MemberBankGate::AfterBranchExhausted => branch.current_level == Level::Final,
        }
    }
}
