//! Read-side projection tests: update form, timeline, list rows,
//! and the shipped data files.

use chrono::{Duration, TimeZone, Utc};
use ftdh_core::{
    clock::FixedClock,
    config::{EngineConfig, MemberBankGate},
    engine::CaseEngine,
    error::CaseResult,
    projection::LevelAccess,
    status::{LABEL_NEW, LABEL_REVIEWED},
    Case, Level, Response, TrackKind,
};

mod common;

fn build() -> CaseEngine<FixedClock> {
    let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 7, 1, 9, 0, 0).unwrap());
    CaseEngine::with_clock(EngineConfig::default_test(), clock)
}

fn data_file(name: &str) -> String {
    format!("{}/../data/{name}", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn update_form_locks_member_bank_until_gate_opens() -> CaseResult<()> {
    let engine = build();
    let case = engine.open_case(common::attributes());

    let form = engine.update_form(&case);
    assert_eq!(form.branch[0].access, LevelAccess::AwaitingSend);
    assert!(form.member_bank.iter().all(|v| v.access == LevelAccess::Locked));

    let case = engine.mark_sent(&case, TrackKind::Branch, Level::Initial)?;
    let case = engine.record_response(&case, TrackKind::Branch, Level::Initial, Response::No)?;

    let form = engine.update_form(&case);
    assert_eq!(form.branch[0].access, LevelAccess::ReadOnly);
    assert_eq!(form.branch[0].response, Some(Response::No));
    assert_eq!(form.branch[1].access, LevelAccess::AwaitingSend);
    assert_eq!(form.member_bank[0].access, LevelAccess::AwaitingSend);
    assert_eq!(form.member_bank[1].access, LevelAccess::Locked);
    Ok(())
}

#[test]
fn timeline_interleaves_tracks_by_sent_time() -> CaseResult<()> {
    let engine = build();
    let case = engine.open_case(common::attributes());

    engine.clock().advance(Duration::hours(1));
    let case = engine.mark_sent(&case, TrackKind::Branch, Level::Initial)?;
    let case = engine.record_response(&case, TrackKind::Branch, Level::Initial, Response::No)?;
    engine.clock().advance(Duration::days(2));
    let case = engine.mark_sent(&case, TrackKind::MemberBank, Level::Initial)?;
    engine.clock().advance(Duration::days(1));
    let case = engine.mark_sent(&case, TrackKind::Branch, Level::Reminder1)?;

    let timeline = engine.timeline(&case);
    let order: Vec<(TrackKind, Level)> = timeline.iter().map(|e| (e.track, e.level)).collect();
    assert_eq!(
        order,
        [
            (TrackKind::Branch, Level::Initial),
            (TrackKind::MemberBank, Level::Initial),
            (TrackKind::Branch, Level::Reminder1),
        ]
    );
    assert_eq!(timeline[0].response, Some(Response::No));
    assert!(timeline.windows(2).all(|w| w[0].sent_at <= w[1].sent_at));
    Ok(())
}

#[test]
fn list_rows_carry_branch_badges() -> CaseResult<()> {
    let engine = build();
    let fresh = engine.open_case(common::attributes());
    let resolved = engine.mark_sent(&fresh, TrackKind::Branch, Level::Initial)?;
    let resolved =
        engine.record_response(&resolved, TrackKind::Branch, Level::Initial, Response::Yes)?;

    let rows = engine.list_rows(&[fresh.clone(), resolved.clone()]);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].case_id, fresh.id);
    assert_eq!(rows[0].badge.label, LABEL_NEW);
    assert_eq!(rows[1].badge.label, LABEL_REVIEWED);
    assert_eq!(rows[1].ftdh_number, "FTDH-2024-0107");
    Ok(())
}

#[test]
fn shipped_config_loads() {
    let config = EngineConfig::load(&data_file("engine_config.json")).expect("load config");
    assert_eq!(config.member_bank_gate, MemberBankGate::AfterBranchEscalated);
    assert!(config.validation.known_banks.iter().any(|b| b == "DBBL"));
}

#[test]
fn sample_case_rehydrates_awaiting_first_reminder_answer() -> CaseResult<()> {
    let json = std::fs::read_to_string(data_file("sample_case.json")).expect("read sample case");
    let case = Case::from_json(&json)?;

    let view = build().case_view(&case);
    assert_eq!(view.branch.current_level, Level::Reminder1);
    assert!(view.branch.awaiting_response);
    assert!(view.member_bank_available);
    assert_eq!(view.overall_badge.label, "1st Reminder Sent");
    Ok(())
}
