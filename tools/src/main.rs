//! case-runner: headless driver for the FTDH escalation engine.
//!
//! Usage:
//!   case-runner --case data/sample_case.json
//!   case-runner --case data/sample_case.json --config data/engine_config.json --ipc-mode
//!
//! In IPC mode each stdin line is one JSON command and each stdout line is
//! one JSON reply. The case is held in memory; `dump` returns it for the
//! caller to persist. `open` takes a full wizard form and only creates a
//! case when every step validates; `validate` checks one step.

use anyhow::{Context, Result};
use ftdh_core::{
    clock::Clock,
    command::CaseCommand,
    config::EngineConfig,
    engine::CaseEngine,
    error::ErrorKind,
    level::{Level, Response},
    track::TrackKind,
    wizard::{CaseForm, SubmitOutcome, ValidationResult, Wizard, WizardStep},
    Case, CaseError,
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    Open {
        form: CaseForm,
    },
    Validate {
        step: WizardStep,
        form: CaseForm,
    },
    View,
    MarkSent {
        track: TrackKind,
        level: Level,
    },
    RecordResponse {
        track:    TrackKind,
        level:    Level,
        response: Response,
    },
    UpdateForm,
    Timeline,
    Dump,
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let config_path = arg_value(&args, "--config").unwrap_or("./data/engine_config.json");
    let case_path = arg_value(&args, "--case");

    let config = match EngineConfig::load(config_path) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("{e}; falling back to default config");
            EngineConfig::default()
        }
    };
    let engine = CaseEngine::new(config);

    let case = match case_path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Cannot read case file {path}"))?;
            Some(Case::from_json(&json).with_context(|| format!("Cannot load case from {path}"))?)
        }
        None => None,
    };

    if ipc_mode {
        run_ipc_loop(&engine, case)?;
    } else {
        let case = case.context("--case <file> is required outside --ipc-mode")?;
        print_summary(&engine, &case);
    }

    Ok(())
}

fn run_ipc_loop<C: Clock>(engine: &CaseEngine<C>, mut case: Option<Case>) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": "invalid_input", "message": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        if matches!(cmd, IpcCommand::Quit) {
            break;
        }

        let reply = match handle_command(engine, &mut case, cmd) {
            Ok(value) => value,
            Err(e) => error_reply(&e),
        };
        writeln!(stdout, "{}", reply)?;
        stdout.flush()?;
    }

    Ok(())
}

fn handle_command<C: Clock>(
    engine: &CaseEngine<C>,
    case: &mut Option<Case>,
    cmd: IpcCommand,
) -> Result<serde_json::Value, CaseError> {
    let reply = match cmd {
        IpcCommand::Open { form } => match Wizard::new(engine).submit(&form)? {
            SubmitOutcome::Created(opened) => {
                let reply = serde_json::json!({
                    "case_id": opened.id,
                    "view": engine.case_view(&opened),
                });
                *case = Some(opened);
                reply
            }
            SubmitOutcome::Invalid(result) => validation_reply(&result),
        },
        IpcCommand::Validate { step, form } => {
            serde_json::to_value(Wizard::new(engine).validate(step, &form))?
        }
        IpcCommand::View => serde_json::to_value(engine.case_view(loaded(case)?))?,
        IpcCommand::MarkSent { track, level } => {
            let next = engine.apply(loaded(case)?, CaseCommand::MarkSent { track, level })?;
            let view = serde_json::to_value(engine.case_view(&next))?;
            *case = Some(next);
            view
        }
        IpcCommand::RecordResponse { track, level, response } => {
            let command = CaseCommand::RecordResponse { track, level, response };
            let next = engine.apply(loaded(case)?, command)?;
            let view = serde_json::to_value(engine.case_view(&next))?;
            *case = Some(next);
            view
        }
        IpcCommand::UpdateForm => serde_json::to_value(engine.update_form(loaded(case)?))?,
        IpcCommand::Timeline => serde_json::to_value(engine.timeline(loaded(case)?))?,
        IpcCommand::Dump => serde_json::to_value(loaded(case)?)?,
        IpcCommand::Quit => serde_json::Value::Null,
    };
    Ok(reply)
}

fn loaded(case: &Option<Case>) -> Result<&Case, CaseError> {
    case.as_ref()
        .ok_or_else(|| CaseError::InvalidInput("no case loaded; send `open` first".into()))
}

fn error_reply(e: &CaseError) -> serde_json::Value {
    serde_json::json!({ "error": e.kind(), "message": e.to_string() })
}

fn validation_reply(result: &ValidationResult) -> serde_json::Value {
    serde_json::json!({
        "error": ErrorKind::InvalidInput,
        "message": format!("{} field error(s); no case created", result.errors.len()),
        "errors": result.errors,
    })
}

fn print_summary(engine: &CaseEngine, case: &Case) {
    let view = engine.case_view(case);
    let attrs = &case.attributes;

    println!("=== CASE SUMMARY ===");
    println!("  case_id:        {}", case.id);
    println!("  ftdh_number:    {}", attrs.ftdh_number);
    println!("  banks:          {} -> {}", attrs.sending_bank, attrs.receiving_bank);
    println!("  amount:         {:.2}", attrs.transaction_amount);
    println!("  status:         {} ({:?})", view.overall_badge.label, view.overall_badge.severity);
    println!();
    println!("=== TRACKS ===");
    println!(
        "  branch:         {} complete={} awaiting_response={}",
        view.branch.current_level, view.branch.is_complete, view.branch.awaiting_response
    );
    if view.member_bank_available {
        println!(
            "  member_bank:    {} complete={} ({})",
            view.member_bank.current_level, view.member_bank.is_complete, view.member_bank_badge.label
        );
    } else {
        println!("  member_bank:    closed until the branch track escalates");
    }
    for kind in [TrackKind::Branch, TrackKind::MemberBank] {
        println!(
            "  {:<26} {}",
            format!("{}:", kind.terminal_flag_name()),
            case.track(kind).terminal_flag()
        );
    }

    println!();
    println!("=== TIMELINE ===");
    let timeline = engine.timeline(case);
    if timeline.is_empty() {
        println!("  (Nothing sent yet)");
    }
    for entry in timeline {
        let answer = entry.response.map(|r| r.as_str()).unwrap_or("pending");
        println!(
            "  {} | {:<11} | {:<9} | {}",
            entry.sent_at.format("%Y-%m-%d %H:%M"),
            entry.track,
            entry.level,
            answer
        );
    }
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ftdh_core::clock::FixedClock;

    fn build() -> CaseEngine<FixedClock> {
        let start = "2024-05-01T09:00:00Z".parse().unwrap();
        CaseEngine::with_clock(EngineConfig::default_test(), FixedClock::new(start))
    }

    fn open_command(form: serde_json::Value) -> IpcCommand {
        serde_json::from_value(serde_json::json!({ "type": "open", "form": form })).unwrap()
    }

    fn valid_form() -> serde_json::Value {
        serde_json::json!({
            "initial_data": {
                "ftdh_number": "FTDH-2024-0311",
                "sending_bank": "DBBL",
                "receiving_bank": "BRAC",
                "sender_account": "1234567890123",
                "beneficiary_account": "9876543210",
                "stan": "482113",
                "transaction_date": "2024-04-28",
                "transaction_amount": 25000.0
            },
            "actions_taken": { "action_taken": "Beneficiary account frozen" },
            "branch_communication": {
                "branch_name": "Motijheel",
                "branch_email": "motijheel@dbbl.example"
            },
            "member_bank_communication": {
                "member_bank_contact": "Dispute desk",
                "member_bank_email": "disputes@brac.example"
            }
        })
    }

    #[test]
    fn invalid_open_creates_no_case() {
        let engine = build();
        let mut form = valid_form();
        form["initial_data"]["receiving_bank"] = "DBBL".into();
        form["initial_data"]["transaction_date"] = "2999-01-01".into();
        form["initial_data"]["transaction_amount"] = serde_json::json!(-5.0);
        form["actions_taken"]["recovery_amount"] = serde_json::json!(1_000_000.0);
        form["branch_communication"]["branch_email"] = "nope".into();

        let mut case = None;
        let reply = handle_command(&engine, &mut case, open_command(form)).unwrap();

        assert!(case.is_none());
        assert_eq!(reply["error"], "invalid_input");
        let fields: Vec<&str> = reply["errors"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|e| e["field"].as_str())
            .collect();
        for field in ["receiving_bank", "transaction_date", "transaction_amount", "branch_email"] {
            assert!(fields.contains(&field), "missing {field} in {fields:?}");
        }
    }

    #[test]
    fn valid_open_replaces_loaded_case() {
        let engine = build();
        let mut case = None;
        let reply = handle_command(&engine, &mut case, open_command(valid_form())).unwrap();

        let opened = case.expect("case opened");
        assert_eq!(reply["case_id"], opened.id.to_string());
        assert_eq!(opened.attributes.stan, 482_113);
        assert_eq!(reply["view"]["overallBadge"]["label"], "New");
    }

    #[test]
    fn commands_need_a_case() {
        let engine = build();
        let mut case = None;
        let err = handle_command(&engine, &mut case, IpcCommand::View).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
