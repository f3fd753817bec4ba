//! Case-creation wizard: four gated steps in front of `CaseEngine::open_case`.
//!
//! Validation is not an error channel: a half-filled form is routine, so
//! `validate` always returns a `ValidationResult` listing zero or more
//! field messages. Only navigation that breaks the gating rule errors.
//!
//! Navigation rules:
//!   - `advance` moves forward one step, and only when the current step validates.
//!   - `jump_to` may revisit any completed step or any earlier step, never skip ahead.
//!   - `submit` re-validates every step before a case is created.
//!
//! "Today" for the future-date rule is read from the engine clock.

use crate::{
    case::{Case, DisputeAttributes},
    clock::{Clock, SystemClock},
    config::ValidationConfig,
    engine::CaseEngine,
    error::{CaseError, CaseResult},
    level::Level,
    track::TrackKind,
    types::Amount,
};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt, sync::LazyLock};

static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").unwrap());

/// local@domain.tld: no whitespace, a single `@`, no empty domain labels.
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    InitialData,
    ActionsTaken,
    BranchCommunication,
    MemberBankCommunication,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::InitialData,
        WizardStep::ActionsTaken,
        WizardStep::BranchCommunication,
        WizardStep::MemberBankCommunication,
    ];

    /// 1-based position shown to the user.
    pub fn number(self) -> usize {
        self as usize + 1
    }

    pub fn next(self) -> Option<WizardStep> {
        Self::ALL.get(self as usize + 1).copied()
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InitialData             => "initial data",
            Self::ActionsTaken            => "actions taken",
            Self::BranchCommunication     => "branch communication",
            Self::MemberBankCommunication => "member bank communication",
        };
        write!(f, "step {} ({name})", self.number())
    }
}

// ── Form state ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialDataForm {
    pub ftdh_number: String,
    pub sending_bank: String,
    pub receiving_bank: String,
    pub sender_account: String,
    pub beneficiary_account: String,
    /// Kept as text so leading zeros and stray characters survive until validation.
    pub stan: String,
    pub transaction_date: Option<NaiveDate>,
    pub transaction_amount: Option<Amount>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionsTakenForm {
    pub action_taken: String,
    pub recovery_amount: Option<Amount>,
    pub amount_on_hold: Option<Amount>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BranchCommunicationForm {
    pub branch_name: String,
    pub branch_email: String,
    /// Mark the branch Initial notice sent as part of case creation.
    pub send_initial_notice: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberBankCommunicationForm {
    pub member_bank_contact: String,
    pub member_bank_email: String,
    pub member_bank_reference: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseForm {
    pub initial_data: InitialDataForm,
    pub actions_taken: ActionsTakenForm,
    pub branch_communication: BranchCommunicationForm,
    pub member_bank_communication: MemberBankCommunicationForm,
}

// ── Validation result ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub step: WizardStep,
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub errors: Vec<FieldError>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn messages_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.errors
            .iter()
            .filter(move |e| e.field == field)
            .map(|e| e.message.as_str())
    }

    fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
    }
}

/// Collects field errors for one step.
struct Checker<'a> {
    step: WizardStep,
    config: &'a ValidationConfig,
    result: ValidationResult,
}

impl<'a> Checker<'a> {
    fn new(step: WizardStep, config: &'a ValidationConfig) -> Self {
        Self {
            step,
            config,
            result: ValidationResult::default(),
        }
    }

    fn fail(&mut self, field: &str, message: impl Into<String>) {
        self.result.errors.push(FieldError {
            step: self.step,
            field: field.to_string(),
            message: message.into(),
        });
    }

    /// Returns the trimmed value when present.
    fn required<'v>(&mut self, field: &str, value: &'v str) -> Option<&'v str> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.fail(field, "is required");
            None
        } else {
            Some(trimmed)
        }
    }

    fn bank(&mut self, field: &str, value: &str) -> Option<String> {
        let bank = self.required(field, value)?;
        let config = self.config;
        let known = &config.known_banks;
        if !known.is_empty() && !known.iter().any(|b| b.eq_ignore_ascii_case(bank)) {
            self.fail(field, format!("'{bank}' is not a recognised bank"));
            return None;
        }
        Some(bank.to_ascii_uppercase())
    }

    fn account_number(&mut self, field: &str, value: &str) {
        let Some(account) = self.required(field, value) else {
            return;
        };
        if !DIGITS.is_match(account) {
            self.fail(field, "must contain digits only");
            return;
        }
        let (min, max) = (
            self.config.account_number_min_len,
            self.config.account_number_max_len,
        );
        if !(min..=max).contains(&account.len()) {
            self.fail(field, format!("must be {min} to {max} digits long"));
        }
    }

    fn stan(&mut self, field: &str, value: &str) {
        let Some(stan) = self.required(field, value) else {
            return;
        };
        if !DIGITS.is_match(stan) {
            self.fail(field, "must be numeric");
            return;
        }
        // Digit strings too long for u32 are out of range, not malformed.
        let (min, max) = (self.config.stan_min, self.config.stan_max);
        if !parse_stan(stan).is_some_and(|n| (min..=max).contains(&n)) {
            self.fail(field, format!("must be between {min} and {max}"));
        }
    }

    fn amount_within(&mut self, field: &str, value: Option<Amount>, ceiling: Option<Amount>) {
        let Some(amount) = value else {
            return;
        };
        if !amount.is_finite() || amount < 0.0 {
            self.fail(field, "must be zero or more");
        } else if let Some(ceiling) = ceiling.filter(|c| amount > *c) {
            self.fail(field, format!("cannot exceed the transaction amount ({ceiling:.2})"));
        }
    }

    fn email(&mut self, field: &str, value: &str) {
        let Some(email) = self.required(field, value) else {
            return;
        };
        if !is_well_formed_email(email) {
            self.fail(field, "is not a valid email address");
        }
    }

    fn finish(self) -> ValidationResult {
        self.result
    }
}

fn parse_stan(value: &str) -> Option<u32> {
    DIGITS.is_match(value).then(|| value.parse().ok()).flatten()
}

fn is_well_formed_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

// ── Step rules ───────────────────────────────────────────────────────────────

pub fn validate(
    step: WizardStep,
    form: &CaseForm,
    config: &ValidationConfig,
    today: NaiveDate,
) -> ValidationResult {
    let mut check = Checker::new(step, config);
    match step {
        WizardStep::InitialData => {
            let data = &form.initial_data;
            check.required("ftdh_number", &data.ftdh_number);
            let sending = check.bank("sending_bank", &data.sending_bank);
            let receiving = check.bank("receiving_bank", &data.receiving_bank);
            if let (Some(s), Some(r)) = (sending, receiving) {
                if s == r {
                    check.fail("receiving_bank", "must differ from the sending bank");
                }
            }
            check.account_number("sender_account", &data.sender_account);
            check.account_number("beneficiary_account", &data.beneficiary_account);
            check.stan("stan", &data.stan);
            match data.transaction_date {
                None => check.fail("transaction_date", "is required"),
                Some(date) if date > today => {
                    check.fail("transaction_date", "cannot be in the future")
                }
                Some(_) => {}
            }
            match data.transaction_amount {
                None => check.fail("transaction_amount", "is required"),
                Some(a) if !a.is_finite() || a <= 0.0 => {
                    check.fail("transaction_amount", "must be greater than zero")
                }
                Some(_) => {}
            }
        }
        WizardStep::ActionsTaken => {
            let actions = &form.actions_taken;
            let ceiling = form.initial_data.transaction_amount;
            check.required("action_taken", &actions.action_taken);
            check.amount_within("recovery_amount", actions.recovery_amount, ceiling);
            check.amount_within("amount_on_hold", actions.amount_on_hold, ceiling);
        }
        WizardStep::BranchCommunication => {
            let branch = &form.branch_communication;
            check.required("branch_name", &branch.branch_name);
            check.email("branch_email", &branch.branch_email);
        }
        WizardStep::MemberBankCommunication => {
            let member = &form.member_bank_communication;
            check.required("member_bank_contact", &member.member_bank_contact);
            check.email("member_bank_email", &member.member_bank_email);
        }
    }
    check.finish()
}

// ── Controller ───────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum SubmitOutcome {
    Created(Case),
    Invalid(ValidationResult),
}

/// Navigation state for one case being created. Borrows the engine for
/// its validation config and clock, and for `submit`.
pub struct Wizard<'e, C: Clock = SystemClock> {
    engine: &'e CaseEngine<C>,
    current_step: WizardStep,
    completed_steps: BTreeSet<WizardStep>,
}

impl<'e, C: Clock> Wizard<'e, C> {
    pub fn new(engine: &'e CaseEngine<C>) -> Self {
        Self {
            engine,
            current_step: WizardStep::InitialData,
            completed_steps: BTreeSet::new(),
        }
    }

    fn today(&self) -> NaiveDate {
        self.engine.clock().now().date_naive()
    }

    pub fn current_step(&self) -> WizardStep {
        self.current_step
    }

    pub fn completed_steps(&self) -> &BTreeSet<WizardStep> {
        &self.completed_steps
    }

    pub fn is_completed(&self, step: WizardStep) -> bool {
        self.completed_steps.contains(&step)
    }

    pub fn validate(&self, step: WizardStep, form: &CaseForm) -> ValidationResult {
        validate(step, form, &self.engine.config.validation, self.today())
    }

    /// Validate the current step and move forward on success.
    /// On failure nothing changes and the field errors are returned.
    pub fn advance(&mut self, form: &CaseForm) -> ValidationResult {
        let result = self.validate(self.current_step, form);
        if !result.is_valid() {
            log::debug!(
                "wizard: {} blocked by {} field error(s)",
                self.current_step,
                result.errors.len()
            );
            return result;
        }
        self.completed_steps.insert(self.current_step);
        if let Some(next) = self.current_step.next() {
            self.current_step = next;
        }
        result
    }

    pub fn jump_to(&mut self, step: WizardStep) -> CaseResult<()> {
        if step < self.current_step || self.is_completed(step) {
            self.current_step = step;
            Ok(())
        } else {
            Err(CaseError::StepNotReachable { step })
        }
    }

    /// Re-validate all steps and, when every one passes, open the case.
    pub fn submit(&self, form: &CaseForm) -> CaseResult<SubmitOutcome> {
        let mut all = ValidationResult::default();
        for step in WizardStep::ALL {
            all.merge(self.validate(step, form));
        }
        let Some(attributes) = all.is_valid().then(|| attributes_from(form)).flatten() else {
            log::debug!("wizard: submit blocked by {} field error(s)", all.errors.len());
            return Ok(SubmitOutcome::Invalid(all));
        };

        let mut case = self.engine.open_case(attributes);
        if form.branch_communication.send_initial_notice {
            case = self.engine.mark_sent(&case, TrackKind::Branch, Level::Initial)?;
        }
        Ok(SubmitOutcome::Created(case))
    }
}

fn attributes_from(form: &CaseForm) -> Option<DisputeAttributes> {
    let data = &form.initial_data;
    let actions = &form.actions_taken;
    let branch = &form.branch_communication;
    let member = &form.member_bank_communication;
    Some(DisputeAttributes {
        ftdh_number: data.ftdh_number.trim().to_string(),
        sending_bank: data.sending_bank.trim().to_ascii_uppercase(),
        receiving_bank: data.receiving_bank.trim().to_ascii_uppercase(),
        sender_account: data.sender_account.trim().to_string(),
        beneficiary_account: data.beneficiary_account.trim().to_string(),
        stan: parse_stan(data.stan.trim())?,
        transaction_date: data.transaction_date?,
        transaction_amount: data.transaction_amount?,
        action_taken: actions.action_taken.trim().to_string(),
        recovery_amount: actions.recovery_amount,
        amount_on_hold: actions.amount_on_hold,
        branch_name: branch.branch_name.trim().to_string(),
        branch_email: branch.branch_email.trim().to_string(),
        member_bank_contact: member.member_bank_contact.trim().to_string(),
        member_bank_email: member.member_bank_email.trim().to_string(),
        member_bank_reference: member
            .member_bank_reference
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(String::from),
    })
}
