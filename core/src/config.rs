use serde::{Deserialize, Serialize};

/// When the member-bank track opens relative to the branch track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberBankGate {
    /// Open once the branch track has left Initial or is resolved.
    #[default]
    AfterBranchEscalated,
    /// Open only once the branch track has exhausted its reminders.
    AfterBranchExhausted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub account_number_min_len: usize,
    pub account_number_max_len: usize,
    /// System trace audit number bounds, inclusive.
    pub stan_min: u32,
    pub stan_max: u32,
    /// Permitted bank identifiers. Empty means any non-empty value.
    pub known_banks: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            account_number_min_len: 10,
            account_number_max_len: 16,
            stan_min: 1,
            stan_max: 999_999,
            known_banks: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub member_bank_gate: MemberBankGate,
    pub validation: ValidationConfig,
}

impl EngineConfig {
    /// Load from a JSON file. Missing keys fall back to defaults.
    /// In tests, use EngineConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: EngineConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.check()?;
        log::debug!(
            "config loaded from {path}: gate={:?}, {} known banks",
            config.member_bank_gate,
            config.validation.known_banks.len()
        );
        Ok(config)
    }

    /// Config with a small fixed bank list for use in tests.
    pub fn default_test() -> Self {
        Self {
            member_bank_gate: MemberBankGate::AfterBranchEscalated,
            validation: ValidationConfig {
                known_banks: vec![
                    "ABBL".into(),
                    "BRAC".into(),
                    "CITY".into(),
                    "DBBL".into(),
                    "EBL".into(),
                ],
                ..ValidationConfig::default()
            },
        }
    }

    fn check(&self) -> anyhow::Result<()> {
        let v = &self.validation;
        if v.account_number_min_len == 0 || v.account_number_min_len > v.account_number_max_len {
            anyhow::bail!(
                "account number length bounds are inverted: {}..={}",
                v.account_number_min_len,
                v.account_number_max_len
            );
        }
        if v.stan_min > v.stan_max {
            anyhow::bail!("STAN bounds are inverted: {}..={}", v.stan_min, v.stan_max);
        }
        Ok(())
    }
}
