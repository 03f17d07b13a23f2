use std::path::PathBuf;

use helpdesk_core::ticket_form::{ticket_defaults, ticket_rule_set};
use helpdesk_core::{FormRecord, RuleSet};
use serde::Deserialize;

use crate::error::WizardError;

/// Rule set plus the declared defaults a fresh wizard starts from.
#[derive(Debug, Clone)]
pub struct LoadedForm {
    pub rule_set: RuleSet,
    pub defaults: FormRecord,
}

/// Optional `defaults` object alongside `steps` in a rule-set file.
#[derive(Deserialize)]
struct DefaultsFile {
    #[serde(default)]
    defaults: FormRecord,
}

/// Wizard configuration loaded from environment variables.
#[derive(Debug, Clone, Default)]
pub struct WizardConfig {
    /// JSON rule-set file. When `None` the built-in ticket form is used.
    pub rules_path: Option<PathBuf>,
}

impl WizardConfig {
    /// Load configuration from environment variables with defaults. A
    /// `.env` file in the working directory is read first when present.
    ///
    /// | Env Var               | Default                  |
    /// |-----------------------|--------------------------|
    /// | `HELPDESK_RULES_PATH` | unset (built-in rules)   |
    pub fn from_env() -> Result<Self, WizardError> {
        dotenvy::dotenv().ok();

        let rules_path = match std::env::var("HELPDESK_RULES_PATH") {
            Ok(path) if !path.trim().is_empty() => Some(PathBuf::from(path.trim())),
            Ok(_) | Err(std::env::VarError::NotPresent) => None,
            Err(e) => {
                return Err(WizardError::Config(format!(
                    "HELPDESK_RULES_PATH is not valid: {e}"
                )))
            }
        };
        Ok(Self { rules_path })
    }

    /// Load the configured rule set and defaults.
    pub fn load(&self) -> Result<LoadedForm, WizardError> {
        let Some(path) = &self.rules_path else {
            tracing::debug!("Using built-in ticket rule set");
            return Ok(LoadedForm {
                rule_set: ticket_rule_set()?,
                defaults: ticket_defaults(),
            });
        };

        let json = std::fs::read_to_string(path).map_err(|e| {
            WizardError::Config(format!("Cannot read rule set {}: {e}", path.display()))
        })?;
        let form = parse_form(&json)?;
        tracing::info!(
            path = %path.display(),
            steps = form.rule_set.step_count(),
            "Loaded rule set"
        );
        Ok(form)
    }
}

/// Parse a rule-set file: `{"steps": [...], "defaults": {...}}`.
pub fn parse_form(json: &str) -> Result<LoadedForm, WizardError> {
    let rule_set = RuleSet::from_json(json)?;
    let file: DefaultsFile = serde_json::from_str(json)
        .map_err(|e| WizardError::Config(format!("Invalid defaults: {e}")))?;
    Ok(LoadedForm {
        rule_set,
        defaults: file.defaults,
    })
}
