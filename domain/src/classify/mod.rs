//! Key Classifier: requirement status, environment variance and the example
//! value policy.
//!
//! Requirement status is always derived from source data, never stored or
//! hand-set. Secret-like keys are redacted wherever a value would be shown.

use crate::core::error::SecretExposureWarning;
use crate::source::{ConfigKey, Environment};
use serde::Serialize;
use std::collections::BTreeSet;

/// Fixed example value rendered for every secret-like key.
pub const REDACTED_PLACEHOLDER: &str = "REDACTED";

/// Main-table example for keys whose value differs between environments.
pub const VARIES_PLACEHOLDER: &str = "(varies by environment)";

/// Whether a key must be provided by the deployer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequirementStatus {
    Required,
    Optional,
}

impl RequirementStatus {
    /// Derive the status from a key's sources.
    ///
    /// Template variables are required unless the template gives a default or
    /// an expression supplies a fallback; per-environment values only serve
    /// as examples for them. Other keys are required unless some source gives
    /// a literal value or an expression supplies a fallback.
    pub fn of(key: &ConfigKey) -> Self {
        let has_default = if key.in_template() {
            key.template_literal().is_some()
        } else {
            key.has_literal
        };
        if has_default || key.fallback.is_some() {
            RequirementStatus::Optional
        } else {
            RequirementStatus::Required
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, RequirementStatus::Required)
    }
}

/// A ConfigKey with its derived classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedKey {
    pub key: ConfigKey,
    pub requirement: RequirementStatus,
    /// The key has different values in at least two environments
    pub environment_variant: bool,
}

impl ClassifiedKey {
    pub fn new(key: ConfigKey) -> Self {
        let requirement = RequirementStatus::of(&key);
        let distinct: BTreeSet<&String> = key.per_environment_values.values().collect();
        let environment_variant = distinct.len() > 1;
        Self {
            key,
            requirement,
            environment_variant,
        }
    }

    pub fn name(&self) -> &str {
        &self.key.name
    }

    pub fn is_required(&self) -> bool {
        self.requirement.is_required()
    }

    pub fn is_secret_like(&self) -> bool {
        self.key.is_secret_like
    }

    /// The value the documentation should show as the example.
    ///
    /// Empty when no value is known; callers must not overwrite a hand-written
    /// example with an empty one.
    pub fn example_value(&self) -> String {
        if self.key.is_secret_like {
            return REDACTED_PLACEHOLDER.to_string();
        }
        if self.environment_variant {
            return VARIES_PLACEHOLDER.to_string();
        }
        self.key
            .template_literal()
            .or_else(|| self.key.fallback.as_deref().filter(|f| !f.is_empty()))
            .or_else(|| {
                self.key
                    .per_environment_values
                    .values()
                    .map(String::as_str)
                    .find(|v| !v.is_empty())
            })
            .unwrap_or_default()
            .to_string()
    }

    /// Values per environment for the differences view, redacted for secrets.
    pub fn environment_values(&self, environments: &[Environment]) -> Vec<Option<String>> {
        environments
            .iter()
            .map(|env| {
                self.key.per_environment_values.get(env).map(|v| {
                    if self.key.is_secret_like && !v.is_empty() {
                        REDACTED_PLACEHOLDER.to_string()
                    } else {
                        v.clone()
                    }
                })
            })
            .collect()
    }

    /// Whether a secret-like key carries a literal that redaction suppresses.
    fn exposes_literal(&self) -> bool {
        self.key.is_secret_like
            && (self.key.has_literal
                || self.key.template_literal().is_some()
                || self.key.fallback.as_deref().is_some_and(|f| !f.is_empty()))
    }
}

/// Classify every loaded key, preserving discovery order.
pub fn classify(keys: Vec<ConfigKey>) -> Vec<ClassifiedKey> {
    keys.into_iter().map(ClassifiedKey::new).collect()
}

/// Warnings for secret-like keys whose literal values were redacted.
pub fn secret_exposures(keys: &[ClassifiedKey]) -> Vec<SecretExposureWarning> {
    keys.iter()
        .filter(|k| k.exposes_literal())
        .map(|k| SecretExposureWarning {
            key: k.name().to_string(),
            seen_in: k.key.origin.clone(),
        })
        .collect()
}

/// Environments present in any key, in rendering order.
pub fn environments_in_use(keys: &[ClassifiedKey]) -> Vec<Environment> {
    let used: BTreeSet<Environment> = keys
        .iter()
        .flat_map(|k| k.key.per_environment_values.keys().copied())
        .collect();
    used.into_iter().collect()
}
