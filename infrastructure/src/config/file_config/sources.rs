//! Configuration source entries from TOML (`[[sources]]` array)

use super::ConfigValidationError;
use docsync_application::SourceSpec;
use docsync_domain::{SourceFormat, SourceTag};
use serde::{Deserialize, Serialize};

/// One configuration source to reconcile against
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSourceConfig {
    pub path: String,
    /// `local`, `prod`, `test` or `template`
    pub environment: String,
    /// `properties` or `env-template`; inferred from the file name when absent
    pub format: Option<String>,
    /// Identifier used in reports; defaults to the path
    pub id: Option<String>,
}

impl FileSourceConfig {
    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.path)
    }

    /// Convert to a source spec, parsing the environment tag and format.
    pub fn to_spec(&self) -> Result<SourceSpec, ConfigValidationError> {
        if self.path.trim().is_empty() {
            return Err(ConfigValidationError::EmptySourcePath);
        }
        let tag: SourceTag =
            self.environment
                .parse()
                .map_err(|_| ConfigValidationError::InvalidEnvironment {
                    path: self.path.clone(),
                    value: self.environment.clone(),
                })?;

        let mut spec = SourceSpec::new(&self.path, tag).with_id(self.id());
        if let Some(format) = &self.format {
            let format: SourceFormat =
                format
                    .parse()
                    .map_err(|_| ConfigValidationError::InvalidFormat {
                        path: self.path.clone(),
                        value: format.clone(),
                    })?;
            spec = spec.with_format(format);
        }
        Ok(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsync_domain::Environment;

    fn source(path: &str, environment: &str) -> FileSourceConfig {
        FileSourceConfig {
            path: path.to_string(),
            environment: environment.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_to_spec_infers_format() {
        let spec = source(".env.example", "template").to_spec().unwrap();
        assert_eq!(spec.tag, SourceTag::Template);
        assert_eq!(spec.id, ".env.example");
        assert_eq!(spec.resolved_format(), SourceFormat::EnvTemplate);
    }

    #[test]
    fn test_to_spec_with_explicit_format_and_id() {
        let mut config = source("conf/prod.conf", "prod");
        config.format = Some("env-template".to_string());
        config.id = Some("prod".to_string());

        let spec = config.to_spec().unwrap();
        assert_eq!(spec.tag, SourceTag::Environment(Environment::Prod));
        assert_eq!(spec.id, "prod");
        assert_eq!(spec.format, Some(SourceFormat::EnvTemplate));
    }

    #[test]
    fn test_to_spec_rejects_unknown_values() {
        assert!(matches!(
            source("a.properties", "staging").to_spec(),
            Err(ConfigValidationError::InvalidEnvironment { value, .. }) if value == "staging"
        ));

        let mut config = source("a.properties", "local");
        config.format = Some("yaml".to_string());
        assert!(matches!(
            config.to_spec(),
            Err(ConfigValidationError::InvalidFormat { value, .. }) if value == "yaml"
        ));

        assert!(matches!(
            source(" ", "local").to_spec(),
            Err(ConfigValidationError::EmptySourcePath)
        ));
    }
}
