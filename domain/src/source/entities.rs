//! Source Loader entities.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Deployment environment a source belongs to.
///
/// Ordering is the rendering order of environment columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Local,
    Prod,
    Test,
}

impl Environment {
    pub const ALL: [Environment; 3] = [Environment::Local, Environment::Prod, Environment::Test];

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Prod => "prod",
            Environment::Test => "test",
        }
    }

    /// Map a Quarkus configuration profile (`%dev.`, `%prod.`, `%test.`) to an environment.
    pub fn from_profile(profile: &str) -> Option<Self> {
        match profile.to_ascii_lowercase().as_str() {
            "dev" | "local" => Some(Environment::Local),
            "prod" => Some(Environment::Prod),
            "test" => Some(Environment::Test),
            _ => None,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Environment::Local),
            "prod" => Ok(Environment::Prod),
            "test" => Ok(Environment::Test),
            other => Err(format!("Unknown environment: {}", other)),
        }
    }
}

/// The single attribution tag every source carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTag {
    Environment(Environment),
    /// The environment-variable template (`.env.example` and friends)
    Template,
}

impl SourceTag {
    pub fn environment(&self) -> Option<Environment> {
        match self {
            SourceTag::Environment(env) => Some(*env),
            SourceTag::Template => None,
        }
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceTag::Environment(env) => write!(f, "{}", env),
            SourceTag::Template => f.write_str("template"),
        }
    }
}

impl FromStr for SourceTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("template") {
            Ok(SourceTag::Template)
        } else {
            s.parse::<Environment>()
                .map(SourceTag::Environment)
                .map_err(|_| format!("Unknown source tag: {} (expected local, prod, test or template)", s.trim()))
        }
    }
}

/// Line syntax of a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceFormat {
    /// `key=value` per line, `#`/`!` comments, `%profile.` prefixes
    Properties,
    /// `NAME=default_or_empty` per line, `#` comments
    EnvTemplate,
}

impl SourceFormat {
    /// Infer the format from a file name.
    pub fn infer(file_name: &str) -> Self {
        let name = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
        if name.starts_with(".env")
            || name.ends_with(".env")
            || name.ends_with(".env.example")
            || name.ends_with(".env.template")
        {
            SourceFormat::EnvTemplate
        } else {
            SourceFormat::Properties
        }
    }
}

impl FromStr for SourceFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "properties" => Ok(SourceFormat::Properties),
            "env-template" | "env" | "dotenv" => Ok(SourceFormat::EnvTemplate),
            other => Err(format!("Unknown source format: {}", other)),
        }
    }
}

/// A named configuration source with its raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    pub id: String,
    pub tag: SourceTag,
    pub format: SourceFormat,
    pub content: String,
}

impl ConfigSource {
    pub fn new(
        id: impl Into<String>,
        tag: SourceTag,
        format: SourceFormat,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            tag,
            format,
            content: content.into(),
        }
    }

    /// Properties source for an environment.
    pub fn properties(id: impl Into<String>, env: Environment, content: impl Into<String>) -> Self {
        Self::new(id, SourceTag::Environment(env), SourceFormat::Properties, content)
    }

    /// Environment-variable template source.
    pub fn template(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(id, SourceTag::Template, SourceFormat::EnvTemplate, content)
    }
}

/// Inferred semantic type of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Boolean,
    Integer,
    Url,
    Secret,
    Enum,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Boolean => "boolean",
            ValueType::Integer => "integer",
            ValueType::Url => "url",
            ValueType::Secret => "secret",
            ValueType::Enum => "enum",
        }
    }

    /// Whether a documented type is acceptable for this inferred type.
    ///
    /// `enum` is a hand-written refinement of `string`.
    pub fn accepts_documented(&self, documented: ValueType) -> bool {
        *self == documented || (*self == ValueType::String && documented == ValueType::Enum)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = String;

    /// Parse a documented type cell; common synonyms are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" | "str" | "text" => Ok(ValueType::String),
            "boolean" | "bool" => Ok(ValueType::Boolean),
            "integer" | "int" | "number" | "long" => Ok(ValueType::Integer),
            "url" | "uri" => Ok(ValueType::Url),
            "secret" | "password" | "credential" => Ok(ValueType::Secret),
            "enum" => Ok(ValueType::Enum),
            other => Err(format!("Unknown type: {}", other)),
        }
    }
}

/// A single configuration property or environment variable, unified across
/// every source that declares it.
///
/// `name` is the identity: the same name in several sources is one key with
/// several `per_environment_values` entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigKey {
    pub name: String,
    /// First literal value seen (template default preferred)
    pub raw_value: Option<String>,
    pub value_type: ValueType,
    /// Source ids that declared or referenced the key, in discovery order
    pub origin: Vec<String>,
    pub per_environment_values: BTreeMap<Environment, String>,
    /// Value in the template source; `Some("")` when declared there without a default
    pub template_default: Option<String>,
    /// Fallback literal from a `${NAME:fallback}` expression
    pub fallback: Option<String>,
    /// Whether any properties/env source gave a non-empty, non-expression value
    pub has_literal: bool,
    pub is_secret_like: bool,
}

impl ConfigKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw_value: None,
            value_type: ValueType::String,
            origin: Vec::new(),
            per_environment_values: BTreeMap::new(),
            template_default: None,
            fallback: None,
            has_literal: false,
            is_secret_like: false,
        }
    }

    pub fn in_template(&self) -> bool {
        self.template_default.is_some()
    }

    /// Non-empty template default, if any.
    pub fn template_literal(&self) -> Option<&str> {
        self.template_default.as_deref().filter(|v| !v.is_empty())
    }

    pub(crate) fn add_origin(&mut self, source_id: &str) {
        if !self.origin.iter().any(|o| o == source_id) {
            self.origin.push(source_id.to_string());
        }
    }
}
