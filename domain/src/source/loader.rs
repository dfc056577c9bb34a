//! Merging parsed sources into the unified [`ConfigKey`] set.

use super::entities::{ConfigKey, ConfigSource, SourceTag, ValueType};
use super::parsing::{SourceEntry, expressions, is_expression, parse_source};
use crate::config::SyncOptions;
use crate::core::error::MalformedSourceError;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::debug;

static URL_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://\S+$").expect("valid regex"));

static URL_WITH_CREDENTIALS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://[^/@\s:]*:[^/@\s]+@").expect("valid regex")
});

/// Build the unified key set from all sources.
///
/// Every source is parsed before anything is merged, so a malformed source
/// aborts the whole load. Keys come back in discovery order (source order,
/// then line order).
pub fn load_keys(
    sources: &[ConfigSource],
    options: &SyncOptions,
) -> Result<Vec<ConfigKey>, MalformedSourceError> {
    let parsed = sources
        .iter()
        .map(|source| parse_source(source).map(|entries| (source, entries)))
        .collect::<Result<Vec<(&ConfigSource, Vec<SourceEntry>)>, _>>()?;

    let mut keys: Vec<ConfigKey> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut first_literal: HashMap<String, String> = HashMap::new();

    for (source, entries) in &parsed {
        debug!(source = %source.id, entries = entries.len(), "source_parsed");

        for entry in entries {
            let literal = !entry.value.is_empty() && !is_expression(&entry.value);
            {
                let key = key_mut(&mut keys, &mut index, &entry.key);
                key.add_origin(&source.id);

                match (entry.profile, source.tag) {
                    (Some(env), _) | (None, SourceTag::Environment(env)) => {
                        key.per_environment_values.insert(env, entry.value.clone());
                        if literal {
                            key.has_literal = true;
                            first_literal
                                .entry(entry.key.clone())
                                .or_insert_with(|| entry.value.clone());
                        }
                    }
                    (None, SourceTag::Template) => {
                        key.template_default = Some(entry.value.clone());
                    }
                }
            }

            for expr in expressions(&entry.value) {
                let referenced = key_mut(&mut keys, &mut index, &expr.name);
                referenced.add_origin(&source.id);
                if referenced.fallback.is_none() {
                    referenced.fallback = expr.fallback;
                }
            }
        }
    }

    for key in &mut keys {
        let observed = observed_values(key);
        key.value_type = infer_type(&key.name, &observed, options);
        key.is_secret_like = options.is_secret_name(&key.name)
            || observed.iter().any(|v| URL_WITH_CREDENTIALS.is_match(v));
        key.raw_value = key
            .template_literal()
            .map(str::to_string)
            .or_else(|| first_literal.remove(&key.name));
    }

    debug!(sources = sources.len(), keys = keys.len(), "keys_loaded");
    Ok(keys)
}

fn key_mut<'a>(
    keys: &'a mut Vec<ConfigKey>,
    index: &mut HashMap<String, usize>,
    name: &str,
) -> &'a mut ConfigKey {
    let position = *index.entry(name.to_string()).or_insert_with(|| {
        keys.push(ConfigKey::new(name));
        keys.len() - 1
    });
    &mut keys[position]
}

/// Literal values seen for a key across all sources, excluding expressions.
fn observed_values(key: &ConfigKey) -> Vec<String> {
    let mut values: Vec<String> = Vec::new();
    if let Some(default) = key.template_literal()
        && !is_expression(default)
    {
        values.push(default.to_string());
    }
    values.extend(
        key.per_environment_values
            .values()
            .filter(|v| !v.is_empty() && !is_expression(v))
            .cloned(),
    );
    if let Some(fallback) = key.fallback.as_deref().filter(|f| !f.is_empty()) {
        values.push(fallback.to_string());
    }
    values
}

/// Infer the semantic type of a key from its name and observed literals.
///
/// Checked in order: boolean, integer, url (all observed values must agree),
/// then secret by name, otherwise string.
pub fn infer_type(name: &str, values: &[String], options: &SyncOptions) -> ValueType {
    if !values.is_empty() {
        if values
            .iter()
            .all(|v| v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("false"))
        {
            return ValueType::Boolean;
        }
        if values.iter().all(|v| v.parse::<i64>().is_ok()) {
            return ValueType::Integer;
        }
        if values.iter().all(|v| URL_SCHEME.is_match(v)) {
            return ValueType::Url;
        }
    }
    if options.is_secret_name(name) {
        return ValueType::Secret;
    }
    ValueType::String
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::entities::Environment;

    fn load(sources: &[ConfigSource]) -> Vec<ConfigKey> {
        load_keys(sources, &SyncOptions::default()).unwrap()
    }

    fn find<'a>(keys: &'a [ConfigKey], name: &str) -> &'a ConfigKey {
        keys.iter().find(|k| k.name == name).unwrap()
    }

    #[test]
    fn test_same_name_across_sources_is_one_key() {
        let keys = load(&[
            ConfigSource::properties("local.env", Environment::Local, "REDIS_HOST=localhost"),
            ConfigSource::properties("prod.env", Environment::Prod, "REDIS_HOST=redis.internal"),
            ConfigSource::template(".env.example", "REDIS_HOST="),
        ]);
        assert_eq!(keys.len(), 1);
        let key = &keys[0];
        assert_eq!(key.origin, vec!["local.env", "prod.env", ".env.example"]);
        assert_eq!(key.per_environment_values.len(), 2);
        assert_eq!(key.per_environment_values[&Environment::Local], "localhost");
        assert_eq!(key.template_default.as_deref(), Some(""));
        assert_eq!(key.raw_value.as_deref(), Some("localhost"));
    }

    #[test]
    fn test_discovery_order_is_preserved() {
        let keys = load(&[ConfigSource::properties(
            "application.properties",
            Environment::Local,
            "b.key=1\na.key=2\nc.key=3",
        )]);
        let names: Vec<_> = keys.iter().map(|k| k.name.as_str()).collect();
        assert_eq!(names, vec!["b.key", "a.key", "c.key"]);
    }

    #[test]
    fn test_profile_prefix_overrides_source_environment() {
        let keys = load(&[ConfigSource::properties(
            "application.properties",
            Environment::Local,
            "quarkus.log.level=INFO\n%prod.quarkus.log.level=WARN",
        )]);
        let key = find(&keys, "quarkus.log.level");
        assert_eq!(key.per_environment_values[&Environment::Local], "INFO");
        assert_eq!(key.per_environment_values[&Environment::Prod], "WARN");
    }

    #[test]
    fn test_type_inference() {
        let keys = load(&[ConfigSource::properties(
            "application.properties",
            Environment::Local,
            "flag=true\nport=8080\nendpoint=http://localhost:4317\nname=app\nREDIS_PASSWORD=changeme\nempty=",
        )]);
        assert_eq!(find(&keys, "flag").value_type, ValueType::Boolean);
        assert_eq!(find(&keys, "port").value_type, ValueType::Integer);
        assert_eq!(find(&keys, "endpoint").value_type, ValueType::Url);
        assert_eq!(find(&keys, "name").value_type, ValueType::String);
        assert_eq!(find(&keys, "REDIS_PASSWORD").value_type, ValueType::Secret);
        assert_eq!(find(&keys, "empty").value_type, ValueType::String);
    }

    #[test]
    fn test_mixed_values_fall_back_to_string() {
        let keys = load(&[
            ConfigSource::properties("a", Environment::Local, "mode=true"),
            ConfigSource::properties("b", Environment::Prod, "mode=auto"),
        ]);
        assert_eq!(keys[0].value_type, ValueType::String);
    }

    #[test]
    fn test_expression_references_create_keys_with_fallback() {
        let keys = load(&[ConfigSource::properties(
            "application.properties",
            Environment::Local,
            "quarkus.redis.hosts=redis://${REDIS_HOST:localhost}:${REDIS_PORT}",
        )]);
        let hosts = find(&keys, "quarkus.redis.hosts");
        assert!(!hosts.has_literal);

        let host = find(&keys, "REDIS_HOST");
        assert_eq!(host.fallback.as_deref(), Some("localhost"));
        assert_eq!(host.origin, vec!["application.properties"]);
        assert!(host.per_environment_values.is_empty());

        let port = find(&keys, "REDIS_PORT");
        assert!(port.fallback.is_none());
    }

    #[test]
    fn test_secret_like_by_name_and_by_url_credentials() {
        let keys = load(&[ConfigSource::properties(
            "application.properties",
            Environment::Local,
            "API_TOKEN=abc\ndatasource=postgres://app:hunter2@db:5432/app\nplain=http://host",
        )]);
        assert!(find(&keys, "API_TOKEN").is_secret_like);
        assert!(find(&keys, "datasource").is_secret_like);
        assert!(!find(&keys, "plain").is_secret_like);
    }

    #[test]
    fn test_malformed_source_aborts_load() {
        let result = load_keys(
            &[
                ConfigSource::properties("good", Environment::Local, "a=1"),
                ConfigSource::properties("bad", Environment::Prod, "a=1\nbroken"),
            ],
            &SyncOptions::default(),
        );
        let err = result.unwrap_err();
        assert_eq!(err.source_id, "bad");
        assert_eq!(err.line, 2);
    }
}
