//! Post-merge tree transforms.
//!
//! Converters run after all sources are merged and before materialization,
//! in registration order. Each is a deterministic pure function of its
//! input tree.

use serde_yaml::Value;

use crate::confmap::Confmap;
use crate::error::{ConfmapError, Result};

/// A pure transform over a merged value tree.
pub trait Converter: Send + Sync {
    /// Name used in logs when the converter runs or fails.
    fn name(&self) -> &'static str;

    /// Transform the tree, producing a new one.
    fn convert(&self, confmap: Confmap) -> Result<Confmap>;
}

/// Environment lookup used by [`ExpandConverter`].
type Lookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Expands `${NAME}` and `${NAME:-default}` references in string values.
///
/// A reference to an unset variable without a default fails the whole
/// resolution with [`ConfmapError::UnresolvedReference`].
pub struct ExpandConverter {
    lookup: Lookup,
}

impl ExpandConverter {
    /// Expand against the process environment.
    pub fn new() -> Self {
        Self {
            lookup: Box::new(|name| std::env::var(name).ok()),
        }
    }

    /// Expand against a custom lookup (used by tests and embedders).
    pub fn with_lookup(lookup: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        Self {
            lookup: Box::new(lookup),
        }
    }

    fn expand_value(&self, value: Value) -> Result<Value> {
        match value {
            Value::String(s) => Ok(Value::String(self.expand_string(&s)?)),
            Value::Sequence(seq) => Ok(Value::Sequence(
                seq.into_iter()
                    .map(|v| self.expand_value(v))
                    .collect::<Result<_>>()?,
            )),
            Value::Mapping(map) => Ok(Value::Mapping(
                map.into_iter()
                    .map(|(k, v)| Ok((k, self.expand_value(v)?)))
                    .collect::<Result<_>>()?,
            )),
            other => Ok(other),
        }
    }

    fn expand_string(&self, input: &str) -> Result<String> {
        let mut out = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find('}') else {
                // Unterminated reference, keep the literal text.
                out.push_str(&rest[start..]);
                return Ok(out);
            };
            out.push_str(&self.expand_reference(&after[..end])?);
            rest = &after[end + 1..];
        }

        out.push_str(rest);
        Ok(out)
    }

    fn expand_reference(&self, reference: &str) -> Result<String> {
        let (name, default) = match reference.split_once(":-") {
            Some((name, default)) => (name, Some(default)),
            None => (reference, None),
        };

        match (self.lookup)(name) {
            Some(value) => Ok(value),
            None => match default {
                Some(default) => Ok(default.to_string()),
                None => Err(ConfmapError::UnresolvedReference {
                    name: name.to_string(),
                }),
            },
        }
    }
}

impl Default for ExpandConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter for ExpandConverter {
    fn name(&self) -> &'static str {
        "expand"
    }

    fn convert(&self, confmap: Confmap) -> Result<Confmap> {
        Confmap::from_value(self.expand_value(confmap.into_value())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn converter(vars: &[(&str, &str)]) -> ExpandConverter {
        let vars: Vec<(String, String)> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ExpandConverter::with_lookup(move |name| {
            vars.iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
        })
    }

    fn convert(conv: &ExpandConverter, yaml: &str) -> Result<Confmap> {
        conv.convert(Confmap::parse_yaml(yaml).unwrap())
    }

    #[test]
    fn test_expand_replaces_reference() {
        let conv = converter(&[("ENDPOINT", "localhost:4317")]);
        let map = convert(&conv, "exporters:\n  otlp:\n    endpoint: ${ENDPOINT}\n").unwrap();
        assert_eq!(
            map.get("exporters.otlp.endpoint").and_then(Value::as_str),
            Some("localhost:4317")
        );
    }

    #[test]
    fn test_expand_within_larger_string() {
        let conv = converter(&[("HOST", "collector.internal")]);
        let map = convert(&conv, "endpoint: https://${HOST}:4318/v1\n").unwrap();
        assert_eq!(
            map.get("endpoint").and_then(Value::as_str),
            Some("https://collector.internal:4318/v1")
        );
    }

    #[test]
    fn test_expand_multiple_references() {
        let conv = converter(&[("A", "1"), ("B", "2")]);
        let map = convert(&conv, "value: ${A}-${B}\n").unwrap();
        assert_eq!(map.get("value").and_then(Value::as_str), Some("1-2"));
    }

    #[test]
    fn test_unset_without_default_fails() {
        let conv = converter(&[]);
        let err = convert(&conv, "key: ${MISSING}\n").unwrap_err();
        assert!(matches!(err, ConfmapError::UnresolvedReference { name } if name == "MISSING"));
    }

    #[test]
    fn test_unset_with_default_uses_default() {
        let conv = converter(&[]);
        let map = convert(&conv, "level: ${LOG_LEVEL:-info}\n").unwrap();
        assert_eq!(map.get("level").and_then(Value::as_str), Some("info"));
    }

    #[test]
    fn test_set_variable_wins_over_default() {
        let conv = converter(&[("LOG_LEVEL", "debug")]);
        let map = convert(&conv, "level: ${LOG_LEVEL:-info}\n").unwrap();
        assert_eq!(map.get("level").and_then(Value::as_str), Some("debug"));
    }

    #[test]
    fn test_expands_inside_sequences() {
        let conv = converter(&[("TAG", "env:prod")]);
        let map = convert(&conv, "tags:\n  - ${TAG}\n  - static\n").unwrap();
        let tags = map.get("tags").and_then(Value::as_sequence).unwrap();
        assert_eq!(tags[0].as_str(), Some("env:prod"));
        assert_eq!(tags[1].as_str(), Some("static"));
    }

    #[test]
    fn test_unterminated_reference_kept_literal() {
        let conv = converter(&[]);
        let map = convert(&conv, "key: \"${OOPS\"\n").unwrap();
        assert_eq!(map.get("key").and_then(Value::as_str), Some("${OOPS"));
    }

    #[test]
    fn test_non_string_scalars_untouched() {
        let conv = converter(&[]);
        let map = convert(&conv, "port: 4317\nenabled: true\n").unwrap();
        assert_eq!(map.get("port"), Some(&Value::from(4317)));
        assert_eq!(map.get("enabled"), Some(&Value::from(true)));
    }
}
