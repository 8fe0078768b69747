//! Inline YAML provider: `yaml:key: value` carries the document in the URI.

use async_trait::async_trait;

use crate::confmap::Confmap;
use crate::error::Result;
use crate::provider::Provider;

/// Parses the URI location itself as a YAML document.
#[derive(Debug)]
pub struct YamlProvider;

#[async_trait]
impl Provider for YamlProvider {
    fn scheme(&self) -> &'static str {
        "yaml"
    }

    async fn retrieve(&self, location: &str) -> Result<Confmap> {
        Confmap::parse_yaml(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfmapError;

    #[tokio::test]
    async fn test_retrieve_inline_fragment() {
        let provider = YamlProvider;
        let map = provider
            .retrieve("exporters: {debug: {verbosity: detailed}}")
            .await
            .unwrap();
        assert_eq!(
            map.get("exporters.debug.verbosity")
                .and_then(serde_yaml::Value::as_str),
            Some("detailed")
        );
    }

    #[tokio::test]
    async fn test_retrieve_invalid_yaml() {
        let provider = YamlProvider;
        let err = provider.retrieve("{unclosed").await.unwrap_err();
        assert!(matches!(err, ConfmapError::Parse(_)));
    }
}
