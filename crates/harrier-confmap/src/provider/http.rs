//! HTTP provider: fetches YAML documents over http/https.

use async_trait::async_trait;

use crate::confmap::Confmap;
use crate::error::{ConfmapError, Result};
use crate::provider::Provider;

/// Fetches configuration documents from a remote URL.
///
/// One instance serves exactly one scheme so that `http:` and `https:` are
/// independent registrations, mirroring the rest of the provider set.
#[derive(Debug)]
pub struct HttpProvider {
    scheme: &'static str,
    client: reqwest::Client,
}

impl HttpProvider {
    /// Provider for `http:` URIs.
    pub fn http() -> Self {
        Self {
            scheme: "http",
            client: reqwest::Client::new(),
        }
    }

    /// Provider for `https:` URIs.
    pub fn https() -> Self {
        Self {
            scheme: "https",
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Provider for HttpProvider {
    fn scheme(&self) -> &'static str {
        self.scheme
    }

    async fn retrieve(&self, location: &str) -> Result<Confmap> {
        // `location` is the URI minus its scheme prefix ("//host/path").
        let url = format!("{}:{}", self.scheme, location);

        let fetch_err = |message: String| ConfmapError::ProviderFetch {
            uri: url.clone(),
            message,
        };

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| fetch_err(e.to_string()))?;
        let response = response
            .error_for_status()
            .map_err(|e| fetch_err(e.to_string()))?;
        let body = response
            .text()
            .await
            .map_err(|e| fetch_err(e.to_string()))?;

        Confmap::parse_yaml(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_url_is_fetch_error() {
        let provider = HttpProvider::http();
        let err = provider.retrieve("//[malformed/config.yaml").await.unwrap_err();
        assert!(matches!(err, ConfmapError::ProviderFetch { .. }));
    }

    #[test]
    fn test_schemes() {
        assert_eq!(HttpProvider::http().scheme(), "http");
        assert_eq!(HttpProvider::https().scheme(), "https");
    }
}
