//! Environment variable provider: `env:VAR` where VAR holds a YAML document.

use async_trait::async_trait;

use crate::confmap::Confmap;
use crate::error::{ConfmapError, Result};
use crate::provider::Provider;

/// Reads a whole configuration document from one environment variable.
#[derive(Debug)]
pub struct EnvProvider;

#[async_trait]
impl Provider for EnvProvider {
    fn scheme(&self) -> &'static str {
        "env"
    }

    async fn retrieve(&self, location: &str) -> Result<Confmap> {
        let contents = std::env::var(location).map_err(|e| ConfmapError::ProviderFetch {
            uri: format!("env:{location}"),
            message: e.to_string(),
        })?;
        Confmap::parse_yaml(&contents)
    }
}
