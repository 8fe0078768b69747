//! Configuration source URIs.

use std::fmt;
use std::str::FromStr;

/// Scheme assumed when a URI carries none.
pub const DEFAULT_SCHEME: &str = "file";

/// A configuration source URI of the form `scheme:location`.
///
/// A bare path (no scheme, or a single-letter prefix such as a Windows
/// drive) resolves to the `file` scheme with the whole string as location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigUri {
    scheme: String,
    location: String,
}

impl ConfigUri {
    /// Parse a raw URI string, falling back to the `file` scheme.
    pub fn parse(raw: &str) -> Self {
        if let Some(idx) = raw.find(':') {
            let (scheme, rest) = raw.split_at(idx);
            if is_valid_scheme(scheme) {
                return Self {
                    scheme: scheme.to_ascii_lowercase(),
                    location: rest[1..].to_string(),
                };
            }
        }
        Self {
            scheme: DEFAULT_SCHEME.to_string(),
            location: raw.to_string(),
        }
    }

    /// The URI scheme, always lowercase.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Everything after the `scheme:` prefix.
    pub fn location(&self) -> &str {
        &self.location
    }
}

/// RFC 3986 scheme, with a two-character minimum so that Windows drive
/// prefixes (`C:\...`) fall through to the file provider.
fn is_valid_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    s.len() >= 2
        && first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
}

impl FromStr for ConfigUri {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for ConfigUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.scheme, self.location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_scheme() {
        let uri = ConfigUri::parse("env:HARRIER_CONFIG");
        assert_eq!(uri.scheme(), "env");
        assert_eq!(uri.location(), "HARRIER_CONFIG");
    }

    #[test]
    fn test_parse_bare_path_defaults_to_file() {
        let uri = ConfigUri::parse("config.yaml");
        assert_eq!(uri.scheme(), "file");
        assert_eq!(uri.location(), "config.yaml");
    }

    #[test]
    fn test_parse_absolute_path() {
        let uri = ConfigUri::parse("/etc/harrier/config.yaml");
        assert_eq!(uri.scheme(), "file");
        assert_eq!(uri.location(), "/etc/harrier/config.yaml");
    }

    #[test]
    fn test_parse_windows_drive_is_a_path() {
        let uri = ConfigUri::parse(r"C:\harrier\config.yaml");
        assert_eq!(uri.scheme(), "file");
        assert_eq!(uri.location(), r"C:\harrier\config.yaml");
    }

    #[test]
    fn test_parse_https() {
        let uri = ConfigUri::parse("https://example.com/config.yaml");
        assert_eq!(uri.scheme(), "https");
        assert_eq!(uri.location(), "//example.com/config.yaml");
    }

    #[test]
    fn test_scheme_is_lowercased() {
        let uri = ConfigUri::parse("FILE:config.yaml");
        assert_eq!(uri.scheme(), "file");
    }

    #[test]
    fn test_display_round_trip() {
        let uri = ConfigUri::parse("yaml:receivers: {}");
        assert_eq!(uri.to_string(), "yaml:receivers: {}");
        assert_eq!(ConfigUri::parse(&uri.to_string()), uri);
    }
}
