//! Launch parameters
//!
//! The viewer can be opened from a link such as
//! `https://host:4443/environments.html?env=cave`: everything up to the last
//! path segment is the asset server, and `env` names the environment.

use url::Url;

use crate::config::ConfigError;

/// Where to read from and what to open first
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LaunchRequest {
    /// Asset source override
    pub source: Option<String>,
    /// Environment to open
    pub environment: Option<String>,
}

impl LaunchRequest {
    /// Parse a viewer link.
    pub fn from_url(link: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(link)
            .map_err(|e| ConfigError::Invalid(format!("invalid launch URL {:?}: {}", link, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "launch URL must be http(s): {}",
                link
            )));
        }

        let environment = environment_from_query(url.query().unwrap_or(""));

        // Drop the page name; the server root is its directory.
        let mut base = url.clone();
        base.set_query(None);
        base.set_fragment(None);
        if !base.path().ends_with('/') {
            if let Ok(mut segments) = base.path_segments_mut() {
                segments.pop().push("");
            }
        }

        Ok(Self {
            source: Some(base.to_string()),
            environment,
        })
    }

    /// Apply on top of a config, overriding what the request specifies
    pub fn apply(&self, config: &mut crate::config::ViewerConfig) {
        if let Some(source) = &self.source {
            config.source.location = source.clone();
        }
        if let Some(environment) = &self.environment {
            config.source.environment = Some(environment.clone());
        }
    }
}

/// Value of the `env` parameter in a query string
pub fn environment_from_query(query: &str) -> Option<String> {
    url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        .find(|(key, _)| key == "env")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewerConfig;

    #[test]
    fn test_viewer_link() {
        let request = LaunchRequest::from_url("https://192.168.1.7:4443/environments.html?env=cave").unwrap();
        assert_eq!(request.source.as_deref(), Some("https://192.168.1.7:4443/"));
        assert_eq!(request.environment.as_deref(), Some("cave"));
    }

    #[test]
    fn test_root_link_without_env() {
        let request = LaunchRequest::from_url("https://host:4443").unwrap();
        assert_eq!(request.source.as_deref(), Some("https://host:4443/"));
        assert_eq!(request.environment, None);
    }

    #[test]
    fn test_encoded_name() {
        let request =
            LaunchRequest::from_url("http://host/viewer/environments.html?x=1&env=cave%202").unwrap();
        assert_eq!(request.source.as_deref(), Some("http://host/viewer/"));
        assert_eq!(request.environment.as_deref(), Some("cave 2"));
    }

    #[test]
    fn test_rejects_non_http() {
        assert!(LaunchRequest::from_url("file:///tmp/x.html?env=a").is_err());
        assert!(LaunchRequest::from_url("not a url").is_err());
    }

    #[test]
    fn test_query_parsing() {
        assert_eq!(environment_from_query("?env=beach").as_deref(), Some("beach"));
        assert_eq!(environment_from_query("env="), None);
        assert_eq!(environment_from_query(""), None);
    }

    #[test]
    fn test_apply() {
        let mut config = ViewerConfig::default();
        LaunchRequest {
            source: None,
            environment: Some("forest".into()),
        }
        .apply(&mut config);
        assert_eq!(config.source.location, ".");
        assert_eq!(config.source.environment.as_deref(), Some("forest"));
    }
}
