//! Links a host application opens
//!
//! A host menu action asks `POST /get_url` for the server port and opens the
//! server root. When a save completes the host receives a
//! [`CompletionRecord`] and opens the viewer on the saved environment.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;
use vista_asset::CompletionRecord;

use crate::error::ServerResult;
use crate::routes::INDEX_PAGE;

/// Scheme of the links handed to a host. The server speaks plain HTTP.
pub const LINK_SCHEME: &str = "http";

/// Body of `POST /get_url`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetUrlResponse {
    pub port: String,
}

/// Server root for the menu action
pub fn menu_url(host: &str, response: &GetUrlResponse) -> String {
    format!("{}://{}:{}", LINK_SCHEME, host, response.port)
}

/// Parse a completion payload
pub fn parse_completion(json: &str) -> ServerResult<CompletionRecord> {
    Ok(serde_json::from_str(json)?)
}

/// Viewer page showing the environment named in `record`
pub fn viewer_url(host: &str, record: &CompletionRecord) -> String {
    let name: String = form_urlencoded::byte_serialize(record.name().as_bytes()).collect();
    format!(
        "{}://{}:{}/{}?env={}",
        LINK_SCHEME,
        host,
        record.port(),
        INDEX_PAGE,
        name
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_url() {
        let response: GetUrlResponse = serde_json::from_str(r#"{"port": "4443"}"#).unwrap();
        assert_eq!(menu_url("192.168.1.20", &response), "http://192.168.1.20:4443");
    }

    #[test]
    fn test_completion_arrays_are_joined() {
        let record = parse_completion(r#"{"env_name": ["cave"], "env_port": ["4443"]}"#).unwrap();
        assert_eq!(viewer_url("localhost", &record), "http://localhost:4443/environments.html?env=cave");
    }

    #[test]
    fn test_completion_plain_strings() {
        let record = parse_completion(r#"{"env_name": "my cave 2", "env_port": "4443"}"#).unwrap();
        assert_eq!(
            viewer_url("host", &record),
            "http://host:4443/environments.html?env=my+cave+2"
        );
    }

    #[test]
    fn test_bad_payload() {
        assert!(parse_completion(r#"{"env_name": 3}"#).is_err());
    }
}
