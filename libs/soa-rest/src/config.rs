use serde::{Deserialize, Serialize};

/// Endpoint settings bound into a [`crate::RequestBuilder`] at construction.
///
/// The builder never mutates its config; a call that needs different settings
/// goes through a second builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Base path every request path starts with
    #[serde(default = "default_path")]
    pub path: String,

    #[serde(default = "default_protocol")]
    pub protocol: String,

    #[serde(default)]
    pub with_credentials: bool,

    /// Omit the resource segment from every request path
    #[serde(default)]
    pub exclude_resource_from_path: bool,
}

fn default_host() -> String {
    "localhost".to_owned()
}

fn default_port() -> u16 {
    80
}

fn default_path() -> String {
    "/api".to_owned()
}

fn default_protocol() -> String {
    "http".to_owned()
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            path: default_path(),
            protocol: default_protocol(),
            with_credentials: false,
            exclude_resource_from_path: false,
        }
    }
}
