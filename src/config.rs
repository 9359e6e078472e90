use std::collections::HashSet;

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,

    // S3 settings
    pub s3_access_key_id: String,
    pub s3_secret_access_key: String,
    pub s3_bucket: String,

    // Custom endpoint for S3-compatible stores; the AWS default when unset.
    pub s3_endpoint: Option<String>,
    #[serde(default = "default_region")]
    pub s3_region: String,

    // Comma-separated application names eligible for display
    pub apps_to_check: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    /// Parse the allow-list into a set of trimmed application names.
    pub fn allowed_apps(&self) -> HashSet<String> {
        self.apps_to_check
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect()
    }
}
