//! Construction options and their validated form.

use serde::{Deserialize, Serialize};

use invdb_core::ConfigError;

pub const ENV_NAME: &str = "INVDB_NAME";
pub const ENV_URL: &str = "INVDB_URL";
pub const ENV_NUM_ENTRIES: &str = "INVDB_NUM_ENTRIES";

/// Raw construction options, as a caller or a config source supplies them.
///
/// Every field is optional here so that a missing field is a reportable
/// `ConfigError` rather than a decode failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryDbOptions {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, rename = "numEntries", alias = "num_entries")]
    pub num_entries: Option<i64>,
}

impl InventoryDbOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn num_entries(mut self, num_entries: i64) -> Self {
        self.num_entries = Some(num_entries);
        self
    }

    /// Decode options from a JSON document.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(|e| ConfigError::Malformed(e.to_string()))
    }

    /// Read options from `INVDB_NAME`, `INVDB_URL` and `INVDB_NUM_ENTRIES`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read options through an arbitrary key lookup (env-like sources).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let num_entries = match lookup(ENV_NUM_ENTRIES) {
            Some(raw) => Some(
                raw.trim()
                    .parse::<i64>()
                    .map_err(|_| ConfigError::InvalidNumEntries(raw.clone()))?,
            ),
            None => {
                tracing::debug!("{ENV_NUM_ENTRIES} not set");
                None
            }
        };

        Ok(Self {
            name: lookup(ENV_NAME),
            url: lookup(ENV_URL),
            num_entries,
        })
    }

    /// Check every field and produce the engine configuration.
    ///
    /// Fields are checked in declaration order; the first violation is returned.
    pub fn validate(&self) -> Result<InventoryDbConfig, ConfigError> {
        let name = match self.name.as_deref() {
            None => return Err(ConfigError::MissingName),
            Some(n) if n.trim().is_empty() => return Err(ConfigError::EmptyName),
            Some(n) => n.to_string(),
        };

        let url = match self.url.as_deref() {
            None => return Err(ConfigError::MissingUrl),
            Some(u) if u.trim().is_empty() => return Err(ConfigError::EmptyUrl),
            Some(u) => u.to_string(),
        };

        let num_entries = match self.num_entries {
            None => return Err(ConfigError::MissingNumEntries),
            Some(n) if n <= 0 => return Err(ConfigError::NonPositiveNumEntries(n)),
            Some(n) => n as u64,
        };

        Ok(InventoryDbConfig {
            name,
            url,
            num_entries,
        })
    }
}

/// Validated engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryDbConfig {
    name: String,
    url: String,
    num_entries: u64,
}

impl InventoryDbConfig {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Connection string handed to the storage collaborator.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Capacity bound: valid indices are `[0, num_entries)`.
    pub fn num_entries(&self) -> u64 {
        self.num_entries
    }
}

impl TryFrom<InventoryDbOptions> for InventoryDbConfig {
    type Error = ConfigError;

    fn try_from(value: InventoryDbOptions) -> Result<Self, Self::Error> {
        value.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn valid() -> InventoryDbOptions {
        InventoryDbOptions::new()
            .name("test")
            .url("postgres://localhost:5432/inventory")
            .num_entries(10)
    }

    #[test]
    fn accepts_complete_options() {
        let config = valid().validate().unwrap();
        assert_eq!(config.name(), "test");
        assert_eq!(config.url(), "postgres://localhost:5432/inventory");
        assert_eq!(config.num_entries(), 10);
    }

    #[test]
    fn rejects_missing_and_invalid_fields() {
        let cases = [
            (InventoryDbOptions { name: None, ..valid() }, "name is required"),
            (valid().name("  "), "name must be a non-empty string"),
            (InventoryDbOptions { url: None, ..valid() }, "url is required"),
            (valid().url(""), "url must be a non-empty string"),
            (
                InventoryDbOptions { num_entries: None, ..valid() },
                "numEntries is required",
            ),
            (valid().num_entries(0), "numEntries must be a positive integer, got 0"),
            (valid().num_entries(-3), "numEntries must be a positive integer, got -3"),
        ];

        for (opts, message) in cases {
            let err = opts.validate().unwrap_err();
            assert_eq!(err.to_string(), message);
        }
    }

    #[test]
    fn first_violation_wins() {
        let err = InventoryDbOptions::new().validate().unwrap_err();
        assert_eq!(err, ConfigError::MissingName);
    }

    #[test]
    fn decodes_json_with_camel_case_capacity() {
        let opts = InventoryDbOptions::from_json(
            r#"{"name":"test","url":"postgres://localhost","numEntries":10}"#,
        )
        .unwrap();
        assert_eq!(opts.validate().unwrap().num_entries(), 10);

        let opts = InventoryDbOptions::from_json(r#"{"name":"test","url":"x","num_entries":4}"#)
            .unwrap();
        assert_eq!(opts.num_entries, Some(4));
    }

    #[test]
    fn wrong_typed_json_is_malformed() {
        let err = InventoryDbOptions::from_json(r#"{"name":"test","url":"x","numEntries":"10"}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Malformed(_)));
    }

    #[test]
    fn reads_env_like_sources() {
        let vars: HashMap<&str, &str> = [
            (ENV_NAME, "stock"),
            (ENV_URL, "postgres://db"),
            (ENV_NUM_ENTRIES, " 25 "),
        ]
        .into_iter()
        .collect();

        let opts = InventoryDbOptions::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        let config = opts.validate().unwrap();
        assert_eq!(config.name(), "stock");
        assert_eq!(config.num_entries(), 25);
    }

    #[test]
    fn unparseable_env_capacity_is_reported() {
        let err = InventoryDbOptions::from_lookup(|k| {
            (k == ENV_NUM_ENTRIES).then(|| "ten".to_string())
        })
        .unwrap_err();
        assert_eq!(err, ConfigError::InvalidNumEntries("ten".to_string()));
    }
}
