use std::env;
use std::fmt;

use anyhow::bail;

pub const SERVICE_URL_VAR: &str = "HXBIT_SERVICE_URL";
pub const ANON_KEY_VAR: &str = "HXBIT_ANON_KEY";

/// The two connection parameters every request to the hosted service needs.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    service_url: String,
    anon_key: String,
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("service_url", &self.service_url)
            .field("anon_key", &"<redacted>")
            .finish()
    }
}

impl ServiceConfig {
    /// Read both parameters from the process environment. Either one missing is fatal.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let service_url = required(&lookup, SERVICE_URL_VAR)?;
        let anon_key = required(&lookup, ANON_KEY_VAR)?;
        Self::new(service_url, anon_key)
    }

    pub fn new(service_url: impl Into<String>, anon_key: impl Into<String>) -> anyhow::Result<Self> {
        let service_url = service_url.into().trim().trim_end_matches('/').to_owned();
        if !(service_url.starts_with("https://") || service_url.starts_with("http://")) {
            bail!("{SERVICE_URL_VAR} must be an http(s) URL, got `{service_url}`");
        }

        Ok(Self {
            service_url,
            anon_key: anon_key.into().trim().to_owned(),
        })
    }

    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    pub fn anon_key(&self) -> &str {
        &self.anon_key
    }

    /// Join `path` onto the service URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.service_url, path.trim_start_matches('/'))
    }
}

fn required<F>(lookup: &F, key: &str) -> anyhow::Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|value| value.trim().to_owned()) {
        Some(value) if !value.is_empty() => Ok(value),
        Some(_) => bail!("environment variable {key} is empty"),
        None => bail!("missing required environment variable {key}"),
    }
}
