use std::time::Duration;

const BASE_URL_VAR: &str = "CONSOLE_BASE_URL";
const API_PREFIX_VAR: &str = "CONSOLE_API_PREFIX";
const PUBLIC_PREFIX_VAR: &str = "CONSOLE_PUBLIC_PREFIX";

/// Where the backend lives and how its two URL spaces are rooted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub base_url: String,
    pub api_prefix: String,
    pub public_prefix: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            api_prefix: "/api".to_string(),
            public_prefix: "/public".to_string(),
        }
    }
}

impl Endpoints {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Reads overrides from `CONSOLE_BASE_URL`, `CONSOLE_API_PREFIX` and
    /// `CONSOLE_PUBLIC_PREFIX`; unset or empty variables keep the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let read = |key: &str, fallback: String| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or(fallback)
        };
        Self {
            base_url: read(BASE_URL_VAR, defaults.base_url),
            api_prefix: read(API_PREFIX_VAR, defaults.api_prefix),
            public_prefix: read(PUBLIC_PREFIX_VAR, defaults.public_prefix),
        }
    }

    /// URL of an authenticated API endpoint, e.g. `sysJobs/list`.
    pub fn api_url(&self, path: &str) -> String {
        join_url(&self.base_url, &self.api_prefix, path)
    }

    /// URL of a static public asset, e.g. `area/area.json`.
    pub fn public_url(&self, path: &str) -> String {
        join_url(&self.base_url, &self.public_prefix, path)
    }
}

fn join_url(base: &str, prefix: &str, path: &str) -> String {
    let mut url = base.trim_end_matches('/').to_string();
    for segment in [prefix, path] {
        let segment = segment.trim_matches('/');
        if !segment.is_empty() {
            url.push('/');
            url.push_str(segment);
        }
    }
    url
}

#[derive(Debug, Clone)]
pub struct TransportSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn joins_prefixes_without_doubled_slashes() {
        let endpoints = Endpoints::new("http://host:9000/");
        assert_eq!(
            endpoints.api_url("sysJobs/list"),
            "http://host:9000/api/sysJobs/list"
        );
        assert_eq!(
            endpoints.public_url("/area/area.json"),
            "http://host:9000/public/area/area.json"
        );
    }

    #[test]
    fn empty_prefix_is_skipped() {
        let endpoints = Endpoints {
            api_prefix: String::new(),
            ..Endpoints::new("http://host")
        };
        assert_eq!(endpoints.api_url("sysJobs/7"), "http://host/sysJobs/7");
    }

    #[test]
    fn lookup_overrides_only_non_empty_values() {
        let vars: HashMap<&str, &str> = [
            (BASE_URL_VAR, "https://console.example.com"),
            (API_PREFIX_VAR, "  "),
            (PUBLIC_PREFIX_VAR, "/static"),
        ]
        .into_iter()
        .collect();

        let endpoints = Endpoints::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(endpoints.base_url, "https://console.example.com");
        assert_eq!(endpoints.api_prefix, "/api");
        assert_eq!(endpoints.public_prefix, "/static");
    }
}
