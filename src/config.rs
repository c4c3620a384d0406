//! Runtime configuration for the `vecstore` binary.
//!
//! Every setting has a default and can be overridden through the environment:
//!
//! | Variable              | Default        |
//! |-----------------------|----------------|
//! | `VECSTORE_BIND`       | `0.0.0.0:7878` |
//! | `VECSTORE_STORE_NAME` | `default`      |
//! | `VECSTORE_LOG`        | `info`         |
//!
//! The library types never read configuration; only `main` does.

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Address the HTTP server binds to.
    pub bind: String,
    /// Name given to the store created at startup.
    pub store_name: String,
    /// `tracing_subscriber::EnvFilter` directive.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:7878".to_string(),
            store_name: "default".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup, falling back to defaults
    /// for missing or blank values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str, default: String| {
            lookup(key).filter(|v| !v.trim().is_empty()).unwrap_or(default)
        };

        Self {
            bind: get("VECSTORE_BIND", defaults.bind),
            store_name: get("VECSTORE_STORE_NAME", defaults.store_name),
            log_level: get("VECSTORE_LOG", defaults.log_level),
        }
    }
}

#[cfg(test)]
mod config_test {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config, Config::default());
        assert_eq!(config.bind, "0.0.0.0:7878");
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("VECSTORE_BIND", "127.0.0.1:9000"),
            ("VECSTORE_STORE_NAME", "bench"),
            ("VECSTORE_LOG", "   "),
        ]
        .into_iter()
        .collect();

        let config = Config::from_lookup(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.bind, "127.0.0.1:9000");
        assert_eq!(config.store_name, "bench");
        // blank values fall back to the default
        assert_eq!(config.log_level, "info");
    }
}
