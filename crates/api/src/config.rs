use std::path::PathBuf;

use cinedex_db::store::{StoreBackend, StoreConfig};

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got '{value}'")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Movie store selection and connection settings.
    pub store: StoreConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                    |
    /// |----------------------------|----------------------------|
    /// | `HOST`                     | `0.0.0.0`                  |
    /// | `PORT`                     | `3000`                     |
    /// | `CORS_ORIGINS`             | `http://localhost:3000`    |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                       |
    /// | `MOVIE_STORE`              | `file`                     |
    /// | `MOVIES_FILE`              | `data/movies.json`         |
    /// | `DATABASE_URL`             | none (required for postgres) |
    /// | `DATABASE_MAX_CONNECTIONS` | `10`                       |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = var("HOST", "0.0.0.0");
        let port = parse(&var("PORT", "3000"), "PORT", "a valid u16")?;

        let cors_origins: Vec<String> = var("CORS_ORIGINS", "http://localhost:3000")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = parse(
            &var("REQUEST_TIMEOUT_SECS", "30"),
            "REQUEST_TIMEOUT_SECS",
            "a valid u64",
        )?;

        let backend_name = var("MOVIE_STORE", "file");
        let backend =
            StoreBackend::from_name(&backend_name).map_err(|_| ConfigError::Invalid {
                var: "MOVIE_STORE",
                expected: "one of: file, postgres",
                value: backend_name.clone(),
            })?;

        let store = StoreConfig {
            backend,
            movies_file: PathBuf::from(var("MOVIES_FILE", "data/movies.json")),
            database_url: lookup("DATABASE_URL").filter(|s| !s.trim().is_empty()),
            max_connections: parse(
                &var("DATABASE_MAX_CONNECTIONS", "10"),
                "DATABASE_MAX_CONNECTIONS",
                "a valid u32",
            )?,
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            store,
        })
    }
}

fn parse<T: std::str::FromStr>(
    value: &str,
    var: &'static str,
    expected: &'static str,
) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        var,
        expected,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_use_file_store() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.cors_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.store.backend, StoreBackend::File);
        assert_eq!(config.store.movies_file, PathBuf::from("data/movies.json"));
        assert!(config.store.database_url.is_none());
        assert_eq!(config.store.max_connections, 10);
    }

    #[test]
    fn reads_postgres_settings() {
        let config = config_from(&[
            ("MOVIE_STORE", "postgres"),
            ("DATABASE_URL", "postgres://localhost/cinedex"),
            ("DATABASE_MAX_CONNECTIONS", "4"),
            ("CORS_ORIGINS", "http://a.test, ,http://b.test"),
        ])
        .unwrap();
        assert_eq!(config.store.backend, StoreBackend::Postgres);
        assert_eq!(
            config.store.database_url.as_deref(),
            Some("postgres://localhost/cinedex")
        );
        assert_eq!(config.store.max_connections, 4);
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn rejects_invalid_port() {
        assert_matches!(
            config_from(&[("PORT", "eighty")]),
            Err(ConfigError::Invalid { var: "PORT", .. })
        );
    }

    #[test]
    fn rejects_unknown_store() {
        assert_matches!(
            config_from(&[("MOVIE_STORE", "mongo")]),
            Err(ConfigError::Invalid { var: "MOVIE_STORE", .. })
        );
    }
}
