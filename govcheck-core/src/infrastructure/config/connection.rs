// govcheck-core/src/infrastructure/config/connection.rs

use url::Url;

use crate::infrastructure::error::InfrastructureError;

pub const ENV_SERVER: &[&str] = &["DATAHUB_GMS_URL", "DATAHUB_SERVER"];
pub const ENV_TOKEN: &[&str] = &["DATAHUB_GMS_TOKEN", "DATAHUB_TOKEN"];

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where and how to reach the DataHub GMS server.
///
/// Custom `Debug` implementation redacts the token so that the settings can
/// be logged safely.
#[derive(Clone, PartialEq, Eq)]
pub struct DataHubConnection {
    pub server: Url,
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for DataHubConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataHubConnection")
            .field("server", &self.server.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl DataHubConnection {
    pub fn new(server: &str, token: Option<String>) -> Result<Self, InfrastructureError> {
        let server = Url::parse(server.trim().trim_end_matches('/')).map_err(|e| InfrastructureError::InvalidUrl {
            url: server.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(server.scheme(), "http" | "https") {
            return Err(InfrastructureError::InvalidUrl {
                url: server.to_string(),
                reason: "only http and https are supported".into(),
            });
        }
        Ok(Self {
            server,
            token: token.filter(|t| !t.trim().is_empty()),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs.max(1);
        self
    }

    /// Explicit values (CLI flags) win over environment variables.
    /// Fails when no server is configured anywhere.
    pub fn resolve<F>(server: Option<&str>, token: Option<&str>, lookup: F) -> Result<Self, InfrastructureError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let first_env = |keys: &[&str]| {
            keys.iter()
                .find_map(|k| lookup(k).filter(|v| !v.trim().is_empty()))
        };

        let server = server
            .map(String::from)
            .or_else(|| first_env(ENV_SERVER))
            .ok_or_else(|| {
                InfrastructureError::ConfigError(format!(
                    "No DataHub server configured (use --datahub-server or set {})",
                    ENV_SERVER.join(" / ")
                ))
            })?;
        let token = token.map(String::from).or_else(|| first_env(ENV_TOKEN));

        Self::new(&server, token)
    }

    pub fn from_env(server: Option<&str>, token: Option<&str>) -> Result<Self, InfrastructureError> {
        Self::resolve(server, token, |key| std::env::var(key).ok())
    }

    /// Joins `path` to the server URL, keeping any base path.
    pub fn endpoint(&self, path: &str) -> Result<Url, InfrastructureError> {
        let base = format!("{}/", self.server.as_str().trim_end_matches('/'));
        Url::parse(&base)
            .and_then(|b| b.join(path.trim_start_matches('/')))
            .map_err(|e| InfrastructureError::InvalidUrl {
                url: format!("{base}{path}"),
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_env() -> anyhow::Result<()> {
        let env = |key: &str| match key {
            "DATAHUB_SERVER" => Some("http://env-host:8080".to_string()),
            "DATAHUB_TOKEN" => Some("env-token".to_string()),
            _ => None,
        };

        let from_env = DataHubConnection::resolve(None, None, env)?;
        assert_eq!(from_env.server.as_str(), "http://env-host:8080/");
        assert_eq!(from_env.token.as_deref(), Some("env-token"));

        let from_flags = DataHubConnection::resolve(Some("https://gms.example.com"), Some("flag-token"), env)?;
        assert_eq!(from_flags.server.host_str(), Some("gms.example.com"));
        assert_eq!(from_flags.token.as_deref(), Some("flag-token"));
        Ok(())
    }

    #[test]
    fn test_primary_env_names_win() -> anyhow::Result<()> {
        let env = |key: &str| match key {
            "DATAHUB_GMS_URL" => Some("http://primary:8080".to_string()),
            "DATAHUB_SERVER" => Some("http://secondary:8080".to_string()),
            _ => None,
        };
        let conn = DataHubConnection::resolve(None, None, env)?;
        assert_eq!(conn.server.host_str(), Some("primary"));
        assert_eq!(conn.token, None);
        Ok(())
    }

    #[test]
    fn test_missing_server_is_an_error() {
        let err = DataHubConnection::resolve(None, None, |_| None).unwrap_err();
        assert!(err.to_string().contains("--datahub-server"));
    }

    #[test]
    fn test_debug_redacts_token() -> anyhow::Result<()> {
        let conn = DataHubConnection::new("http://localhost:8080", Some("s3cr3t".into()))?;
        let debug = format!("{conn:?}");
        assert!(!debug.contains("s3cr3t"));
        assert!(debug.contains("[REDACTED]"));
        Ok(())
    }

    #[test]
    fn test_endpoint_keeps_base_path() -> anyhow::Result<()> {
        let conn = DataHubConnection::new("https://acme.acryl.io/gms/", None)?;
        assert_eq!(conn.endpoint("/api/graphql")?.as_str(), "https://acme.acryl.io/gms/api/graphql");
        assert!(DataHubConnection::new("ftp://host", None).is_err());
        Ok(())
    }
}
