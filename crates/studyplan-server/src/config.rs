use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    /// Expected `aud` claim. Empty disables the audience check.
    pub jwt_audience: String,
    /// IANA zone applied when a request carries no `timezone`.
    pub default_timezone: String,
    /// Comma-separated. Empty or `*` allows any origin.
    pub cors_allowed_origins: String,
}

impl ServerConfig {
    /// Defaults, then `studyplan.toml` if present, then `STUDYPLAN_*` variables.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Config::builder()
            .set_default("host", "127.0.0.1")?
            .set_default("port", 8080_i64)?
            .set_default("database_url", "sqlite://studyplan.db?mode=rwc")?
            .set_default("jwt_audience", "authenticated")?
            .set_default("default_timezone", "UTC")?
            .set_default("cors_allowed_origins", "")?
            .add_source(File::with_name("studyplan").required(false))
            .add_source(Environment::with_prefix("STUDYPLAN").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn audience(&self) -> Option<&str> {
        let aud = self.jwt_audience.trim();
        (!aud.is_empty()).then_some(aud)
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ServerConfig {
        ServerConfig {
            host: "0.0.0.0".into(),
            port: 9000,
            database_url: "sqlite::memory:".into(),
            jwt_secret: "secret".into(),
            jwt_audience: " ".into(),
            default_timezone: "UTC".into(),
            cors_allowed_origins: "https://a.example, ,https://b.example".into(),
        }
    }

    #[test]
    fn listen_addr_joins_host_and_port() {
        assert_eq!(config().listen_addr(), "0.0.0.0:9000");
    }

    #[test]
    fn blank_audience_disables_check() {
        assert_eq!(config().audience(), None);
    }

    #[test]
    fn cors_origins_skip_blanks() {
        assert_eq!(
            config().cors_origins(),
            vec!["https://a.example", "https://b.example"]
        );
    }
}
