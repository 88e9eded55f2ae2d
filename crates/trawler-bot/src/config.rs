use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result, bail};

use trawler_core::RejectMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

/// Application configuration loaded from environment variables
#[derive(Clone)]
pub struct Config {
    pub discord_token: String,
    pub api_url: String,
    pub api_key: String,
    pub review_channel: String,
    pub environment: Environment,
    pub fanout_delay: Duration,
    pub reject_mode: RejectMode,
    pub heartbeat_url: Option<String>,
    pub health_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            get(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("{} must be set", key))
        };

        let review_channel = required("PHISH_REVIEW_CHANNEL")?;
        review_channel
            .parse::<u64>()
            .context("PHISH_REVIEW_CHANNEL must be a channel id")?;

        let environment = match get("TRAWLER_ENV").as_deref().map(str::to_lowercase).as_deref() {
            None | Some("development") => Environment::Development,
            Some("production") => Environment::Production,
            Some(other) => bail!("TRAWLER_ENV must be 'development' or 'production', got '{}'", other),
        };

        let reject_mode = match get("TRAWLER_REJECT_MODE").as_deref() {
            None | Some("transition") => RejectMode::Transition,
            Some("delete") => RejectMode::Delete,
            Some(other) => bail!("TRAWLER_REJECT_MODE must be 'transition' or 'delete', got '{}'", other),
        };

        Ok(Self {
            discord_token: required("DISCORD_TOKEN")?,
            api_url: required("PHISHERMAN_API_URL")?,
            api_key: required("PHISHERMAN_API_KEY")?,
            review_channel,
            environment,
            fanout_delay: Duration::from_millis(
                get("TRAWLER_FANOUT_DELAY_MS")
                    .unwrap_or_else(|| "1000".to_string())
                    .parse()
                    .context("TRAWLER_FANOUT_DELAY_MS must be a number of milliseconds")?,
            ),
            reject_mode,
            heartbeat_url: get("HEARTBEAT_URL").filter(|v| !v.trim().is_empty()),
            health_addr: get("TRAWLER_HEALTH_ADDR")
                .unwrap_or_else(|| "0.0.0.0:3000".to_string())
                .parse()
                .context("TRAWLER_HEALTH_ADDR must be a socket address")?,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

// Keeps the token and API key out of logs
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_url", &self.api_url)
            .field("review_channel", &self.review_channel)
            .field("environment", &self.environment)
            .field("fanout_delay", &self.fanout_delay)
            .field("reject_mode", &self.reject_mode)
            .field("heartbeat_url", &self.heartbeat_url)
            .field("health_addr", &self.health_addr)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    const REQUIRED: [(&str, &str); 4] = [
        ("DISCORD_TOKEN", "token"),
        ("PHISHERMAN_API_URL", "https://api.phisherman.gg"),
        ("PHISHERMAN_API_KEY", "key"),
        ("PHISH_REVIEW_CHANNEL", "878130674844979210"),
    ];

    #[test]
    fn defaults_apply() {
        let config = load(&REQUIRED).unwrap();
        assert_eq!(config.environment, Environment::Development);
        assert!(!config.is_production());
        assert_eq!(config.fanout_delay, Duration::from_secs(1));
        assert_eq!(config.reject_mode, RejectMode::Transition);
        assert_eq!(config.heartbeat_url, None);
        assert_eq!(config.health_addr, "0.0.0.0:3000".parse().unwrap());
    }

    #[test]
    fn optional_values_are_read() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("TRAWLER_ENV", "Production"),
            ("TRAWLER_FANOUT_DELAY_MS", "250"),
            ("TRAWLER_REJECT_MODE", "delete"),
            ("HEARTBEAT_URL", "https://uptime.example.com/ping"),
            ("TRAWLER_HEALTH_ADDR", "127.0.0.1:8081"),
        ]);

        let config = load(&vars).unwrap();
        assert!(config.is_production());
        assert_eq!(config.fanout_delay, Duration::from_millis(250));
        assert_eq!(config.reject_mode, RejectMode::Delete);
        assert_eq!(config.heartbeat_url.as_deref(), Some("https://uptime.example.com/ping"));
        assert_eq!(config.health_addr.port(), 8081);
    }

    #[test]
    fn missing_required_variable_is_named() {
        let vars: Vec<_> = REQUIRED
            .iter()
            .copied()
            .filter(|(k, _)| *k != "PHISHERMAN_API_KEY")
            .collect();
        let err = load(&vars).unwrap_err();
        assert!(err.to_string().contains("PHISHERMAN_API_KEY"));
    }

    #[test]
    fn review_channel_must_be_numeric() {
        let mut vars = REQUIRED.to_vec();
        vars[3] = ("PHISH_REVIEW_CHANNEL", "#phish-review");
        assert!(load(&vars).is_err());
    }

    #[test]
    fn unknown_modes_are_refused() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("TRAWLER_REJECT_MODE", "ignore"));
        assert!(load(&vars).is_err());

        let mut vars = REQUIRED.to_vec();
        vars.push(("TRAWLER_ENV", "staging"));
        assert!(load(&vars).is_err());
    }

    #[test]
    fn debug_output_hides_secrets() {
        let rendered = format!("{:?}", load(&REQUIRED).unwrap());
        assert!(!rendered.contains("token"));
        assert!(!rendered.contains("\"key\""));
    }
}
