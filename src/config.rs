use crate::domain::Decimal;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: String,
    pub rates_api_url: String,
    /// Interval between background rate refreshes; `None` refreshes at startup only.
    pub rate_refresh: Option<Duration>,
    /// Fee reduction used until the operator sets one, as a fraction in [0, 1].
    pub default_reduction: Decimal,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let database_path = env_map
            .get("DATABASE_PATH")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("DATABASE_PATH".to_string()))?;

        let rates_api_url = env_map
            .get("RATES_API_URL")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|| "https://api.coingecko.com".to_string());

        let refresh_secs = env_map
            .get("RATE_REFRESH_SECS")
            .map(|s| s.as_str())
            .unwrap_or("0")
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "RATE_REFRESH_SECS".to_string(),
                    "must be a non-negative integer".to_string(),
                )
            })?;
        let rate_refresh = (refresh_secs > 0).then(|| Duration::from_secs(refresh_secs));

        let default_reduction = match env_map.get("DEFAULT_REDUCTION") {
            None => Decimal::from_parts(15, 2),
            Some(raw) => Decimal::parse_lenient(raw)
                .filter(|r| *r >= Decimal::zero() && *r <= Decimal::one())
                .ok_or_else(|| {
                    ConfigError::InvalidValue(
                        "DEFAULT_REDUCTION".to_string(),
                        format!("must be a fraction between 0 and 1, got {}", raw),
                    )
                })?,
        };

        Ok(Config {
            port,
            database_path,
            rates_api_url,
            rate_refresh,
            default_reduction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_required_env() -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("DATABASE_PATH".to_string(), "/tmp/test.db".to_string());
        map
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_env_map(setup_required_env()).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rates_api_url, "https://api.coingecko.com");
        assert_eq!(config.rate_refresh, None);
        assert_eq!(config.default_reduction, Decimal::from_parts(15, 2));
    }

    #[test]
    fn test_missing_database_path() {
        let mut env_map = setup_required_env();
        env_map.remove("DATABASE_PATH");
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::MissingEnv(s)) => assert_eq!(s, "DATABASE_PATH"),
            _ => panic!("Expected MissingEnv error"),
        }
    }

    #[test]
    fn test_invalid_port() {
        let mut env_map = setup_required_env();
        env_map.insert("PORT".to_string(), "not_a_number".to_string());
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "PORT"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_refresh_interval() {
        let mut env_map = setup_required_env();
        env_map.insert("RATE_REFRESH_SECS".to_string(), "300".to_string());
        let config = Config::from_env_map(env_map).unwrap();
        assert_eq!(config.rate_refresh, Some(Duration::from_secs(300)));
    }

    #[test]
    fn test_invalid_refresh_interval() {
        let mut env_map = setup_required_env();
        env_map.insert("RATE_REFRESH_SECS".to_string(), "-5".to_string());
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "RATE_REFRESH_SECS"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_reduction_out_of_range() {
        let mut env_map = setup_required_env();
        env_map.insert("DEFAULT_REDUCTION".to_string(), "1.5".to_string());
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "DEFAULT_REDUCTION"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_rates_url_trailing_slash_trimmed() {
        let mut env_map = setup_required_env();
        env_map.insert(
            "RATES_API_URL".to_string(),
            "http://127.0.0.1:9000/".to_string(),
        );
        let config = Config::from_env_map(env_map).unwrap();
        assert_eq!(config.rates_api_url, "http://127.0.0.1:9000");
    }
}
