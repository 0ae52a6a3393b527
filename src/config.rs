use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Directory holding the JSON data artifacts
    /// (movies.json, content_based.json, user_recommendations.json, users.json)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Secret used to sign and verify JWT bearer tokens
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,

    /// Token lifetime in days
    #[serde(default = "default_jwt_expiry_days")]
    pub jwt_expiry_days: i64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins (comma-separated in the environment)
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Deployment environment label, reported by the health endpoint
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_jwt_secret() -> String {
    "movie-rec-secret-key".to_string()
}

fn default_jwt_expiry_days() -> i64 {
    7
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://localhost:5173".to_string(),
        "http://localhost:4200".to_string(),
    ]
}

fn default_environment() -> String {
    "development".to_string()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: Config = envy::from_iter(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.port, 3001);
        assert_eq!(config.jwt_expiry_days, 7);
        assert_eq!(config.environment, "development");
        assert_eq!(config.cors_origins.len(), 3);
    }

    #[test]
    fn test_overrides_from_iter() {
        let vars = vec![
            ("DATA_DIR".to_string(), "/srv/movierec".to_string()),
            ("PORT".to_string(), "8080".to_string()),
            ("ENVIRONMENT".to_string(), "production".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/movierec"));
        assert_eq!(config.port, 8080);
        assert_eq!(config.environment, "production");
    }
}
