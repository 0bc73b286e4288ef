use crate::error::{AppError, Result};

/// Savings are quoted monthly; annual figures multiply by this.
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Channel capacity between request handlers and the lead writer.
pub const CHANNEL_CAPACITY: usize = 1024;

/// Service name reported by the health endpoint.
pub const SERVICE_NAME: &str = "roi-calculator";

pub const DEFAULT_API_PORT: u16 = 8001;

/// Fixed implementation fee (ARS) the form presents unless overridden.
pub const DEFAULT_IMPLEMENTATION_COST: f64 = 1_000_000.0;

/// Initial values shown by the input form.
pub mod form_defaults {
    pub const MONTHLY_QUERIES: u64 = 500;
    pub const CHATBOT_AUTOMATION_PCT: f64 = 70.0;
    pub const MANUAL_RESPONSE_MINUTES: f64 = 4.0;
    pub const MONTHLY_CRM_HOURS: f64 = 40.0;
    pub const CRM_AUTOMATION_PCT: f64 = 40.0;
    pub const EMPLOYEE_COUNT: u32 = 3;
    pub const HOURLY_EMPLOYEE_COST: f64 = 2_500.0;
    pub const ANNUAL_LICENSE_COST: f64 = 150_000.0;
}

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub db_path: String,
    pub api_port: u16,
    /// Persist submitted leads to SQLite (LEAD_STORE_ENABLED)
    pub lead_store_enabled: bool,
    /// Implementation cost advertised to the form (IMPLEMENTATION_COST)
    pub implementation_cost: f64,
    /// Allowed browser origin, `*` for any (CORS_ALLOW_ORIGIN)
    pub cors_allow_origin: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests don't touch process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let implementation_cost = match lookup("IMPLEMENTATION_COST") {
            Some(raw) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .ok_or_else(|| {
                    AppError::Config(
                        "IMPLEMENTATION_COST must be a non-negative number".to_string(),
                    )
                })?,
            None => DEFAULT_IMPLEMENTATION_COST,
        };

        Ok(Self {
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            db_path: lookup("DB_PATH").unwrap_or_else(|| "leads.db".to_string()),
            api_port: match lookup("API_PORT") {
                Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                    AppError::Config("API_PORT must be a valid port number".to_string())
                })?,
                None => DEFAULT_API_PORT,
            },
            lead_store_enabled: match lookup("LEAD_STORE_ENABLED") {
                Some(raw) => parse_flag(&raw).ok_or_else(|| {
                    AppError::Config("LEAD_STORE_ENABLED must be true or false".to_string())
                })?,
                None => true,
            },
            implementation_cost,
            cors_allow_origin: lookup("CORS_ALLOW_ORIGIN")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "*".to_string()),
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_env_is_empty() {
        let cfg = config_from(&[]).unwrap();
        assert_eq!(cfg.api_port, DEFAULT_API_PORT);
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.db_path, "leads.db");
        assert!(cfg.lead_store_enabled);
        assert_eq!(cfg.implementation_cost, DEFAULT_IMPLEMENTATION_COST);
        assert_eq!(cfg.cors_allow_origin, "*");
    }

    #[test]
    fn overrides_are_honored() {
        let cfg = config_from(&[
            ("API_PORT", "9000"),
            ("LEAD_STORE_ENABLED", "off"),
            ("IMPLEMENTATION_COST", "750000"),
            ("CORS_ALLOW_ORIGIN", "https://efficiency24.io"),
        ])
        .unwrap();
        assert_eq!(cfg.api_port, 9000);
        assert!(!cfg.lead_store_enabled);
        assert!((cfg.implementation_cost - 750_000.0).abs() < 1e-9);
        assert_eq!(cfg.cors_allow_origin, "https://efficiency24.io");
    }

    #[test]
    fn invalid_port_is_a_config_error() {
        let err = config_from(&[("API_PORT", "not-a-port")]).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn negative_implementation_cost_is_rejected() {
        let err = config_from(&[("IMPLEMENTATION_COST", "-1")]).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(config_from(&[("LEAD_STORE_ENABLED", "maybe")]).is_err());
    }
}
