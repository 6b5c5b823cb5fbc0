// Runtime configuration, read once from the environment at startup.
// Every field has a development default so the server runs with no env set.

use std::env;

use crate::payment::PaymentConfig;

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_address: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "smtp.gmail.com".to_string(),
            port: 587,
            username: String::new(),
            password: String::new(),
            from_address: String::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_minutes: i64,
    pub refresh_days: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            // Development-only signing key, overridden via JWT_SECRET.
            secret: "insecure-development-signing-key-0000".to_string(),
            access_minutes: 60,
            refresh_days: 7,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    /// Base URL prefixed to stored relative media paths in responses.
    pub public_base_url: Option<String>,
    pub seed_demo_data: bool,
    pub jwt: JwtConfig,
    pub smtp: SmtpConfig,
    pub payment: PaymentConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            public_base_url: None,
            seed_demo_data: false,
            jwt: JwtConfig::default(),
            smtp: SmtpConfig::default(),
            payment: PaymentConfig::default(),
        }
    }
}

fn env_string(key: &str, default: impl Into<String>) -> String {
    env::var(key).unwrap_or_else(|_| default.into())
}

fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"),
        Err(_) => default,
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let jwt_defaults = JwtConfig::default();
        let smtp_defaults = SmtpConfig::default();
        let payment_defaults = PaymentConfig::default();

        Self {
            bind_addr: env_string("BIND_ADDR", defaults.bind_addr),
            public_base_url: env::var("PUBLIC_BASE_URL").ok().filter(|v| !v.is_empty()),
            seed_demo_data: env_bool("SEED_DEMO_DATA", defaults.seed_demo_data),
            jwt: JwtConfig {
                secret: env_string("JWT_SECRET", jwt_defaults.secret),
                access_minutes: env_parse("JWT_ACCESS_MINUTES", jwt_defaults.access_minutes),
                refresh_days: env_parse("JWT_REFRESH_DAYS", jwt_defaults.refresh_days),
            },
            smtp: SmtpConfig {
                host: env_string("SMTP_HOST", smtp_defaults.host),
                port: env_parse("SMTP_PORT", smtp_defaults.port),
                username: env_string("SMTP_USERNAME", smtp_defaults.username),
                password: env_string("SMTP_PASSWORD", smtp_defaults.password),
                from_address: env_string("SMTP_FROM", smtp_defaults.from_address),
            },
            payment: PaymentConfig {
                key_id: env_string("RAZORPAY_KEY_ID", payment_defaults.key_id),
                key_secret: env_string("RAZORPAY_KEY_SECRET", payment_defaults.key_secret),
                base_url: env_string("RAZORPAY_BASE_URL", payment_defaults.base_url),
            },
        }
    }
}
