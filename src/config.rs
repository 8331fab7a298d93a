//! Environment-driven configuration.
//!
//! Everything the server needs at startup comes from environment
//! variables (a `.env` file is honored in development via dotenvy).

use std::env;
use std::path::PathBuf;

/// Server configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address. Default: 127.0.0.1.
    pub host: String,
    /// Bind port. Default: 5000.
    pub port: u16,
    /// Postgres connection string. Required.
    pub database_url: String,
    /// Origins allowed by CORS, localhost dev ports plus FRONTEND_URL.
    pub allowed_origins: Vec<String>,
    /// HMAC secret for bearer tokens. Required.
    pub jwt_secret: String,
    /// Token lifetime in seconds. Default: 30 days.
    pub jwt_ttl_secs: i64,
    /// Root directory for uploaded images. Default: ./uploads.
    pub upload_dir: PathBuf,
    /// Address new-order notifications go to.
    pub owner_email: String,
    /// SMTP settings; mailer is disabled when the host is unset.
    pub smtp: Option<SmtpConfig>,
    /// From header for outgoing mail.
    pub email_from: String,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

/// Local dev origins the SPAs run on, always allowed.
const DEV_ORIGINS: &[&str] = &[
    "http://localhost:5173",
    "http://localhost:5174",
    "http://localhost:5175",
    "http://localhost:5176",
    "http://localhost:3000",
];

impl Config {
    /// Reads configuration from the process environment.
    ///
    /// Fails fast on missing required variables so a misconfigured
    /// deployment dies at startup rather than on the first request.
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = require("DATABASE_URL")?;
        let jwt_secret = require("JWT_SECRET")?;

        let mut allowed_origins: Vec<String> =
            DEV_ORIGINS.iter().map(|s| s.to_string()).collect();
        if let Ok(frontend) = env::var("FRONTEND_URL") {
            if !frontend.is_empty() && !allowed_origins.contains(&frontend) {
                allowed_origins.push(frontend);
            }
        }

        let smtp = match env::var("SMTP_HOST") {
            Ok(host) if !host.is_empty() => Some(SmtpConfig {
                host,
                port: parse_or("SMTP_PORT", 587)?,
                username: env::var("SMTP_USER").unwrap_or_default(),
                password: env::var("SMTP_PASS").unwrap_or_default(),
            }),
            _ => None,
        };

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_or("PORT", 5000)?,
            database_url,
            allowed_origins,
            jwt_secret,
            jwt_ttl_secs: parse_or("JWT_TTL_SECS", 60 * 60 * 24 * 30)?,
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploads")),
            owner_email: env::var("OWNER_EMAIL")
                .unwrap_or_else(|_| "orders@classiccarry.example".to_string()),
            smtp,
            email_from: env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "Classic Carry <no-reply@classiccarry.example>".to_string()),
        })
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

fn require(key: &str) -> anyhow::Result<String> {
    env::var(key).map_err(|_| anyhow::anyhow!("missing required env var {key}"))
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> anyhow::Result<T> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid value for {key}: {raw}")),
        Err(_) => Ok(default),
    }
}
