use std::env;

pub const DEFAULT_PORT: u16 = 13739;
pub const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub profile: String,
    pub seed_demo: bool,
}

impl Config {
    pub fn from_env() -> Self {
        let profile = env::var("PROFILE").unwrap_or_else(|_| "default".to_string());
        Self::for_profile(profile)
    }

    /// Same as [`Config::from_env`] with the profile given explicitly
    /// (the `--profile` CLI flag)
    pub fn for_profile(profile: String) -> Self {
        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| {
            if profile == "default" {
                "sqlite://estate_sentry.db?mode=rwc".to_string()
            } else {
                format!("sqlite://estate_sentry_{}.db?mode=rwc", profile)
            }
        });

        Self {
            database_url,
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|s| {
                    s.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            profile,
            seed_demo: env::var("SEED_DEMO")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(false),
        }
    }
}

/// Token lifetime, read on every token issue so tests can adjust it
pub fn jwt_expiry_hours() -> i64 {
    env::var("JWT_EXPIRY_HOURS")
        .ok()
        .and_then(|h| h.parse().ok())
        .filter(|h: &i64| *h > 0)
        .unwrap_or(DEFAULT_JWT_EXPIRY_HOURS)
}
