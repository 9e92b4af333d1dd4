use serde::Deserialize;

/// Settings for the auth core: token signing and password hashing cost.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
    pub argon2_memory_kib: u32,
    pub argon2_iterations: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub auth: AuthConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = std::env::var("APP_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(8000);
        let auth = AuthConfig {
            jwt_secret: std::env::var("JWT_SECRET")?,
            token_ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(30),
            argon2_memory_kib: std::env::var("ARGON2_MEMORY_KIB")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(19456),
            argon2_iterations: std::env::var("ARGON2_ITERATIONS")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(2),
        };
        Ok(Self {
            database_url,
            host,
            port,
            auth,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_applies_safe_defaults() {
        std::env::set_var("DATABASE_URL", "postgres://postgres@localhost/dalli");
        std::env::set_var("JWT_SECRET", "env-secret");
        std::env::remove_var("APP_HOST");
        std::env::remove_var("APP_PORT");
        std::env::remove_var("JWT_TTL_MINUTES");

        let config = AppConfig::from_env().expect("config from env");
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8000);
        assert_eq!(config.auth.token_ttl_minutes, 30);
        assert_eq!(config.auth.jwt_secret, "env-secret");
    }
}

#[cfg(test)]
impl AuthConfig {
    /// Low-cost settings so unit tests do not pay the full hashing price.
    pub fn for_tests() -> Self {
        Self {
            jwt_secret: "test-secret".into(),
            token_ttl_minutes: 5,
            argon2_memory_kib: 1024,
            argon2_iterations: 1,
        }
    }
}
