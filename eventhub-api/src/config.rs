/// Configuration management for the API server
///
/// Configuration is read once at startup from environment variables (a `.env`
/// file is loaded first when present) into a typed [`Config`].
///
/// # Environment Variables
///
/// | Variable | Default |
/// |---|---|
/// | `API_HOST` / `API_PORT` | `0.0.0.0` / `8080` |
/// | `APP_ENV` | `development` (`test`, `production`) |
/// | `CORS_ORIGINS` | `*` (comma separated) |
/// | `DATABASE_URL` | required |
/// | `DATABASE_MAX_CONNECTIONS` | `10` |
/// | `JWT_SECRET` | required, at least 32 characters |
/// | `JWT_EXPIRES_IN` | `24h` (`3600`, `45m`, `12h`, `7d`) |
/// | `EMAIL_HOST` / `EMAIL_PORT` / `EMAIL_SECURE` | unset / `587` / `false` |
/// | `EMAIL_USER` / `EMAIL_PASS` | unset |
/// | `EMAIL_FROM` | `noreply@eventhub.local` |
/// | `FRONTEND_URL` | `http://localhost:3000` |
/// | `REQUIRE_VERIFIED_EMAIL` | `false` |
///
/// # Example
///
/// ```no_run
/// use eventhub_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use std::env;

use chrono::Duration;
use eventhub_shared::auth::jwt::{DEFAULT_EXPIRATION_HOURS, MAX_EXPIRATION_DAYS};
use eventhub_shared::db::pool::DatabaseConfig as PoolConfig;
use eventhub_shared::mail::{MailConfig, DEFAULT_FROM_NAME};

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub mail: MailConfig,

    /// Gate participant self-registration on a verified email address
    pub require_verified_email: bool,
}

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Test,
    Production,
}

impl AppEnv {
    /// Whether error responses may carry diagnostic detail
    pub fn exposes_error_detail(self) -> bool {
        self != AppEnv::Production
    }
}

impl std::str::FromStr for AppEnv {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(AppEnv::Development),
            "test" => Ok(AppEnv::Test),
            "production" | "prod" => Ok(AppEnv::Production),
            other => anyhow::bail!("Unknown APP_ENV: {}", other),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub environment: AppEnv,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Pool settings for the shared persistence layer
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig {
            url: self.url.clone(),
            max_connections: self.max_connections,
            ..PoolConfig::default()
        }
    }
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HS256 signing secret, at least 32 bytes
    ///
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,

    /// Lifetime of issued tokens
    pub expires_in: Duration,
}

impl Config {
    /// Loads configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value does not
    /// parse
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Same as [`Config::from_env`]
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let required = |key: &str| {
            lookup(key).ok_or_else(|| anyhow::anyhow!("{} environment variable is required", key))
        };

        let port = var("API_PORT", "8080")
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("Invalid API_PORT: {}", e))?;

        let environment = var("APP_ENV", "development").parse::<AppEnv>()?;

        let cors_origins = var("CORS_ORIGINS", "*")
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        let max_connections = var("DATABASE_MAX_CONNECTIONS", "10")
            .parse::<u32>()
            .map_err(|e| anyhow::anyhow!("Invalid DATABASE_MAX_CONNECTIONS: {}", e))?;

        let secret = required("JWT_SECRET")?;
        if secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let expires_in = match lookup("JWT_EXPIRES_IN") {
            Some(raw) => parse_duration(&raw)?,
            None => Duration::hours(DEFAULT_EXPIRATION_HOURS),
        };

        let mail = MailConfig {
            host: lookup("EMAIL_HOST").filter(|h| !h.trim().is_empty()),
            port: var("EMAIL_PORT", "587")
                .parse::<u16>()
                .map_err(|e| anyhow::anyhow!("Invalid EMAIL_PORT: {}", e))?,
            secure: parse_bool("EMAIL_SECURE", &var("EMAIL_SECURE", "false"))?,
            username: lookup("EMAIL_USER"),
            password: lookup("EMAIL_PASS"),
            from_address: var("EMAIL_FROM", "noreply@eventhub.local"),
            from_name: DEFAULT_FROM_NAME.to_string(),
            frontend_url: var("FRONTEND_URL", "http://localhost:3000"),
        };

        let require_verified_email =
            parse_bool("REQUIRE_VERIFIED_EMAIL", &var("REQUIRE_VERIFIED_EMAIL", "false"))?;

        Ok(Self {
            api: ApiConfig {
                host: var("API_HOST", "0.0.0.0"),
                port,
                environment,
                cors_origins,
            },
            database: DatabaseConfig {
                url: required("DATABASE_URL")?,
                max_connections,
            },
            jwt: JwtConfig { secret, expires_in },
            mail,
            require_verified_email,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

/// Parses a token lifetime
///
/// A bare number is seconds; `s`, `m`, `h` and `d` suffixes select the unit.
///
/// # Errors
///
/// Returns an error for an empty, negative, zero or malformed value, or one
/// longer than [`MAX_EXPIRATION_DAYS`]
pub fn parse_duration(raw: &str) -> anyhow::Result<Duration> {
    let raw = raw.trim();
    let (digits, unit) = match raw.char_indices().last() {
        Some((idx, c)) if c.is_ascii_alphabetic() => (&raw[..idx], c.to_ascii_lowercase()),
        _ => (raw, 's'),
    };

    let amount: i64 = digits
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid duration: {:?}", raw))?;
    if amount <= 0 {
        anyhow::bail!("Duration must be positive: {:?}", raw);
    }

    let duration = match unit {
        's' => Duration::try_seconds(amount),
        'm' => Duration::try_minutes(amount),
        'h' => Duration::try_hours(amount),
        'd' => Duration::try_days(amount),
        _ => anyhow::bail!("Unknown duration unit in {:?}", raw),
    };

    match duration {
        Some(d) if d <= Duration::days(MAX_EXPIRATION_DAYS) => Ok(d),
        _ => anyhow::bail!("Duration too long: {:?} (max {} days)", raw, MAX_EXPIRATION_DAYS),
    }
}

fn parse_bool(key: &str, raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        other => anyhow::bail!("Invalid {}: {:?} is not a boolean", key, other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    fn minimal() -> Vec<(&'static str, &'static str)> {
        vec![
            ("DATABASE_URL", "postgresql://localhost/eventhub"),
            ("JWT_SECRET", SECRET),
        ]
    }

    #[test]
    fn test_defaults() {
        let config = load(&minimal()).unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.api.environment, AppEnv::Development);
        assert_eq!(config.api.cors_origins, vec!["*"]);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.jwt.expires_in, Duration::hours(24));
        assert!(config.mail.host.is_none());
        assert_eq!(config.mail.port, 587);
        assert_eq!(config.mail.from_address, "noreply@eventhub.local");
        assert_eq!(config.mail.frontend_url, "http://localhost:3000");
        assert!(!config.require_verified_email);
    }

    #[test]
    fn test_missing_required() {
        let err = load(&[("JWT_SECRET", SECRET)]).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));

        let err = load(&[("DATABASE_URL", "postgresql://localhost/x")]).unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn test_short_secret_rejected() {
        let err = load(&[
            ("DATABASE_URL", "postgresql://localhost/x"),
            ("JWT_SECRET", "too-short"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("32 characters"));
    }

    #[test]
    fn test_overrides() {
        let mut vars = minimal();
        vars.extend([
            ("API_HOST", "127.0.0.1"),
            ("API_PORT", "9000"),
            ("APP_ENV", "production"),
            ("CORS_ORIGINS", "https://a.example.com, https://b.example.com"),
            ("JWT_EXPIRES_IN", "7d"),
            ("EMAIL_HOST", "smtp.example.com"),
            ("EMAIL_SECURE", "true"),
            ("EMAIL_PORT", "465"),
            ("REQUIRE_VERIFIED_EMAIL", "true"),
        ]);

        let config = load(&vars).unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:9000");
        assert_eq!(config.api.environment, AppEnv::Production);
        assert!(!config.api.environment.exposes_error_detail());
        assert_eq!(
            config.api.cors_origins,
            vec!["https://a.example.com", "https://b.example.com"]
        );
        assert_eq!(config.jwt.expires_in, Duration::days(7));
        assert_eq!(config.mail.host.as_deref(), Some("smtp.example.com"));
        assert!(config.mail.secure);
        assert_eq!(config.mail.port, 465);
        assert!(config.require_verified_email);
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("3600").unwrap(), Duration::seconds(3600));
        assert_eq!(parse_duration("30s").unwrap(), Duration::seconds(30));
        assert_eq!(parse_duration("45m").unwrap(), Duration::minutes(45));
        assert_eq!(parse_duration("12h").unwrap(), Duration::hours(12));
        assert_eq!(parse_duration("7d").unwrap(), Duration::days(7));
        assert_eq!(parse_duration("1D").unwrap(), Duration::days(1));

        assert!(parse_duration("").is_err());
        assert!(parse_duration("h").is_err());
        assert!(parse_duration("0").is_err());
        assert!(parse_duration("-5m").is_err());
        assert!(parse_duration("3w").is_err());
        assert!(parse_duration("ten").is_err());

        assert_eq!(parse_duration("3650d").unwrap(), Duration::days(3650));
        assert!(parse_duration("3651d").is_err());
        assert!(parse_duration("9223372036854775807d").is_err());
        assert!(parse_duration("9223372036854775807").is_err());
    }

    #[test]
    fn test_app_env_parsing() {
        assert_eq!("test".parse::<AppEnv>().unwrap(), AppEnv::Test);
        assert_eq!("PRODUCTION".parse::<AppEnv>().unwrap(), AppEnv::Production);
        assert!("staging".parse::<AppEnv>().is_err());
        assert!(AppEnv::Development.exposes_error_detail());
    }

    #[test]
    fn test_invalid_boolean() {
        let mut vars = minimal();
        vars.push(("EMAIL_SECURE", "maybe"));
        assert!(load(&vars).is_err());
    }
}
