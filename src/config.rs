/*
 * Responsibility
 * - 環境変数や設定の読み込み (DATABASE_URL, CORS 許可、Auth 設定など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderValue;
use jsonwebtoken::Algorithm;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<String>) -> Self {
        match value
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Where the trusted signing keys (JWKS document) come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JwksSource {
    Inline(String),
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub database_url: String,
    pub database_max_connections: u32,
    pub database_run_migrations: bool,

    pub cors_allowed_origins: Vec<String>,
    pub http_body_limit_bytes: usize,
    pub http_timeout: Duration,

    pub auth_issuer: String,
    pub auth_audience: String,
    pub auth_algorithms: Vec<Algorithm>,
    pub access_token_leeway_seconds: u64,
    pub auth_jwks: JwksSource,
    pub auth_jwks_reload: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port: u16 = parse_or(&var, "PORT", 3000)?;
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let app_env = AppEnv::parse(var("APP_ENV"));

        let database_url = var("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let database_max_connections = parse_or(&var, "DATABASE_MAX_CONNECTIONS", 5)?;
        let database_run_migrations = match var("DATABASE_RUN_MIGRATIONS")
            .map(|v| v.trim().to_ascii_lowercase())
            .as_deref()
        {
            None | Some("true") | Some("1") => true,
            Some("false") | Some("0") => false,
            Some(_) => return Err(ConfigError::Invalid("DATABASE_RUN_MIGRATIONS")),
        };

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();
        // Exact origins only; `*` would turn the production allowlist into "any".
        if cors_allowed_origins
            .iter()
            .any(|o| o == "*" || HeaderValue::from_str(o).is_err())
        {
            return Err(ConfigError::Invalid("CORS_ALLOWED_ORIGINS"));
        }

        let http_body_limit_bytes = parse_or(&var, "HTTP_BODY_LIMIT_BYTES", 1024 * 1024)?;
        let http_timeout = Duration::from_secs(parse_or(&var, "HTTP_TIMEOUT_SECONDS", 30)?);

        // Auth0 style: only the tenant domain is configured.
        let auth_issuer = match (var("AUTH_ISSUER"), var("AUTH0_DOMAIN")) {
            (Some(issuer), _) => issuer,
            (None, Some(domain)) => format!("https://{}/", domain.trim_end_matches('/')),
            (None, None) => return Err(ConfigError::Missing("AUTH_ISSUER")),
        };
        url::Url::parse(&auth_issuer).map_err(|_| ConfigError::Invalid("AUTH_ISSUER"))?;

        let auth_audience = var("AUTH_AUDIENCE")
            .or_else(|| var("API_AUDIENCE"))
            .ok_or(ConfigError::Missing("AUTH_AUDIENCE"))?;

        let auth_algorithms =
            parse_algorithms(&var("AUTH_ALGORITHMS").unwrap_or_else(|| "RS256".to_string()))?;

        let access_token_leeway_seconds = parse_or(&var, "ACCESS_TOKEN_LEEWAY_SECONDS", 60)?;

        let auth_jwks = match (var("AUTH_JWKS_JSON"), var("AUTH_JWKS_PATH")) {
            (Some(document), _) => JwksSource::Inline(document),
            (None, Some(path)) => JwksSource::File(PathBuf::from(path)),
            (None, None) => return Err(ConfigError::Missing("AUTH_JWKS_JSON or AUTH_JWKS_PATH")),
        };

        let auth_jwks_reload = match parse_or(&var, "AUTH_JWKS_RELOAD_SECONDS", 0u64)? {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        Ok(Self {
            addr,
            app_env,
            database_url,
            database_max_connections,
            database_run_migrations,
            cors_allowed_origins,
            http_body_limit_bytes,
            http_timeout,
            auth_issuer,
            auth_audience,
            auth_algorithms,
            access_token_leeway_seconds,
            auth_jwks,
            auth_jwks_reload,
        })
    }
}

fn parse_or<T: FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match var(key) {
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

// Public-key algorithms only: the trusted keys come from a published JWKS.
fn parse_algorithms(raw: &str) -> Result<Vec<Algorithm>, ConfigError> {
    let algorithms = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| match Algorithm::from_str(s) {
            Ok(Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) | Err(_) => {
                Err(ConfigError::Invalid("AUTH_ALGORITHMS"))
            }
            Ok(alg) => Ok(alg),
        })
        .collect::<Result<Vec<_>, _>>()?;

    if algorithms.is_empty() {
        return Err(ConfigError::Invalid("AUTH_ALGORITHMS"));
    }
    Ok(algorithms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const BASE: &[(&str, &str)] = &[
        ("DATABASE_URL", "postgres://localhost/coffee"),
        ("AUTH_ISSUER", "https://coffee.example.auth0.com/"),
        ("AUTH_AUDIENCE", "drinks"),
        ("AUTH_JWKS_PATH", "/etc/coffee/jwks.json"),
    ];

    fn with(extra: &[(&'static str, &'static str)]) -> Vec<(&'static str, &'static str)> {
        let mut pairs = BASE.to_vec();
        pairs.extend_from_slice(extra);
        pairs
    }

    #[test]
    fn defaults() {
        let config = Config::from_lookup(lookup(BASE)).unwrap();

        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.auth_algorithms, vec![Algorithm::RS256]);
        assert_eq!(config.access_token_leeway_seconds, 60);
        assert_eq!(
            config.auth_jwks,
            JwksSource::File(PathBuf::from("/etc/coffee/jwks.json"))
        );
        assert_eq!(config.auth_jwks_reload, None);
        assert!(config.database_run_migrations);
        assert_eq!(config.http_timeout, Duration::from_secs(30));
    }

    #[test]
    fn issuer_from_auth0_domain() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/coffee"),
            ("AUTH0_DOMAIN", "coffee.eu.auth0.com"),
            ("API_AUDIENCE", "drinks"),
            ("AUTH_JWKS_JSON", r#"{"keys": []}"#),
        ]))
        .unwrap();

        assert_eq!(config.auth_issuer, "https://coffee.eu.auth0.com/");
        assert_eq!(config.auth_audience, "drinks");
        assert!(matches!(config.auth_jwks, JwksSource::Inline(_)));
    }

    #[test]
    fn missing_required_values() {
        let err = Config::from_lookup(lookup(&[("AUTH_AUDIENCE", "drinks")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));

        let err = Config::from_lookup(lookup(&BASE[..3])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("AUTH_JWKS_JSON or AUTH_JWKS_PATH"));
    }

    #[test]
    fn rejects_symmetric_algorithms() {
        let err =
            Config::from_lookup(lookup(&with(&[("AUTH_ALGORITHMS", "RS256,HS256")]))).unwrap_err();
        assert_eq!(err, ConfigError::Invalid("AUTH_ALGORITHMS"));

        let config =
            Config::from_lookup(lookup(&with(&[("AUTH_ALGORITHMS", "RS256, ES256")]))).unwrap();
        assert_eq!(
            config.auth_algorithms,
            vec![Algorithm::RS256, Algorithm::ES256]
        );
    }

    #[test]
    fn invalid_numbers_fail_instead_of_defaulting() {
        let err = Config::from_lookup(lookup(&with(&[("PORT", "http")]))).unwrap_err();
        assert_eq!(err, ConfigError::Invalid("PORT"));
    }

    #[test]
    fn wildcard_cors_origin_is_rejected() {
        for origins in ["*", "https://a.example,*", "https://a.example\u{7f}"] {
            let err = Config::from_lookup(lookup(&with(&[
                ("APP_ENV", "production"),
                ("CORS_ALLOWED_ORIGINS", origins),
            ])))
            .unwrap_err();
            assert_eq!(err, ConfigError::Invalid("CORS_ALLOWED_ORIGINS"), "{origins:?}");
        }
    }

    #[test]
    fn reload_period_and_production() {
        let config = Config::from_lookup(lookup(&with(&[
            ("AUTH_JWKS_RELOAD_SECONDS", "300"),
            ("APP_ENV", "PROD"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, ,https://b.example"),
        ])))
        .unwrap();

        assert_eq!(config.auth_jwks_reload, Some(Duration::from_secs(300)));
        assert!(config.app_env.is_production());
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
    }
}
