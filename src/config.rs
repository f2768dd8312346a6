/*
 * Responsibility
 * - 環境変数や設定の読み込み (JWKS URI, header/cookie 名, tenant 設定など)
 * - 設定値のバリデーション (不足なら起動失敗)
 * - 空文字は読み込み時に「未設定」(None) に正規化する
 * - issuer / audience / tenant は完全一致で比較するので trim しない
 */
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use regex::RegexSet;
use thiserror::Error;
use url::Url;

use crate::services::gate::{MAX_LEEWAY_SECONDS, TenantPolicy};

const DEFAULT_EXEMPT_PATHS: &str = "^/api/v1/health$";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<&str>) -> Self {
        match raw
            .unwrap_or("development")
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

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
    #[error("missing configuration: one of AUTH_HEADER_NAME or AUTH_COOKIE_NAME must be set")]
    NoTokenSource,
}

/// Where the gate looks for a token.
///
/// Header wins when both are configured; the cookie is only read when no
/// header name is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    Header(String),
    Cookie(String),
}

/// Immutable gate settings, validated once at startup.
#[derive(Debug, Clone)]
pub struct GateConfig {
    pub source: TokenSource,
    pub header_prefix: Option<String>,
    pub jwks_uri: Url,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub tenant: Option<TenantPolicy>,
    pub leeway_seconds: u64,
    pub exempt_paths: RegexSet,
}

pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    // Whole-request bound; also the only bound on the JWKS fetch.
    pub request_timeout: Duration,
    pub gate: GateConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty (or whitespace-only) values count as unset.
        let verbatim = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let var = |key: &str| verbatim(key).map(|v| v.trim().to_string());

        let port: u16 = match var("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };
        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(var("APP_ENV").as_deref());

        let request_timeout = match var("REQUEST_TIMEOUT_SECONDS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS"))?,
            None => Duration::from_secs(30),
        };

        let source = match (var("AUTH_HEADER_NAME"), var("AUTH_COOKIE_NAME")) {
            (Some(header), _) => TokenSource::Header(header),
            (None, Some(cookie)) => TokenSource::Cookie(cookie),
            (None, None) => return Err(ConfigError::NoTokenSource),
        };

        let jwks_uri = var("AUTH_JWKS_URI").ok_or(ConfigError::Missing("AUTH_JWKS_URI"))?;
        let jwks_uri = Url::parse(&jwks_uri).map_err(|_| ConfigError::Invalid("AUTH_JWKS_URI"))?;
        if !matches!(jwks_uri.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid("AUTH_JWKS_URI"));
        }

        let leeway_seconds = match var("AUTH_LEEWAY_SECONDS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs <= MAX_LEEWAY_SECONDS)
                .ok_or(ConfigError::Invalid("AUTH_LEEWAY_SECONDS"))?,
            None => 0,
        };

        let tenant = match (
            var("AUTH_TENANT_NAMESPACE"),
            var("AUTH_TENANT_KEY"),
            verbatim("AUTH_ALLOWED_TENANT"),
        ) {
            (Some(namespace_key), Some(tenant_key), Some(allowed_tenant)) => Some(TenantPolicy {
                namespace_key,
                tenant_key,
                allowed_tenant,
            }),
            (None, None, None) => None,
            _ => {
                tracing::warn!(
                    "tenant check is partially configured; set AUTH_TENANT_NAMESPACE, \
                     AUTH_TENANT_KEY and AUTH_ALLOWED_TENANT together to enable it"
                );
                None
            }
        };

        let exempt_patterns = var("AUTH_EXEMPT_PATHS")
            .unwrap_or_else(|| DEFAULT_EXEMPT_PATHS.to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();
        let exempt_paths = RegexSet::new(&exempt_patterns)
            .map_err(|_| ConfigError::Invalid("AUTH_EXEMPT_PATHS"))?;

        Ok(Self {
            addr,
            app_env,
            request_timeout,
            gate: GateConfig {
                source,
                header_prefix: var("AUTH_HEADER_PREFIX"),
                jwks_uri,
                issuer: verbatim("AUTH_ISSUER"),
                audience: verbatim("AUTH_AUDIENCE"),
                tenant,
                leeway_seconds,
                exempt_paths,
            },
        })
    }
}
