use axum::http::HeaderMap;
use axum_extra::extract::cookie::CookieJar;

use crate::config::TokenSource;

/// Read the candidate token from the configured header or cookie.
///
/// Returns `None` when the source is absent, not valid UTF-8, or blank.
pub fn extract(headers: &HeaderMap, source: &TokenSource) -> Option<String> {
    let raw = match source {
        TokenSource::Header(name) => headers
            .get(name.as_str())
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        TokenSource::Cookie(name) => CookieJar::from_headers(headers)
            .get(name)
            .map(|c| c.value().to_string()),
    };

    raw.filter(|t| !t.trim().is_empty())
}

/// Remove a configured scheme prefix such as `Bearer`.
///
/// When `token` starts with `prefix`, the prefix and the single separator
/// character after it are dropped, then leading whitespace is trimmed.
/// Anything else is returned unchanged.
pub fn strip_prefix<'a>(token: &'a str, prefix: Option<&str>) -> &'a str {
    let Some(rest) = prefix
        .filter(|p| !p.is_empty())
        .and_then(|p| token.strip_prefix(p))
    else {
        return token;
    };

    let mut chars = rest.chars();
    chars.next();
    chars.as_str().trim_start()
}
