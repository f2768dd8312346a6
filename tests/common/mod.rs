//! Shared fixtures: Ed25519 signing keys, a wiremock JWKS endpoint, and a
//! router wired the same way the binary wires it.
#![allow(dead_code)]

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use ed25519_dalek::SigningKey;
use ed25519_dalek::pkcs8::EncodePrivateKey;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::Value;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use token_gate::app;
use token_gate::config::Config;

pub const JWKS_PATH: &str = "/.well-known/jwks.json";
pub const ISSUER: &str = "https://idp.example.com/";

/// Ed25519 key pair published under `kid`.
pub struct TestKey {
    pub kid: String,
    encoding_key: EncodingKey,
    x: String,
}

impl TestKey {
    pub fn new(seed: u8, kid: &str) -> Self {
        let signing_key = SigningKey::from_bytes(&[seed; 32]);
        let der = signing_key
            .to_pkcs8_der()
            .expect("encode test key as PKCS#8");

        Self {
            kid: kid.to_string(),
            encoding_key: EncodingKey::from_ed_der(der.as_bytes()),
            x: URL_SAFE_NO_PAD.encode(signing_key.verifying_key().as_bytes()),
        }
    }

    pub fn jwk(&self) -> Value {
        serde_json::json!({
            "kty": "OKP",
            "crv": "Ed25519",
            "kid": self.kid,
            "alg": "EdDSA",
            "use": "sig",
            "x": self.x,
        })
    }

    pub fn sign(&self, claims: &Value) -> String {
        self.sign_as(&self.kid, claims)
    }

    /// Sign with this key but advertise another `kid`.
    pub fn sign_as(&self, kid: &str, claims: &Value) -> String {
        let mut header = Header::new(Algorithm::EdDSA);
        header.typ = Some("JWT".to_string());
        header.kid = Some(kid.to_string());
        jsonwebtoken::encode(&header, claims, &self.encoding_key).expect("sign test token")
    }

    pub fn sign_without_kid(&self, claims: &Value) -> String {
        let header = Header::new(Algorithm::EdDSA);
        jsonwebtoken::encode(&header, claims, &self.encoding_key).expect("sign test token")
    }
}

pub fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time")
        .as_secs() as i64
}

/// Claims valid for the next hour.
pub fn fresh_claims(sub: &str) -> Value {
    serde_json::json!({
        "sub": sub,
        "iss": ISSUER,
        "iat": now(),
        "exp": now() + 3600,
    })
}

/// JWKS endpoint serving `keys`, expected to be hit exactly `fetches` times.
pub async fn jwks_server(keys: &[&TestKey], fetches: u64) -> MockServer {
    let server = MockServer::start().await;
    let body = serde_json::json!({
        "keys": keys.iter().map(|k| k.jwk()).collect::<Vec<_>>()
    });

    Mock::given(method("GET"))
        .and(path(JWKS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(fetches)
        .mount(&server)
        .await;

    server
}

pub fn jwks_uri(server: &MockServer) -> String {
    format!("{}{}", server.uri(), JWKS_PATH)
}

/// Router wired like the binary: bearer header source, `vars` layered on top.
pub fn router(server: &MockServer, vars: &[(&str, &str)]) -> Router {
    let mut map: HashMap<String, String> = HashMap::from([
        ("AUTH_HEADER_NAME".to_string(), "authorization".to_string()),
        ("AUTH_HEADER_PREFIX".to_string(), "Bearer".to_string()),
        ("AUTH_JWKS_URI".to_string(), jwks_uri(server)),
    ]);
    for (key, value) in vars {
        map.insert(key.to_string(), value.to_string());
    }

    let config = Config::from_lookup(|key| map.get(key).cloned()).expect("valid test config");
    let state = app::build_state(&config.gate).expect("build state");
    app::build_router(state, &config)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn get_with_header(uri: &str, name: &str, value: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(name, value)
        .body(Body::empty())
        .unwrap()
}

pub fn get_bearer(uri: &str, token: &str) -> Request<Body> {
    get_with_header(uri, "authorization", &format!("Bearer {}", token))
}

/// Send one request and decode the JSON body (Null when empty).
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

/// Rejection reason carried in a 401 body.
pub fn reason(body: &Value) -> &str {
    body["error"]["message"].as_str().unwrap_or_default()
}
