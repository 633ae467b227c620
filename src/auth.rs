//! Bearer-token authentication against the identity provider.
//!
//! Tokens are verified with the provider's published JWKS. The key set is
//! held in a time-boxed cache: entries expire after the configured TTL and an
//! unknown `kid` forces an immediate refetch, so provider-side key rotation
//! is picked up without a process restart.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, web};
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::config::{AuthConfig, IdpConfig};
use crate::error::ApiError;

/// The authenticated caller, as seen by handlers. The subject is the
/// identity provider's `sub` claim; mapping it to a staff or patient row is
/// the services' job.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub subject: String,
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
}

pub struct Authenticator {
    mode: Mode,
}

enum Mode {
    Bypass { subject: String },
    Jwt(JwtVerifier),
}

impl Authenticator {
    pub fn new(config: &AuthConfig, http: reqwest::Client) -> Self {
        let mode = match config {
            AuthConfig::Bypass { subject } => {
                tracing::warn!(subject, "token verification disabled (local-dev bypass)");
                Mode::Bypass {
                    subject: subject.clone(),
                }
            }
            AuthConfig::Idp(idp) => Mode::Jwt(JwtVerifier::new(idp, http)),
        };
        Authenticator { mode }
    }

    pub async fn authenticate(&self, authorization: Option<&str>) -> Result<AuthUser, ApiError> {
        match &self.mode {
            Mode::Bypass { subject } => Ok(AuthUser {
                subject: subject.clone(),
            }),
            Mode::Jwt(verifier) => {
                let value = authorization
                    .ok_or_else(|| ApiError::Unauthenticated("missing bearer token".into()))?;
                let token = value
                    .strip_prefix("Bearer ")
                    .or_else(|| value.strip_prefix("bearer "))
                    .ok_or_else(|| {
                        ApiError::Unauthenticated("authorization header is not a bearer token".into())
                    })?;
                verifier.verify(token.trim()).await
            }
        }
    }
}

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = Pin<Box<dyn Future<Output = Result<AuthUser, ApiError>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let authenticator = req.app_data::<web::Data<Authenticator>>().cloned();
        let authorization = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        Box::pin(async move {
            let authenticator = authenticator
                .ok_or_else(|| ApiError::Internal("authenticator not configured".into()))?;
            authenticator.authenticate(authorization.as_deref()).await
        })
    }
}

struct JwtVerifier {
    issuer: String,
    audience: String,
    jwks: JwksCache,
}

impl JwtVerifier {
    fn new(idp: &IdpConfig, http: reqwest::Client) -> Self {
        JwtVerifier {
            issuer: idp.issuer.clone(),
            audience: idp.audience.clone(),
            jwks: JwksCache::new(idp.jwks_url.clone(), idp.cache_ttl, http),
        }
    }

    async fn verify(&self, token: &str) -> Result<AuthUser, ApiError> {
        let header = decode_header(token)
            .map_err(|_| ApiError::Unauthenticated("malformed token".into()))?;
        if !matches!(
            header.alg,
            Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512
        ) {
            return Err(ApiError::Unauthenticated("unsupported token algorithm".into()));
        }
        let kid = header
            .kid
            .ok_or_else(|| ApiError::Unauthenticated("token missing key id".into()))?;
        let key = self.jwks.key_for(&kid).await?;

        let mut validation = Validation::new(header.alg);
        validation.set_audience(&[self.audience.as_str()]);
        validation.set_issuer(&[self.issuer.as_str()]);
        let data = decode::<Claims>(token, &key, &validation)
            .map_err(|err| ApiError::Unauthenticated(format!("invalid token: {err}")))?;
        Ok(AuthUser {
            subject: data.claims.sub,
        })
    }
}

/// Time-boxed JWKS cache keyed by `kid`.
struct JwksCache {
    url: String,
    ttl: Duration,
    http: reqwest::Client,
    state: RwLock<KeySet>,
}

#[derive(Default)]
struct KeySet {
    keys: HashMap<String, DecodingKey>,
    fetched_at: Option<Instant>,
}

impl KeySet {
    fn is_stale(&self, ttl: Duration) -> bool {
        match self.fetched_at {
            None => true,
            Some(at) => at.elapsed() >= ttl,
        }
    }
}

impl JwksCache {
    fn new(url: String, ttl: Duration, http: reqwest::Client) -> Self {
        JwksCache {
            url,
            ttl,
            http,
            state: RwLock::new(KeySet::default()),
        }
    }

    #[cfg(test)]
    fn with_keys(keys: HashMap<String, DecodingKey>) -> Self {
        JwksCache {
            url: String::new(),
            ttl: Duration::from_secs(3600),
            http: reqwest::Client::new(),
            state: RwLock::new(KeySet {
                keys,
                fetched_at: Some(Instant::now()),
            }),
        }
    }

    async fn key_for(&self, kid: &str) -> Result<DecodingKey, ApiError> {
        {
            let state = self.state.read().await;
            if !state.is_stale(self.ttl) {
                if let Some(key) = state.keys.get(kid) {
                    return Ok(key.clone());
                }
            }
        }

        let mut state = self.state.write().await;
        // Refetch when stale, and on an unknown kid: the provider may have
        // rotated in a key this process has never seen.
        if state.is_stale(self.ttl) || !state.keys.contains_key(kid) {
            state.keys = self.fetch().await?;
            state.fetched_at = Some(Instant::now());
            tracing::info!(count = state.keys.len(), "refreshed identity provider key set");
        }
        state
            .keys
            .get(kid)
            .cloned()
            .ok_or_else(|| ApiError::Unauthenticated("unknown signing key".into()))
    }

    async fn fetch(&self) -> Result<HashMap<String, DecodingKey>, ApiError> {
        let set: JwkSet = self
            .http
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let mut keys = HashMap::new();
        for jwk in &set.keys {
            let Some(kid) = jwk.common.key_id.as_deref() else {
                continue;
            };
            match DecodingKey::from_jwk(jwk) {
                Ok(key) => {
                    keys.insert(kid.to_string(), key);
                }
                Err(err) => tracing::warn!(kid, error = %err, "skipping unusable jwk"),
            }
        }
        if keys.is_empty() {
            return Err(ApiError::Upstream(
                "identity provider returned no usable keys".into(),
            ));
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use rsa::pkcs1::{EncodeRsaPrivateKey, EncodeRsaPublicKey};
    use rsa::pkcs8::LineEnding;
    use rsa::{RsaPrivateKey, RsaPublicKey};
    use serde::Serialize;

    const ISSUER: &str = "https://idp.example.com/";
    const AUDIENCE: &str = "careportal-api";
    const KID: &str = "test-key-1";

    #[derive(Serialize)]
    struct TestClaims {
        sub: String,
        iss: String,
        aud: String,
        exp: i64,
    }

    fn test_keys() -> (EncodingKey, DecodingKey) {
        let mut rng = rand::thread_rng();
        let private_key = RsaPrivateKey::new(&mut rng, 2048).expect("generate rsa key");
        let public_key = RsaPublicKey::from(&private_key);
        let private_pem = private_key
            .to_pkcs1_pem(LineEnding::LF)
            .expect("encode private pem");
        let public_pem = public_key
            .to_pkcs1_pem(LineEnding::LF)
            .expect("encode public pem");
        (
            EncodingKey::from_rsa_pem(private_pem.as_bytes()).expect("encoding key"),
            DecodingKey::from_rsa_pem(public_pem.as_bytes()).expect("decoding key"),
        )
    }

    fn verifier_with(decoding: DecodingKey) -> JwtVerifier {
        JwtVerifier {
            issuer: ISSUER.to_string(),
            audience: AUDIENCE.to_string(),
            jwks: JwksCache::with_keys(HashMap::from([(KID.to_string(), decoding)])),
        }
    }

    fn sign(encoding: &EncodingKey, claims: &TestClaims, kid: &str) -> String {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(kid.to_string());
        encode(&header, claims, encoding).expect("sign token")
    }

    fn valid_claims() -> TestClaims {
        TestClaims {
            sub: "auth0|patient-42".into(),
            iss: ISSUER.into(),
            aud: AUDIENCE.into(),
            exp: chrono::Utc::now().timestamp() + 600,
        }
    }

    #[tokio::test]
    async fn accepts_a_well_formed_token() {
        let (encoding, decoding) = test_keys();
        let verifier = verifier_with(decoding);
        let token = sign(&encoding, &valid_claims(), KID);
        let user = verifier.verify(&token).await.expect("verify");
        assert_eq!(user.subject, "auth0|patient-42");
    }

    #[tokio::test]
    async fn rejects_a_wrong_audience() {
        let (encoding, decoding) = test_keys();
        let verifier = verifier_with(decoding);
        let mut claims = valid_claims();
        claims.aud = "some-other-api".into();
        let token = sign(&encoding, &claims, KID);
        assert!(matches!(
            verifier.verify(&token).await,
            Err(ApiError::Unauthenticated(_))
        ));
    }

    #[tokio::test]
    async fn rejects_an_expired_token() {
        let (encoding, decoding) = test_keys();
        let verifier = verifier_with(decoding);
        let mut claims = valid_claims();
        claims.exp = chrono::Utc::now().timestamp() - 600;
        let token = sign(&encoding, &claims, KID);
        assert!(verifier.verify(&token).await.is_err());
    }

    #[tokio::test]
    async fn rejects_a_token_signed_with_an_unknown_kid() {
        let (encoding, decoding) = test_keys();
        let verifier = verifier_with(decoding);
        let token = sign(&encoding, &valid_claims(), "rotated-away");
        // The unknown kid triggers a refetch, which fails here (no provider
        // behind the empty URL) and surfaces as an upstream error.
        assert!(verifier.verify(&token).await.is_err());
    }

    #[tokio::test]
    async fn decoding_key_builds_from_a_published_jwk() {
        use base64::Engine as _;
        use base64::engine::general_purpose::URL_SAFE_NO_PAD;
        use rsa::traits::PublicKeyParts;

        let mut rng = rand::thread_rng();
        let private_key = RsaPrivateKey::new(&mut rng, 2048).expect("generate rsa key");
        let public_key = RsaPublicKey::from(&private_key);

        // The same document shape the identity provider publishes.
        let jwks = serde_json::json!({
            "keys": [{
                "kty": "RSA",
                "alg": "RS256",
                "use": "sig",
                "kid": KID,
                "n": URL_SAFE_NO_PAD.encode(public_key.n().to_bytes_be()),
                "e": URL_SAFE_NO_PAD.encode(public_key.e().to_bytes_be()),
            }]
        });
        let set: JwkSet = serde_json::from_value(jwks).expect("parse jwk set");
        let jwk = set.keys.first().expect("one key");
        let decoding = DecodingKey::from_jwk(jwk).expect("decoding key");

        let private_pem = private_key
            .to_pkcs1_pem(LineEnding::LF)
            .expect("encode private pem");
        let encoding = EncodingKey::from_rsa_pem(private_pem.as_bytes()).expect("encoding key");
        let verifier = verifier_with(decoding);
        let token = sign(&encoding, &valid_claims(), KID);
        assert!(verifier.verify(&token).await.is_ok());
    }

    #[tokio::test]
    async fn bypass_mode_ignores_the_header() {
        let authenticator = Authenticator::new(
            &AuthConfig::Bypass {
                subject: "dev-user".into(),
            },
            reqwest::Client::new(),
        );
        let user = authenticator.authenticate(None).await.expect("bypass");
        assert_eq!(user.subject, "dev-user");
    }

    #[tokio::test]
    async fn missing_header_is_unauthenticated() {
        let (_, decoding) = test_keys();
        let authenticator = Authenticator {
            mode: Mode::Jwt(verifier_with(decoding)),
        };
        assert!(matches!(
            authenticator.authenticate(None).await,
            Err(ApiError::Unauthenticated(_))
        ));
    }

    #[test]
    fn key_set_staleness_honors_the_ttl() {
        let fresh = KeySet {
            keys: HashMap::new(),
            fetched_at: Some(Instant::now()),
        };
        assert!(!fresh.is_stale(Duration::from_secs(3600)));
        assert!(fresh.is_stale(Duration::ZERO));
        assert!(KeySet::default().is_stale(Duration::from_secs(3600)));
    }
}
