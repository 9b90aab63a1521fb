use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::Validation;
use serde::Deserialize;
use serde_json::Map;
use serde_json::Value;

use crate::claims::TokenClaims;
use crate::config::AudiencePolicy;
use crate::config::ValidatorConfig;
use crate::error::jwt_error;
use crate::error::malformed_token_error;
use crate::error::Error;
use crate::error::Result;
use crate::jwks_cache::JwksCache;
use crate::key::PublicKey;

/// Trait for bearer token validation
#[async_trait]
pub trait ValidateToken {
    /// Validate a token, optionally prefixed with `Bearer `, and return its claims
    async fn validate(&self, token: &str) -> Result<TokenClaims>;
}

/// Signing algorithms a token may declare
///
/// Only the RSA PKCS#1 v1.5 family is accepted, so a token can never steer
/// verification towards a symmetric algorithm or `none`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningAlgorithm {
    Rs256,
    Rs384,
    Rs512,
}

impl SigningAlgorithm {
    /// Map the header's `alg` value onto a supported algorithm
    ///
    /// # Errors
    /// Returns `Error::UnsupportedAlgorithm` for anything outside the family
    pub fn from_header(alg: &str) -> Result<Self> {
        match alg {
            "RS256" => Ok(Self::Rs256),
            "RS384" => Ok(Self::Rs384),
            "RS512" => Ok(Self::Rs512),
            other => Err(Error::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

impl From<SigningAlgorithm> for Algorithm {
    fn from(alg: SigningAlgorithm) -> Self {
        match alg {
            SigningAlgorithm::Rs256 => Algorithm::RS256,
            SigningAlgorithm::Rs384 => Algorithm::RS384,
            SigningAlgorithm::Rs512 => Algorithm::RS512,
        }
    }
}

/// The part of a token header the validator looks at
#[derive(Debug, Deserialize)]
struct TokenHeader {
    #[serde(default)]
    alg: String,
    kid: Option<Value>,
}

impl TokenHeader {
    /// Key id, if it is a non-empty string
    fn key_id(&self) -> Option<&str> {
        self.kid
            .as_ref()
            .and_then(Value::as_str)
            .filter(|kid| !kid.is_empty())
    }
}

/// Bearer token validator with JWKS caching support
pub struct TokenValidator {
    jwks_cache: JwksCache,
    expected_issuer: String,
    expected_audience: String,
    audience_policy: AudiencePolicy,
}

impl TokenValidator {
    /// Create a new validator that owns its own key cache
    pub fn new(config: ValidatorConfig) -> Self {
        let client = config.http_client.unwrap_or_default();

        Self {
            jwks_cache: JwksCache::new(config.provider_key_endpoint, config.key_cache_ttl, client),
            expected_issuer: config.expected_issuer,
            expected_audience: config.expected_audience,
            audience_policy: config.audience_policy,
        }
    }

    /// The key cache owned by this validator
    pub fn jwks_cache(&self) -> &JwksCache {
        &self.jwks_cache
    }

    /// Verify the signature over header and payload and decode the payload
    ///
    /// Claim checks are left to the validator's own steps so each failure
    /// keeps its own error kind.
    fn verify_signature(
        &self,
        token: &str,
        key: &PublicKey,
        algorithm: SigningAlgorithm,
    ) -> Result<TokenClaims> {
        let mut validation = Validation::new(algorithm.into());
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let token_data =
            decode::<Map<String, Value>>(token, key.decoding_key(), &validation).map_err(jwt_error)?;

        Ok(TokenClaims::new(token_data.claims))
    }

    fn check_expiry(&self, claims: &TokenClaims) -> Result<()> {
        match claims.expires_at() {
            Some(exp) if Utc::now().timestamp() < exp => Ok(()),
            exp => Err(Error::TokenExpired(exp)),
        }
    }

    fn check_issuer(&self, claims: &TokenClaims) -> Result<()> {
        if claims.issuer() != Some(self.expected_issuer.as_str()) {
            return Err(Error::IssuerMismatch(claims.get("iss").map(describe)));
        }
        Ok(())
    }

    fn check_audience(&self, claims: &TokenClaims) -> Result<()> {
        let client_id = claims.get("client_id");
        let audience = claims.get("aud");

        for (claim, value) in [("client_id", client_id), ("aud", audience)] {
            if let Some(value) = value {
                if value.as_str() != Some(self.expected_audience.as_str()) {
                    return Err(Error::AudienceMismatch {
                        claim,
                        found: Some(describe(value)),
                    });
                }
            }
        }

        if client_id.is_none()
            && audience.is_none()
            && self.audience_policy == AudiencePolicy::RequireClientOrAudience
        {
            return Err(Error::AudienceMismatch {
                claim: "client_id/aud",
                found: None,
            });
        }

        Ok(())
    }
}

#[async_trait]
impl ValidateToken for TokenValidator {
    async fn validate(&self, token: &str) -> Result<TokenClaims> {
        let token = strip_scheme(token);

        let header = parse_header(token)?;
        let algorithm = SigningAlgorithm::from_header(&header.alg)?;
        let kid = header.key_id().ok_or(Error::MissingKeyId)?;

        let key = self.jwks_cache.resolve(kid).await?;
        let claims = self.verify_signature(token, &key, algorithm)?;

        self.check_expiry(&claims)?;
        self.check_issuer(&claims)?;
        self.check_audience(&claims)?;

        tracing::debug!(kid = %kid, "Token validated");
        Ok(claims)
    }
}

/// Remove a leading `Bearer ` scheme label, if present
pub fn strip_scheme(raw: &str) -> &str {
    let raw = raw.trim();
    match raw.split_once(char::is_whitespace) {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim_start(),
        _ => raw,
    }
}

/// Split the token, check every part decodes and return its header
///
/// Nothing in the header is trusted yet; this only rejects input that could
/// never verify, before any key lookup.
fn parse_header(token: &str) -> Result<TokenHeader> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(malformed_token_error(format!(
            "expected 3 dot-separated parts, got {}",
            parts.len()
        )));
    }
    if parts[0].is_empty() || parts[1].is_empty() {
        return Err(malformed_token_error("empty header or payload"));
    }

    let header = URL_SAFE_NO_PAD
        .decode(parts[0])
        .map_err(malformed_token_error)?;
    let payload = URL_SAFE_NO_PAD
        .decode(parts[1])
        .map_err(malformed_token_error)?;
    URL_SAFE_NO_PAD
        .decode(parts[2])
        .map_err(malformed_token_error)?;

    match serde_json::from_slice::<Value>(&payload).map_err(malformed_token_error)? {
        Value::Object(_) => {}
        _ => return Err(malformed_token_error("payload is not a JSON object")),
    }

    serde_json::from_slice(&header).map_err(malformed_token_error)
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
