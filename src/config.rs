use std::time::Duration;

use reqwest::Client;
use reqwest::Url;

use crate::error::configuration_error;
use crate::error::Result;

/// How the validator treats tokens that carry neither `client_id` nor `aud`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AudiencePolicy {
    /// Reject tokens that name no client and no audience
    #[default]
    RequireClientOrAudience,
    /// Accept tokens that name no client and no audience; a present claim must still match
    AllowMissing,
}

/// Configuration for the token validator
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Where the provider publishes its signing keys
    pub(crate) provider_key_endpoint: Url,
    /// The expected issuer: `<provider base>/<pool identifier>`
    pub(crate) expected_issuer: String,
    /// The client the token's `client_id` or `aud` must name
    pub(crate) expected_audience: String,
    /// Freshness window for cached keys (default: 1 hour)
    pub(crate) key_cache_ttl: Duration,
    /// Optional custom HTTP client for fetching JWKS
    /// If not provided, a default client will be created
    pub(crate) http_client: Option<Client>,
    pub(crate) audience_policy: AudiencePolicy,
}

const DEFAULT_KEY_CACHE_TTL_SECS: u64 = 3600;
const JWKS_PATH: &str = ".well-known/jwks.json";

impl ValidatorConfig {
    /// Create a configuration for a provider pool
    ///
    /// The issuer is `<provider_base>/<pool_id>` and keys are fetched from
    /// `<issuer>/.well-known/jwks.json`.
    ///
    /// # Errors
    /// Returns `Error::Configuration` if any value is empty or the derived
    /// key endpoint is not a valid URL
    pub fn new(
        provider_base: impl AsRef<str>,
        pool_id: impl AsRef<str>,
        client_id: impl AsRef<str>,
    ) -> Result<Self> {
        let provider_base = required("provider base", provider_base.as_ref())?;
        let pool_id = required("pool identifier", pool_id.as_ref())?;
        let client_id = required("client identifier", client_id.as_ref())?;

        let expected_issuer = format!("{}/{}", provider_base.trim_end_matches('/'), pool_id);
        let provider_key_endpoint = Url::parse(&format!("{expected_issuer}/{JWKS_PATH}"))
            .map_err(|e| configuration_error(format!("invalid key endpoint: {e}")))?;

        Ok(Self {
            provider_key_endpoint,
            expected_issuer,
            expected_audience: client_id.to_string(),
            key_cache_ttl: Duration::from_secs(DEFAULT_KEY_CACHE_TTL_SECS),
            http_client: None,
            audience_policy: AudiencePolicy::default(),
        })
    }

    /// Set the freshness window after which all cached keys are discarded
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.key_cache_ttl = ttl;
        self
    }

    /// Set a custom HTTP client
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Set how tokens without `client_id` and `aud` are treated
    pub fn with_audience_policy(mut self, policy: AudiencePolicy) -> Self {
        self.audience_policy = policy;
        self
    }

    /// The URL keys are fetched from
    pub fn provider_key_endpoint(&self) -> &Url {
        &self.provider_key_endpoint
    }

    /// The issuer tokens must carry in `iss`
    pub fn expected_issuer(&self) -> &str {
        &self.expected_issuer
    }

    /// The client tokens must name in `client_id` or `aud`
    pub fn expected_audience(&self) -> &str {
        &self.expected_audience
    }
}

fn required<'a>(name: &str, value: &'a str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(configuration_error(format!("{name} is required")));
    }
    Ok(value)
}
