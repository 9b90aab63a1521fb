//! Amazon Cognito user pool tokens
//!
//! Cognito publishes the keys of a user pool at
//! `https://cognito-idp.<region>.amazonaws.com/<pool id>/.well-known/jwks.json`
//! and issues tokens with `iss` set to the same URL minus the JWKS path.
//!
//! ID tokens name the app client in `aud`; access tokens name it in
//! `client_id`. Either is checked against the configured client.

use crate::config::ValidatorConfig;
use crate::error::configuration_error;
use crate::error::Result;
use crate::validator::TokenValidator;

/// Base URL of the Cognito identity provider in `region`
///
/// # Errors
/// Returns `Error::Configuration` if the region is empty
pub fn provider_base(region: &str) -> Result<String> {
    let region = region.trim();
    if region.is_empty() {
        return Err(configuration_error("region is required"));
    }
    Ok(format!("https://cognito-idp.{region}.amazonaws.com"))
}

/// Validator configuration for a Cognito user pool
pub fn cognito_config(region: &str, user_pool_id: &str, client_id: &str) -> Result<ValidatorConfig> {
    ValidatorConfig::new(provider_base(region)?, user_pool_id, client_id)
}

/// Validator for a Cognito user pool with default settings
pub fn validator(region: &str, user_pool_id: &str, client_id: &str) -> Result<TokenValidator> {
    Ok(TokenValidator::new(cognito_config(region, user_pool_id, client_id)?))
}
