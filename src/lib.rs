//! # Poolguard
//!
//! A Rust library for validating bearer tokens against the signing keys an
//! identity provider publishes as a JWKS (JSON Web Key Set).
//!
//! It is designed for Amazon Cognito user pools and other OIDC-style
//! providers that publish RSA keys, and for turning the outcome into an
//! API gateway authorizer decision.
//!
//! ## Features
//!
//! - RSA public key reconstruction from published modulus and exponent
//! - Per-validator JWKS caching with a freshness window (default 1 hour)
//! - RS256/RS384/RS512 signature verification; every other algorithm is refused
//! - Expiration, issuer and client/audience validation with typed errors
//! - Allow/deny authorizer responses that never expose why a token was denied
//!
//! ## Example
//!
//! ```rust,no_run
//! use poolguard::{TokenValidator, ValidateToken, ValidatorConfig};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ValidatorConfig::new(
//!         "https://cognito-idp.eu-west-1.amazonaws.com",
//!         "eu-west-1_AbCdEf123",
//!         "my-app-client",
//!     )?
//!     .with_cache_ttl(Duration::from_secs(1800)); // 30 minutes
//!
//!     let validator = TokenValidator::new(config);
//!
//!     let token = "Bearer eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9...";
//!     let claims = validator.validate(token).await?;
//!
//!     println!("Subject: {:?}", claims.subject());
//!     println!("Username: {:?}", claims.username());
//!
//!     Ok(())
//! }
//! ```

pub mod authorizer;
mod claims;
mod config;
mod error;
mod jwks_cache;
mod key;
pub mod providers;
mod validator;

// Re-exports for public API
pub use authorizer::authorize;
pub use authorizer::AuthorizerRequest;
pub use authorizer::AuthorizerResponse;
pub use claims::TokenClaims;
pub use config::AudiencePolicy;
pub use config::ValidatorConfig;
pub use error::Error;
pub use error::Result;
pub use jwks_cache::JwksCache;
pub use key::decode_exponent;
pub use key::decode_modulus;
pub use key::PublicKey;
pub use key::SigningKeyRecord;
pub use key::SigningKeySet;
pub use validator::strip_scheme;
pub use validator::SigningAlgorithm;
pub use validator::TokenValidator;
pub use validator::ValidateToken;
