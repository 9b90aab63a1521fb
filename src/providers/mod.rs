//! Provider-specific convenience constructors
//!
//! Each provider module knows how its identity provider lays out issuer and
//! key endpoint URLs, so callers only supply the values that identify a pool.
//!
//! ## Available Providers
//!
//! - [`cognito`]: Amazon Cognito user pools
//!
//! ## Example
//!
//! ```rust,no_run
//! use poolguard::providers::cognito;
//! use poolguard::ValidateToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let validator = cognito::validator("eu-west-1", "eu-west-1_AbCdEf123", "my-app-client")?;
//!
//! let claims = validator.validate("Bearer eyJhbG...").await?;
//! println!("Subject: {:?}", claims.subject());
//! # Ok(())
//! # }
//! ```

pub mod cognito;
