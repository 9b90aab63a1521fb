use std::time::Duration;

use poolguard::providers::cognito;
use poolguard::{authorize, AudiencePolicy, AuthorizerRequest, TokenValidator, ValidateToken};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Example JWT token (this is just a placeholder - use a real token in practice)
    let token = "Bearer eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9...";

    // Example 1: Simple usage with default settings
    println!("=== Example 1: Cognito User Pool ===");
    let validator = cognito::validator("eu-west-1", "eu-west-1_AbCdEf123", "my-app-client")?;

    match validator.validate(token).await {
        Ok(claims) => {
            println!("✓ Token validated successfully!");
            println!("  Subject: {:?}", claims.subject());
            println!("  Username: {:?}", claims.username());
        }
        Err(e) => {
            eprintln!("✗ Token validation failed ({}): {}", e.kind(), e);
        }
    }

    println!();

    // Example 2: Custom cache window, HTTP client and audience policy
    println!("=== Example 2: Custom Configuration ===");
    let custom_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()?;

    let config = cognito::cognito_config("eu-west-1", "eu-west-1_AbCdEf123", "my-app-client")?
        .with_cache_ttl(Duration::from_secs(1800))
        .with_http_client(custom_client)
        .with_audience_policy(AudiencePolicy::AllowMissing);

    let validator = TokenValidator::new(config);

    // Example 3: API gateway authorizer decision
    println!("=== Example 3: Authorizer Response ===");
    let request = AuthorizerRequest {
        kind: "TOKEN".to_string(),
        authorization_token: token.to_string(),
        method_arn: "arn:aws:execute-api:eu-west-1:123456789012:abc123/prod/GET/items".to_string(),
    };

    let response = authorize(&validator, &request).await;
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
