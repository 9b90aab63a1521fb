//! API gateway style authorizer responses
//!
//! Turns the outcome of token validation into an allow or deny policy for
//! the invoked resource. Every validation failure renders the same deny
//! response; only the error kind is logged.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::claims::TokenClaims;
use crate::validator::ValidateToken;

const POLICY_VERSION: &str = "2012-10-17";
const INVOKE_ACTION: &str = "execute-api:Invoke";
const UNAUTHORIZED_PRINCIPAL: &str = "unauthorized";

/// Token authorizer invocation
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerRequest {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub authorization_token: String,
    pub method_arn: String,
}

/// Outcome of a policy statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Effect {
    Allow,
    Deny,
}

/// One statement of a policy document
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    pub action: Vec<String>,
    pub effect: Effect,
    pub resource: Vec<String>,
}

/// IAM-style policy returned to the gateway
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<Statement>,
}

impl PolicyDocument {
    /// Single-statement policy for invoking `resource`
    pub fn invoke(effect: Effect, resource: impl Into<String>) -> Self {
        Self {
            version: POLICY_VERSION.to_string(),
            statement: vec![Statement {
                action: vec![INVOKE_ACTION.to_string()],
                effect,
                resource: vec![resource.into()],
            }],
        }
    }
}

/// Authorizer decision for one invocation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerResponse {
    pub principal_id: String,
    pub policy_document: PolicyDocument,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, String>,
}

impl AuthorizerResponse {
    /// Allow `resource` for the token's subject, passing identity attributes
    /// through in the context
    pub fn allow(claims: &TokenClaims, resource: impl Into<String>) -> Self {
        let subject = claims.subject().unwrap_or_default().to_string();

        let mut context = BTreeMap::new();
        context.insert("sub".to_string(), subject.clone());
        if let Some(username) = claims.username() {
            context.insert("username".to_string(), username.to_string());
        }
        if let Some(email) = claims.email() {
            context.insert("email".to_string(), email.to_string());
        }

        Self {
            principal_id: subject,
            policy_document: PolicyDocument::invoke(Effect::Allow, resource),
            context,
        }
    }

    /// Deny `resource` without revealing anything about the token
    pub fn deny(resource: impl Into<String>) -> Self {
        Self {
            principal_id: UNAUTHORIZED_PRINCIPAL.to_string(),
            policy_document: PolicyDocument::invoke(Effect::Deny, resource),
            context: BTreeMap::new(),
        }
    }

    /// Effect of the first policy statement
    pub fn effect(&self) -> Option<Effect> {
        self.policy_document.statement.first().map(|s| s.effect)
    }
}

/// Validate the request's token and render the decision for its method
pub async fn authorize<V>(validator: &V, request: &AuthorizerRequest) -> AuthorizerResponse
where
    V: ValidateToken + Sync + ?Sized,
{
    match validator.validate(&request.authorization_token).await {
        Ok(claims) if claims.subject().is_some() => {
            AuthorizerResponse::allow(&claims, request.method_arn.as_str())
        }
        Ok(_) => {
            tracing::warn!(reason = "missing_subject", "Denying request");
            AuthorizerResponse::deny(request.method_arn.as_str())
        }
        Err(error) => {
            tracing::warn!(reason = error.kind(), "Denying request");
            AuthorizerResponse::deny(request.method_arn.as_str())
        }
    }
}
