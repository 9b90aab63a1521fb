use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

/// Claims of a token that passed every validation step
///
/// Known claims have typed accessors that return `None` when the claim is
/// missing or carries an unexpected type. Anything else is reachable
/// through [`TokenClaims::get`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct TokenClaims(Map<String, Value>);

impl TokenClaims {
    pub(crate) fn new(claims: Map<String, Value>) -> Self {
        Self(claims)
    }

    /// Subject (`sub`)
    pub fn subject(&self) -> Option<&str> {
        self.get_str("sub")
    }

    /// Issuer (`iss`)
    pub fn issuer(&self) -> Option<&str> {
        self.get_str("iss")
    }

    /// Expiration time (`exp`) as a Unix timestamp
    ///
    /// Fractional timestamps are truncated.
    pub fn expires_at(&self) -> Option<i64> {
        let exp = self.get("exp")?;
        exp.as_i64().or_else(|| exp.as_f64().map(|secs| secs as i64))
    }

    /// App client that requested an access token
    pub fn client_id(&self) -> Option<&str> {
        self.get_str("client_id")
    }

    /// Audience (`aud`) when it is a single string
    pub fn audience(&self) -> Option<&str> {
        self.get_str("aud")
    }

    /// `cognito:username` on ID tokens, `username` on access tokens
    pub fn username(&self) -> Option<&str> {
        self.get_str("cognito:username")
            .or_else(|| self.get_str("username"))
    }

    pub fn email(&self) -> Option<&str> {
        self.get_str("email")
    }

    /// `id` or `access`
    pub fn token_use(&self) -> Option<&str> {
        self.get_str("token_use")
    }

    /// Any claim by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Any string claim by name
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}
