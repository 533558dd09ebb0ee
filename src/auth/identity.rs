//! Authenticated identity and per-request context.

use axum::http::Method;
use serde::Serialize;
use serde_json::{Map, Value};

/// Claims about a user, as returned by the identity provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identity {
    subject: String,
    claims: Map<String, Value>,
}

impl Identity {
    pub fn new(subject: impl Into<String>, claims: Map<String, Value>) -> Self {
        Self {
            subject: subject.into(),
            claims,
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn claims(&self) -> &Map<String, Value> {
        &self.claims
    }

    pub fn claim(&self, key: &str) -> Option<&Value> {
        self.claims.get(key)
    }

    /// String claim, if present and a string.
    pub fn claim_str(&self, key: &str) -> Option<&str> {
        self.claim(key).and_then(Value::as_str)
    }
}

/// Typed state attached to a request once it has been routed.
///
/// Inserted into the request extensions by the route checker; handlers take it
/// with `Extension<RequestContext>`.
#[derive(Debug, Clone)]
pub struct RequestContext {
    method: Method,
    path: String,
    request_id: Option<String>,
    identity: Option<Identity>,
}

impl RequestContext {
    pub fn new(method: Method, path: impl Into<String>, request_id: Option<String>) -> Self {
        Self {
            method,
            path: path.into(),
            request_id,
            identity: None,
        }
    }

    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identity_accessors() {
        let claims = json!({ "email": "a@b.c", "emailVerified": true })
            .as_object()
            .cloned()
            .unwrap();
        let identity = Identity::new("uid-1", claims);

        assert_eq!(identity.subject(), "uid-1");
        assert_eq!(identity.claim_str("email"), Some("a@b.c"));
        assert_eq!(identity.claim_str("emailVerified"), None);
        assert_eq!(identity.claim("emailVerified"), Some(&json!(true)));
    }

    #[test]
    fn test_context_starts_anonymous() {
        let ctx = RequestContext::new(Method::GET, "/dashboard", Some("req-1".into()));
        assert!(!ctx.is_authenticated());
        assert_eq!(ctx.request_id(), Some("req-1"));

        let ctx = ctx.with_identity(Identity::new("uid", Map::new()));
        assert_eq!(ctx.identity().map(Identity::subject), Some("uid"));
    }
}
