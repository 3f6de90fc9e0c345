use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts, http::HeaderMap};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use std::convert::Infallible;
use uuid::Uuid;

use super::{Claims, Identity};

/// Per-request values the identity provider may inspect.
///
/// Handlers extract this once and pass it explicitly; nothing reads the
/// current request from ambient state.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
    headers: HeaderMap,
}

impl RequestContext {
    pub fn new(headers: HeaderMap) -> Self {
        let request_id = headers
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Self { request_id, headers }
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Extract the bearer token from the Authorization header
    pub fn bearer_token(&self) -> Result<&str, &'static str> {
        let auth_header = self
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .ok_or("Missing Authorization header")?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| "Invalid Authorization header format")?;

        match auth_str.strip_prefix("Bearer ") {
            Some(token) if !token.trim().is_empty() => Ok(token.trim()),
            Some(_) => Err("Empty bearer token"),
            None => Err("Authorization header must use Bearer token format"),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(RequestContext::new(parts.headers.clone()))
    }
}

/// Resolves the caller of a request. `None` means unauthenticated.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn current_identity(&self, ctx: &RequestContext) -> Option<Identity>;
}

/// Verifies HS256 bearer tokens issued by the hosted identity provider
pub struct JwtIdentityProvider {
    decoding_key: Option<DecodingKey>,
    validation: Validation,
}

impl JwtIdentityProvider {
    pub fn new(secret: &str, issuer: Option<&str>) -> Self {
        // An empty HMAC key would accept tokens signed with an empty key
        let decoding_key = if secret.is_empty() {
            tracing::warn!("JWT secret not configured; every request will be unauthenticated");
            None
        } else {
            Some(DecodingKey::from_secret(secret.as_bytes()))
        };

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }

        Self { decoding_key, validation }
    }

    fn verify(&self, token: &str) -> Result<Claims, String> {
        let key = self
            .decoding_key
            .as_ref()
            .ok_or_else(|| "JWT secret not configured".to_string())?;

        let token_data = decode::<Claims>(token, key, &self.validation)
            .map_err(|e| format!("Invalid JWT token: {}", e))?;

        Ok(token_data.claims)
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn current_identity(&self, ctx: &RequestContext) -> Option<Identity> {
        let token = match ctx.bearer_token() {
            Ok(token) => token,
            Err(reason) => {
                tracing::debug!(request_id = %ctx.request_id, "No identity: {}", reason);
                return None;
            }
        };

        match self.verify(token) {
            Ok(claims) if !claims.sub.trim().is_empty() => Some(Identity::new(claims.sub)),
            Ok(_) => {
                tracing::debug!(request_id = %ctx.request_id, "No identity: empty subject");
                None
            }
            Err(reason) => {
                tracing::debug!(request_id = %ctx.request_id, "No identity: {}", reason);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::issue_token;
    use axum::http::HeaderValue;

    const SECRET: &str = "test-secret";

    fn context_with(auth: Option<&str>) -> RequestContext {
        let mut headers = HeaderMap::new();
        if let Some(value) = auth {
            headers.insert(axum::http::header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        }
        RequestContext::new(headers)
    }

    fn bearer(claims: &Claims, secret: &str) -> String {
        format!("Bearer {}", issue_token(claims, secret).unwrap())
    }

    #[tokio::test]
    async fn accepts_valid_token() {
        let provider = JwtIdentityProvider::new(SECRET, None);
        let ctx = context_with(Some(&bearer(&Claims::new("user_1", None, 1), SECRET)));

        assert_eq!(provider.current_identity(&ctx).await, Some(Identity::new("user_1")));
    }

    #[tokio::test]
    async fn rejects_missing_and_malformed_headers() {
        let provider = JwtIdentityProvider::new(SECRET, None);

        assert_eq!(provider.current_identity(&context_with(None)).await, None);
        assert_eq!(provider.current_identity(&context_with(Some("Basic abc"))).await, None);
        assert_eq!(provider.current_identity(&context_with(Some("Bearer   "))).await, None);
        assert_eq!(provider.current_identity(&context_with(Some("Bearer not.a.jwt"))).await, None);
    }

    #[tokio::test]
    async fn rejects_wrong_signature() {
        let provider = JwtIdentityProvider::new(SECRET, None);
        let ctx = context_with(Some(&bearer(&Claims::new("user_1", None, 1), "other-secret")));

        assert_eq!(provider.current_identity(&ctx).await, None);
    }

    #[tokio::test]
    async fn rejects_expired_token() {
        let provider = JwtIdentityProvider::new(SECRET, None);
        let mut claims = Claims::new("user_1", None, 1);
        claims.exp = chrono::Utc::now().timestamp() - 3600;
        let ctx = context_with(Some(&bearer(&claims, SECRET)));

        assert_eq!(provider.current_identity(&ctx).await, None);
    }

    #[tokio::test]
    async fn enforces_issuer_when_configured() {
        let provider = JwtIdentityProvider::new(SECRET, Some("https://clerk.example.com"));

        let wrong = context_with(Some(&bearer(&Claims::new("user_1", Some("https://evil.example.com".into()), 1), SECRET)));
        assert_eq!(provider.current_identity(&wrong).await, None);

        let right = context_with(Some(&bearer(&Claims::new("user_1", Some("https://clerk.example.com".into()), 1), SECRET)));
        assert_eq!(provider.current_identity(&right).await, Some(Identity::new("user_1")));
    }

    #[tokio::test]
    async fn empty_secret_authenticates_nobody() {
        let provider = JwtIdentityProvider::new("", None);
        // Signed with a real key; the provider must not fall back to accepting it
        let ctx = context_with(Some(&bearer(&Claims::new("user_1", None, 1), SECRET)));

        assert_eq!(provider.current_identity(&ctx).await, None);
    }

    #[test]
    fn request_id_comes_from_header_when_present() {
        let mut headers = HeaderMap::new();
        headers.insert("x-request-id", HeaderValue::from_static("req-42"));
        assert_eq!(RequestContext::new(headers).request_id, "req-42");
        assert!(!RequestContext::new(HeaderMap::new()).request_id.is_empty());
    }
}
