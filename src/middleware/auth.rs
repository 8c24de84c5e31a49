use axum::{async_trait, extract::FromRequestParts, http::request::Parts, http::HeaderMap};
use std::convert::Infallible;

/// Raw bearer token from the Authorization header, if any.
///
/// Extraction never fails and never verifies anything; the `Authenticate`
/// gate decides what a missing or bad credential means for the route.
#[derive(Debug, Clone, Default)]
pub struct Credential(Option<String>);

impl Credential {
    pub fn bearer(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn from_headers(headers: &HeaderMap) -> Self {
        let token = headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string);

        Self(token)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Credential
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}
