//! Bearer token extraction
//!
//! The proxy does not validate tokens; it only requires one and forwards it
//! upstream with each call.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::ApiError;

/// Token taken from `Authorization: Bearer <token>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(pub String);

impl BearerToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?
            .to_str()
            .map_err(|_| ApiError::Unauthorized("Invalid Authorization header".to_string()))?;

        parse_bearer(header)
            .map(|token| BearerToken(token.to_string()))
            .ok_or_else(|| ApiError::Unauthorized("Expected a bearer token".to_string()))
    }
}

/// Split `Bearer <token>` (scheme is case-insensitive); empty tokens are rejected
fn parse_bearer(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
