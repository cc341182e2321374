use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::{self, Claims, JwtError};
use crate::error::ApiError;

/// Authenticated user context extracted from the JWT
#[derive(Clone, Copy, Debug)]
pub struct AuthUser {
    pub user_id: i64,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
        }
    }
}

/// JWT authentication middleware that validates tokens and injects the
/// user context as a request extension.
pub async fn jwt_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers).map_err(ApiError::unauthorized)?;

    let claims = auth::decode_token(&token).map_err(|err| match err {
        JwtError::Invalid(_) => ApiError::unauthorized("invalid token"),
        other => ApiError::from(other),
    })?;

    request.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(request).await)
}

/// Extract the token from an `Authorization: Bearer <token>` header
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty bearer token".to_string());
        }
        Ok(token.trim().to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        let headers = headers_with("Bearer abc.def.ghi");
        assert_eq!(extract_bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn rejects_missing_header() {
        assert!(extract_bearer_token(&HeaderMap::new()).is_err());
    }

    #[test]
    fn rejects_non_bearer_scheme() {
        let headers = headers_with("Basic dXNlcjpwYXNz");
        assert!(extract_bearer_token(&headers).is_err());
    }

    #[test]
    fn rejects_empty_token() {
        let headers = headers_with("Bearer   ");
        assert!(extract_bearer_token(&headers).is_err());
    }
}
