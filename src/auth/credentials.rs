/// Credential extraction from the `Authorization` header
///
/// Two wire conventions share the same header: `Bearer <token>` for user
/// session credentials and `ApiKey <key>` for service-to-service calls.
/// Scheme prefixes are case-sensitive with a single space separator.

use actix_web::http::header::{self, HeaderMap};

use crate::error::CredentialError;

/// Extract a bearer token from the request headers.
///
/// # Errors
/// `MissingHeader` when no `Authorization` header is present,
/// `MalformedScheme` when it does not start with `"Bearer "`, and
/// `EmptyToken` when nothing but whitespace follows the prefix.
pub fn bearer_token(headers: &HeaderMap) -> Result<String, CredentialError> {
    token_with_scheme(headers, "Bearer")
}

/// Extract an API key from the request headers.
///
/// Same algorithm as [`bearer_token`] with the `"ApiKey "` prefix; the key
/// deliberately travels in the `Authorization` header, not a header of its
/// own.
pub fn api_key(headers: &HeaderMap) -> Result<String, CredentialError> {
    token_with_scheme(headers, "ApiKey")
}

fn token_with_scheme(headers: &HeaderMap, scheme: &'static str) -> Result<String, CredentialError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(CredentialError::MissingHeader)?
        .to_str()
        .map_err(|_| CredentialError::MalformedScheme(scheme))?;

    let token = value
        .strip_prefix(scheme)
        .and_then(|rest| rest.strip_prefix(' '))
        .ok_or(CredentialError::MalformedScheme(scheme))?
        .trim();

    if token.is_empty() {
        return Err(CredentialError::EmptyToken);
    }

    Ok(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::HeaderValue;

    fn headers_with_authorization(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(value).unwrap(),
        );
        headers
    }

    #[test]
    fn bearer_token_is_extracted() {
        let headers = headers_with_authorization("Bearer abc123");
        assert_eq!(bearer_token(&headers).unwrap(), "abc123");
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let headers = headers_with_authorization("Bearer   abc123  ");
        assert_eq!(bearer_token(&headers).unwrap(), "abc123");
    }

    #[test]
    fn missing_header_is_its_own_error() {
        let headers = HeaderMap::new();
        assert_eq!(
            bearer_token(&headers).unwrap_err(),
            CredentialError::MissingHeader
        );
    }

    #[test]
    fn wrong_scheme_is_rejected() {
        let headers = headers_with_authorization("Basic abc123");
        assert_eq!(
            bearer_token(&headers).unwrap_err(),
            CredentialError::MalformedScheme("Bearer")
        );
    }

    #[test]
    fn scheme_prefix_is_case_sensitive() {
        let headers = headers_with_authorization("bearer abc123");
        assert_eq!(
            bearer_token(&headers).unwrap_err(),
            CredentialError::MalformedScheme("Bearer")
        );
    }

    #[test]
    fn missing_space_separator_is_rejected() {
        let headers = headers_with_authorization("Bearerabc123");
        assert_eq!(
            bearer_token(&headers).unwrap_err(),
            CredentialError::MalformedScheme("Bearer")
        );
    }

    #[test]
    fn empty_token_is_its_own_error() {
        let headers = headers_with_authorization("Bearer ");
        assert_eq!(
            bearer_token(&headers).unwrap_err(),
            CredentialError::EmptyToken
        );
    }

    #[test]
    fn api_key_uses_the_same_header_with_its_own_scheme() {
        let headers = headers_with_authorization("ApiKey f271c81ff7084ee5b99a5091b42d486e");
        assert_eq!(
            api_key(&headers).unwrap(),
            "f271c81ff7084ee5b99a5091b42d486e"
        );

        let bearer = headers_with_authorization("Bearer sometoken");
        assert_eq!(
            api_key(&bearer).unwrap_err(),
            CredentialError::MalformedScheme("ApiKey")
        );
    }
}
