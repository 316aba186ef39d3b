//! OAuth helpers for the Spotify accounts service.
//!
//! The authorization-code flow happens once, from the CLI: the user opens
//! [`authorize_url`], approves access, and pastes the redirect back. The code
//! is exchanged for a refresh token, which is stored in the config file and
//! traded for a fresh access token at the start of every batch.
//!
//! API: https://developer.spotify.com/documentation/web-api/tutorials/code-flow

use std::time::Duration;

use super::{adapter, dto};
use crate::config::Credentials;
use crate::error::{Error, Result};

/// Scopes needed to create playlists and add items to them
pub const SCOPES: &[&str] = &["playlist-modify-public", "playlist-modify-private"];

/// Tokens granted by the accounts service
#[derive(Debug, Clone)]
pub struct TokenGrant {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Duration,
}

impl From<dto::TokenResponse> for TokenGrant {
    fn from(response: dto::TokenResponse) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_in: Duration::from_secs(response.expires_in),
        }
    }
}

/// URL the user opens to grant access
pub fn authorize_url(accounts_base_url: &str, credentials: &Credentials) -> Result<String> {
    require_client_id(credentials)?;
    if credentials.redirect_uri.is_empty() {
        return Err(Error::authentication("missing redirect URI"));
    }

    Ok(format!(
        "{}/authorize?client_id={}&response_type=code&redirect_uri={}&scope={}",
        accounts_base_url.trim_end_matches('/'),
        urlencoding::encode(&credentials.client_id),
        urlencoding::encode(&credentials.redirect_uri),
        urlencoding::encode(&SCOPES.join(" ")),
    ))
}

/// Pull the authorization code out of whatever the user pasted.
///
/// Accepts either the full redirect URL or the bare code.
pub fn extract_authorization_code(input: &str) -> Result<String> {
    let input = input.trim();
    if input.is_empty() {
        return Err(Error::authentication("no authorization code given"));
    }

    if !input.contains("://") {
        return Ok(input.to_string());
    }

    let url = reqwest::Url::parse(input)
        .map_err(|e| Error::authentication(format!("invalid redirect URL: {}", e)))?;

    let mut code = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "error" => {
                return Err(Error::authentication(format!(
                    "authorization was refused: {}",
                    value
                )));
            }
            "code" => code = Some(value.into_owned()),
            _ => {}
        }
    }

    code.filter(|c| !c.is_empty())
        .ok_or_else(|| Error::authentication("redirect URL carries no `code` parameter"))
}

/// Exchange an authorization code for access and refresh tokens
pub async fn exchange_code(
    http_client: &reqwest::Client,
    accounts_base_url: &str,
    credentials: &Credentials,
    code: &str,
) -> Result<TokenGrant> {
    request_token(
        http_client,
        accounts_base_url,
        credentials,
        &[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", credentials.redirect_uri.as_str()),
        ],
    )
    .await
}

/// Trade a refresh token for a new access token
pub async fn refresh_access_token(
    http_client: &reqwest::Client,
    accounts_base_url: &str,
    credentials: &Credentials,
    refresh_token: &str,
) -> Result<TokenGrant> {
    request_token(
        http_client,
        accounts_base_url,
        credentials,
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ],
    )
    .await
}

async fn request_token(
    http_client: &reqwest::Client,
    accounts_base_url: &str,
    credentials: &Credentials,
    form: &[(&str, &str)],
) -> Result<TokenGrant> {
    require_client_id(credentials)?;
    if credentials.client_secret.is_empty() {
        return Err(Error::authentication("missing client secret"));
    }

    let url = format!("{}/api/token", accounts_base_url.trim_end_matches('/'));
    let response = http_client
        .post(&url)
        .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
        .form(form)
        .send()
        .await
        .map_err(|e| Error::authentication(format!("token request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<dto::AuthErrorResponse>(&body)
            .map(adapter::auth_error_message)
            .unwrap_or_else(|_| body.chars().take(200).collect());
        return Err(Error::authentication(format!(
            "token request rejected (HTTP {}): {}",
            status.as_u16(),
            detail
        )));
    }

    let token = response
        .json::<dto::TokenResponse>()
        .await
        .map_err(|e| Error::authentication(format!("malformed token response: {}", e)))?;

    tracing::debug!("Obtained access token valid for {}s", token.expires_in);
    Ok(token.into())
}

fn require_client_id(credentials: &Credentials) -> Result<()> {
    if credentials.client_id.is_empty() {
        return Err(Error::authentication("missing client ID"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn credentials() -> Credentials {
        Credentials {
            client_id: "client id".to_string(),
            client_secret: "secret".to_string(),
            redirect_uri: "http://127.0.0.1:8888/callback".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_authorize_url_encodes_parameters() {
        let url = authorize_url("https://accounts.spotify.com/", &credentials()).unwrap();
        assert!(url.starts_with("https://accounts.spotify.com/authorize?"));
        assert!(url.contains("client_id=client%20id"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("redirect_uri=http%3A%2F%2F127.0.0.1%3A8888%2Fcallback"));
        assert!(url.contains("scope=playlist-modify-public%20playlist-modify-private"));
    }

    #[test]
    fn test_authorize_url_requires_client_id() {
        let creds = Credentials {
            client_id: String::new(),
            ..credentials()
        };
        let err = authorize_url("https://accounts.spotify.com", &creds).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authentication);
    }

    #[test]
    fn test_extract_code_from_redirect_url() {
        let code = extract_authorization_code(
            "http://127.0.0.1:8888/callback?code=AQBx-123&state=xyz",
        )
        .unwrap();
        assert_eq!(code, "AQBx-123");
    }

    #[test]
    fn test_extract_bare_code() {
        assert_eq!(extract_authorization_code("  AQBx-123\n").unwrap(), "AQBx-123");
    }

    #[test]
    fn test_extract_code_refused() {
        let err = extract_authorization_code("http://127.0.0.1:8888/callback?error=access_denied")
            .unwrap_err();
        assert!(err.to_string().contains("access_denied"));
    }

    #[test]
    fn test_extract_code_missing() {
        assert!(extract_authorization_code("http://127.0.0.1:8888/callback?state=1").is_err());
        assert!(extract_authorization_code("   ").is_err());
    }

    #[tokio::test]
    async fn test_token_request_requires_secret() {
        let creds = Credentials {
            client_secret: String::new(),
            ..credentials()
        };
        let client = reqwest::Client::new();
        let err = refresh_access_token(&client, "http://127.0.0.1:9", &creds, "r")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("client secret"));
    }
}
