//! OAuth setup and config file commands.

use std::path::Path;
use tokio::runtime::Runtime;

use crate::catalog::spotify::{authorize_url, build_http_client, exchange_code, extract_authorization_code};
use crate::config::{self, Config, Credentials};
use crate::error::Error;

/// Print the authorize URL, or exchange a pasted code for a refresh token.
///
/// Only the refresh token (and client credentials the file lacks) are
/// written back; other command-line overrides stay out of the file.
pub fn cmd_authorize(
    rt: &Runtime,
    config: &Config,
    mut file_config: Config,
    config_path: Option<&Path>,
    code: Option<&str>,
) -> anyhow::Result<()> {
    let Some(code) = code else {
        let url = authorize_url(&config.http.accounts_base_url, &config.credentials)?;
        println!("Open this URL in a browser and approve access:");
        println!();
        println!("  {}", url);
        println!();
        println!("Then run: playlist-porter authorize --code '<redirect URL or code>'");
        return Ok(());
    };

    let code = extract_authorization_code(code)?;
    let http_client = build_http_client(&config.http)?;
    let grant = rt.block_on(exchange_code(
        &http_client,
        &config.http.accounts_base_url,
        &config.credentials,
        &code,
    ))?;
    let refresh_token = grant
        .refresh_token
        .ok_or_else(|| Error::authentication("token response carried no refresh token"))?;

    store_refresh_token(&mut file_config.credentials, &config.credentials, refresh_token);
    let path = match config_path {
        Some(path) => {
            config::save_to(&file_config, path)?;
            path.to_path_buf()
        }
        None => config::save(&file_config)?,
    };

    println!("✓ Authorized. Refresh token saved to {}", path.display());
    Ok(())
}

/// Record the new refresh token, filling in client credentials the file lacks
fn store_refresh_token(stored: &mut Credentials, effective: &Credentials, refresh_token: String) {
    if stored.client_id.is_empty() {
        stored.client_id = effective.client_id.clone();
    }
    if stored.client_secret.is_empty() {
        stored.client_secret = effective.client_secret.clone();
    }
    stored.redirect_uri = effective.redirect_uri.clone();
    stored.refresh_token = Some(refresh_token);
}

/// Print where the config file lives
pub fn cmd_config_path(config_path: Option<&Path>) -> anyhow::Result<()> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => config::config_path()
            .ok_or_else(|| Error::config("could not determine the config directory"))?,
    };
    println!("{}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_refresh_token_keeps_file_credentials() {
        let mut stored = Credentials {
            client_id: "file-id".to_string(),
            ..Default::default()
        };
        let effective = Credentials {
            client_id: "env-id".to_string(),
            client_secret: "env-secret".to_string(),
            access_token: Some("short-lived".to_string()),
            ..Default::default()
        };

        store_refresh_token(&mut stored, &effective, "refresh".to_string());

        assert_eq!(stored.client_id, "file-id");
        assert_eq!(stored.client_secret, "env-secret");
        assert_eq!(stored.refresh_token.as_deref(), Some("refresh"));
        assert_eq!(stored.access_token, None);
    }

    #[test]
    fn test_authorized_config_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        store_refresh_token(
            &mut config.credentials,
            &Credentials {
                client_id: "id".to_string(),
                client_secret: "secret".to_string(),
                ..Default::default()
            },
            "refresh".to_string(),
        );

        config::save_to(&config, &path).unwrap();
        let loaded = config::load_from(&path).unwrap();

        assert_eq!(loaded.credentials.refresh_token.as_deref(), Some("refresh"));
        assert_eq!(loaded.credentials.client_id, "id");
    }
}
