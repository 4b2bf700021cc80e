use anyhow::anyhow;
use aws_sdk_sts::{Client, config::Credentials, types};

use crate::error::{CliError, Result};

/// The source profile's long-term key pair and MFA device serial, used as
/// the calling identity for the session token exchange.
pub struct SourceCredentials {
    credentials: Credentials,
    mfa_serial: String,
}

impl SourceCredentials {
    pub fn new(access_key_id: String, secret_access_key: String, mfa_serial: String) -> Self {
        Self {
            credentials: Credentials::new(
                access_key_id,
                secret_access_key,
                None,
                None,
                "aws-mfa-session",
            ),
            mfa_serial,
        }
    }

    pub fn mfa_serial(&self) -> &str {
        &self.mfa_serial
    }

    /// Exchanges the one-time MFA code for temporary session credentials.
    /// The reply is returned exactly as STS issued it, expiration included.
    pub async fn get_session_token(&self, code: &str, duration: u32) -> Result<types::Credentials> {
        let config = aws_config::from_env()
            .credentials_provider(self.credentials.clone())
            .load()
            .await;

        Client::new(&config)
            .get_session_token()
            .duration_seconds(duration as i32)
            .serial_number(&self.mfa_serial)
            .token_code(code)
            .send()
            .await
            .map_err(|err| CliError::Exchange(anyhow::Error::new(err)))?
            .credentials()
            .cloned()
            .ok_or_else(|| CliError::Exchange(anyhow!("no credentials in the STS reply")))
    }
}
