//! The credential refresh pipeline.
//!
//! One linear pass: load the credentials file (writing the backup copy
//! while the original text is still in hand), validate the source
//! profile's required fields, exchange the MFA code for a session token,
//! overlay the session keys onto the destination profile, and save. Each
//! stage returns a tagged error; the first failure ends the run with the
//! file on disk left exactly as it was found (the backup copy, when
//! requested, is written during the load stage and therefore survives a
//! later failure).

use aws_smithy_types::date_time::Format;
use log::{debug, info};

use crate::cli::Args;
use crate::credentials::SourceCredentials;
use crate::error::{CliError, Result};
use crate::store::{self, CredentialsStore};

const OPTIONS_CONTEXT: &str = "program options";

/// What the reporter prints on success.
#[derive(Debug)]
pub struct Summary {
    pub profile: String,
    pub expires: String,
}

/// Diagnostic context accumulated as the pipeline progresses and attached
/// to the terminal error report.
#[derive(Debug, Default)]
pub struct FatalContext {
    pub options: Option<String>,
    pub source_profile: Option<String>,
}

/// Passes `value` through when it is a non-empty string; otherwise the
/// uniform missing-field error naming the value's context and field. Every
/// required value, file-sourced or option-sourced, goes through here.
fn ensure(value: Option<String>, context: &str, field: &str) -> Result<String> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(CliError::MissingField {
            context: context.to_string(),
            field: field.to_string(),
        }),
    }
}

/// Runs the whole refresh. The save completes before this returns, so a
/// success result means the new credentials are on disk.
pub async fn run(args: &Args, ctx: &mut FatalContext) -> Result<Summary> {
    let path = store::expand_tilde(&args.file)?;
    let backup = if args.backup {
        let suffix = ensure(
            Some(args.backup_suffix.clone()),
            OPTIONS_CONTEXT,
            "--backup-suffix",
        )?;
        Some(store::backup_path(&path, &suffix))
    } else {
        None
    };

    let mut store = CredentialsStore::load(path, backup).await?;
    debug!("read credentials file {}", store.path().display());

    if !store.has_profile(&args.source_profile) {
        return Err(CliError::MissingProfile {
            name: args.source_profile.clone(),
        });
    }
    ctx.source_profile = store.profile_dump(&args.source_profile);
    debug!("source profile: {:?}", ctx.source_profile);

    let source_context = format!("source profile '{}'", args.source_profile);
    let source = SourceCredentials::new(
        ensure(
            store.get(&args.source_profile, "aws_access_key_id"),
            &source_context,
            "aws_access_key_id",
        )?,
        ensure(
            store.get(&args.source_profile, "aws_secret_access_key"),
            &source_context,
            "aws_secret_access_key",
        )?,
        ensure(
            store.get(&args.source_profile, "mfa_serial"),
            &source_context,
            "mfa_serial",
        )?,
    );

    let code = ensure(Some(args.mfa_code.clone()), OPTIONS_CONTEXT, "--mfa-code")?;
    info!(
        "Requesting a session token from AWS for {}",
        source.mfa_serial()
    );
    let session = source.get_session_token(&code, args.duration).await?;
    info!("Received MFA session credentials from AWS");

    let expires = session
        .expiration()
        .fmt(Format::DateTime)
        .map_err(|err| CliError::Exchange(anyhow::Error::new(err)))?;

    let profile = ensure(
        Some(args.mfa_profile.clone()),
        OPTIONS_CONTEXT,
        "--mfa-profile",
    )?;
    store.merge_session(&profile, &session, &expires);
    store.save().await?;

    Ok(Summary { profile, expires })
}

#[cfg(test)]
mod tests {
    use tempdir::TempDir;
    use tokio::fs;

    use super::*;

    #[test]
    fn ensure_passes_a_nonempty_value_through() {
        let value = ensure(Some("AKIA".to_string()), "source profile 'default'", "key");
        assert_eq!(value.unwrap(), "AKIA");
    }

    #[test]
    fn ensure_reports_a_missing_value_with_context_and_field() {
        let err = ensure(None, "source profile 'default'", "mfa_serial").unwrap_err();
        assert_eq!(
            err.to_string(),
            "the source profile 'default' does not have a 'mfa_serial' value"
        );
    }

    #[test]
    fn ensure_treats_an_empty_string_as_missing() {
        let err = ensure(Some(String::new()), "program options", "--mfa-code").unwrap_err();
        assert_eq!(
            err.to_string(),
            "the program options does not have a '--mfa-code' value"
        );
    }

    fn args_for(file: &std::path::Path) -> Args {
        Args {
            mfa_code: "123456".to_string(),
            source_profile: "default".to_string(),
            mfa_profile: "mfa".to_string(),
            file: file.to_str().unwrap().to_string(),
            duration: 43200,
            verbose: false,
            backup: false,
            backup_suffix: ".BACKUP".to_string(),
        }
    }

    #[tokio::test]
    async fn run_stops_before_the_exchange_when_a_source_field_is_missing() {
        let dir = TempDir::new("updater").unwrap();
        let path = dir.path().join("credentials");
        let contents = "[default]\naws_access_key_id=AKIA\naws_secret_access_key=secret\n";
        fs::write(&path, contents).await.unwrap();

        let mut ctx = FatalContext::default();
        let err = run(&args_for(&path), &mut ctx).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "the source profile 'default' does not have a 'mfa_serial' value"
        );
        // the failed run never rewrites the file
        assert_eq!(fs::read_to_string(&path).await.unwrap(), contents);
        // the diagnostic context captured the profile that was read
        assert!(ctx.source_profile.unwrap().contains("aws_access_key_id"));
    }

    #[tokio::test]
    async fn run_reports_a_missing_source_profile_by_name() {
        let dir = TempDir::new("updater").unwrap();
        let path = dir.path().join("credentials");
        fs::write(&path, "[other]\nregion=eu-west-1\n").await.unwrap();

        let mut ctx = FatalContext::default();
        let err = run(&args_for(&path), &mut ctx).await.unwrap_err();
        assert!(matches!(err, CliError::MissingProfile { ref name } if name == "default"));
    }
}
