//! Command-line interface definitions.

use clap::Parser;

/// AWS MFA session credential refresher.
///
/// Exchanges an MFA code for temporary session credentials using the
/// long-term keys stored in the source profile, then writes the temporary
/// credentials into the destination profile of the same credentials file.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// The code from the MFA device
    #[arg(short = 'c', long)]
    pub mfa_code: String,

    /// The profile holding the long-term keys and MFA serial
    #[arg(short = 's', long, default_value = "default")]
    pub source_profile: String,

    /// The profile to update with the session credentials
    #[arg(short = 'm', long, default_value = "mfa")]
    pub mfa_profile: String,

    /// The credentials file to update
    #[arg(
        short = 'f',
        long,
        env = "AWS_SHARED_CREDENTIALS_FILE",
        default_value = "~/.aws/credentials"
    )]
    pub file: String,

    /// Session duration in seconds (900-129600)
    #[arg(
        short = 'd',
        long,
        env = "AWS_SESSION_DURATION",
        default_value = "43200",
        value_parser = clap::value_parser!(u32).range(900..=129600)
    )]
    pub duration: u32,

    /// Display verbose logging
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Create a backup of the credentials file before updating it
    #[arg(short = 'b', long)]
    pub backup: bool,

    /// Suffix to use for the backup file
    #[arg(short = 'S', long, default_value = ".BACKUP")]
    pub backup_suffix: String,
}
