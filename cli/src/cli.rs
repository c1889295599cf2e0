//! # CLI Interface
//!
//! Defines the command-line argument structure for `tessera` using `clap`
//! derive. Raw transactions are passed and printed as hex, with or without
//! a `0x` prefix.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::logging::LogFormat;

/// Tessera transaction tool.
///
/// Generates keys, and decodes, encodes, signs and verifies raw
/// transactions offline.
#[derive(Parser, Debug)]
#[command(
    name = "tessera",
    about = "Tessera transaction tool",
    version,
    propagate_version = true
)]
pub struct TesseraCli {
    /// JSON fee schedule replacing the genesis values.
    #[arg(long, global = true, env = "TESSERA_FEE_SCHEDULE")]
    pub fee_schedule: Option<PathBuf>,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Default log filter when `RUST_LOG` is not set.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a new secp256k1 keypair.
    Keygen,
    /// Print the address controlled by a secret key.
    Address(KeyArgs),
    /// Decode a raw transaction and print it as JSON.
    Decode(RawArgs),
    /// Encode a JSON transaction into raw hex.
    Encode(EncodeArgs),
    /// Sign a raw transaction and print the signed raw hex.
    Sign(SignArgs),
    /// Validate a raw transaction. Exits non-zero when invalid.
    Verify(RawArgs),
    /// Print the active fee schedule.
    Fees,
    /// Print version information and exit.
    Version,
}

/// A secret key argument.
#[derive(Parser, Debug)]
pub struct KeyArgs {
    /// Hex-encoded 32-byte secret key.
    ///
    /// **Visible in shell history.** Prefer the `TESSERA_KEY` variable.
    #[arg(long, env = "TESSERA_KEY", hide_env_values = true)]
    pub key: String,
}

/// A raw transaction argument.
#[derive(Parser, Debug)]
pub struct RawArgs {
    /// Hex-encoded RLP transaction.
    pub raw: String,
}

/// Arguments for the `encode` subcommand.
#[derive(Parser, Debug)]
pub struct EncodeArgs {
    /// JSON file holding a transaction view, or `-` for stdin.
    #[arg(long)]
    pub json: PathBuf,
}

/// Arguments for the `sign` subcommand.
#[derive(Parser, Debug)]
pub struct SignArgs {
    #[command(flatten)]
    pub key: KeyArgs,

    /// Hex-encoded RLP transaction to sign.
    pub raw: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        // Ensures the derive macros produce a valid CLI definition.
        TesseraCli::command().debug_assert();
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = TesseraCli::try_parse_from([
            "tessera",
            "verify",
            "0xc0",
            "--log-format",
            "json",
            "--fee-schedule",
            "fees.json",
        ])
        .unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        assert_eq!(cli.fee_schedule, Some(PathBuf::from("fees.json")));
        assert!(matches!(cli.command, Commands::Verify(RawArgs { ref raw }) if raw == "0xc0"));
    }

    #[test]
    fn sign_takes_key_and_raw() {
        let cli =
            TesseraCli::try_parse_from(["tessera", "sign", "--key", "01", "c0"]).unwrap();
        match cli.command {
            Commands::Sign(args) => {
                assert_eq!(args.key.key, "01");
                assert_eq!(args.raw, "c0");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
