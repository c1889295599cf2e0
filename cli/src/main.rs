// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Tessera CLI
//!
//! Entry point for the `tessera` binary. Parses CLI arguments, initializes
//! logging, installs the fee schedule, and runs one offline command against
//! raw transactions:
//!
//! - `keygen`  — generate a keypair
//! - `address` — address of a secret key
//! - `decode`  — raw hex to JSON
//! - `encode`  — JSON to raw hex
//! - `sign`    — sign raw hex
//! - `verify`  — validate raw hex (exit status 1 when invalid)
//! - `fees`    — print the active fee schedule
//! - `version` — print build version information

mod cli;
mod logging;

use std::io::Read;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use serde_json::json;

use tessera_protocol::crypto::keys::Keypair;
use tessera_protocol::fees::{self, FeeSchedule};
use tessera_protocol::transaction::{Transaction, TransactionView};

use cli::{Commands, TesseraCli};

fn main() -> Result<ExitCode> {
    let cli = TesseraCli::parse();
    logging::init_logging(&cli.log_level, cli.log_format);

    if let Some(path) = &cli.fee_schedule {
        let schedule = FeeSchedule::from_file(path)
            .with_context(|| format!("failed to load fee schedule {}", path.display()))?;
        fees::install(schedule).map_err(|_| anyhow!("fee schedule already installed"))?;
        tracing::info!(path = %path.display(), "fee schedule installed");
    }

    let (output, success) = match cli.command {
        Commands::Keygen => (keygen()?, true),
        Commands::Address(args) => (address(&args.key)?, true),
        Commands::Decode(args) => (decode(&args.raw)?, true),
        Commands::Encode(args) => (encode(&args.json)?, true),
        Commands::Sign(args) => (sign(&args.key.key, &args.raw)?, true),
        Commands::Verify(args) => verify(&args.raw)?,
        Commands::Fees => (fee_table(), true),
        Commands::Version => (version(), true),
    };

    println!("{}", output);
    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Accepts hex with or without `0x`, ignoring surrounding whitespace.
fn decode_hex(input: &str) -> Result<Vec<u8>> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    hex::decode(digits).context("input is not valid hex")
}

fn decode_raw(raw: &str) -> Result<Transaction> {
    let bytes = decode_hex(raw)?;
    Transaction::decode(&bytes).context("failed to decode transaction")
}

fn keygen() -> Result<String> {
    let keypair = Keypair::generate();
    tracing::info!(address = %keypair.address(), "generated keypair");
    let out = json!({
        "secret_key": hex::encode(keypair.secret_key_bytes()),
        "public_key": keypair.public_key_hex(),
        "address": keypair.address(),
    });
    Ok(serde_json::to_string_pretty(&out)?)
}

fn address(key: &str) -> Result<String> {
    let keypair = Keypair::from_hex(key.trim()).context("invalid secret key")?;
    Ok(keypair.address().to_string())
}

fn decode(raw: &str) -> Result<String> {
    let tx = decode_raw(raw)?;
    let validation = match tx.validate_detailed() {
        Ok(_) => json!({ "valid": true }),
        Err(reason) => json!({ "valid": false, "reason": reason.to_string() }),
    };
    let out = json!({
        "transaction": tx.to_view(),
        "validation": validation,
    });
    Ok(serde_json::to_string_pretty(&out)?)
}

fn encode(source: &Path) -> Result<String> {
    let json = if source == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("failed to read {}", source.display()))?
    };
    let view: TransactionView =
        serde_json::from_str(&json).context("input is not a transaction JSON object")?;
    let tx: Transaction = Transaction::try_from(view).context("invalid transaction fields")?;
    Ok(format!("0x{}", hex::encode(tx.serialize())))
}

fn sign(key: &str, raw: &str) -> Result<String> {
    let keypair = Keypair::from_hex(key.trim()).context("invalid secret key")?;
    let mut tx = decode_raw(raw)?;
    if tx.is_signed() {
        tracing::warn!("replacing existing signature");
    }
    tx.sign_with(&keypair).context("signing failed")?;
    tracing::info!(
        sender = %keypair.address(),
        hash = %hex::encode(tx.hash(true)),
        "transaction signed"
    );
    Ok(format!("0x{}", hex::encode(tx.serialize())))
}

fn verify(raw: &str) -> Result<(String, bool)> {
    let tx = decode_raw(raw)?;
    match tx.validate_detailed() {
        Ok(_) => {
            let sender = tx
                .sender_address()
                .map(|a| a.to_string())
                .unwrap_or_default();
            Ok((format!("valid (sender {sender})"), true))
        }
        Err(reason) => Ok((format!("invalid: {reason}"), false)),
    }
}

fn fee_table() -> String {
    fees::global()
        .iter()
        .map(|(name, fee)| format!("{name:<12} {fee}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn version() -> String {
    format!(
        "tessera   {}\nprotocol  {}\nsignature {}\nhash      {}",
        env!("CARGO_PKG_VERSION"),
        tessera_protocol::config::PROTOCOL_VERSION,
        tessera_protocol::config::SIGNING_ALGORITHM,
        tessera_protocol::config::PRIMARY_HASH_FUNCTION,
    )
}
