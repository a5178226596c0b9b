//! Operator CLI for producing signed management requests
//!
//! `keygen` creates an Ed25519 key pair for a new signer; `sign` attests a
//! JSON payload and prints the envelope the API expects.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use ed25519_dalek::SigningKey;
use management_core::common::SignedEnvelope;
use rand::rngs::OsRng;
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "management_sign")]
#[command(about = "Sign management API payloads")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a signer key pair (base64)
    Keygen,

    /// Sign a JSON payload as one signer
    Sign {
        /// Signer id as registered in the keychain
        #[arg(long)]
        signer: String,

        /// File holding the base64 private key
        #[arg(long)]
        key_file: PathBuf,

        /// Payload file, `-` for stdin
        #[arg(long, default_value = "-")]
        payload: String,

        /// Seconds until the signature expires
        #[arg(long, default_value_t = 60)]
        ttl: i64,

        /// Print a complete request body instead of only the envelope
        #[arg(long)]
        request: bool,
    },
}

#[derive(Serialize)]
struct KeyPair {
    private_key: String,
    public_key: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = match cli.command {
        Commands::Keygen => {
            let key = SigningKey::generate(&mut OsRng);
            serde_json::to_value(KeyPair {
                private_key: BASE64.encode(key.to_bytes()),
                public_key: BASE64.encode(key.verifying_key().to_bytes()),
            })?
        }
        Commands::Sign {
            signer,
            key_file,
            payload,
            ttl,
            request,
        } => {
            let key = read_signing_key(&key_file)?;
            let payload = read_payload(&payload)?;

            let now = Utc::now();
            let envelope = SignedEnvelope::sign(
                signer.as_str(),
                &payload,
                &key,
                now,
                now + Duration::seconds(ttl),
            )
            .context("Failed to canonicalize payload")?;

            if request {
                json!({ "data": payload, "signatures": [envelope] })
            } else {
                serde_json::to_value(envelope)?
            }
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn read_signing_key(path: &PathBuf) -> Result<SigningKey> {
    let encoded = fs::read_to_string(path)
        .with_context(|| format!("Failed to read key file {}", path.display()))?;
    let bytes = BASE64
        .decode(encoded.trim())
        .context("Key file must contain base64")?;
    let seed: [u8; 32] = bytes
        .try_into()
        .map_err(|_| anyhow!("Private key must be 32 bytes"))?;
    Ok(SigningKey::from_bytes(&seed))
}

fn read_payload(source: &str) -> Result<Value> {
    let raw = if source == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read payload from stdin")?;
        buffer
    } else {
        fs::read_to_string(source).with_context(|| format!("Failed to read payload {}", source))?
    };
    serde_json::from_str(&raw).context("Payload must be JSON")
}
