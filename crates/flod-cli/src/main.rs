//! FLOD packet assembler/disassembler.
//!
//! ```bash
//! flod assemble --keyring ./keyring --to 0102030405060708 --sign 0102030405060708 "hello" > packet.der
//! flod disassemble --keyring ./keyring packet.der
//! ```

mod error;
mod settings;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rsa::pkcs8::DecodePublicKey;
use rsa::traits::PublicKeyParts;
use rsa::RsaPublicKey;

use error::CliError;
use flod_core::{KeyProvider, LookupResult, Outcome};
use flod_keyring::PemKeyProvider;
use settings::Settings;

#[derive(Parser)]
#[command(name = "flod")]
#[command(about = "Assemble and disassemble FLOD packets", long_about = None)]
struct Cli {
    /// Directory of PKCS#1 PEM keys plus contacts.toml.
    #[arg(long, global = true)]
    keyring: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt (and optionally sign) a message into a FLOD packet.
    Assemble {
        /// Recipient: an 8-byte hex contact id, or a path to a public key PEM file.
        #[arg(long)]
        to: String,

        /// Sign as the 8-byte hex id of one's own key in the keyring.
        #[arg(long)]
        sign: Option<String>,

        /// Write the DER packet here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,

        /// The plaintext message.
        message: String,
    },

    /// Decrypt and authenticate a FLOD packet.
    Disassemble {
        /// Path to the DER-encoded packet.
        packet: PathBuf,
    },
}

fn main() -> Result<()> {
    let settings = Settings::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(&settings.log_level)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let keyring_dir = cli.keyring.unwrap_or(settings.keyring_dir);

    match cli.command {
        Commands::Assemble {
            to,
            sign,
            out,
            message,
        } => run_assemble(&keyring_dir, &to, sign.as_deref(), &message, out.as_deref()),
        Commands::Disassemble { packet } => run_disassemble(&keyring_dir, &packet),
    }
}

fn run_assemble(
    keyring_dir: &std::path::Path,
    to: &str,
    sign: Option<&str>,
    message: &str,
    out: Option<&std::path::Path>,
) -> Result<()> {
    let provider = PemKeyProvider::load_dir(keyring_dir)
        .map_err(CliError::Keyring)
        .with_context(|| format!("loading keyring at {}", keyring_dir.display()))?;

    let recipient = resolve_recipient(&provider, to)?;

    let signer_id = sign.map(parse_id).transpose()?;
    let signer_key = signer_id
        .map(|_| {
            provider
                .yield_keys()
                .into_iter()
                .next()
                .ok_or(CliError::NoSigningKey)
        })
        .transpose()?;

    let packet = flod_core::assemble(
        message,
        &recipient,
        signer_key
            .as_ref()
            .zip(signer_id.as_ref())
            .map(|(k, id)| (k, *id)),
    )
    .map_err(CliError::Core)?;

    match out {
        Some(path) => fs::write(path, &packet).with_context(|| format!("writing {}", path.display()))?,
        None => {
            use std::io::Write;
            std::io::stdout().write_all(&packet)?;
        }
    }

    tracing::info!(bytes = packet.len(), "assembled FLOD packet");
    Ok(())
}

fn run_disassemble(keyring_dir: &std::path::Path, packet_path: &std::path::Path) -> Result<()> {
    let provider = PemKeyProvider::load_dir(keyring_dir)
        .map_err(CliError::Keyring)
        .with_context(|| format!("loading keyring at {}", keyring_dir.display()))?;
    let packet = fs::read(packet_path)
        .with_context(|| format!("reading {}", packet_path.display()))?;

    let outcome = flod_core::disassemble(&packet, &provider).map_err(CliError::Core)?;

    println!("timestamp: {}", outcome.timestamp());
    println!("message:   {}", outcome.message());
    println!("exit_code: {}", outcome.exit_code());
    match &outcome {
        Outcome::SignedKnown { signer_id, .. } => {
            println!("signer:    {}", hex::encode(signer_id));
        }
        Outcome::SignedNonPgp { signer_key, .. } => {
            println!("signer:    (non-PGP key, {}-bit)", signer_key.n().bits());
        }
        Outcome::Unsigned { .. } | Outcome::Unauthenticated { .. } => {}
    }

    tracing::info!(exit_code = outcome.exit_code(), "disassembled FLOD packet");
    Ok(())
}

fn resolve_recipient(provider: &PemKeyProvider, to: &str) -> Result<RsaPublicKey> {
    if let Ok(id) = parse_id(to) {
        match provider.lookup(&id) {
            LookupResult::One(pk) => return Ok(pk),
            LookupResult::Many(_) => return Err(CliError::AmbiguousRecipient(to.to_string()).into()),
            LookupResult::Absent => {}
        }
    }

    let pem = fs::read_to_string(to)
        .map_err(|_| CliError::UnknownRecipient(to.to_string()))?;
    Ok(RsaPublicKey::from_public_key_pem(&pem).map_err(CliError::Rsa)?)
}

fn parse_id(s: &str) -> Result<[u8; 8], CliError> {
    let bytes = hex::decode(s).map_err(|_| CliError::InvalidId(s.to_string()))?;
    bytes
        .try_into()
        .map_err(|_| CliError::InvalidId(s.to_string()))
}
