//! `flod-keyring` — a concrete [`flod_core::KeyProvider`] backed by PKCS#1
//! PEM files on disk and a `contacts.toml` mapping PGP-style 8-byte key ids
//! to public keys.
//!
//! This is deliberately a separate crate from `flod-core`: the codec has no
//! opinion on where keys live, this one does.

pub mod error;

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePublicKey;
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde::Deserialize;
use zeroize::Zeroizing;

pub use error::{KeyringError, KeyringResult};
use flod_core::{KeyProvider, LookupResult};

const ALL_ZERO_ID: [u8; 8] = [0u8; 8];
const PRIVATE_KEY_SUFFIX: &str = ".priv.pem";
const CONTACTS_FILE: &str = "contacts.toml";

#[derive(Deserialize)]
struct ContactsFile {
    #[serde(default)]
    contact: Vec<ContactEntry>,
}

#[derive(Deserialize)]
struct ContactEntry {
    id: String,
    key: String,
}

/// A directory-backed [`KeyProvider`]: one's own PKCS#1 private keys plus a
/// `contacts.toml` of known senders' public keys.
pub struct PemKeyProvider {
    own_keys: Vec<RsaPrivateKey>,
    contacts: HashMap<[u8; 8], Vec<RsaPublicKey>>,
}

impl PemKeyProvider {
    /// Load every `*.priv.pem` file in `dir` as an owned private key, and
    /// `dir/contacts.toml` (if present) as the known-sender public key
    /// bindings.
    ///
    /// Files are loaded in directory-listing order, which becomes the trial
    /// order `yield_keys()` hands to disassembly.
    pub fn load_dir(dir: impl AsRef<Path>) -> KeyringResult<Self> {
        let dir = dir.as_ref();
        let own_keys = load_own_keys(dir)?;
        let contacts = load_contacts(dir)?;
        tracing::info!(
            own_keys = own_keys.len(),
            contacts = contacts.len(),
            path = %dir.display(),
            "loaded keyring directory"
        );
        Ok(Self { own_keys, contacts })
    }
}

impl KeyProvider for PemKeyProvider {
    fn yield_keys(&self) -> Vec<RsaPrivateKey> {
        self.own_keys.clone()
    }

    fn lookup(&self, pgp_key_id: &[u8; 8]) -> LookupResult {
        match self.contacts.get(pgp_key_id) {
            None => LookupResult::Absent,
            Some(keys) if *pgp_key_id == ALL_ZERO_ID => LookupResult::Many(keys.clone()),
            Some(keys) => LookupResult::One(keys[0].clone()),
        }
    }
}

fn load_own_keys(dir: &Path) -> KeyringResult<Vec<RsaPrivateKey>> {
    let mut entries: Vec<_> = fs::read_dir(dir)
        .map_err(|source| KeyringError::Io {
            path: dir.to_path_buf(),
            source,
        })?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(PRIVATE_KEY_SUFFIX))
        })
        .collect();
    entries.sort();

    entries
        .into_iter()
        .map(|path| {
            let pem = Zeroizing::new(fs::read_to_string(&path).map_err(|source| {
                KeyringError::Io {
                    path: path.clone(),
                    source,
                }
            })?);
            RsaPrivateKey::from_pkcs1_pem(&pem).map_err(|source| KeyringError::InvalidPrivateKey {
                path: path.clone(),
                source,
            })
        })
        .collect()
}

fn load_contacts(dir: &Path) -> KeyringResult<HashMap<[u8; 8], Vec<RsaPublicKey>>> {
    let contacts_path = dir.join(CONTACTS_FILE);
    if !contacts_path.exists() {
        return Ok(HashMap::new());
    }

    let raw = fs::read_to_string(&contacts_path).map_err(|source| KeyringError::Io {
        path: contacts_path.clone(),
        source,
    })?;
    let parsed: ContactsFile = toml::from_str(&raw)?;

    let mut contacts: HashMap<[u8; 8], Vec<RsaPublicKey>> = HashMap::new();
    for entry in parsed.contact {
        let id = parse_hex_id(&entry.id)?;
        let key_path = dir.join(&entry.key);
        let pem = fs::read_to_string(&key_path).map_err(|source| KeyringError::Io {
            path: key_path.clone(),
            source,
        })?;
        let public_key =
            RsaPublicKey::from_public_key_pem(&pem).map_err(|source| KeyringError::InvalidPublicKey {
                path: key_path.clone(),
                source,
            })?;

        let bucket = contacts.entry(id).or_default();
        if id != ALL_ZERO_ID && !bucket.is_empty() {
            return Err(KeyringError::DuplicateContactId(entry.id));
        }
        bucket.push(public_key);
    }

    Ok(contacts)
}

fn parse_hex_id(id: &str) -> KeyringResult<[u8; 8]> {
    let bytes = hex::decode(id).map_err(|_| KeyringError::InvalidContactId(id.to_string()))?;
    bytes
        .try_into()
        .map_err(|_| KeyringError::InvalidContactId(id.to_string()))
}
