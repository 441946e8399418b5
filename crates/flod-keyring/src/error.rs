use std::path::PathBuf;

use thiserror::Error;

/// Failures loading a keyring directory into a [`crate::PemKeyProvider`].
#[derive(Debug, Error)]
pub enum KeyringError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a valid PKCS#1 RSA private key: {source}")]
    InvalidPrivateKey {
        path: PathBuf,
        #[source]
        source: rsa::pkcs1::Error,
    },

    #[error("{path} is not a valid SubjectPublicKeyInfo RSA public key: {source}")]
    InvalidPublicKey {
        path: PathBuf,
        #[source]
        source: rsa::pkcs8::spki::Error,
    },

    #[error("contacts.toml is malformed: {0}")]
    InvalidContactsFile(#[from] toml::de::Error),

    #[error("contacts.toml entry has an id that is not 8 bytes of hex: {0}")]
    InvalidContactId(String),

    #[error("contacts.toml binds more than one key to non-all-zero id {0}")]
    DuplicateContactId(String),
}

pub type KeyringResult<T> = std::result::Result<T, KeyringError>;
