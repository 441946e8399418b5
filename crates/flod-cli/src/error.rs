use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0} is neither a known contact id nor a readable public key file")]
    UnknownRecipient(String),

    #[error("{0} resolves to more than one public key and cannot be used as an encryption recipient")]
    AmbiguousRecipient(String),

    #[error("no private key found in the keyring directory to sign with")]
    NoSigningKey,

    #[error("{0} is not a valid 16-hex-character PGP key id")]
    InvalidId(String),

    #[error(transparent)]
    Keyring(#[from] flod_keyring::KeyringError),

    #[error(transparent)]
    Core(#[from] flod_core::FlodError),

    #[error(transparent)]
    Rsa(#[from] rsa::pkcs8::spki::Error),
}
