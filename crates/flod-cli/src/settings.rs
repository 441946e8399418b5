use std::path::PathBuf;

use serde::Deserialize;

/// Configuration layered from `flod.toml` (current directory) and `FLOD_*`
/// environment variables (via `dotenvy`'s `.env` loading), in that order —
/// environment wins. Both layers are optional; every field has a default.
#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default = "default_keyring_dir")]
    pub keyring_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_keyring_dir() -> PathBuf {
    PathBuf::from("./keyring")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let settings = config::Config::builder()
            .set_default("keyring_dir", "./keyring")?
            .set_default("log_level", "info")?
            .add_source(config::File::with_name("flod").required(false))
            .add_source(config::Environment::with_prefix("FLOD"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
