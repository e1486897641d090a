//! Configuration file store.
//!
//! The write is a plain truncate-and-write. A crash part way through can leave
//! a truncated file behind; there is no temp-file rename.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use configsync_proto::Config;

use crate::error::{Result, StoreError};

/// Permission bits for written config files.
#[cfg(unix)]
const CONFIG_FILE_MODE: u32 = 0o644;

/// On-disk encoding of a configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Pick the encoding from the path's extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") => Ok(ConfigFormat::Yaml),
            Some("json") => Ok(ConfigFormat::Json),
            _ => {
                let path = path.display().to_string();
                tracing::error!(path = %path, "invalid config file type provided");
                Err(StoreError::InvalidFileType { path })
            }
        }
    }

    /// Serialize a document in this encoding.
    pub fn encode(&self, config: &Config) -> Result<Vec<u8>> {
        match self {
            ConfigFormat::Yaml => Ok(serde_yaml::to_string(config)?.into_bytes()),
            ConfigFormat::Json => Ok(serde_json::to_vec(config)?),
        }
    }

    /// Deserialize a document from this encoding.
    pub fn decode(&self, data: &[u8]) -> Result<Config> {
        match self {
            ConfigFormat::Yaml => Ok(serde_yaml::from_slice(data)?),
            ConfigFormat::Json => Ok(serde_json::from_slice(data)?),
        }
    }
}

/// Store the config document to disk, replacing any existing file.
///
/// The whole document is serialized before the file is touched, so an
/// unsupported extension or an encoding failure leaves the file as it was.
pub fn store_config_to_file(config: &Config, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path)?;
    let data = format.encode(config)?;

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(CONFIG_FILE_MODE);
    }

    let mut file = options.open(path)?;
    file.write_all(&data)?;
    file.flush()?;

    tracing::debug!(path = %path.display(), bytes = data.len(), "stored config file");
    Ok(())
}

/// Load a config document from disk.
pub fn load_config_from_file(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path)?;
    let data = fs::read(path)?;
    format.decode(&data)
}
