//! configsync core - configuration file storage.
//!
//! The replicated configuration document is flushed to disk through this
//! crate. The encoding is picked from the file extension.

pub mod error;
pub mod store;

pub use error::{Result, StoreError};
pub use store::{load_config_from_file, store_config_to_file, ConfigFormat};
