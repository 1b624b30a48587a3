//! JSON config files.
//!
//! Missing fields take their [`VocoderConfig::default`] values, so a file
//! only needs the settings it changes.

use crate::Result;
use std::path::Path;
use voxframe_core::VocoderConfig;

/// Read a config file. The result is not validated; that happens when a
/// session opens with it.
pub fn load_config(path: impl AsRef<Path>) -> Result<VocoderConfig> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let config = serde_json::from_str(&text)?;
    tracing::debug!(path = %path.display(), ?config, "loaded config");
    Ok(config)
}

/// Write `config` as pretty-printed JSON.
pub fn save_config(path: impl AsRef<Path>, config: &VocoderConfig) -> Result<()> {
    let text = serde_json::to_string_pretty(config)?;
    std::fs::write(path, text)?;
    Ok(())
}
