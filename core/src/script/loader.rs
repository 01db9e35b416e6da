//! Play definition loading
//!
//! Reads `[[play]]` entries from TOML files. Every definition is built
//! once at load time so malformed trees are rejected at the file boundary
//! instead of surfacing mid-frame.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::definition::PlayDefinition;
use super::error::ScriptError;

#[derive(Debug, Default, Serialize, Deserialize)]
struct PlayFile {
    #[serde(default)]
    play: Vec<PlayDefinition>,
}

/// Load play definitions from a single TOML file.
pub fn load_plays_from_file(path: &Path) -> Result<Vec<PlayDefinition>, ScriptError> {
    let content = fs::read_to_string(path).map_err(|source| ScriptError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    let file: PlayFile = toml::from_str(&content).map_err(|source| ScriptError::ParseToml {
        path: path.to_path_buf(),
        source,
    })?;

    for play in &file.play {
        if let Err(err) = play.build() {
            return Err(ScriptError::InvalidDefinition {
                path: path.to_path_buf(),
                reason: format!("play `{}`: {err}", play.id),
            });
        }
    }

    Ok(file.play)
}

/// Load every `.toml` play file in `dir`, in directory order.
pub fn load_plays_from_dir(dir: &Path) -> Result<Vec<PlayDefinition>, ScriptError> {
    let entries = fs::read_dir(dir).map_err(|source| ScriptError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut plays = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ScriptError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("toml") {
            continue;
        }
        tracing::debug!(path = %path.display(), "loading play file");
        plays.extend(load_plays_from_file(&path)?);
    }
    Ok(plays)
}
