use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single podcast episode as published in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub title: String,
    /// Hosts and guests, comma separated
    pub members: String,
    /// Cover art URI
    pub thumbnail: String,
    /// Declared length in whole seconds
    pub duration: u32,
    /// Stream URL handed to the media engine
    pub url: String,
}

/// Errors raised while loading an episode catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog file {path}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Parse a catalog from its JSON text (an array of episodes)
pub fn parse_catalog(raw: &str) -> Result<Vec<Episode>, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Load an episode catalog from a JSON file
pub fn load_catalog(path: &Path) -> Result<Vec<Episode>, CatalogError> {
    let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let episodes = parse_catalog(&raw).map_err(|source| CatalogError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    log::info!("Loaded {} episodes from {}", episodes.len(), path.display());
    Ok(episodes)
}
