//! Configuration de l'identification

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::registry::RegistryConfig;

/// Configuration principale, persistée en TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentifyConfig {
    /// Dossier parcouru à la recherche de datfiles `.dat` / `.xml`
    pub datfile_folder: Option<PathBuf>,

    /// Nombre de threads pour l'analyse de plusieurs fichiers (défaut: rayon)
    pub worker_threads: Option<usize>,

    /// Réglages par plateforme (`[registry.gba]`, `[registry.megadrive]`, ...)
    pub registry: RegistryConfig,
}

impl IdentifyConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Lecture de la configuration {}", path.display()))?;
        let config: IdentifyConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load_from_file(path.as_ref()) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Configuration par défaut utilisée: {:#}", e);
                Self::default()
            }
        }
    }
}
