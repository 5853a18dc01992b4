//! Registre des décodeurs: associe une extension aux plateformes capables de
//! la décoder, selon la configuration

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::platform::{normalize_extension, Platform};

/// Réglages d'une plateforme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformSettings {
    pub enabled: bool,

    /// Calculer les empreintes des fichiers de cette plateforme
    pub calculate_hash: bool,

    /// Remplace le nombre d'octets d'en-tête ignorés avant le hachage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_skip: Option<u64>,
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            calculate_hash: true,
            header_skip: None,
        }
    }
}

/// Réglages par identifiant de plateforme (`gba`, `megadrive`, ...)
///
/// Une plateforme absente utilise les réglages par défaut.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistryConfig {
    pub platforms: BTreeMap<String, PlatformSettings>,
}

impl RegistryConfig {
    pub fn settings_for(&self, platform: Platform) -> PlatformSettings {
        self.platforms
            .get(platform.id())
            .cloned()
            .unwrap_or_default()
    }

    pub fn set(&mut self, platform: Platform, settings: PlatformSettings) {
        self.platforms.insert(platform.id().to_string(), settings);
    }
}

/// Décodeurs actifs, dans l'ordre d'enregistrement
#[derive(Debug, Clone)]
pub struct DecoderRegistry {
    entries: Vec<(Platform, PlatformSettings)>,
}

impl DecoderRegistry {
    pub fn new(config: &RegistryConfig) -> Self {
        for id in config.platforms.keys() {
            if Platform::from_id(id).is_none() {
                log::warn!("Plateforme inconnue dans la configuration: {}", id);
            }
        }

        let entries = Platform::ALL
            .into_iter()
            .filter_map(|platform| {
                let settings = config.settings_for(platform);
                if settings.enabled {
                    Some((platform, settings))
                } else {
                    log::debug!("Plateforme désactivée: {}", platform.id());
                    None
                }
            })
            .collect();

        Self { entries }
    }

    /// Plateformes capables de décoder l'extension (insensible à la casse)
    pub fn decoders_for(&self, extension: &str) -> Vec<Platform> {
        let extension = normalize_extension(extension);
        if extension.is_empty() {
            return Vec::new();
        }
        self.entries
            .iter()
            .map(|(platform, _)| *platform)
            .filter(|platform| platform.handles_extension(&extension))
            .collect()
    }

    pub fn filetype_name(&self, platform: Platform, extension: &str) -> Option<&'static str> {
        platform.filetype_name(extension)
    }

    pub fn platforms(&self) -> Vec<Platform> {
        self.entries.iter().map(|(platform, _)| *platform).collect()
    }

    pub fn is_enabled(&self, platform: Platform) -> bool {
        self.settings(platform).is_some()
    }

    pub fn should_calculate_hash(&self, platform: Platform) -> bool {
        self.settings(platform)
            .map(|settings| settings.calculate_hash)
            .unwrap_or(false)
    }

    /// Octets ignorés avant le hachage: réglage, sinon valeur de la plateforme
    pub fn header_skip(&self, platform: Platform) -> u64 {
        self.settings(platform)
            .and_then(|settings| settings.header_skip)
            .unwrap_or(platform.info().header_skip)
    }

    fn settings(&self, platform: Platform) -> Option<&PlatformSettings> {
        self.entries
            .iter()
            .find(|(p, _)| *p == platform)
            .map(|(_, settings)| settings)
    }
}

impl Default for DecoderRegistry {
    fn default() -> Self {
        Self::new(&RegistryConfig::default())
    }
}
