//! Identification des fichiers ROM: décodage d'en-têtes et recherche dans
//! les datfiles

pub mod database;
pub mod decompression;
pub mod loader;
pub mod validation;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;

pub use database::{identify, identify_cancellable, Datfile, DatfileCollection, Game, IdentifyResult, Rom};
pub use decompression::{CompressionType, RomDecompressor, RomFile};
pub use loader::{load_datfile, DatfileError};
pub use validation::{digests_equal, rom_matches, CancelToken, Cancelled, FileDigests, HexError};

use crate::config::IdentifyConfig;
use crate::info::InfoRecord;
use crate::platform::Platform;
use crate::registry::DecoderRegistry;
use crate::stream::RomStream;

/// Correspondance trouvée, sous forme sérialisable
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchSummary {
    pub datfile: String,
    pub game: String,
    pub rom: String,
    pub status: String,
}

impl From<IdentifyResult<'_>> for MatchSummary {
    fn from(result: IdentifyResult<'_>) -> Self {
        Self {
            datfile: result.datfile.display_name().to_string(),
            game: result.game.name.clone(),
            rom: result.rom.name.clone(),
            status: result.rom.status.clone(),
        }
    }
}

/// Rapport complet pour un fichier
#[derive(Debug, Serialize)]
pub struct FileReport {
    pub path: PathBuf,

    /// Nom du fichier analysé (entrée d'archive le cas échéant)
    pub name: String,

    pub compression_type: CompressionType,

    /// Type de fichier selon le premier décodeur
    pub filetype: Option<&'static str>,

    /// Un enregistrement par décodeur
    pub records: Vec<(Platform, InfoRecord)>,

    pub digests: Option<FileDigests>,

    pub matches: Vec<MatchSummary>,
}

impl FileReport {
    pub fn record_for(&self, platform: Platform) -> Option<&InfoRecord> {
        self.records
            .iter()
            .find(|(p, _)| *p == platform)
            .map(|(_, record)| record)
    }
}

/// Façade d'identification: registre de décodeurs et datfiles partagés
#[derive(Debug, Default)]
pub struct RomIdentifier {
    registry: DecoderRegistry,
    datfiles: DatfileCollection,
}

impl RomIdentifier {
    pub fn new(registry: DecoderRegistry, datfiles: DatfileCollection) -> Self {
        Self { registry, datfiles }
    }

    /// Construit le registre et charge les datfiles selon la configuration
    pub fn from_config(config: &IdentifyConfig) -> Result<Self> {
        let registry = DecoderRegistry::new(&config.registry);
        let datfiles = match &config.datfile_folder {
            Some(folder) => DatfileCollection::load_from_folder(folder)
                .with_context(|| format!("Chargement des datfiles depuis {}", folder.display()))?,
            None => DatfileCollection::new(),
        };
        log::info!(
            "{} plateformes actives, {} datfiles chargés",
            registry.platforms().len(),
            datfiles.len()
        );
        Ok(Self::new(registry, datfiles))
    }

    pub fn registry(&self) -> &DecoderRegistry {
        &self.registry
    }

    pub fn datfiles(&self) -> &DatfileCollection {
        &self.datfiles
    }

    /// Identifie un fichier: en-têtes, empreintes puis datfiles
    pub fn identify_path(&self, path: &Path) -> Result<FileReport> {
        let mut rom = RomDecompressor::open(path)?;
        let platforms = self.registry.decoders_for(&rom.extension);
        if platforms.is_empty() {
            log::debug!("{}: aucun décodeur pour l'extension \"{}\"", path.display(), rom.extension);
        }

        let records = platforms
            .iter()
            .map(|&platform| self.decode_with(platform, &mut rom.stream, &rom.extension).map(|r| (platform, r)))
            .collect::<Result<Vec<_>>>()?;

        let digests = if self.should_hash(&platforms) {
            let skip = platforms
                .first()
                .map(|&platform| self.registry.header_skip(platform))
                .unwrap_or(0);
            rom.stream.set_position(0)?;
            Some(FileDigests::compute(&mut rom.stream, skip)?)
        } else {
            None
        };

        let matches = match &digests {
            Some(digests) => self
                .datfiles
                .identify(digests)
                .into_iter()
                .map(MatchSummary::from)
                .collect(),
            None => Vec::new(),
        };

        Ok(FileReport {
            path: path.to_path_buf(),
            filetype: platforms
                .first()
                .and_then(|&platform| self.registry.filetype_name(platform, &rom.extension)),
            name: rom.name,
            compression_type: rom.compression_type,
            records,
            digests,
            matches,
        })
    }

    /// Chaque décodeur repart du début du flux, dans un enregistrement neuf
    fn decode_with<R: std::io::Read + std::io::Seek>(
        &self,
        platform: Platform,
        stream: &mut RomStream<R>,
        extension: &str,
    ) -> Result<InfoRecord> {
        stream.set_position(0)?;
        let mut record = InfoRecord::new();
        platform
            .decode(stream, &mut record, extension)
            .with_context(|| format!("Décodage {}", platform.name()))?;
        Ok(record)
    }

    /// Sans décodeur, le fichier est haché; sinon il suffit qu'une plateforme le demande
    fn should_hash(&self, platforms: &[Platform]) -> bool {
        platforms.is_empty()
            || platforms
                .iter()
                .any(|&platform| self.registry.should_calculate_hash(platform))
    }

    /// Identifie plusieurs fichiers en parallèle
    ///
    /// Les fichiers non commencés au moment de l'annulation renvoient `Cancelled`.
    pub fn identify_paths(
        &self,
        paths: &[PathBuf],
        token: &CancelToken,
    ) -> Vec<(PathBuf, Result<FileReport>)> {
        paths
            .par_iter()
            .map(|path| {
                let result = match token.check() {
                    Ok(()) => self.identify_path(path),
                    Err(cancelled) => Err(cancelled.into()),
                };
                (path.clone(), result)
            })
            .collect()
    }
}
