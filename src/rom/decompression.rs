//! Ouverture des fichiers ROM, éventuellement dans une archive ZIP ou GZIP

use anyhow::{anyhow, Context, Result};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;
use zip::ZipArchive;

use crate::platform::normalize_extension;
use crate::stream::{ReadSeek, RomStream};

/// Types de conteneur pris en charge
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum CompressionType {
    /// Fichier non compressé
    None,

    /// Archive ZIP, seule la première entrée est lue
    Zip,

    /// Compression GZIP
    Gzip,
}

/// Fichier ouvert, prêt à être décodé et haché
pub struct RomFile {
    /// Nom du fichier ROM (entrée d'archive le cas échéant)
    pub name: String,

    /// Extension du fichier ROM, normalisée
    pub extension: String,

    pub compression_type: CompressionType,

    pub stream: RomStream<Box<dyn ReadSeek>>,
}

impl std::fmt::Debug for RomFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RomFile")
            .field("name", &self.name)
            .field("extension", &self.extension)
            .field("compression_type", &self.compression_type)
            .field("length", &self.stream.len())
            .finish()
    }
}

/// Extension d'un nom de fichier, normalisée (vide si absente)
pub fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(normalize_extension)
        .unwrap_or_default()
}

/// Ouvreur de fichiers ROM
pub struct RomDecompressor;

impl RomDecompressor {
    /// Détecte le type de conteneur d'après l'extension
    pub fn detect_compression_type(path: &Path) -> CompressionType {
        match path.extension().and_then(|e| e.to_str()).map(normalize_extension).as_deref() {
            Some("zip") => CompressionType::Zip,
            Some("gz" | "gzip") => CompressionType::Gzip,
            _ => CompressionType::None,
        }
    }

    /// Ouvre un fichier; le contenu des archives est chargé en mémoire
    pub fn open(path: &Path) -> Result<RomFile> {
        match Self::detect_compression_type(path) {
            CompressionType::None => Self::open_raw_file(path),
            CompressionType::Zip => Self::open_zip(path),
            CompressionType::Gzip => Self::open_gzip(path),
        }
    }

    fn file_name(path: &Path) -> String {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    fn open_raw_file(path: &Path) -> Result<RomFile> {
        let file = File::open(path)
            .with_context(|| format!("Impossible d'ouvrir {}", path.display()))?;
        let name = Self::file_name(path);
        let inner: Box<dyn ReadSeek> = Box::new(BufReader::new(file));

        Ok(RomFile {
            extension: extension_of(&name),
            name,
            compression_type: CompressionType::None,
            stream: RomStream::new(inner)?,
        })
    }

    fn in_memory(name: String, data: Vec<u8>, compression_type: CompressionType) -> Result<RomFile> {
        let inner: Box<dyn ReadSeek> = Box::new(Cursor::new(data));
        Ok(RomFile {
            extension: extension_of(&name),
            name,
            compression_type,
            stream: RomStream::new(inner)?,
        })
    }

    /// Première entrée non-dossier d'une archive ZIP
    fn open_zip(path: &Path) -> Result<RomFile> {
        let file = File::open(path)
            .with_context(|| format!("Impossible d'ouvrir {}", path.display()))?;
        let mut archive = ZipArchive::new(BufReader::new(file))?;
        let entry_count = archive.len();

        for i in 0..entry_count {
            let mut entry = archive.by_index(i)?;
            if entry.is_dir() {
                continue;
            }

            let mut contents = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut contents)?;
            let name = entry.name().to_string();
            if entry_count > 1 {
                log::debug!(
                    "{}: {} entrées, seule {} est analysée",
                    path.display(),
                    entry_count,
                    name
                );
            }
            return Self::in_memory(name, contents, CompressionType::Zip);
        }

        Err(anyhow!("Archive ZIP vide: {}", path.display()))
    }

    fn open_gzip(path: &Path) -> Result<RomFile> {
        let file = File::open(path)
            .with_context(|| format!("Impossible d'ouvrir {}", path.display()))?;
        let mut decoder = GzDecoder::new(BufReader::new(file));

        let mut contents = Vec::new();
        decoder.read_to_end(&mut contents)?;

        // Le nom sans l'extension .gz
        let name = path
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self::in_memory(name, contents, CompressionType::Gzip)
    }
}
