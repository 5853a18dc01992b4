//! romscope - Identification de ROMs et d'images disque
//!
//! Cette bibliothèque décode les en-têtes propres à chaque plateforme en
//! enregistrements lisibles, et retrouve les fichiers dans des datfiles de
//! référence à partir de leurs empreintes CRC32, MD5 et SHA-1.

pub mod checksum;
pub mod config;
pub mod info;
pub mod lookup;
pub mod platform;
pub mod registry;
pub mod rom;
pub mod stream;

pub use config::IdentifyConfig;
pub use info::{FieldValue, FormatMode, InfoField, InfoRecord};
pub use platform::Platform;
pub use registry::{DecoderRegistry, PlatformSettings, RegistryConfig};
pub use rom::{
    CancelToken, Datfile, DatfileCollection, FileDigests, FileReport, IdentifyResult, MatchSummary,
    RomIdentifier,
};
pub use stream::{RomStream, StreamError};

/// Version de la bibliothèque
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
