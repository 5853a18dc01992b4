//! Décodeurs d'en-têtes par plateforme
//!
//! L'ensemble des plateformes est fermé: un `Platform` par famille de
//! fichiers, avec ses métadonnées statiques (`PlatformInfo`) et son décodeur.
//! Un décodeur écrit ses champs dans un `InfoRecord` et ne signale jamais une
//! donnée inattendue comme une erreur.

pub mod gba;
pub mod master_system;
pub mod megadrive;
pub mod pokemon_mini;
pub mod xbox;

use std::fmt;
use std::io::{Read, Seek};

use serde::Serialize;

use crate::info::InfoRecord;
use crate::stream::{RomStream, StreamResult};

/// Métadonnées statiques d'une plateforme
#[derive(Debug)]
pub struct PlatformInfo {
    /// Identifiant stable, utilisé dans la configuration
    pub id: &'static str,

    /// Nom affiché
    pub name: &'static str,

    /// Extensions gérées et leur description
    pub filetypes: &'static [(&'static str, &'static str)],

    /// Octets d'en-tête ignorés par défaut lors du calcul des empreintes
    pub header_skip: u64,
}

/// Plateformes prises en charge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Platform {
    GameBoyAdvance,
    MasterSystem,
    GameGear,
    Megadrive,
    PokemonMini,
    Xbox,
}

static GBA_INFO: PlatformInfo = PlatformInfo {
    id: "gba",
    name: "Game Boy Advance",
    filetypes: &[
        ("gba", "Nintendo Game Boy Advance ROM"),
        ("bin", "Nintendo Game Boy Advance ROM"),
        ("srl", "Nintendo Game Boy Advance ROM"),
        ("mb", "Nintendo Game Boy Advance multiboot ROM"),
    ],
    header_skip: 0,
};

static MASTER_SYSTEM_INFO: PlatformInfo = PlatformInfo {
    id: "sms",
    name: "Sega Master System",
    filetypes: &[("sms", "Sega Master System ROM")],
    header_skip: 0,
};

static GAME_GEAR_INFO: PlatformInfo = PlatformInfo {
    id: "gg",
    name: "Sega Game Gear",
    filetypes: &[("gg", "Sega Game Gear ROM")],
    header_skip: 0,
};

static MEGADRIVE_INFO: PlatformInfo = PlatformInfo {
    id: "megadrive",
    name: "Megadrive/Genesis",
    filetypes: &[
        ("gen", "Sega Genesis/Megadrive ROM"),
        ("bin", "Sega Genesis/Megadrive ROM"),
        ("sgd", "Sega Genesis/Megadrive ROM"),
        ("smd", "Sega Genesis/Megadrive interleaved ROM"),
        ("md", "Sega Genesis/Megadrive ROM"),
    ],
    header_skip: 0,
};

static POKEMON_MINI_INFO: PlatformInfo = PlatformInfo {
    id: "pokemon_mini",
    name: "Pokemon Mini",
    filetypes: &[("min", "Pokémon Mini ROM")],
    header_skip: 0,
};

static XBOX_INFO: PlatformInfo = PlatformInfo {
    id: "xbox",
    name: "Xbox",
    filetypes: &[
        ("xbe", "Microsoft Xbox executable"),
        ("iso", "Microsoft Xbox disc"),
    ],
    header_skip: 0,
};

/// Normalise une extension: minuscules, sans point initial
pub fn normalize_extension(extension: &str) -> String {
    extension.trim_start_matches('.').to_ascii_lowercase()
}

impl Platform {
    /// Toutes les plateformes, dans l'ordre d'enregistrement
    pub const ALL: [Platform; 6] = [
        Platform::GameBoyAdvance,
        Platform::MasterSystem,
        Platform::GameGear,
        Platform::Megadrive,
        Platform::PokemonMini,
        Platform::Xbox,
    ];

    pub fn info(self) -> &'static PlatformInfo {
        match self {
            Platform::GameBoyAdvance => &GBA_INFO,
            Platform::MasterSystem => &MASTER_SYSTEM_INFO,
            Platform::GameGear => &GAME_GEAR_INFO,
            Platform::Megadrive => &MEGADRIVE_INFO,
            Platform::PokemonMini => &POKEMON_MINI_INFO,
            Platform::Xbox => &XBOX_INFO,
        }
    }

    pub fn id(self) -> &'static str {
        self.info().id
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.id() == id)
    }

    /// Description du type de fichier pour une extension gérée
    pub fn filetype_name(self, extension: &str) -> Option<&'static str> {
        let extension = normalize_extension(extension);
        self.info()
            .filetypes
            .iter()
            .find(|(ext, _)| *ext == extension)
            .map(|(_, name)| *name)
    }

    pub fn handles_extension(self, extension: &str) -> bool {
        self.filetype_name(extension).is_some()
    }

    /// Décode l'en-tête du flux dans `record`
    ///
    /// Une fin de flux pendant la lecture de l'en-tête est absorbée et notée
    /// par `Header truncated?`; seules les erreurs d'E/S remontent.
    pub fn decode<R: Read + Seek>(
        self,
        stream: &mut RomStream<R>,
        record: &mut InfoRecord,
        extension: &str,
    ) -> StreamResult<()> {
        record.add("Platform", self.name());
        let extension = normalize_extension(extension);

        let result = match self {
            Platform::GameBoyAdvance => gba::decode(stream, record),
            Platform::MasterSystem => master_system::decode(stream, record, false),
            Platform::GameGear => master_system::decode(stream, record, true),
            Platform::Megadrive => megadrive::decode(stream, record),
            Platform::PokemonMini => pokemon_mini::decode(stream, record),
            Platform::Xbox => xbox::decode(stream, record, &extension),
        };

        match result {
            Err(e) if e.is_end_of_stream() => {
                log::debug!("{}: en-tête tronqué ({})", self.name(), e);
                record.add("Header truncated?", true);
                Ok(())
            }
            other => other,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
