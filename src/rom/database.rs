//! Modèle des datfiles de référence et recherche par empreinte

use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use super::loader::load_datfile;
use super::validation::{rom_matches, CancelToken, Cancelled, FileDigests};

/// Statut d'une ROM quand le datfile n'en précise pas
pub const DEFAULT_ROM_STATUS: &str = "good";

/// Extensions reconnues lors du parcours d'un dossier de datfiles
pub const DATFILE_EXTENSIONS: [&str; 2] = ["dat", "xml"];

/// Datfile chargé, immuable après construction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Datfile {
    pub name: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
    pub author: Option<String>,
    pub homepage: Option<String>,
    pub url: Option<String>,

    pub games: Vec<Game>,

    /// ROMs rejetées à cause d'une empreinte malformée
    pub skipped_roms: usize,
}

/// Jeu d'un datfile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Game {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub roms: Vec<Rom>,
}

/// Entrée ROM d'un jeu
///
/// Une empreinte absente (`None`) est distincte d'une empreinte nulle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rom {
    pub name: String,
    pub size: u64,
    pub crc32: Option<u32>,
    pub md5: Option<[u8; 16]>,
    pub sha1: Option<[u8; 20]>,
    pub status: String,
}

impl Default for Rom {
    fn default() -> Self {
        Self {
            name: String::new(),
            size: 0,
            crc32: None,
            md5: None,
            sha1: None,
            status: DEFAULT_ROM_STATUS.to_string(),
        }
    }
}

/// Association datfile / jeu / ROM trouvée par [`identify`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifyResult<'a> {
    pub datfile: &'a Datfile,
    pub game: &'a Game,
    pub rom: &'a Rom,
}

impl Datfile {
    /// Libellé pour les journaux et les rapports
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.description.as_deref())
            .unwrap_or("<sans nom>")
    }

    pub fn rom_count(&self) -> usize {
        self.games.iter().map(|game| game.roms.len()).sum()
    }

    pub fn identify<'a>(&'a self, digests: &FileDigests) -> Vec<IdentifyResult<'a>> {
        let mut results = Vec::new();
        collect_matches(self, digests, &mut results);
        results
    }
}

fn collect_matches<'a>(
    datfile: &'a Datfile,
    digests: &FileDigests,
    results: &mut Vec<IdentifyResult<'a>>,
) {
    for game in &datfile.games {
        collect_game_matches(datfile, game, digests, results);
    }
}

fn collect_game_matches<'a>(
    datfile: &'a Datfile,
    game: &'a Game,
    digests: &FileDigests,
    results: &mut Vec<IdentifyResult<'a>>,
) {
    results.extend(
        game.roms
            .iter()
            .filter(|rom| rom_matches(rom, digests))
            .map(|rom| IdentifyResult { datfile, game, rom }),
    );
}

/// Toutes les ROMs correspondantes, dans l'ordre datfile, jeu, ROM, sans dédoublonnage
pub fn identify<'a, I>(datfiles: I, digests: &FileDigests) -> Vec<IdentifyResult<'a>>
where
    I: IntoIterator<Item = &'a Datfile>,
{
    let mut results = Vec::new();
    for datfile in datfiles {
        collect_matches(datfile, digests, &mut results);
    }
    results
}

/// Comme [`identify`], le jeton étant vérifié entre datfiles et entre jeux
pub fn identify_cancellable<'a, I>(
    datfiles: I,
    digests: &FileDigests,
    token: &CancelToken,
) -> Result<Vec<IdentifyResult<'a>>, Cancelled>
where
    I: IntoIterator<Item = &'a Datfile>,
{
    let mut results = Vec::new();
    for datfile in datfiles {
        token.check()?;
        for game in &datfile.games {
            token.check()?;
            collect_game_matches(datfile, game, digests, &mut results);
        }
    }
    Ok(results)
}

/// Datfiles chargés, dans l'ordre de chargement
#[derive(Debug, Clone, Default)]
pub struct DatfileCollection {
    datfiles: Vec<Datfile>,
}

impl DatfileCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, datfile: Datfile) {
        self.datfiles.push(datfile);
    }

    pub fn len(&self) -> usize {
        self.datfiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datfiles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Datfile> {
        self.datfiles.iter()
    }

    pub fn identify(&self, digests: &FileDigests) -> Vec<IdentifyResult<'_>> {
        identify(&self.datfiles, digests)
    }

    pub fn identify_cancellable(
        &self,
        digests: &FileDigests,
        token: &CancelToken,
    ) -> Result<Vec<IdentifyResult<'_>>, Cancelled> {
        identify_cancellable(&self.datfiles, digests, token)
    }

    /// Charge les fichiers `.dat` et `.xml` d'un dossier, triés par chemin
    ///
    /// Un fichier illisible est journalisé puis ignoré.
    pub fn load_from_folder<P: AsRef<Path>>(folder: P) -> anyhow::Result<Self> {
        let folder = folder.as_ref();
        if !folder.is_dir() {
            return Err(anyhow::anyhow!(
                "Dossier de datfiles introuvable: {}",
                folder.display()
            ));
        }

        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in WalkDir::new(folder) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Erreur de lecture dans {}: {}", folder.display(), e);
                    continue;
                }
            };
            if entry.file_type().is_file() && is_datfile_path(entry.path()) {
                paths.push(entry.into_path());
            }
        }
        paths.sort();

        let mut collection = Self::new();
        for path in paths {
            match load_datfile(&path) {
                Ok(datfile) => {
                    log::info!(
                        "Datfile chargé: {} ({} jeux, {} ROMs, {} ignorées)",
                        datfile.display_name(),
                        datfile.games.len(),
                        datfile.rom_count(),
                        datfile.skipped_roms
                    );
                    collection.push(datfile);
                }
                Err(e) => log::warn!("Datfile ignoré {}: {}", path.display(), e),
            }
        }

        Ok(collection)
    }
}

impl From<Vec<Datfile>> for DatfileCollection {
    fn from(datfiles: Vec<Datfile>) -> Self {
        Self { datfiles }
    }
}

impl<'a> IntoIterator for &'a DatfileCollection {
    type Item = &'a Datfile;
    type IntoIter = std::slice::Iter<'a, Datfile>;

    fn into_iter(self) -> Self::IntoIter {
        self.datfiles.iter()
    }
}

fn is_datfile_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            DATFILE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}
