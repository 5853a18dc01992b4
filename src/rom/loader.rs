//! Chargement des datfiles XML (format Logiqx) par lecture en flux
//!
//! Le document est parcouru avec `quick-xml`; une pile de phases suit la
//! position courante (`datafile` > `header` | `game` > `rom`). Les éléments
//! inconnus sont ignorés avec tout leur contenu.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

use super::database::{Datfile, Game, Rom, DEFAULT_ROM_STATUS};
use super::validation::{parse_crc32, parse_hex_digest, HexError};

/// Erreurs fatales de chargement; une ROM malformée n'en fait pas partie
#[derive(Debug, Error)]
pub enum DatfileError {
    #[error("erreur d'entrée/sortie: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML invalide à l'octet {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    #[error("attribut invalide: {0}")]
    Attr(#[from] AttrError),

    #[error("valeur d'attribut invalide: {0}")]
    AttrValue(#[source] quick_xml::Error),

    #[error("élément racine attendu <datafile>, trouvé <{0}>")]
    UnexpectedRoot(String),

    #[error("document incomplet: balise <{0}> non fermée")]
    Unclosed(String),
}

pub type DatfileResult<T> = Result<T, DatfileError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Root,
    Datafile,
    Header,
    HeaderName,
    HeaderDescription,
    HeaderVersion,
    HeaderAuthor,
    HeaderHomepage,
    HeaderUrl,
    Game,
    GameDescription,
    GameCategory,
    Rom,
    Ignored,
}

impl Phase {
    fn captures_text(self) -> bool {
        matches!(
            self,
            Phase::HeaderName
                | Phase::HeaderDescription
                | Phase::HeaderVersion
                | Phase::HeaderAuthor
                | Phase::HeaderHomepage
                | Phase::HeaderUrl
                | Phase::GameDescription
                | Phase::GameCategory
        )
    }
}

/// Attributs d'une balise `<rom>`, bruts
#[derive(Debug, Default)]
struct RomAttributes {
    name: Option<String>,
    size: Option<String>,
    crc: Option<String>,
    md5: Option<String>,
    sha1: Option<String>,
    status: Option<String>,
}

/// Raison du rejet d'une ROM
#[derive(Debug)]
enum RomRejection {
    Empty,
    Malformed(&'static str, HexError),
}

impl RomAttributes {
    fn read(element: &BytesStart<'_>) -> DatfileResult<Self> {
        let mut attrs = Self::default();
        for attr in element.attributes() {
            let attr = attr?;
            let slot = match attr.key.as_ref() {
                b"name" => &mut attrs.name,
                b"size" => &mut attrs.size,
                b"crc" => &mut attrs.crc,
                b"md5" => &mut attrs.md5,
                b"sha1" => &mut attrs.sha1,
                b"status" => &mut attrs.status,
                _ => continue,
            };
            *slot = Some(attr_value(&attr)?);
        }
        Ok(attrs)
    }

    fn into_rom(self) -> Result<Rom, RomRejection> {
        // Les fichiers vides ne servent à rien pour l'identification
        let size = match self.size.as_deref() {
            Some("0") => return Err(RomRejection::Empty),
            Some(size) => size.trim().parse().unwrap_or(0),
            None => 0,
        };

        let crc32 = self
            .crc
            .as_deref()
            .map(parse_crc32)
            .transpose()
            .map_err(|e| RomRejection::Malformed("crc", e))?;
        let md5 = self
            .md5
            .as_deref()
            .map(parse_hex_digest::<16>)
            .transpose()
            .map_err(|e| RomRejection::Malformed("md5", e))?;
        let sha1 = self
            .sha1
            .as_deref()
            .map(parse_hex_digest::<20>)
            .transpose()
            .map_err(|e| RomRejection::Malformed("sha1", e))?;

        Ok(Rom {
            name: self.name.unwrap_or_default(),
            size,
            crc32,
            md5,
            sha1,
            status: self
                .status
                .unwrap_or_else(|| DEFAULT_ROM_STATUS.to_string()),
        })
    }
}

fn attr_value(attr: &quick_xml::events::attributes::Attribute<'_>) -> DatfileResult<String> {
    attr.unescape_value()
        .map(|value| value.into_owned())
        .map_err(DatfileError::AttrValue)
}

fn element_name(element: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(element.name().as_ref()).into_owned()
}

/// État du parseur entre deux événements XML
struct DatfileBuilder {
    phase_stack: Vec<Phase>,
    text: String,
    datfile: Datfile,
    current_game: Option<Game>,
}

impl DatfileBuilder {
    fn new() -> Self {
        Self {
            phase_stack: Vec::with_capacity(8),
            text: String::new(),
            datfile: Datfile::default(),
            current_game: None,
        }
    }

    fn phase(&self) -> Phase {
        self.phase_stack.last().copied().unwrap_or(Phase::Root)
    }

    fn handle_start(&mut self, element: &BytesStart<'_>) -> DatfileResult<()> {
        let new_phase = match (self.phase(), element.name().as_ref()) {
            (Phase::Root, b"datafile") => Phase::Datafile,
            (Phase::Root, _) => return Err(DatfileError::UnexpectedRoot(element_name(element))),
            (Phase::Datafile, b"header") => Phase::Header,
            (Phase::Header, b"name") => Phase::HeaderName,
            (Phase::Header, b"description") => Phase::HeaderDescription,
            (Phase::Header, b"version") => Phase::HeaderVersion,
            (Phase::Header, b"author") => Phase::HeaderAuthor,
            (Phase::Header, b"homepage") => Phase::HeaderHomepage,
            (Phase::Header, b"url") => Phase::HeaderUrl,
            (Phase::Datafile, b"game") => {
                self.start_game(element)?;
                Phase::Game
            }
            (Phase::Game, b"description") => Phase::GameDescription,
            (Phase::Game, b"category") => Phase::GameCategory,
            (Phase::Game, b"rom") => {
                self.add_rom(element)?;
                Phase::Rom
            }
            _ => Phase::Ignored,
        };

        if new_phase.captures_text() {
            self.text.clear();
        }
        self.phase_stack.push(new_phase);
        Ok(())
    }

    fn handle_end(&mut self) {
        let phase = self.phase_stack.pop().unwrap_or(Phase::Root);
        let mut text = || Some(std::mem::take(&mut self.text).trim().to_string());

        match phase {
            Phase::HeaderName => self.datfile.name = text(),
            Phase::HeaderDescription => self.datfile.description = text(),
            Phase::HeaderVersion => self.datfile.version = text(),
            Phase::HeaderAuthor => self.datfile.author = text(),
            Phase::HeaderHomepage => self.datfile.homepage = text(),
            Phase::HeaderUrl => self.datfile.url = text(),
            Phase::GameDescription => {
                let value = text();
                if let Some(game) = self.current_game.as_mut() {
                    game.description = value;
                }
            }
            Phase::GameCategory => {
                let value = text();
                if let Some(game) = self.current_game.as_mut() {
                    game.category = value;
                }
            }
            Phase::Game => {
                if let Some(game) = self.current_game.take() {
                    self.datfile.games.push(game);
                }
            }
            _ => {}
        }
    }

    fn handle_text(&mut self, text: &str) {
        if self.phase().captures_text() {
            self.text.push_str(text);
        }
    }

    fn start_game(&mut self, element: &BytesStart<'_>) -> DatfileResult<()> {
        let mut name = None;
        for attr in element.attributes() {
            let attr = attr?;
            if attr.key.as_ref() == b"name" {
                name = Some(attr_value(&attr)?);
            }
        }

        let name = name.unwrap_or_else(|| {
            log::warn!(
                "Jeu sans attribut name (n°{}), conservé avec un nom vide",
                self.datfile.games.len() + 1
            );
            String::new()
        });

        self.current_game = Some(Game {
            name,
            ..Default::default()
        });
        Ok(())
    }

    fn add_rom(&mut self, element: &BytesStart<'_>) -> DatfileResult<()> {
        let attrs = RomAttributes::read(element)?;
        let rom_name = attrs.name.clone().unwrap_or_default();

        let Some(game) = self.current_game.as_mut() else {
            return Ok(());
        };
        match attrs.into_rom() {
            Ok(rom) => game.roms.push(rom),
            Err(RomRejection::Empty) => {}
            Err(RomRejection::Malformed(attribute, e)) => {
                log::warn!(
                    "ROM ignorée \"{}\" du jeu \"{}\": attribut {} invalide ({})",
                    rom_name,
                    game.name,
                    attribute,
                    e
                );
                self.datfile.skipped_roms += 1;
            }
        }
        Ok(())
    }

    fn finish(self) -> DatfileResult<Datfile> {
        if let Some(phase) = self.phase_stack.last() {
            return Err(DatfileError::Unclosed(format!("{:?}", phase).to_lowercase()));
        }
        Ok(self.datfile)
    }
}

impl Datfile {
    /// Lit un datfile depuis un flux XML
    pub fn from_reader<R: BufRead>(reader: R) -> DatfileResult<Self> {
        let mut reader = Reader::from_reader(reader);

        let mut builder = DatfileBuilder::new();
        let mut buf = Vec::new();

        loop {
            let event = reader
                .read_event_into(&mut buf)
                .map_err(|source| DatfileError::Xml {
                    position: reader.buffer_position() as u64,
                    source,
                })?;

            match event {
                Event::Start(element) => builder.handle_start(&element)?,
                Event::Empty(element) => {
                    builder.handle_start(&element)?;
                    builder.handle_end();
                }
                Event::End(_) => builder.handle_end(),
                Event::Text(text) => {
                    let text = text.unescape().map_err(|source| DatfileError::Xml {
                        position: reader.buffer_position() as u64,
                        source,
                    })?;
                    builder.handle_text(&text);
                }
                Event::CData(data) => {
                    builder.handle_text(&String::from_utf8_lossy(&data));
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        builder.finish()
    }

    /// Lit un datfile depuis une chaîne
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(xml: &str) -> DatfileResult<Self> {
        Self::from_reader(xml.as_bytes())
    }
}

/// Charge un datfile depuis le disque
pub fn load_datfile<P: AsRef<Path>>(path: P) -> DatfileResult<Datfile> {
    let path = path.as_ref();
    log::debug!("Chargement du datfile {}", path.display());
    let file = File::open(path)?;
    Datfile::from_reader(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0"?>
<!DOCTYPE datafile PUBLIC "-//Logiqx//DTD ROM Management Datafile//EN" "http://www.logiqx.com/Dats/datafile.dtd">
<datafile>
    <header>
        <name>Nintendo - Game Boy Advance</name>
        <description>Nintendo - Game Boy Advance (20240101)</description>
        <version>20240101</version>
        <author>tester &amp; co</author>
        <homepage>No-Intro</homepage>
    </header>
    <game name="Alpha (USA)">
        <description>Alpha (USA)</description>
        <category>Games</category>
        <rom name="Alpha (USA).gba" size="4194304" crc="CBF43926" md5="25f9e794323b453885f5181f1b624d0b" sha1="f7c3bc1d808e04732adf679965ccc34ca7ae3441" status="verified"/>
    </game>
    <game name="Beta (Europe)">
        <description>Beta (Europe)</description>
        <rom name="Beta (Europe).gba" size="8388608" crc="1234abcd"/>
        <rom name="empty.bin" size="0" crc="00000000"/>
    </game>
</datafile>
"#;

    #[test]
    fn test_parse_sample() {
        let datfile = Datfile::from_str(SAMPLE).unwrap();

        assert_eq!(datfile.name.as_deref(), Some("Nintendo - Game Boy Advance"));
        assert_eq!(datfile.version.as_deref(), Some("20240101"));
        assert_eq!(datfile.author.as_deref(), Some("tester & co"));
        assert_eq!(datfile.url, None);
        assert_eq!(datfile.games.len(), 2);
        assert_eq!(datfile.skipped_roms, 0);

        let alpha = &datfile.games[0];
        assert_eq!(alpha.name, "Alpha (USA)");
        assert_eq!(alpha.category.as_deref(), Some("Games"));
        let rom = &alpha.roms[0];
        assert_eq!(rom.size, 4_194_304);
        assert_eq!(rom.crc32, Some(0xCBF4_3926));
        assert_eq!(rom.md5.map(|d| d[0]), Some(0x25));
        assert_eq!(rom.sha1.map(|d| d[19]), Some(0x41));
        assert_eq!(rom.status, "verified");
    }

    #[test]
    fn test_zero_size_rom_dropped() {
        let datfile = Datfile::from_str(SAMPLE).unwrap();
        let beta = &datfile.games[1];
        assert_eq!(beta.roms.len(), 1);
        assert_eq!(beta.roms[0].status, "good");
        assert_eq!(beta.roms[0].md5, None);
        assert_eq!(beta.category, None);
    }

    #[test]
    fn test_malformed_digest_skips_rom_only() {
        let xml = r#"<datafile>
            <game name="G">
                <rom name="bad" size="1" sha1="zz"/>
                <rom name="short" size="1" md5="abcd"/>
                <rom name="good" size="1" crc="1"/>
                <rom name="nosize" crc="2" size="abc"/>
            </game>
        </datafile>"#;
        let datfile = Datfile::from_str(xml).unwrap();

        assert_eq!(datfile.skipped_roms, 2);
        let roms = &datfile.games[0].roms;
        assert_eq!(roms.len(), 2);
        assert_eq!(roms[0].name, "good");
        assert_eq!(roms[0].crc32, Some(1));
        assert_eq!(roms[1].size, 0);
    }

    #[test]
    fn test_game_without_name_is_kept() {
        let xml = r#"<datafile><game><rom name="a" size="2" crc="ff"/></game></datafile>"#;
        let datfile = Datfile::from_str(xml).unwrap();
        assert_eq!(datfile.games.len(), 1);
        assert_eq!(datfile.games[0].name, "");
        assert_eq!(datfile.games[0].roms[0].crc32, Some(0xff));
    }

    #[test]
    fn test_unknown_elements_ignored() {
        let xml = r#"<datafile>
            <header><clrmamepro forcenodump="required"/><name>N</name></header>
            <game name="G"><release name="G" region="USA"/><rom name="r" size="1" crc="1"/></game>
            <machine name="M"><rom name="m" size="1" crc="2"/></machine>
        </datafile>"#;
        let datfile = Datfile::from_str(xml).unwrap();
        assert_eq!(datfile.name.as_deref(), Some("N"));
        assert_eq!(datfile.games.len(), 1);
        assert_eq!(datfile.rom_count(), 1);
    }

    #[test]
    fn test_structural_errors() {
        assert!(matches!(
            Datfile::from_str("<datafile><game name=\"x\"></datafile>"),
            Err(DatfileError::Xml { .. })
        ));
        assert!(matches!(
            Datfile::from_str("<datafile><game name=\"x\">"),
            Err(DatfileError::Unclosed(_) | DatfileError::Xml { .. })
        ));
        assert!(matches!(
            Datfile::from_str("<softwarelist/>"),
            Err(DatfileError::UnexpectedRoot(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            load_datfile("/nonexistent/romscope.dat"),
            Err(DatfileError::Io(_))
        ));
    }
}
