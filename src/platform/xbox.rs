//! Exécutables Xbox (XBE): en-tête d'image et certificat

use std::io::{Read, Seek};

use bitflags::bitflags;
use chrono::Datelike;

use crate::checksum::{resolve_xbe_entry_point, xbox_timestamp};
use crate::info::InfoRecord;
use crate::lookup::microsoft::LICENSEE_CODES;
use crate::lookup::month_name;
use crate::stream::{ascii_char, RomStream, StreamResult, TextEncoding, NUL};

pub const XBE_MAGIC: &str = "XBEH";

bitflags! {
    /// Supports autorisés par le certificat
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AllowedMedia: u32 {
        const HARD_DISK = 1 << 0;
        const DVD_X2 = 1 << 1;
        const DVD_CD = 1 << 2;
        const CD = 1 << 3;
        const DVD = 1 << 4;
        const DVD_DL = 1 << 5;
        const DVD_RW = 1 << 6;
        const DVD_RW_DL = 1 << 7;
        const DONGLE = 1 << 8;
        const MEDIA_BOARD = 1 << 9;
    }
}

bitflags! {
    /// Régions de jeu du certificat
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct XboxRegion: u32 {
        const NORTH_AMERICA = 1 << 0;
        const JAPAN = 1 << 1;
        const REST_OF_WORLD = 1 << 2;
        const MANUFACTURING = 0x8000_0000;
    }
}

const MEDIA_FIELDS: [(AllowedMedia, &str); 10] = [
    (AllowedMedia::HARD_DISK, "Allowed on hard disk"),
    (AllowedMedia::DVD_X2, "Allowed on DVD X2"),
    (AllowedMedia::DVD_CD, "Allowed on DVD CD"),
    (AllowedMedia::CD, "Allowed on CD"),
    (AllowedMedia::DVD, "Allowed on DVD"),
    (AllowedMedia::DVD_DL, "Allowed on DVD DL"),
    (AllowedMedia::DVD_RW, "Allowed on DVD-RW"),
    (AllowedMedia::DVD_RW_DL, "Allowed on DVD-RW DL"),
    (AllowedMedia::DONGLE, "Allowed on dongle"),
    (AllowedMedia::MEDIA_BOARD, "Allowed on media board"),
];

const REGION_NAMES: [(XboxRegion, &str); 4] = [
    (XboxRegion::NORTH_AMERICA, "North America"),
    (XboxRegion::JAPAN, "Japan"),
    (XboxRegion::REST_OF_WORLD, "Rest of world"),
    (XboxRegion::MANUFACTURING, "Manufacturing"),
];

impl XboxRegion {
    /// Noms des régions joints par `" | "`; les bits inconnus sont gardés en hexadécimal
    pub fn describe(self) -> String {
        let mut names: Vec<String> = REGION_NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| name.to_string())
            .collect();

        let unknown = self.bits() & !XboxRegion::all().bits();
        if unknown != 0 {
            names.push(format!("{:#x}", unknown));
        }

        if names.is_empty() {
            "None".to_string()
        } else {
            names.join(" | ")
        }
    }
}

pub(crate) fn decode<R: Read + Seek>(
    stream: &mut RomStream<R>,
    record: &mut InfoRecord,
    extension: &str,
) -> StreamResult<()> {
    // Les images disque ne sont pas analysées
    if extension != "xbe" {
        return Ok(());
    }
    parse_xbe(stream, record)
}

/// Date XBE décomposée en champs date, année, mois et jour
fn add_date(record: &mut InfoRecord, prefix: Option<&str>, seconds: u32) {
    let field = |name: &str| match prefix {
        Some(prefix) => format!("{} {}", prefix, name.to_lowercase()),
        None => name.to_string(),
    };

    let Some(date) = xbox_timestamp(seconds) else {
        record.add_hex(&field("Date"), seconds, false);
        return;
    };
    record.add(&field("Date"), date);
    record.add(&field("Year"), date.year());
    record.add(&field("Month"), month_name(date.month()));
    record.add(&field("Day"), date.day());
}

fn parse_xbe<R: Read + Seek>(stream: &mut RomStream<R>, record: &mut InfoRecord) -> StreamResult<()> {
    if !stream.magic_at(0, XBE_MAGIC)? {
        record.add("Detected format", "Unknown");
        return Ok(());
    }
    record.add("Detected format", "XBE");

    stream.set_position(XBE_MAGIC.len() as u64)?;
    let signature = stream.read_bytes(256)?;
    record.add("Signed", signature.iter().any(|&b| b != 0));

    stream.set_position(0x104)?;
    let base_address = stream.read_u32_le()?;
    record.add_hex("Base address", base_address, true);

    record.add_extra("Header size", stream.read_u32_le()?);
    record.add_extra("Image size", stream.read_u32_le()?);
    record.add_extra("Image header size", stream.read_u32_le()?);

    add_date(record, Some("XBE"), stream.read_u32_le()?);

    let certificate_offset = i64::from(stream.read_u32_le()?) - i64::from(base_address);
    record.add_hex("Certificate offset", certificate_offset, true);

    record.add_extra("Number of sections", stream.read_u32_le()?);
    let sections_offset = i64::from(stream.read_u32_le()?) - i64::from(base_address);
    record.add_hex("Address of sections", sections_offset, true);
    record.add_hex("Initialization flags", stream.read_u32_le()?, true);

    let raw_entry_point = stream.read_u32_le()?;
    let (entry_point, is_debug) = resolve_xbe_entry_point(raw_entry_point, base_address, stream.len());
    record.add_hex("Entry point", entry_point, true);
    record.add("Is debug", is_debug);

    if certificate_offset > 0 && (certificate_offset as u64) < stream.len() {
        parse_certificate(stream, record, certificate_offset as u64)?;
    } else {
        log::debug!("Certificat XBE hors du fichier ({:#x})", certificate_offset);
    }

    Ok(())
}

fn parse_certificate<R: Read + Seek>(
    stream: &mut RomStream<R>,
    record: &mut InfoRecord,
    offset: u64,
) -> StreamResult<()> {
    stream.set_position(offset)?;

    record.add_extra("Certificate size", stream.read_u32_le()?);
    add_date(record, None, stream.read_u32_le()?);

    record.add("Title ID", stream.read_u16_le()? as i16);

    // Stocké à l'envers
    let maker: String = stream.read_array::<2>()?.iter().rev().map(|&b| ascii_char(b)).collect();
    record.add_lookup_str("Publisher", &maker, &LICENSEE_CODES);

    let name = stream.read_text_trimmed(80, TextEncoding::Utf16Le, NUL)?;
    record.add("Internal name", name);

    let alt_ids = stream.read_bytes(64)?;
    record.add_hex("Alt IDs", alt_ids, true);

    let media = AllowedMedia::from_bits_retain(stream.read_u32_le()?);
    for (flag, name) in MEDIA_FIELDS {
        record.add_extra(name, media.contains(flag));
    }

    let region = XboxRegion::from_bits_retain(stream.read_u32_le()?);
    record.add("Region", region.describe());

    let ratings = stream.read_bytes(4)?;
    record.add_hex("Ratings", ratings, true);
    record.add("Disc number", stream.read_u32_le()?);
    record.add("Version", stream.read_u32_le()?);

    Ok(())
}
