//! En-tête Megadrive/Genesis à 0x100, avec prise en charge du format
//! entrelacé Super Magic Drive (SMD)

use std::io::{Cursor, Read, Seek};
use std::sync::LazyLock;

use regex::Regex;

use crate::checksum::megadrive_checksum;
use crate::info::InfoRecord;
use crate::lookup::month_name;
use crate::lookup::sega::{
    LICENSEES, MEGADRIVE_COUNTRIES, MEGADRIVE_IO_SUPPORT, MEGADRIVE_PRODUCT_TYPES,
    MONTH_ABBREVIATIONS,
};
use crate::stream::{RomStream, StreamResult, TextEncoding, NUL_AND_SPACE, SPACE};

pub const HEADER_OFFSET: u64 = 0x100;

/// En-tête du copieur, ignoré
pub const SMD_HEADER_SIZE: u64 = 512;
pub const SMD_BLOCK_SIZE: usize = 16 * 1024;
const SMD_MIDPOINT: usize = 8192;

static COPYRIGHT_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| match Regex::new(r"\(C\)(\S{4}.)(\d{4})\.(.{3})") {
        Ok(regex) => Some(regex),
        Err(e) => {
            log::error!("Expression du copyright invalide: {}", e);
            None
        }
    });

pub(crate) fn decode<R: Read + Seek>(
    stream: &mut RomStream<R>,
    record: &mut InfoRecord,
) -> StreamResult<()> {
    if is_smd(stream)? {
        record.add("Detected format", "Super Magic Drive interleaved");
        let mut decoded = deinterleave_smd(stream)?;
        parse_header(&mut decoded, record)
    } else {
        record.add("Detected format", "Plain");
        parse_header(stream, record)
    }
}

/// Détecte le format SMD: 0xAA 0xBB à l'offset 8 et "EAMG"/"EAGN" à 0x280
///
/// La position du flux est conservée.
pub fn is_smd<R: Read + Seek>(stream: &mut RomStream<R>) -> StreamResult<bool> {
    let mut guard = stream.guard();
    guard.set_position(8)?;

    let marker = match guard.read_array::<2>() {
        Ok(marker) => marker,
        Err(e) if e.is_end_of_stream() => return Ok(false),
        Err(e) => return Err(e),
    };
    if marker != [0xAA, 0xBB] {
        return Ok(false);
    }

    // Octets impairs de "SEGA MEGA DRIVE" / "SEGA GENESIS"
    Ok(guard.magic_at(0x280, "EAMG")? || guard.magic_at(0x280, "EAGN")?)
}

/// Désentrelace le premier bloc SMD, suffisant pour lire l'en-tête
///
/// La première moitié du bloc (indices 0 à 8192 inclus) remplit les offsets
/// impairs à partir de 1, le reste les offsets pairs à partir de 2.
pub fn deinterleave_smd<R: Read + Seek>(
    stream: &mut RomStream<R>,
) -> StreamResult<RomStream<Cursor<Vec<u8>>>> {
    let mut guard = stream.guard();
    guard.set_position(SMD_HEADER_SIZE)?;
    let block = guard.read_up_to(SMD_BLOCK_SIZE)?;

    let mut buffer = vec![0u8; SMD_BLOCK_SIZE + 2];
    let mut odd = 1;
    let mut even = 2;
    for (i, &b) in block.iter().enumerate() {
        if i <= SMD_MIDPOINT {
            buffer[odd] = b;
            odd += 2;
        } else {
            buffer[even] = b;
            even += 2;
        }
    }
    buffer.truncate(even);

    Ok(RomStream::from_bytes(buffer))
}

/// Plateforme déduite du nom de console
pub fn platform_from_console_name(console_name: &str) -> &'static str {
    match console_name {
        name if name.starts_with("SEGA 32X") => "Sega 32X",
        "SAMSUNG PICO" => "Samsung Pico",
        "SEGA PICO" | "SEGATOYS PICO" | "SEGA TOYS PICO" | "IMA IKUNOJYUKU" | "IMA IKUNOUJYUKU" => {
            "Sega Pico"
        }
        name if name.starts_with("SEGA GENESIS") => "Sega Genesis",
        name if name.starts_with("SEGA MEGA DRIVE") || name.starts_with("SEGA MEGADRIVE") => {
            "Sega Mega Drive"
        }
        _ => "Sega Genesis/Mega Drive",
    }
}

/// Normalise le code éditeur: `T-0xx` devient `T-xx`, `Txx` devient `T-xx`
pub fn normalize_maker(raw: &str) -> String {
    let maker = raw.trim().trim_end_matches(',');
    if let Some(rest) = maker.strip_prefix("T-0") {
        return format!("T-{}", rest);
    }
    match maker.strip_prefix('T') {
        Some(rest) if !rest.starts_with('-') => format!("T-{}", rest),
        _ => maker.to_string(),
    }
}

fn parse_copyright(copyright: &str, record: &mut InfoRecord) {
    let Some(pattern) = (*COPYRIGHT_PATTERN).as_ref() else {
        return;
    };
    let Some(captures) = pattern.captures(copyright) else {
        return;
    };

    let maker = normalize_maker(&captures[1]);
    record.add_lookup_str("Publisher", &maker, &LICENSEES);
    record.add("Year", &captures[2]);

    let month = &captures[3];
    match MONTH_ABBREVIATIONS.get_str(&month.to_uppercase()) {
        Some(number) => record.add("Month", month_name(number)),
        None => record.add("Month", format!("Unknown ({})", month)),
    }
}

/// Caractères significatifs d'une liste de codes (espaces et NUL retirés)
fn code_list(text: &str) -> Vec<char> {
    text.chars().filter(|&c| c != ' ' && c != '\0').collect()
}

fn parse_header<R: Read + Seek>(
    stream: &mut RomStream<R>,
    record: &mut InfoRecord,
) -> StreamResult<()> {
    stream.set_position(HEADER_OFFSET)?;

    let console_name = stream.read_text_trimmed(16, TextEncoding::Ascii, NUL_AND_SPACE)?;
    record.add("Console name", console_name.as_str());
    record.add("Platform", platform_from_console_name(console_name.trim_start()));

    let copyright = stream.read_text_trimmed(16, TextEncoding::Ascii, NUL_AND_SPACE)?;
    record.add("Copyright", copyright.as_str());
    parse_copyright(&copyright, record);

    let domestic_name = stream.read_text_trimmed(48, TextEncoding::ShiftJis, NUL_AND_SPACE)?;
    record.add("Internal name", domestic_name);
    let overseas_name = stream.read_text_trimmed(48, TextEncoding::ShiftJis, NUL_AND_SPACE)?;
    record.add("Overseas name", overseas_name);

    let product_type = stream.read_text(2, TextEncoding::Ascii)?;
    record.add_lookup_str("Type", &product_type, &MEGADRIVE_PRODUCT_TYPES);

    stream.seek_relative(1)?;
    let serial = stream.read_text_trimmed(8, TextEncoding::Ascii, NUL_AND_SPACE)?;
    record.add("Product code", serial);
    stream.seek_relative(1)?;
    record.add("Version", stream.read_text(2, TextEncoding::Ascii)?);

    let checksum = stream.read_u16_be()?;
    let calculated = megadrive_checksum(stream)?;
    record.add_hex("Checksum", checksum, true);
    record.add_hex("Calculated checksum", calculated, true);
    record.add("Checksum valid?", checksum == calculated);

    let peripherals = code_list(&stream.read_text(16, TextEncoding::Ascii)?);
    record.add_lookup_list("Compatible peripherals", &peripherals, &MEGADRIVE_IO_SUPPORT);

    let rom_start = stream.read_u32_be()?;
    let rom_end = stream.read_u32_be()?;
    record.add_hex("ROM start", rom_start, true);
    record.add_hex("ROM end", rom_end, true);
    record.add_size("ROM size", i64::from(rom_end) - i64::from(rom_start));

    let ram_start = stream.read_u32_be()?;
    let ram_end = stream.read_u32_be()?;
    record.add_hex("RAM start", ram_start, true);
    record.add_hex("RAM end", ram_end, true);
    record.add_size("RAM size", i64::from(ram_end) - i64::from(ram_start));

    let backup_ram_id = stream.read_bytes(4)?;
    record.add_hex("Backup RAM ID", backup_ram_id, false);
    let backup_start = stream.read_u32_be()?;
    let backup_end = stream.read_u32_be()?;
    record.add_hex("Backup RAM start", backup_start, true);
    record.add_hex("Backup RAM end", backup_end, true);
    record.add_size("Save size", i64::from(backup_end) - i64::from(backup_start));

    // Que des espaces si le modem n'est pas pris en charge
    let modem = stream.read_text_trimmed(12, TextEncoding::Ascii, SPACE)?;
    record.add("Modem data", modem);
    let memo = stream.read_text_trimmed(40, TextEncoding::Ascii, NUL_AND_SPACE)?;
    record.add("Memo", memo);

    let countries = code_list(&stream.read_text(3, TextEncoding::Ascii)?);
    record.add_lookup_list("Country", &countries, &MEGADRIVE_COUNTRIES);

    Ok(())
}
