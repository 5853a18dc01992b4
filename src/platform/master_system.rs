//! En-têtes Master System / Game Gear: en-tête Sega "TMR SEGA" et en-tête
//! homebrew SDSC

use std::io::{Read, Seek};

use chrono::NaiveDate;

use crate::checksum::{decode_bcd, decode_bcd_word, sms_checksum};
use crate::info::InfoRecord;
use crate::lookup::month_name;
use crate::lookup::sega::{LICENSEES, SMS_REGIONS, SMS_ROM_SIZES};
use crate::stream::{RomStream, StreamResult};

pub const SEGA_MAGIC: &str = "TMR SEGA";
pub const SDSC_MAGIC: &str = "SDSC";

/// Positions possibles de la signature, testées dans l'ordre
pub const HEADER_PROBES: [u64; 3] = [0x1ff0, 0x3ff0, 0x7ff0];
pub const SDSC_OFFSET: u64 = 0x7fe0;

/// Offset de chaîne SDSC signifiant "absent"
const SDSC_NO_STRING: u16 = 0xffff;

pub(crate) fn decode<R: Read + Seek>(
    stream: &mut RomStream<R>,
    record: &mut InfoRecord,
    is_game_gear: bool,
) -> StreamResult<()> {
    match find_sega_header(stream)? {
        Some(offset) => {
            record.add_hex("Header position", offset, true);
            record.add("Has standard header", true);
            // Un en-tête Sega coupé n'empêche pas la lecture du bloc SDSC
            match parse_sega_header(stream, record, offset, is_game_gear) {
                Err(e) if e.is_end_of_stream() => {
                    log::debug!("En-tête Sega tronqué à {:#x}: {}", offset, e);
                    record.add("Header truncated?", true);
                }
                other => other?,
            }
        }
        None => record.add("Has standard header", false),
    }

    if stream.magic_at(SDSC_OFFSET, SDSC_MAGIC)? {
        record.add("Has SDSC header", true);
        stream.set_position(SDSC_OFFSET + SDSC_MAGIC.len() as u64)?;
        parse_sdsc_header(stream, record)?;
    } else {
        record.add("Has SDSC header", false);
    }

    Ok(())
}

/// Position juste après la signature, si elle est trouvée
pub fn find_sega_header<R: Read + Seek>(stream: &mut RomStream<R>) -> StreamResult<Option<u64>> {
    for probe in HEADER_PROBES {
        if stream.magic_at(probe, SEGA_MAGIC)? {
            log::debug!("Signature {} trouvée à {:#x}", SEGA_MAGIC, probe);
            return Ok(Some(probe + SEGA_MAGIC.len() as u64));
        }
    }
    Ok(None)
}

/// Code produit: 4 chiffres BCD, préfixés du quartet haut s'il est non nul
fn format_product_code(bcd: [u8; 2], prefix: u8) -> String {
    let digits = decode_bcd_word(bcd);
    if prefix == 0 {
        format!("{:04}", digits)
    } else {
        format!("{}{:04}", prefix, digits)
    }
}

fn parse_sega_header<R: Read + Seek>(
    stream: &mut RomStream<R>,
    record: &mut InfoRecord,
    offset: u64,
    is_game_gear: bool,
) -> StreamResult<()> {
    stream.set_position(offset)?;

    let reserved = stream.read_bytes(2)?;
    record.add_hex("Reserved", reserved, true);

    let checksum = stream.read_u16_le()?;
    record.add_hex("Checksum", checksum, true);

    let code = stream.read_array::<2>()?;
    let code_and_version = stream.read_u8()?;
    let product_code = format_product_code(code, code_and_version >> 4);
    record.add("Product code", product_code.as_str());

    if is_game_gear {
        if product_code.len() >= 5 {
            let maker = format!("T-{}", &product_code[..product_code.len() - 3]);
            record.add_lookup_str("Publisher", &maker, &LICENSEES);
        } else {
            record.add("Publisher", "Sega");
        }
    }
    record.add("Version", code_and_version & 0x0f);

    let region_and_size = stream.read_u8()?;
    let size_code = region_and_size & 0x0f;
    record.add_lookup("Region", region_and_size >> 4, &SMS_REGIONS);
    record.add_size_lookup("ROM size", size_code, &SMS_ROM_SIZES);

    let calculated = sms_checksum(stream, size_code)?;
    record.add_hex("Calculated checksum", calculated, true);
    record.add("Checksum valid?", checksum == calculated);

    Ok(())
}

fn parse_sdsc_header<R: Read + Seek>(
    stream: &mut RomStream<R>,
    record: &mut InfoRecord,
) -> StreamResult<()> {
    record.add("Major version", decode_bcd(stream.read_u8()?));
    record.add("Minor version", decode_bcd(stream.read_u8()?));

    let day = decode_bcd(stream.read_u8()?);
    let month = decode_bcd(stream.read_u8()?);
    let year = decode_bcd_word(stream.read_array::<2>()?);
    record.add("Day", day);
    record.add("Month", month_name(month));
    record.add("Year", year);
    if let Some(date) = NaiveDate::from_ymd_opt(year as i32, month, day) {
        record.add("Date", date);
    }

    let author_offset = stream.read_u16_le()?;
    let name_offset = stream.read_u16_le()?;
    let description_offset = stream.read_u16_le()?;
    record.add_hex("Author offset", author_offset, true);
    record.add_hex("Name offset", name_offset, true);
    record.add_hex("Description offset", description_offset, true);

    if author_offset != SDSC_NO_STRING && author_offset != 0 {
        stream.set_position(u64::from(author_offset))?;
        record.add("Author", read_sdsc_string(stream)?);
    }
    if name_offset != SDSC_NO_STRING {
        stream.set_position(u64::from(name_offset))?;
        record.add("Internal name", read_sdsc_string(stream)?);
    }
    if description_offset != SDSC_NO_STRING {
        stream.set_position(u64::from(description_offset))?;
        record.add("Description", read_sdsc_string(stream)?);
    }

    Ok(())
}

/// Chaîne ASCII terminée par NUL; s'arrête au premier octet hors de 32..=127
fn read_sdsc_string<R: Read + Seek>(stream: &mut RomStream<R>) -> StreamResult<String> {
    let mut text = String::new();
    while let Some(b) = stream.try_read_u8()? {
        if !(32..=127).contains(&b) {
            break;
        }
        text.push(b as char);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::FieldValue;

    #[test]
    fn test_product_code() {
        assert_eq!(format_product_code([0x01, 0x70], 0), "7001");
        assert_eq!(format_product_code([0x05, 0x25], 2), "22505");
    }

    #[test]
    fn test_sdsc_string_stops_on_invalid_byte() {
        let mut stream = RomStream::from_bytes(b"Hello\x01World\0".to_vec());
        assert_eq!(read_sdsc_string(&mut stream).unwrap(), "Hello");

        let mut stream = RomStream::from_bytes(b"Tail".to_vec());
        assert_eq!(read_sdsc_string(&mut stream).unwrap(), "Tail");
    }

    #[test]
    fn test_find_header_probes_in_order() {
        let mut data = vec![0u8; 0x8000];
        data[0x3ff0..0x3ff8].copy_from_slice(b"TMR SEGA");
        data[0x7ff0..0x7ff8].copy_from_slice(b"TMR SEGA");
        let mut stream = RomStream::from_bytes(data);
        assert_eq!(find_sega_header(&mut stream).unwrap(), Some(0x3ff8));
    }

    #[test]
    fn test_sdsc_read_after_truncated_sega_header() {
        // Fichier coupé juste après "TMR SEGA" + 2 octets réservés
        let mut data = vec![0u8; 0x7ffa];
        data[0x100..0x105].copy_from_slice(b"Demo\0");
        data[0x7fe0..0x7fe4].copy_from_slice(b"SDSC");
        data[0x7fe4] = 0x01;
        data[0x7fe6] = 0x25;
        data[0x7fe7] = 0x12;
        data[0x7fe8] = 0x17;
        data[0x7fe9] = 0x20;
        data[0x7fea..0x7fec].copy_from_slice(&SDSC_NO_STRING.to_le_bytes());
        data[0x7fec..0x7fee].copy_from_slice(&0x100u16.to_le_bytes());
        data[0x7fee..0x7ff0].copy_from_slice(&SDSC_NO_STRING.to_le_bytes());
        data[0x7ff0..0x7ff8].copy_from_slice(b"TMR SEGA");

        let mut stream = RomStream::from_bytes(data);
        let mut record = InfoRecord::new();
        decode(&mut stream, &mut record, false).unwrap();

        assert_eq!(record.value("Has standard header"), Some(&FieldValue::Bool(true)));
        assert_eq!(record.value("Header truncated?"), Some(&FieldValue::Bool(true)));
        assert_eq!(record.value("Has SDSC header"), Some(&FieldValue::Bool(true)));
        assert_eq!(record.get("Internal name").unwrap().display(), "Demo");
        assert!(record.get("Date").is_some());
        assert!(record.get("Author").is_none());
    }

    #[test]
    fn test_no_header_on_small_rom() {
        let mut stream = RomStream::from_bytes(vec![0u8; 0x100]);
        assert_eq!(find_sega_header(&mut stream).unwrap(), None);
    }
}
