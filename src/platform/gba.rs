//! En-tête de cartouche Game Boy Advance (192 octets à l'offset 0)

use std::io::{Read, Seek};

use crate::checksum::{gba_header_checksum, nintendo_logo_valid};
use crate::info::InfoRecord;
use crate::lookup::nintendo::{COUNTRIES, GBA_GAME_TYPES, GBA_MULTIBOOT_MODES, LICENSEE_CODES};
use crate::stream::{ascii_char, contains, RomStream, StreamResult, TextEncoding, NUL};

/// Valeur attendue à 0xB2
pub const FIXED_VALUE: u8 = 0x96;

// Chaînes laissées par le SDK selon le type de sauvegarde
const EEPROM: &[u8] = b"EEPROM_V";
const SRAM: &[u8] = b"SRAM_V";
const SRAM_F: &[u8] = b"SRAM_F_V";
const FLASH: &[u8] = b"FLASH_V";
const FLASH_512: &[u8] = b"FLASH512_V";
const FLASH_1M: &[u8] = b"FLASH1M_V";
const RTC: &[u8] = b"SIIRTC_V";

/// Début de la routine SelectSong du pilote Sappy
pub const SAPPY_SELECTSONG: [u8; 30] = [
    0x00, 0xB5, 0x00, 0x04, 0x07, 0x4A, 0x08, 0x49, 0x40, 0x0B, 0x40, 0x18, 0x83, 0x88, 0x59,
    0x00, 0xC9, 0x18, 0x89, 0x00, 0x89, 0x18, 0x0A, 0x68, 0x01, 0x68, 0x10, 0x1C, 0x00, 0xF0,
];

pub(crate) fn decode<R: Read + Seek>(
    stream: &mut RomStream<R>,
    record: &mut InfoRecord,
) -> StreamResult<()> {
    stream.set_position(0)?;

    let entry_point = stream.read_bytes(4)?;
    record.add_hex("Entry point", entry_point, true);

    let logo = stream.read_bytes(156)?;
    let logo_valid = nintendo_logo_valid(&logo);
    record.add_hex("Nintendo logo", logo, true);
    record.add("Nintendo logo valid?", logo_valid);

    let title = stream.read_text_trimmed(12, TextEncoding::Ascii, NUL)?;
    record.add("Internal name", title);

    let code = stream.read_array::<4>()?;
    record.add("Product code", TextEncoding::Ascii.decode(&code));
    record.add_lookup("Type", ascii_char(code[0]), &GBA_GAME_TYPES);
    record.add("Short title", TextEncoding::Ascii.decode(&code[1..3]));
    record.add_lookup("Region", ascii_char(code[3]), &COUNTRIES);

    let maker = stream.read_text(2, TextEncoding::Ascii)?;
    record.add_lookup_str("Manufacturer", &maker, &LICENSEE_CODES);

    let fixed_value = stream.read_u8()?;
    record.add_hex("Fixed value", fixed_value, true);
    record.add("Fixed value valid?", fixed_value == FIXED_VALUE);

    // Matériel requis, normalement 0
    record.add("Main unit code", stream.read_u8()?);
    record.add("Device type", stream.read_u8()?);

    let reserved = stream.read_bytes(7)?;
    record.add_hex("Reserved", reserved, true);
    record.add("Version", stream.read_u8()?);

    let checksum = stream.read_u8()?;
    let calculated = gba_header_checksum(stream)?;
    record.add_hex("Checksum", checksum, true);
    record.add_hex("Calculated checksum", calculated, true);
    record.add("Checksum valid?", checksum == calculated);

    let reserved = stream.read_bytes(2)?;
    record.add_hex("Reserved 2", reserved, true);
    let multiboot_entry = stream.read_bytes(4)?;
    record.add_hex("Multiboot entry point", multiboot_entry, true);
    record.add_lookup("Multiboot mode", stream.read_u8()?, &GBA_MULTIBOOT_MODES);
    record.add("Multiboot slave ID", stream.read_u8()?);

    let rest = stream.read_remaining()?;
    detect_save_type(record, &rest);
    record.add("Has RTC", contains(&rest, RTC));
    let driver = if contains(&rest, &SAPPY_SELECTSONG) {
        "Sappy"
    } else {
        "Unknown"
    };
    record.add("Sound driver", driver);

    Ok(())
}

/// Type de sauvegarde d'après les chaînes du SDK
fn detect_save_type(record: &mut InfoRecord, data: &[u8]) {
    if contains(data, EEPROM) {
        // 512 octets ou 8 KiB, indiscernables ici
        record.add("Save type", "EEPROM");
    } else if contains(data, SRAM) || contains(data, SRAM_F) {
        record.add("Save type", "SRAM");
        record.add_size("Save size", 32 * 1024u32);
    } else if contains(data, FLASH) || contains(data, FLASH_512) {
        record.add("Save type", "Flash");
        record.add_size("Save size", 64 * 1024u32);
    } else if contains(data, FLASH_1M) {
        record.add("Save type", "Flash");
        record.add_size("Save size", 128 * 1024u32);
    }
}
