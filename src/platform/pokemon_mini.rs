//! En-tête de cartouche Pokémon Mini (0x2100)

use std::io::{Read, Seek};

use crate::info::InfoRecord;
use crate::lookup::nintendo::{COUNTRIES, LICENSEE_CODES, POKEMON_MINI_GAME_TYPES};
use crate::stream::{ascii_char, RomStream, StreamResult, TextEncoding, NUL_AND_SPACE};

pub const HEADER_OFFSET: u64 = 0x2100;

/// Vecteurs d'interruption qui suivent le point d'entrée, 6 octets chacun
const IRQ_VECTORS: [&str; 26] = [
    "PRC frame copy IRQ",
    "PRC render IRQ",
    "Timer 2 underflow upper IRQ",
    "Timer 2 underflow lower IRQ",
    "Timer 1 underflow upper IRQ",
    "Timer 1 underflow lower IRQ",
    "Timer 3 underflow upper IRQ",
    "Timer 3 comparator IRQ",
    "32Hz timer IRQ",
    "8Hz timer IRQ",
    "2Hz timer IRQ",
    "1Hz timer IRQ",
    "IR receiver IRQ",
    "Shake sensor IRQ",
    "Power key IRQ",
    "Right key IRQ",
    "Left key IRQ",
    "Down key IRQ",
    "Up key IRQ",
    "C key IRQ",
    "B key IRQ",
    "A key IRQ",
    "Unknown IRQ 1",
    "Unknown IRQ 2",
    "Unknown IRQ 3",
    "Cartridge IRQ",
];

pub(crate) fn decode<R: Read + Seek>(
    stream: &mut RomStream<R>,
    record: &mut InfoRecord,
) -> StreamResult<()> {
    stream.set_position(HEADER_OFFSET)?;

    record.add_extra("Marker", stream.read_text(2, TextEncoding::Ascii)?);
    record.add_hex("Entry point", stream.read_bytes(6)?, true);
    for name in IRQ_VECTORS {
        record.add_hex(name, stream.read_bytes(6)?, true);
    }

    // Devrait valoir "NINTENDO"
    record.add_extra("Magic", stream.read_text(8, TextEncoding::Ascii)?);

    let code = stream.read_array::<4>()?;
    record.add("Product code", TextEncoding::Ascii.decode(&code));
    record.add_lookup("Type", ascii_char(code[0]), &POKEMON_MINI_GAME_TYPES);
    record.add("Short title", TextEncoding::Ascii.decode(&code[1..3]));
    record.add_lookup("Country", ascii_char(code[3]), &COUNTRIES);

    let title = stream.read_text_trimmed(12, TextEncoding::ShiftJis, NUL_AND_SPACE)?;
    record.add("Internal name", title);

    let publisher = stream.read_text(2, TextEncoding::Ascii)?;
    record.add_lookup_str("Publisher", &publisher, &LICENSEE_CODES);

    record.add_hex("Reserved", stream.read_bytes(18)?, true);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::FieldValue;

    #[test]
    fn test_header_layout() {
        let mut data = vec![0u8; 0x2200];
        // Marqueur, point d'entrée et vecteurs: 2 + 6 + 26 * 6 octets
        let magic_offset = 0x2100 + 2 + 6 + 26 * 6;
        assert_eq!(magic_offset, 0x21A4);
        data[magic_offset..magic_offset + 8].copy_from_slice(b"NINTENDO");
        data[magic_offset + 8..magic_offset + 12].copy_from_slice(b"MPZE");
        data[magic_offset + 12..magic_offset + 17].copy_from_slice(b"PUZZL");
        data[magic_offset + 24..magic_offset + 26].copy_from_slice(b"2P");

        let mut stream = RomStream::from_bytes(data);
        let mut record = InfoRecord::new();
        decode(&mut stream, &mut record).unwrap();

        assert_eq!(record.value("Magic"), Some(&FieldValue::Text("NINTENDO".into())));
        assert_eq!(record.get("Type").unwrap().display(), "Game");
        assert_eq!(record.get("Country").unwrap().display(), "USA");
        assert_eq!(record.value("Internal name"), Some(&FieldValue::Text("PUZZL".into())));
        assert_eq!(record.get("Publisher").unwrap().display(), "The Pokémon Company");
        assert!(record.get("Cartridge IRQ").unwrap().extra);
    }
}
