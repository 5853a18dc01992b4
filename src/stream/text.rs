//! Décodage des champs texte de taille fixe

use encoding_rs::{SHIFT_JIS, UTF_16LE};

/// Caractères rognés en fin de champ
pub const NUL: &[char] = &['\0'];
pub const SPACE: &[char] = &[' '];
pub const NUL_AND_SPACE: &[char] = &['\0', ' '];

/// Encodages rencontrés dans les en-têtes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// ASCII strict; les octets hors plage deviennent `?`
    Ascii,

    /// Shift-JIS (titres japonais Megadrive, Pokémon Mini)
    ShiftJis,

    /// UTF-16 petit-boutiste (certificats XBE)
    Utf16Le,
}

/// Caractère ASCII d'un octet, `?` hors plage
pub fn ascii_char(byte: u8) -> char {
    if byte.is_ascii() {
        byte as char
    } else {
        '?'
    }
}

impl TextEncoding {
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            TextEncoding::Ascii => bytes.iter().map(|&b| ascii_char(b)).collect(),
            TextEncoding::ShiftJis => SHIFT_JIS.decode_without_bom_handling(bytes).0.into_owned(),
            TextEncoding::Utf16Le => UTF_16LE.decode_without_bom_handling(bytes).0.into_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_replaces_high_bytes() {
        assert_eq!(TextEncoding::Ascii.decode(b"AB\xFFC"), "AB?C");
    }

    #[test]
    fn test_shift_jis() {
        // "ソニック" en Shift-JIS
        let bytes = [0x83, 0x5C, 0x83, 0x6A, 0x83, 0x62, 0x83, 0x4E];
        assert_eq!(TextEncoding::ShiftJis.decode(&bytes), "ソニック");
    }

    #[test]
    fn test_utf16le() {
        let bytes = [b'H', 0, b'a', 0, b'l', 0, b'o', 0];
        assert_eq!(TextEncoding::Utf16Le.decode(&bytes), "Halo");
    }
}
