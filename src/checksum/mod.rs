//! Sommes de contrôle et validateurs par plateforme
//!
//! Chaque fonction travaille derrière un `PositionGuard`: la position du flux
//! est la même avant et après l'appel, quelle que soit l'issue. Une fin de flux
//! pendant une somme l'interrompt et la somme partielle est renvoyée.

use std::io::{Read, Seek};

use chrono::{DateTime, Utc};

use crate::stream::{RomStream, StreamResult};

/// CRC32 du logo Nintendo de l'en-tête GBA
pub const GBA_LOGO_CRC32: u32 = 0xD0BE_B55E;

/// Clés XOR du point d'entrée XBE
pub const XBE_DEBUG_KEY: u32 = 0x9485_9D4B;
pub const XBE_RETAIL_KEY: u32 = 0xA8FC_57AB;

/// Décalage des dates XBE: secondes depuis 1969-12-31T16:00:00 UTC
const XBOX_EPOCH_OFFSET: i64 = 8 * 60 * 60;

/// Complément de l'en-tête GBA, calculé sur 0xA0..=0xBC
pub fn gba_header_checksum<R: Read + Seek>(stream: &mut RomStream<R>) -> StreamResult<u8> {
    let mut guard = stream.guard();
    guard.set_position(0xA0)?;

    let mut x: u8 = 0;
    for _ in 0xA0..=0xBC {
        match guard.try_read_u8()? {
            Some(b) => x = x.wrapping_sub(b),
            None => break,
        }
    }
    Ok(x.wrapping_sub(0x19))
}

/// Fenêtres sommées selon le code de taille de l'en-tête Sega
fn sms_windows(size_code: u8) -> (u64, Option<u64>) {
    let low_end = match size_code {
        0xa => 0x1fef,
        0xb => 0x3fef,
        0xd => 0xbfef,
        _ => 0x7fef,
    };

    let high_end = match size_code {
        0xe => Some(0xffff),
        0xf => Some(0x1ffff),
        0x0 => Some(0x3ffff),
        0x1 => Some(0x7ffff),
        0x2 => Some(0xfffff),
        _ => None,
    };

    (low_end, high_end)
}

/// Somme sur 16 bits des octets de `[start, end]`, arrêtée en fin de flux
fn sum_bytes<R: Read + Seek>(
    stream: &mut RomStream<R>,
    start: u64,
    end: u64,
    mut sum: u16,
) -> StreamResult<u16> {
    stream.set_position(start)?;
    for _ in start..=end {
        match stream.try_read_u8()? {
            Some(b) => sum = sum.wrapping_add(b as u16),
            None => break,
        }
    }
    Ok(sum)
}

/// Somme de contrôle Master System / Game Gear
pub fn sms_checksum<R: Read + Seek>(stream: &mut RomStream<R>, size_code: u8) -> StreamResult<u16> {
    let mut guard = stream.guard();
    let (low_end, high_end) = sms_windows(size_code);

    let mut sum = sum_bytes(&mut *guard, 0, low_end, 0)?;
    if let Some(high_end) = high_end {
        sum = sum_bytes(&mut *guard, 0x8000, high_end, sum)?;
    }
    Ok(sum)
}

/// Taille des blocs lus pour la somme Megadrive (paire)
const MEGADRIVE_CHUNK_SIZE: usize = 64 * 1024;

/// Somme des mots big-endian de 0x200 jusqu'à la fin
pub fn megadrive_checksum<R: Read + Seek>(stream: &mut RomStream<R>) -> StreamResult<u16> {
    let mut guard = stream.guard();
    guard.set_position(0x200)?;

    let mut sum: u16 = 0;
    loop {
        let chunk = guard.read_up_to(MEGADRIVE_CHUNK_SIZE)?;
        // Un octet impair final est ignoré
        for word in chunk.chunks_exact(2) {
            sum = sum.wrapping_add(u16::from_be_bytes([word[0], word[1]]));
        }
        if chunk.len() < MEGADRIVE_CHUNK_SIZE {
            break;
        }
    }
    Ok(sum)
}

/// Décode le point d'entrée XBE; renvoie `(adresse, is_debug)`
///
/// La clé debug est essayée en premier: si le résultat tombe dans le
/// fichier, l'exécutable est une version debug.
pub fn resolve_xbe_entry_point(raw: u32, base_address: u32, file_len: u64) -> (u32, bool) {
    let debug = (raw ^ XBE_DEBUG_KEY).wrapping_sub(base_address);
    if u64::from(debug) <= file_len {
        return (debug, true);
    }
    ((raw ^ XBE_RETAIL_KEY).wrapping_sub(base_address), false)
}

pub fn nintendo_logo_valid(logo: &[u8]) -> bool {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(logo);
    hasher.finalize() == GBA_LOGO_CRC32
}

/// Convertit une date XBE en date UTC
pub fn xbox_timestamp(seconds: u32) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(i64::from(seconds) - XBOX_EPOCH_OFFSET, 0)
}

/// Décode un octet BCD (deux chiffres)
pub fn decode_bcd(byte: u8) -> u32 {
    let hi = u32::from(byte >> 4);
    let lo = u32::from(byte & 0x0f);
    hi * 10 + lo
}

/// Décode un mot BCD de quatre chiffres; le second octet porte les chiffres hauts
pub fn decode_bcd_word(bytes: [u8; 2]) -> u32 {
    decode_bcd(bytes[1]) * 100 + decode_bcd(bytes[0])
}
