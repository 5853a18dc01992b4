//! Empreintes de fichiers et règles de correspondance avec les datfiles

use std::io::{self, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crc32fast::Hasher;
use serde::{Serialize, Serializer};
use sha1::Sha1;
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::database::Rom;

const BUFFER_SIZE: usize = 64 * 1024;

/// Erreurs de décodage hexadécimal
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HexError {
    #[error("caractère hexadécimal invalide '{ch}' à la position {position}")]
    InvalidChar { ch: char, position: usize },

    #[error("longueur incorrecte: attendu {expected} octets, trouvé {found}")]
    WrongLength { expected: usize, found: usize },
}

/// Opération interrompue par un [`CancelToken`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("opération annulée")]
pub struct Cancelled;

/// Jeton d'annulation coopérative, partagé entre threads
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// `Err(Cancelled)` si l'annulation a été demandée
    pub fn check(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }
}

fn hex_value(ch: char, position: usize) -> Result<u8, HexError> {
    ch.to_digit(16)
        .map(|digit| digit as u8)
        .ok_or(HexError::InvalidChar { ch, position })
}

/// Décode une chaîne hexadécimale, deux caractères par octet
///
/// Une longueur impaire est complétée par un `0` en tête. La casse est ignorée.
pub fn parse_hex_bytes(text: &str) -> Result<Vec<u8>, HexError> {
    let mut chars: Vec<char> = text.chars().collect();
    let padded = chars.len() % 2 == 1;
    if padded {
        chars.insert(0, '0');
    }

    chars
        .chunks(2)
        .enumerate()
        .map(|(i, pair)| {
            // Positions dans la chaîne d'origine, sans le zéro ajouté
            let offset = i * 2;
            let high = hex_value(pair[0], offset.saturating_sub(usize::from(padded)))?;
            let low = hex_value(pair[1], offset + 1 - usize::from(padded))?;
            Ok((high << 4) | low)
        })
        .collect()
}

/// Décode une empreinte de taille fixe (16 octets pour MD5, 20 pour SHA-1)
pub fn parse_hex_digest<const N: usize>(text: &str) -> Result<[u8; N], HexError> {
    let bytes = parse_hex_bytes(text)?;
    bytes.as_slice().try_into().map_err(|_| HexError::WrongLength {
        expected: N,
        found: bytes.len(),
    })
}

/// CRC32 hexadécimal sans préfixe `0x`
pub fn parse_crc32(text: &str) -> Result<u32, HexError> {
    let bytes = parse_hex_bytes(text)?;
    if bytes.is_empty() || bytes.len() > 4 {
        return Err(HexError::WrongLength {
            expected: 4,
            found: bytes.len(),
        });
    }
    Ok(bytes.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b)))
}

/// Représentation hexadécimale minuscule
pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn serialize_hex<S: Serializer, const N: usize>(
    digest: &Option<[u8; N]>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match digest {
        Some(bytes) => serializer.serialize_some(&to_hex(bytes)),
        None => serializer.serialize_none(),
    }
}

fn serialize_crc32<S: Serializer>(crc: &Option<u32>, serializer: S) -> Result<S::Ok, S::Error> {
    match crc {
        Some(crc) => serializer.serialize_some(&format!("{:08x}", crc)),
        None => serializer.serialize_none(),
    }
}

/// Empreintes d'un fichier
///
/// Chaque empreinte peut être absente: une requête partielle ne compare que
/// ce qu'elle fournit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileDigests {
    #[serde(serialize_with = "serialize_crc32")]
    pub crc32: Option<u32>,

    #[serde(serialize_with = "serialize_hex")]
    pub md5: Option<[u8; 16]>,

    #[serde(serialize_with = "serialize_hex")]
    pub sha1: Option<[u8; 20]>,

    /// Informatif, jamais utilisé pour la correspondance
    #[serde(serialize_with = "serialize_hex")]
    pub sha256: Option<[u8; 32]>,
}

impl FileDigests {
    /// Calcule toutes les empreintes en une passe, après `skip` octets d'en-tête
    pub fn compute<R: Read>(mut reader: R, skip: u64) -> io::Result<Self> {
        let skipped = io::copy(&mut reader.by_ref().take(skip), &mut io::sink())?;
        if skipped < skip {
            log::debug!("Fichier plus court que l'en-tête ignoré ({} < {})", skipped, skip);
        }

        let mut crc = Hasher::new();
        let mut md5 = md5::Context::new();
        let mut sha1 = Sha1::new();
        let mut sha256 = Sha256::new();

        let mut buffer = vec![0u8; BUFFER_SIZE];
        loop {
            let count = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(count) => count,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            let chunk = &buffer[..count];
            crc.update(chunk);
            md5.consume(chunk);
            sha1.update(chunk);
            sha256.update(chunk);
        }

        let mut sha1_bytes = [0u8; 20];
        sha1_bytes.copy_from_slice(&sha1.finalize());
        let mut sha256_bytes = [0u8; 32];
        sha256_bytes.copy_from_slice(&sha256.finalize());

        Ok(Self {
            crc32: Some(crc.finalize()),
            md5: Some(md5.finalize().0),
            sha1: Some(sha1_bytes),
            sha256: Some(sha256_bytes),
        })
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        // La lecture d'un slice ne peut pas échouer
        Self::compute(data, 0).unwrap_or_default()
    }

    pub fn with_crc32(mut self, crc32: u32) -> Self {
        self.crc32 = Some(crc32);
        self
    }

    pub fn with_md5(mut self, md5: [u8; 16]) -> Self {
        self.md5 = Some(md5);
        self
    }

    pub fn with_sha1(mut self, sha1: [u8; 20]) -> Self {
        self.sha1 = Some(sha1);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.crc32.is_none() && self.md5.is_none() && self.sha1.is_none()
    }
}

/// Égalité d'empreintes optionnelles
///
/// Deux absences sont égales; une absence n'égale jamais une valeur.
pub fn digests_equal(a: Option<&[u8]>, b: Option<&[u8]>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Correspondance d'une ROM: l'empreinte la plus forte présente des deux
/// côtés décide (SHA-1, puis MD5, puis CRC32)
pub fn rom_matches(rom: &Rom, digests: &FileDigests) -> bool {
    if let (Some(expected), Some(actual)) = (&rom.sha1, &digests.sha1) {
        return digests_equal(Some(expected), Some(actual));
    }
    if let (Some(expected), Some(actual)) = (&rom.md5, &digests.md5) {
        return digests_equal(Some(expected), Some(actual));
    }
    if let (Some(expected), Some(actual)) = (rom.crc32, digests.crc32) {
        return expected == actual;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rom(crc32: Option<u32>, md5: Option<[u8; 16]>, sha1: Option<[u8; 20]>) -> Rom {
        Rom {
            name: "test.bin".to_string(),
            size: 4,
            crc32,
            md5,
            sha1,
            status: "good".to_string(),
        }
    }

    #[test]
    fn test_hex_parsing() {
        assert_eq!(parse_hex_bytes("00ff10").unwrap(), vec![0x00, 0xff, 0x10]);
        assert_eq!(parse_hex_bytes("ABcd").unwrap(), vec![0xab, 0xcd]);
        assert_eq!(parse_hex_bytes("abc").unwrap(), vec![0x0a, 0xbc]);
        assert_eq!(parse_hex_bytes("").unwrap(), Vec::<u8>::new());
        assert_eq!(
            parse_hex_bytes("12g4"),
            Err(HexError::InvalidChar { ch: 'g', position: 2 })
        );
    }

    #[test]
    fn test_hex_digest_length() {
        let md5: [u8; 16] = parse_hex_digest("d41d8cd98f00b204e9800998ecf8427e").unwrap();
        assert_eq!(md5[0], 0xd4);
        assert_eq!(md5[15], 0x7e);

        assert_eq!(
            parse_hex_digest::<20>("d41d8cd98f00b204e9800998ecf8427e"),
            Err(HexError::WrongLength {
                expected: 20,
                found: 16
            })
        );
    }

    #[test]
    fn test_hex_round_trip() {
        let bytes = [0x00u8, 0x01, 0x7f, 0x80, 0xfe, 0xff];
        assert_eq!(parse_hex_bytes(&to_hex(&bytes)).unwrap(), bytes.to_vec());
    }

    #[test]
    fn test_odd_length_padding_round_trip() {
        assert_eq!(to_hex(&parse_hex_bytes("abc").unwrap()), "0abc");
        assert_eq!(to_hex(&parse_hex_bytes("F").unwrap()), "0f");

        // MD5 dont le zéro de tête a été perdu
        let md5: [u8; 16] = parse_hex_digest("41d8cd98f00b204e9800998ecf8427e").unwrap();
        assert_eq!(md5[0], 0x04);
        assert_eq!(to_hex(&md5), "041d8cd98f00b204e9800998ecf8427e");

        // Les positions d'erreur ignorent le zéro ajouté
        assert_eq!(
            parse_hex_bytes("abg"),
            Err(HexError::InvalidChar { ch: 'g', position: 2 })
        );
    }

    #[test]
    fn test_crc32_parsing() {
        assert_eq!(parse_crc32("cbf43926").unwrap(), 0xCBF4_3926);
        assert_eq!(parse_crc32("1A2B").unwrap(), 0x1A2B);
        assert!(parse_crc32("").is_err());
        assert!(parse_crc32("123456789").is_err());
        assert!(parse_crc32("zz").is_err());
    }

    #[test]
    fn test_known_digests() {
        let digests = FileDigests::from_bytes(b"123456789");
        assert_eq!(digests.crc32, Some(0xCBF4_3926));
        assert_eq!(to_hex(&digests.md5.unwrap()), "25f9e794323b453885f5181f1b624d0b");
        assert_eq!(
            to_hex(&digests.sha1.unwrap()),
            "f7c3bc1d808e04732adf679965ccc34ca7ae3441"
        );
    }

    #[test]
    fn test_header_skip() {
        let mut data = vec![0xEEu8; 512];
        data.extend_from_slice(b"123456789");
        let digests = FileDigests::compute(data.as_slice(), 512).unwrap();
        assert_eq!(digests.crc32, Some(0xCBF4_3926));

        let digests = FileDigests::compute(&b"abc"[..], 512).unwrap();
        assert_eq!(digests, FileDigests::from_bytes(b""));
    }

    #[test]
    fn test_digests_equal() {
        let a = [1u8, 2, 3];
        let b = [1u8, 2, 3];
        let c = [1u8, 2];
        assert!(digests_equal(None, None));
        assert!(digests_equal(Some(&a), Some(&b)));
        assert!(!digests_equal(Some(&a), None));
        assert!(!digests_equal(None, Some(&a)));
        assert!(!digests_equal(Some(&a), Some(&c)));
        assert_eq!(
            digests_equal(Some(&a), Some(&c)),
            digests_equal(Some(&c), Some(&a))
        );
    }

    #[test]
    fn test_sha1_mismatch_blocks_crc_match() {
        let rom = rom(Some(0x1234), None, Some([1; 20]));
        let digests = FileDigests::default().with_crc32(0x1234).with_sha1([2; 20]);
        assert!(!rom_matches(&rom, &digests));
    }

    #[test]
    fn test_crc_only_query() {
        let rom = rom(Some(0x1234), Some([3; 16]), Some([1; 20]));
        assert!(rom_matches(&rom, &FileDigests::default().with_crc32(0x1234)));
        assert!(!rom_matches(&rom, &FileDigests::default().with_crc32(0x4321)));
    }

    #[test]
    fn test_md5_precedes_crc() {
        let rom = rom(Some(0x1234), Some([3; 16]), None);
        let wrong_md5 = FileDigests::default().with_crc32(0x1234).with_md5([4; 16]);
        assert!(!rom_matches(&rom, &wrong_md5));

        let right_md5 = FileDigests::default().with_crc32(0x9999).with_md5([3; 16]);
        assert!(rom_matches(&rom, &right_md5));
    }

    #[test]
    fn test_no_shared_digest() {
        let rom = rom(None, None, Some([1; 20]));
        assert!(!rom_matches(&rom, &FileDigests::default().with_crc32(0x1234)));
        assert!(!rom_matches(&rom, &FileDigests::default()));
    }

    #[test]
    fn test_cancel_token() {
        let token = CancelToken::new();
        let shared = token.clone();
        assert!(token.check().is_ok());
        shared.cancel();
        assert!(token.is_cancelled());
        assert_eq!(token.check(), Err(Cancelled));
    }
}
