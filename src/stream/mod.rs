//! Flux d'octets positionnable utilisé par tous les décodeurs d'en-têtes
//!
//! `RomStream` enveloppe n'importe quelle source `Read + Seek` et suit sa position
//! absolue. Les lectures au-delà de la fin renvoient `StreamError::EndOfStream`
//! au lieu de boucler ou de rendre des données arbitraires.

pub mod text;

use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::ops::{Deref, DerefMut};

use thiserror::Error;

pub use text::{ascii_char, TextEncoding, NUL, NUL_AND_SPACE, SPACE};

/// Erreurs de lecture du flux
#[derive(Debug, Error)]
pub enum StreamError {
    /// Fin de flux atteinte pendant une lecture de taille fixe
    #[error("fin de flux: {wanted} octets demandés, {available} disponibles")]
    EndOfStream { wanted: usize, available: usize },

    /// Erreur d'entrée/sortie sous-jacente
    #[error("erreur d'E/S: {0}")]
    Io(#[from] io::Error),
}

impl StreamError {
    /// Vrai si l'erreur signale seulement la fin des données
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, StreamError::EndOfStream { .. })
    }
}

pub type StreamResult<T> = Result<T, StreamError>;

/// Source lisible et positionnable, utilisable derrière un `Box<dyn _>`
pub trait ReadSeek: Read + Seek + Send {}

impl<T: Read + Seek + Send> ReadSeek for T {}

/// Flux d'octets avec position absolue et longueur connue
#[derive(Debug)]
pub struct RomStream<R> {
    inner: R,
    position: u64,
    length: u64,
}

impl RomStream<Cursor<Vec<u8>>> {
    /// Crée un flux en mémoire
    pub fn from_bytes(data: Vec<u8>) -> Self {
        let length = data.len() as u64;
        Self {
            inner: Cursor::new(data),
            position: 0,
            length,
        }
    }
}

impl<R: Read + Seek> RomStream<R> {
    /// Enveloppe une source et se place au début
    pub fn new(mut inner: R) -> io::Result<Self> {
        let length = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;
        Ok(Self {
            inner,
            position: 0,
            length,
        })
    }

    /// Position absolue courante
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Déplace la position absolue
    pub fn set_position(&mut self, position: u64) -> StreamResult<()> {
        self.position = self.inner.seek(SeekFrom::Start(position))?;
        Ok(())
    }

    /// Déplace la position relativement à la position courante
    pub fn seek_relative(&mut self, delta: i64) -> StreamResult<()> {
        let target = self.position.saturating_add_signed(delta);
        self.set_position(target)
    }

    /// Longueur totale du flux
    pub fn len(&self) -> u64 {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Sauvegarde la position; elle est restaurée quand le garde est détruit
    pub fn guard(&mut self) -> PositionGuard<'_, R> {
        let saved = self.position;
        PositionGuard {
            stream: self,
            saved,
        }
    }

    /// Lit au plus `count` octets; moins en fin de flux
    pub fn read_up_to(&mut self, count: usize) -> StreamResult<Vec<u8>> {
        let mut buffer = Vec::with_capacity(count);
        let read = (&mut self.inner)
            .take(count as u64)
            .read_to_end(&mut buffer)?;
        self.position += read as u64;
        Ok(buffer)
    }

    /// Lit exactement `count` octets
    pub fn read_bytes(&mut self, count: usize) -> StreamResult<Vec<u8>> {
        let buffer = self.read_up_to(count)?;
        if buffer.len() < count {
            return Err(StreamError::EndOfStream {
                wanted: count,
                available: buffer.len(),
            });
        }
        Ok(buffer)
    }

    /// Lit un tableau de taille fixe
    pub fn read_array<const N: usize>(&mut self) -> StreamResult<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&bytes);
        Ok(out)
    }

    /// Lit tout ce qui reste jusqu'à la fin du flux
    pub fn read_remaining(&mut self) -> StreamResult<Vec<u8>> {
        let mut buffer = Vec::new();
        let read = self.inner.read_to_end(&mut buffer)?;
        self.position += read as u64;
        Ok(buffer)
    }

    /// Lit un octet, ou `None` en fin de flux
    pub fn try_read_u8(&mut self) -> StreamResult<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    self.position += 1;
                    return Ok(Some(byte[0]));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    pub fn read_u8(&mut self) -> StreamResult<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16_le(&mut self) -> StreamResult<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u16_be(&mut self) -> StreamResult<u16> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    pub fn read_u32_le(&mut self) -> StreamResult<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32_be(&mut self) -> StreamResult<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    /// Lit un texte de taille fixe dans l'encodage donné, sans rognage
    pub fn read_text(&mut self, count: usize, encoding: TextEncoding) -> StreamResult<String> {
        let bytes = self.read_bytes(count)?;
        Ok(encoding.decode(&bytes))
    }

    /// Lit un texte de taille fixe et retire les caractères de fin indiqués
    pub fn read_text_trimmed(
        &mut self,
        count: usize,
        encoding: TextEncoding,
        trim: &[char],
    ) -> StreamResult<String> {
        let text = self.read_text(count, encoding)?;
        Ok(text.trim_end_matches(|c| trim.contains(&c)).to_string())
    }

    /// Vérifie une signature ASCII à une position donnée
    ///
    /// Une fin de flux compte comme une signature absente. La position est
    /// restaurée dans tous les cas.
    pub fn magic_at(&mut self, offset: u64, magic: &str) -> StreamResult<bool> {
        let mut guard = self.guard();
        guard.set_position(offset)?;
        match guard.read_bytes(magic.len()) {
            Ok(bytes) => Ok(bytes == magic.as_bytes()),
            Err(e) if e.is_end_of_stream() => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Lecture séquentielle brute, utilisée pour le hachage
impl<R: Read + Seek> Read for RomStream<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let read = self.inner.read(buf)?;
        self.position += read as u64;
        Ok(read)
    }
}

/// Acquisition de position à portée limitée
///
/// Donne accès au flux et remet la position sauvegardée en place à la
/// destruction, y compris lors d'un retour anticipé par `?`.
pub struct PositionGuard<'a, R: Read + Seek> {
    stream: &'a mut RomStream<R>,
    saved: u64,
}

impl<'a, R: Read + Seek> PositionGuard<'a, R> {
    /// Position qui sera restaurée
    pub fn saved_position(&self) -> u64 {
        self.saved
    }
}

impl<'a, R: Read + Seek> Deref for PositionGuard<'a, R> {
    type Target = RomStream<R>;

    fn deref(&self) -> &Self::Target {
        self.stream
    }
}

impl<'a, R: Read + Seek> DerefMut for PositionGuard<'a, R> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.stream
    }
}

impl<'a, R: Read + Seek> Drop for PositionGuard<'a, R> {
    fn drop(&mut self) {
        if let Err(e) = self.stream.set_position(self.saved) {
            log::warn!("Impossible de restaurer la position {:#x}: {}", self.saved, e);
        }
    }
}

/// Recherche une séquence d'octets dans un buffer
pub fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    if needle.is_empty() {
        return true;
    }
    if needle.len() > haystack.len() {
        return false;
    }
    haystack.windows(needle.len()).any(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_reads() {
        let mut stream = RomStream::from_bytes(vec![0x12, 0x34, 0x56, 0x78, 0x9A]);

        assert_eq!(stream.read_u16_le().unwrap(), 0x3412);
        stream.set_position(0).unwrap();
        assert_eq!(stream.read_u16_be().unwrap(), 0x1234);
        stream.set_position(0).unwrap();
        assert_eq!(stream.read_u32_le().unwrap(), 0x78563412);
        assert_eq!(stream.position(), 4);
        assert_eq!(stream.read_u8().unwrap(), 0x9A);
    }

    #[test]
    fn test_read_past_end() {
        let mut stream = RomStream::from_bytes(vec![1, 2, 3]);
        stream.set_position(1).unwrap();

        let err = stream.read_bytes(4).unwrap_err();
        assert!(err.is_end_of_stream());
        // La position avance de ce qui a été consommé
        assert_eq!(stream.position(), 3);
        assert_eq!(stream.try_read_u8().unwrap(), None);
    }

    #[test]
    fn test_guard_restores_position() {
        let mut stream = RomStream::from_bytes(vec![0; 16]);
        stream.set_position(5).unwrap();

        {
            let mut guard = stream.guard();
            guard.set_position(12).unwrap();
            assert!(guard.read_bytes(8).is_err());
        }
        assert_eq!(stream.position(), 5);
    }

    #[test]
    fn test_guard_restores_on_early_return() {
        fn failing_read(stream: &mut RomStream<Cursor<Vec<u8>>>) -> StreamResult<u32> {
            let mut guard = stream.guard();
            guard.set_position(2)?;
            guard.read_u32_be()
        }

        let mut stream = RomStream::from_bytes(vec![0; 4]);
        stream.set_position(1).unwrap();
        assert!(failing_read(&mut stream).is_err());
        assert_eq!(stream.position(), 1);
    }

    #[test]
    fn test_magic_at() {
        let mut data = vec![0u8; 32];
        data[16..24].copy_from_slice(b"TMR SEGA");
        let mut stream = RomStream::from_bytes(data);

        assert!(stream.magic_at(16, "TMR SEGA").unwrap());
        assert!(!stream.magic_at(0, "TMR SEGA").unwrap());
        // Fin de flux: signature absente, pas d'erreur
        assert!(!stream.magic_at(30, "TMR SEGA").unwrap());
        assert_eq!(stream.position(), 0);
    }

    #[test]
    fn test_trimmed_text() {
        let mut stream = RomStream::from_bytes(b"SONIC   \0\0".to_vec());
        let text = stream.read_text_trimmed(10, TextEncoding::Ascii, NUL_AND_SPACE).unwrap();
        assert_eq!(text, "SONIC");
    }

    #[test]
    fn test_contains() {
        assert!(contains(b"xxSRAM_Vyy", b"SRAM_V"));
        assert!(!contains(b"SRAM", b"SRAM_V"));
        assert!(contains(b"abc", b""));
    }
}
