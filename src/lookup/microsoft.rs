//! Codes éditeur des certificats XBE

use super::LookupTable;

pub static LICENSEE_CODES: LookupTable<&'static str> = LookupTable::new(&[
    ("AC", "Acclaim"),
    ("AV", "Activision"),
    ("BA", "Bandai"),
    ("CC", "Capcom"),
    ("CM", "Codemasters"),
    ("EA", "Electronic Arts"),
    ("ES", "Eidos"),
    ("HU", "Hudson Soft"),
    ("IG", "Infogrames"),
    ("IP", "Interplay"),
    ("KN", "Konami"),
    ("KO", "Koei"),
    ("LA", "LucasArts"),
    ("MJ", "Majesco"),
    ("MS", "Microsoft"),
    ("MW", "Midway"),
    ("NM", "Namco"),
    ("SE", "Sega"),
    ("SN", "SNK"),
    ("TC", "Tecmo"),
    ("TQ", "THQ"),
    ("TT", "Take-Two Interactive"),
    ("US", "Ubisoft"),
    ("VU", "Vivendi Universal"),
    ("WB", "Warner Bros"),
]);
