//! Codes Sega (Master System, Game Gear, Megadrive)

use super::LookupTable;

/// Éditeurs tiers au format `T-xx`, plus quelques codes à quatre lettres
pub static LICENSEES: LookupTable<&'static str> = LookupTable::new(&[
    ("SEGA", "Sega"),
    ("T-11", "Taito"),
    ("T-12", "Capcom"),
    ("T-13", "Data East"),
    ("T-14", "Namco"),
    ("T-15", "Sun Electronics"),
    ("T-22", "Micronet"),
    ("T-25", "Sage's Creation"),
    ("T-35", "Technosoft"),
    ("T-48", "Tengen"),
    ("T-50", "Electronic Arts"),
    ("T-70", "Virgin Games"),
    ("T-76", "Electronic Arts Victor"),
    ("T-81", "Acclaim"),
    ("T-83", "Sony Imagesoft"),
    ("T-95", "Konami"),
    ("ACLD", "Ballistic"),
    ("ASCI", "ASCII"),
    ("RSI", "Razorsoft"),
    ("TREC", "Treco"),
    ("VRGN", "Virgin Games"),
    ("WSTN", "Westone"),
]);

/// Région (quartet haut de l'octet région/taille)
pub static SMS_REGIONS: LookupTable<u8> = LookupTable::new(&[
    (3, "Japanese SMS"),
    (4, "Export SMS"),
    (5, "Japanese Game Gear"),
    (6, "Export Game Gear"),
    (7, "International Game Gear"),
]);

/// Taille de ROM (quartet bas de l'octet région/taille)
pub static SMS_ROM_SIZES: LookupTable<u8, u64> = LookupTable::new(&[
    (0xa, 8 * 1024),
    (0xb, 16 * 1024),
    (0xc, 32 * 1024),
    (0xd, 48 * 1024),
    (0xe, 64 * 1024),
    (0xf, 128 * 1024),
    (0x0, 256 * 1024),
    (0x1, 512 * 1024),
    (0x2, 1024 * 1024),
]);

pub static MEGADRIVE_PRODUCT_TYPES: LookupTable<&'static str> = LookupTable::new(&[
    ("AI", "Education"),
    ("BR", "Boot ROM"),
    ("GM", "Game"),
    ("OS", "Operating system"),
    ("PX", "Pictures"),
    ("SF", "Super Fighter Team game"),
    ("83", "Samsung Pico"),
    ("MP", "Brazilian Pico game"),
]);

/// Périphériques compatibles, un caractère par périphérique
pub static MEGADRIVE_IO_SUPPORT: LookupTable<char> = LookupTable::new(&[
    ('0', "Master System joypad"),
    ('4', "Team Play"),
    ('6', "6-button joypad"),
    ('A', "Analog joystick"),
    ('B', "Control ball"),
    ('C', "CD-ROM"),
    ('F', "Floppy drive"),
    ('G', "Menacer"),
    ('J', "Joypad"),
    ('K', "Keyboard"),
    ('L', "Activator"),
    ('M', "Mouse"),
    ('O', "J-Cart"),
    ('P', "Printer"),
    ('R', "Serial RS232C"),
    ('T', "Tablet"),
    ('V', "Paddle"),
]);

pub static MEGADRIVE_COUNTRIES: LookupTable<char> = LookupTable::new(&[
    ('J', "Japan"),
    ('U', "USA"),
    ('E', "Europe"),
    ('4', "Brazil + USA"),
    ('8', "Hong Kong"),
    ('A', "Europe (A)"),
    ('B', "Brazil (B)"),
    ('C', "USA + Europe"),
    ('F', "Worldwide / France"),
    ('G', "Germany"),
    ('I', "Italy"),
    ('S', "Spain"),
    ('e', "Europe (e)"),
    ('1', "Japan"),
    ('5', "Japan + USA"),
]);

/// Abréviations de mois vues dans la ligne de copyright
pub static MONTH_ABBREVIATIONS: LookupTable<&'static str, u32> = LookupTable::new(&[
    ("JAN", 1),
    ("FEB", 2),
    ("MAR", 3),
    ("APR", 4),
    ("APL", 4),
    ("MAY", 5),
    ("JUN", 6),
    ("JUL", 7),
    ("JUR", 7),
    ("JLY", 7),
    ("AUG", 8),
    ("08", 8),
    ("SEP", 9),
    ("SEPT", 9),
    ("OCT", 10),
    ("NOV", 11),
    ("DEC", 12),
]);
