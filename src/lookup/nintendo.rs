//! Codes partagés par les plateformes Nintendo (GBA, Pokémon Mini)

use super::LookupTable;

/// Dernier caractère du code produit
pub static COUNTRIES: LookupTable<char> = LookupTable::new(&[
    ('A', "Worldwide"),
    ('B', "Brazil"),
    ('C', "China"),
    ('D', "Germany"),
    ('E', "USA"),
    ('F', "France"),
    ('G', "Greece"),
    ('H', "Netherlands"),
    ('I', "Italy"),
    ('J', "Japan"),
    ('K', "Korea"),
    ('L', "Canada"),
    ('M', "Sweden"),
    ('N', "Norway"),
    ('O', "International"),
    ('P', "Europe"),
    ('Q', "Denmark"),
    ('R', "Russia"),
    ('S', "Spain"),
    ('T', "USA + Australia"),
    ('U', "Australia"),
    ('V', "Europe + Australia"),
    ('W', "Taiwan"),
    ('X', "Europe (X)"),
    ('Y', "Europe (Y)"),
    ('Z', "Europe (Z)"),
]);

/// Codes éditeur à deux caractères
///
/// Un nom préfixé par `/` n'a été vu que dans un seul jeu; `???` marque une
/// attribution douteuse et `(dupe)` un second code du même éditeur.
pub static LICENSEE_CODES: LookupTable<&'static str> = LookupTable::new(&[
    ("00", "Nobody"),
    ("  ", "Nobody"),
    ("\0\0", "Nobody"),
    ("##", "Nobody"),
    ("??", "Nobody"),
    ("01", "Nintendo"),
    ("08", "Capcom"),
    ("0A", "Jaleco"),
    ("0B", "Coconuts Japan"),
    ("13", "Electronic Arts Victor"),
    ("18", "Hudson Soft"),
    ("1F", "Virgin Japan"),
    ("1M", "Micro Cabin"),
    ("1Q", "TDK Core"),
    ("20", "Destination Software"),
    ("29", "Seta"),
    ("2L", "Tamsoft"),
    ("2N", "Smilesoft"),
    ("2P", "The Pokémon Company"),
    ("30", "Viacom"),
    ("36", "Codemasters"),
    ("39", "Event Evolution Entertainment"),
    ("41", "Ubisoft"),
    ("46", "System 3"),
    ("49", "Irem"),
    ("4B", "Raya Systems"),
    ("4S", "Black Pearl Software"),
    ("4Y", "Rare"),
    ("4Z", "Crave Entertainment"),
    ("50", "Absolute Entertainment"),
    ("51", "Acclaim"),
    ("52", "Activision"),
    ("55", "Hi-Tech Expressions"),
    ("56", "LJN"),
    ("58", "Mattel"),
    ("5A", "Mindscape"),
    ("5F", "American Softworks"),
    ("5G", "Majesco"),
    ("5H", "The 3DO Company"),
    ("5K", "Hasbro"),
    ("5L", "NewKidCo"),
    ("5T", "Cryo Interactive"),
    ("5X", "Microids"),
    ("60", "Titus"),
    ("61", "Virgin"),
    ("62", "Maxis"),
    ("64", "LucasArts"),
    ("67", "Ocean"),
    ("69", "Electronic Arts"),
    ("6B", "Laser Beam Entertainment"),
    ("6F", "Electro Brain"),
    ("6H", "BBC Multimedia"),
    ("6J", "Software 2000"),
    ("6L", "BAM! Entertainment"),
    ("6M", "System 3"),
    ("6S", "TDK Mediactive"),
    ("6V", "JoWooD Entertainment"),
    ("71", "Interplay"),
    ("72", "JVC"),
    ("75", "The Sales Curve"),
    ("78", "THQ"),
    ("79", "Accolade"),
    ("7C", "Microprose"),
    ("7F", "Kemco"),
    ("7G", "Rage Software"),
    ("7J", "Zoo Digital Publishing"),
    ("7L", "Simon & Schuster"),
    ("82", "Namcot"),
    ("8B", "Bullet-Proof Software"),
    ("8E", "Character Soft"),
    ("8F", "I'Max"),
    ("8P", "Sega"),
    ("91", "Chunsoft"),
    ("93", "Bec"),
    ("95", "Varie"),
    ("97", "Kaneko"),
    ("9A", "Nichibutsu"),
    ("9B", "Tecmo"),
    ("9C", "Imagineer"),
    ("9H", "Bottom Up"),
    ("9M", "Jaguar"),
    ("9N", "Marvelous Entertainment"),
    ("9Z", "Crunchyroll"),
    ("A0", "Telenet"),
    ("A4", "Konami"),
    ("A5", "K Amusement Leasing"),
    ("A7", "Takara"),
    ("A8", "Royal Industries"),
    ("AD", "Toho"),
    ("AH", "J-Wing"),
    ("AL", "Media Factory"),
    ("B0", "Acclaim Japan"),
    ("B1", "ASCII"),
    ("B2", "Bandai"),
    ("B3", "Soft Pro"),
    ("B4", "Enix"),
    ("B6", "HAL"),
    ("BA", "Culture Brain"),
    ("BB", "Sunsoft"),
    ("BC", "Toshiba EMI"),
    ("BD", "Sony Imagesoft"),
    ("BJ", "Compile"),
    ("BL", "MTO"),
    ("C0", "Taito"),
    ("C1", "Sunsoft (Chinou Game Series)"),
    ("C3", "Squaresoft"),
    ("C4", "Tokuma Shoten"),
    ("C5", "Data East"),
    ("C6", "Tonkin House"),
    ("C8", "Koei"),
    ("CB", "Vap"),
    ("CF", "Angel"),
    ("CP", "Enterbrain"),
    ("D1", "Sofel"),
    ("D9", "Banpresto"),
    ("DA", "Tomy"),
    ("DD", "Masaya"),
    ("DE", "Human"),
    ("DF", "Altron"),
    ("E2", "Yuutaka"),
    ("E4", "T&E Soft"),
    ("E5", "Epoch"),
    ("E7", "Athena"),
    ("E9", "Natsume"),
    ("EB", "Atlus"),
    ("FJ", "Virtual Toys"),
    ("FK", "The Game Factory"),
    ("FQ", "iQue"),
    ("FR", "Digital Tainment Pool"),
    ("FT", "Daiwon C & A"),
    ("GD", "Square Enix"),
    ("GL", "Gameloft"),
    ("GX", "Commodore Gaming"),
    ("HF", "Level5"),
    ("J8", "D4 Enterprise"),
    ("JS", "Digital Leisure"),
    ("KR", "Krea Medie"),
    ("KM", "Deep Silver"),
    ("RW", "RealNetworks"),
    ("WB", "Google"),
    ("WD", "Amazon"),
    ("WR", "Warner Bros"),
    ("WY", "WayForward"),
    ("XB", "Hulu"),
    ("XN", "Netflix"),
    ("4F", "U.S. Gold/Eidos"),
    ("4Q", "Disney/Buena Vista Interactive"),
    ("54", "GameTek/Take-Two Interactive"),
    ("5D", "Midway/Tradewest/Williams"),
    ("70", "Infogrames/Atari, SA"),
    ("7D", "Vivendi/Sierra"),
    ("99", "Pack-in Video/Victor Interactive/Marvelous Interactive"),
    ("AF", "[Bandai] Namco"),
    ("CE", "Pony Canyon/FCI"),
    ("5Z", "???Classified Games"),
    ("AC", "???Toei Animation"),
    ("CA", "???Konami (Ultra Games)"),
    ("09", "/Hot-B"),
    ("19", "/Bandai (B-AI)"),
    ("1P", "/Creatures"),
    ("35", "/Hector"),
    ("47", "/Spectrum Holobyte"),
    ("4A", "/Gakken"),
    ("4G", "/Playmates"),
    ("4J", "/Fox Interactive"),
    ("4X", "/GT Interactive"),
    ("53", "/American Sammy"),
    ("5M", "/Telegames"),
    ("5Q", "/Lego"),
    ("6E", "/Elite Systems"),
    ("6P", "/Ravensburger Interactive"),
    ("6R", "/Sound Source"),
    ("6X", "/Wanadoo"),
    ("8C", "/Vic Tokai"),
    ("8H", "/TNN"),
    ("8M", "/CyberFront"),
    ("8N", "/Success"),
    ("A6", "/Kawada"),
    ("A9", "/Technos Japan"),
    ("BF", "/Sammy"),
    ("C7", "/East Cube"),
    ("CU", "/Marvelous AQL"),
    ("D4", "/Ask Kodansha"),
    ("D6", "/Naxat"),
    ("DB", "/Hiro"),
    ("E1", "/Towa Chiki"),
    ("E8", "/Asmik"),
    ("EA", "/King Records"),
    ("EC", "/Epic / Sony Records"),
    ("EE", "/Information Global Services"),
    ("F3", "/Extreme Entertainment"),
    ("FE", "/Davidson & Associates"),
    ("GN", "/OG International"),
    ("GT", "/505 Games"),
    ("GY", "/The American Game Factory"),
    ("H4", "/SNK Playmore"),
    ("HL", "/Frontier Developments"),
    ("HN", "/High Voltage"),
    ("J9", "/AQ Interactive"),
    ("JT", "/Empty Clip Studios"),
    ("JY", "/Steel Penny"),
    ("NR", "/Destineer"),
    ("NJ", "/Enjoy Gaming"),
    ("PQ", "/PopCap Games"),
    ("PV", "/Pan Vision Games"),
    ("QQ", "/Gamelion Studios"),
    ("RB", "/Detune"),
    ("RG", "/Romino Games"),
    ("S3", "/Genius Sonority"),
    ("SZ", "/Storm City Entertainment"),
    ("TH", "/Kolkom"),
    ("TL", "/Telltale Games"),
    ("Q7", "/Nexon"),
    ("QH", "/Virtual Play Games"),
    ("QU", "/QubicGames"),
    ("UZ", "/Circle Entertainment"),
    ("VT", "/Microforum"),
    ("X0", "/SDP Games"),
    ("XG", "/XGen Studios"),
    ("XJ", "/XSeed Games"),
    ("XS", "/Aksys Games"),
    ("Y4", "/Zen Studios"),
    ("YV", "/KnapNok Games"),
    ("C2", "(dupe) Kemco (C2)"),
    ("28", "(dupe) Kemco (28)"),
    ("86", "(dupe) Tokuma Shoten (86)"),
    ("42", "(dupe) Sunsoft (42)"),
]);

/// Premier caractère du code produit GBA
pub static GBA_GAME_TYPES: LookupTable<char> = LookupTable::new(&[
    ('A', "Normal game (older)"),
    ('B', "Normal game (newer)"),
    ('C', "Normal game (unused)"),
    ('F', "Famicom/Classic NES series"),
    ('K', "Acceleration sensor"),
    ('P', "e-Reader"),
    ('R', "Gyro sensor"),
    ('U', "Solar sensor"),
    ('V', "Rumble"),
    ('M', "GBA Video"),
    ('T', "Test cart"),
    ('Z', "DS expansion"),
]);

pub static GBA_MULTIBOOT_MODES: LookupTable<u8> = LookupTable::new(&[
    (0, "Not multiboot"),
    (1, "Joybus"),
    (2, "Normal"),
    (3, "Multiplay"),
]);

/// Premier caractère du code produit Pokémon Mini
pub static POKEMON_MINI_GAME_TYPES: LookupTable<char> =
    LookupTable::new(&[('M', "Game"), ('K', "Prototype")]);
