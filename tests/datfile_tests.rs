//! Tests d'intégration des datfiles: chargement et recherche par empreinte

use romscope::rom::validation::to_hex;
use romscope::rom::{identify, load_datfile, rom_matches, DatfileError};
use romscope::*;
use std::fs;
use tempfile::TempDir;

const PAYLOAD: &[u8] = b"123456789";
const PAYLOAD_CRC: &str = "cbf43926";
const PAYLOAD_MD5: &str = "25f9e794323b453885f5181f1b624d0b";
const PAYLOAD_SHA1: &str = "f7c3bc1d808e04732adf679965ccc34ca7ae3441";

fn datfile_xml(name: &str, roms: &str) -> String {
    format!(
        r#"<?xml version="1.0"?>
<datafile>
    <header>
        <name>{name}</name>
        <description>{name} (test)</description>
    </header>
    <game name="{name} game">
        <description>{name} game</description>
        {roms}
    </game>
</datafile>
"#
    )
}

#[test]
fn test_three_datfiles_two_matching() {
    let matching = format!(r#"<rom name="a.bin" size="9" crc="{}"/>"#, PAYLOAD_CRC);
    let other = r#"<rom name="b.bin" size="9" crc="deadbeef"/>"#;

    let datfiles = vec![
        Datfile::from_str(&datfile_xml("First", &matching)).unwrap(),
        Datfile::from_str(&datfile_xml("Second", other)).unwrap(),
        Datfile::from_str(&datfile_xml("Third", &matching)).unwrap(),
    ];

    let digests = FileDigests::from_bytes(PAYLOAD);
    let results = identify(&datfiles, &digests);

    assert_eq!(results.len(), 2);
    assert!(std::ptr::eq(results[0].datfile, &datfiles[0]));
    assert!(std::ptr::eq(results[1].datfile, &datfiles[2]));
    assert_eq!(results[0].game.name, "First game");
    assert_eq!(results[1].rom.name, "a.bin");
}

#[test]
fn test_precedence_matrix() {
    let crc = PAYLOAD_CRC;
    let wrong_sha1 = "0000000000000000000000000000000000000000";
    let wrong_md5 = "00000000000000000000000000000000";
    let roms = format!(
        r#"<rom name="sha1-mismatch" size="9" crc="{crc}" sha1="{wrong_sha1}"/>
        <rom name="crc-only" size="9" crc="{crc}"/>
        <rom name="md5-mismatch" size="9" crc="{crc}" md5="{wrong_md5}"/>
        <rom name="md5-match" size="9" crc="ffffffff" md5="{PAYLOAD_MD5}"/>
        <rom name="sha1-match" size="9" crc="ffffffff" md5="{wrong_md5}" sha1="{PAYLOAD_SHA1}"/>"#
    );
    let datfile = Datfile::from_str(&datfile_xml("Matrix", &roms)).unwrap();
    let game = &datfile.games[0];
    assert_eq!(game.roms.len(), 5);

    let full = FileDigests::from_bytes(PAYLOAD);
    let matched: Vec<&str> = datfile
        .identify(&full)
        .iter()
        .map(|r| r.rom.name.as_str())
        .collect();
    assert_eq!(matched, vec!["crc-only", "md5-match", "sha1-match"]);

    // Requête CRC seule: plus rien ne bloque la comparaison CRC
    let crc_only = FileDigests::default().with_crc32(0xCBF4_3926);
    let matched: Vec<&str> = datfile
        .identify(&crc_only)
        .iter()
        .map(|r| r.rom.name.as_str())
        .collect();
    assert_eq!(matched, vec!["sha1-mismatch", "crc-only", "md5-mismatch"]);

    assert!(!rom_matches(&game.roms[0], &full));
    assert!(rom_matches(&game.roms[0], &crc_only));
}

#[test]
fn test_zero_size_and_malformed_roms() {
    let roms = r#"<rom name="empty" size="0" crc="00000000"/>
        <rom name="bad-md5" size="9" md5="xyz"/>
        <rom name="kept" size="9" crc="cbf43926"/>"#;
    let datfile = Datfile::from_str(&datfile_xml("Edge", roms)).unwrap();

    let names: Vec<&str> = datfile.games[0].roms.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["kept"]);
    assert_eq!(datfile.skipped_roms, 1);
    assert_eq!(datfile.description.as_deref(), Some("Edge (test)"));
}

#[test]
fn test_cancellable_matches_plain_identify() {
    let matching = format!(r#"<rom name="a.bin" size="9" crc="{}"/>"#, PAYLOAD_CRC);
    let collection = DatfileCollection::from(vec![
        Datfile::from_str(&datfile_xml("One", &matching)).unwrap(),
        Datfile::from_str(&datfile_xml("Two", &matching)).unwrap(),
    ]);
    let digests = FileDigests::from_bytes(PAYLOAD);

    let token = CancelToken::new();
    let plain = collection.identify(&digests);
    let cancellable = collection.identify_cancellable(&digests, &token).unwrap();
    assert_eq!(plain, cancellable);

    token.cancel();
    assert!(collection.identify_cancellable(&digests, &token).is_err());
}

#[test]
fn test_load_from_folder() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let matching = format!(r#"<rom name="a.bin" size="9" sha1="{}"/>"#, PAYLOAD_SHA1);

    fs::write(dir.path().join("b.dat"), datfile_xml("Bravo", &matching))?;
    fs::write(dir.path().join("a.XML"), datfile_xml("Alpha", &matching))?;
    fs::write(dir.path().join("broken.dat"), "<datafile><game>")?;
    fs::write(dir.path().join("notes.txt"), "not a datfile")?;
    fs::create_dir(dir.path().join("nested"))?;
    fs::write(dir.path().join("nested").join("c.dat"), datfile_xml("Charlie", ""))?;

    let collection = DatfileCollection::load_from_folder(dir.path())?;
    let names: Vec<&str> = collection.iter().map(|d| d.display_name()).collect();
    assert_eq!(names, vec!["Alpha", "Bravo", "Charlie"]);

    let results = collection.identify(&FileDigests::from_bytes(PAYLOAD));
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].datfile.display_name(), "Alpha");
    Ok(())
}

#[test]
fn test_load_from_missing_folder() {
    assert!(DatfileCollection::load_from_folder("/nonexistent/dats").is_err());
}

#[test]
fn test_load_datfile_from_disk() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("single.dat");
    let roms = format!(
        r#"<rom name="a.bin" size="9" crc="{}" md5="{}" sha1="{}"/>"#,
        PAYLOAD_CRC.to_uppercase(),
        PAYLOAD_MD5.to_uppercase(),
        PAYLOAD_SHA1
    );
    fs::write(&path, datfile_xml("Disk", &roms))?;

    let datfile = load_datfile(&path)?;
    let rom = &datfile.games[0].roms[0];
    assert_eq!(rom.crc32, Some(0xCBF4_3926));
    assert_eq!(rom.md5.map(|d| to_hex(&d)), Some(PAYLOAD_MD5.to_string()));
    assert_eq!(rom.status, "good");

    fs::write(&path, "<datafile><game name=\"x\"></datafile>")?;
    assert!(matches!(load_datfile(&path), Err(DatfileError::Xml { .. })));
    Ok(())
}
