use criterion::{black_box, criterion_group, criterion_main, Criterion};
use romscope::rom::validation::to_hex;
use romscope::{Datfile, FileDigests};

/// Datfile synthétique: un jeu par ROM, empreintes distinctes
fn synthetic_datfile(games: usize) -> String {
    let mut xml = String::from("<?xml version=\"1.0\"?>\n<datafile>\n<header><name>Bench</name></header>\n");
    for i in 0..games {
        let payload = format!("rom payload {}", i);
        let digests = FileDigests::from_bytes(payload.as_bytes());
        xml.push_str(&format!(
            "<game name=\"Game {i}\"><description>Game {i}</description><rom name=\"game{i}.bin\" size=\"{}\" crc=\"{:08x}\" md5=\"{}\" sha1=\"{}\"/></game>\n",
            payload.len(),
            digests.crc32.unwrap_or_default(),
            digests.md5.map(|d| to_hex(&d)).unwrap_or_default(),
            digests.sha1.map(|d| to_hex(&d)).unwrap_or_default(),
        ));
    }
    xml.push_str("</datafile>\n");
    xml
}

fn benchmark_datfile_parsing(c: &mut Criterion) {
    let xml = synthetic_datfile(5000);

    c.bench_function("datfile_parse_5000_games", |b| {
        b.iter(|| Datfile::from_str(black_box(&xml)).unwrap())
    });
}

fn benchmark_identify(c: &mut Criterion) {
    let datfile = Datfile::from_str(&synthetic_datfile(5000)).unwrap();
    let hit = FileDigests::from_bytes(b"rom payload 4999");
    let miss = FileDigests::from_bytes(b"not in the datfile");
    let crc_only = FileDigests::default().with_crc32(hit.crc32.unwrap_or_default());

    c.bench_function("identify_hit_sha1", |b| {
        b.iter(|| datfile.identify(black_box(&hit)))
    });

    c.bench_function("identify_miss", |b| {
        b.iter(|| datfile.identify(black_box(&miss)))
    });

    c.bench_function("identify_crc_only", |b| {
        b.iter(|| datfile.identify(black_box(&crc_only)))
    });
}

criterion_group!(benches, benchmark_datfile_parsing, benchmark_identify);
criterion_main!(benches);
