use anyhow::{anyhow, Result};
use log::info;
use romscope::rom::validation::to_hex;
use romscope::{CancelToken, FileReport, IdentifyConfig, RomIdentifier};
use serde::Serialize;
use std::env;
use std::path::PathBuf;

const USAGE: &str = "Usage: romscope <fichier>... [--dat DOSSIER] [--config FICHIER] [--threads N] [--json] [--all]";

/// Options de la ligne de commande
#[derive(Debug, Default)]
struct Options {
    files: Vec<PathBuf>,
    dat_folder: Option<PathBuf>,
    config_path: Option<PathBuf>,
    threads: Option<usize>,
    json: bool,
    show_extra: bool,
}

fn parse_args(args: &[String]) -> Result<Options> {
    let mut options = Options::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        let mut value = |name: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| anyhow!("Valeur manquante pour {}", name))
        };
        match arg.as_str() {
            "--dat" => options.dat_folder = Some(PathBuf::from(value("--dat")?)),
            "--config" => options.config_path = Some(PathBuf::from(value("--config")?)),
            "--threads" => {
                let count = value("--threads")?;
                options.threads = Some(
                    count
                        .parse()
                        .map_err(|_| anyhow!("Nombre de threads invalide: {}", count))?,
                );
            }
            "--json" => options.json = true,
            "--all" => options.show_extra = true,
            "-h" | "--help" => return Err(anyhow!(USAGE)),
            flag if flag.starts_with("--") => return Err(anyhow!("Option inconnue: {}\n{}", flag, USAGE)),
            file => options.files.push(PathBuf::from(file)),
        }
    }

    if options.files.is_empty() {
        return Err(anyhow!(USAGE));
    }
    Ok(options)
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    path: &'a PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a FileReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn print_report(report: &FileReport, show_extra: bool) {
    println!("=== {} ===", report.path.display());
    match report.filetype {
        Some(filetype) => println!("Fichier: {} ({})", report.name, filetype),
        None => println!("Fichier: {}", report.name),
    }

    for (platform, record) in &report.records {
        println!("[{}]", platform);
        for field in record.fields() {
            if field.extra && !show_extra {
                continue;
            }
            println!("  {}: {}", field.name, field.display());
        }
    }

    if let Some(digests) = &report.digests {
        if let Some(crc32) = digests.crc32 {
            println!("CRC32: {:08x}", crc32);
        }
        if let Some(md5) = &digests.md5 {
            println!("MD5: {}", to_hex(md5));
        }
        if let Some(sha1) = &digests.sha1 {
            println!("SHA-1: {}", to_hex(sha1));
        }
    }

    if report.matches.is_empty() {
        println!("Aucune correspondance dans les datfiles");
    } else {
        println!("Correspondances:");
        for m in &report.matches {
            println!("  {} / {} / {} [{}]", m.datfile, m.game, m.rom, m.status);
        }
    }
    println!();
}

fn main() -> Result<()> {
    // Initialiser le logging
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let options = parse_args(&args)?;

    let mut config = match &options.config_path {
        Some(path) => IdentifyConfig::load_from_file(path)?,
        None => IdentifyConfig::default(),
    };
    if options.dat_folder.is_some() {
        config.datfile_folder = options.dat_folder.clone();
    }
    if options.threads.is_some() {
        config.worker_threads = options.threads;
    }

    if let Some(threads) = config.worker_threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    info!("Démarrage de romscope v{}", romscope::VERSION);
    let identifier = RomIdentifier::from_config(&config)?;
    let results = identifier.identify_paths(&options.files, &CancelToken::new());

    let mut failures = 0;
    if options.json {
        let entries: Vec<JsonEntry<'_>> = results
            .iter()
            .map(|(path, result)| match result {
                Ok(report) => JsonEntry {
                    path,
                    report: Some(report),
                    error: None,
                },
                Err(e) => {
                    failures += 1;
                    JsonEntry {
                        path,
                        report: None,
                        error: Some(format!("{:#}", e)),
                    }
                }
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for (path, result) in &results {
            match result {
                Ok(report) => print_report(report, options.show_extra),
                Err(e) => {
                    failures += 1;
                    eprintln!("Erreur {}: {:#}", path.display(), e);
                }
            }
        }
    }

    if failures > 0 {
        return Err(anyhow!("{} fichier(s) non identifié(s)", failures));
    }
    Ok(())
}
