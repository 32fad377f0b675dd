use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use imgtool_core::{
    file_extension, font_family, generate_sequential_filename, mime_for_extension,
    validate_image_file, FileMeta, FileValidationError, Settings, SettingsField, DEFAULT_FONT_FILE,
    FONT_CATALOG,
};

const UNKNOWN_MIME: &str = "application/octet-stream";

#[derive(Parser)]
#[command(name = "imgtool-cli", version, about = "Offline checks for imgtool inputs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate image files the way the upload area does.
    Check {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Print a sequential output filename plan.
    Names {
        #[arg(long, default_value = "image")]
        base: String,
        #[arg(long, default_value_t = 1)]
        start: u32,
        #[arg(long, default_value_t = 1)]
        count: u32,
        #[arg(long, default_value = "png")]
        ext: String,
    },
    /// Merge a persisted settings blob over the defaults and print it.
    Settings {
        #[arg(long, env = "IMGTOOL_SETTINGS_FILE")]
        file: Option<PathBuf>,
        /// Print only this key (camelCase, as stored).
        #[arg(long)]
        field: Option<String>,
    },
    /// List the fonts offered by the style panel.
    Fonts,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { paths } => {
            let mut failed = 0usize;
            for path in &paths {
                match check_path(path) {
                    Ok(meta) => println!("ok    {} ({}, {} bytes)", path.display(), meta.mime, meta.size),
                    Err(err) => {
                        failed += 1;
                        println!("fail  {}: {err}", path.display());
                    }
                }
            }
            if failed > 0 {
                eprintln!("{failed} of {} file(s) rejected", paths.len());
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Names {
            base,
            start,
            count,
            ext,
        } => {
            for name in filename_plan(&base, start, count, &ext) {
                println!("{name}");
            }
        }
        Commands::Settings { file, field } => {
            let raw = match file {
                Some(path) => fs::read_to_string(path)?,
                None => {
                    let mut raw = String::new();
                    io::stdin().read_to_string(&mut raw)?;
                    raw
                }
            };
            let settings = Settings::merged_over_defaults(&raw)?;
            match field {
                Some(key) => println!("{}", field_value(&settings, &key)?),
                None => println!("{}", settings.to_json()?),
            }
        }
        Commands::Fonts => {
            for entry in FONT_CATALOG {
                let marker = if entry.file == DEFAULT_FONT_FILE { "*" } else { " " };
                println!(
                    "{marker} {:<24} {:<28} {}",
                    entry.label,
                    entry.file,
                    font_family(entry.file)
                );
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[derive(Debug)]
enum CheckError {
    Io(io::Error),
    Invalid(FileValidationError),
}

impl std::fmt::Display for CheckError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckError::Io(err) => write!(f, "{err}"),
            CheckError::Invalid(err) => write!(f, "{err}"),
        }
    }
}

fn check_path(path: &Path) -> Result<FileMeta, CheckError> {
    let size = fs::metadata(path).map_err(CheckError::Io)?.len();
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mime = mime_for_extension(&file_extension(&name)).unwrap_or(UNKNOWN_MIME);
    let meta = FileMeta::new(name, mime, size);
    validate_image_file(&meta).map_err(CheckError::Invalid)?;
    Ok(meta)
}

fn field_value(settings: &Settings, key: &str) -> Result<String, Box<dyn std::error::Error>> {
    let field = SettingsField::from_key(key).ok_or_else(|| {
        let known: Vec<&str> = SettingsField::ALL.iter().map(|field| field.key()).collect();
        format!("unknown setting {key:?}; known: {}", known.join(", "))
    })?;
    let encoded: serde_json::Value = serde_json::from_str(&settings.to_json()?)?;
    Ok(encoded
        .get(field.key())
        .map(|value| value.to_string())
        .unwrap_or_default())
}

/// Numbers run from `start` to `start + count - 1`.
fn filename_plan(base: &str, start: u32, count: u32, ext: &str) -> Vec<String> {
    (0..count)
        .map(|index| generate_sequential_filename(base, index, start, ext))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_counts_from_start() {
        assert_eq!(
            filename_plan("card", 7, 3, ".JPG"),
            vec!["card_007.JPG", "card_008.JPG", "card_009.JPG"]
        );
        assert!(filename_plan("card", 1, 0, "png").is_empty());
    }

    #[test]
    fn field_lookup_uses_stored_keys() {
        let settings = Settings::merged_over_defaults(r#"{"fontSize": 40}"#).unwrap();
        assert_eq!(field_value(&settings, "fontSize").unwrap(), "40");
        assert!(field_value(&settings, "font_size").is_err());
    }

    #[test]
    fn check_rejects_unknown_extension() {
        let dir = std::env::temp_dir().join(format!("imgtool-cli-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let notes = dir.join("notes.md");
        fs::write(&notes, b"# hi").unwrap();
        let image = dir.join("tiny.png");
        fs::write(&image, [0x89, b'P', b'N', b'G']).unwrap();

        assert!(matches!(
            check_path(&notes),
            Err(CheckError::Invalid(FileValidationError::InvalidType { .. }))
        ));
        let meta = check_path(&image).unwrap();
        assert_eq!(meta.mime, "image/png");
        assert_eq!(meta.size, 4);
        assert!(matches!(check_path(&dir.join("missing.png")), Err(CheckError::Io(_))));

        fs::remove_dir_all(&dir).unwrap();
    }
}
