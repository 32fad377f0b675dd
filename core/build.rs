use std::collections::HashSet;
use std::env;
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Deserialize)]
struct CatalogFile {
    default_font: Option<String>,
    fonts: Vec<FontEntry>,
}

#[derive(Deserialize)]
struct FontEntry {
    label: String,
    file: String,
}

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("missing CARGO_MANIFEST_DIR"));
    let workspace_root = manifest_dir.parent().unwrap_or(&manifest_dir);
    let env_path = workspace_root.join(".env");
    let env_local_path = workspace_root.join(".env.local");

    let _ = dotenvy::from_filename(&env_local_path);
    let _ = dotenvy::from_filename(&env_path);

    println!("cargo:rerun-if-env-changed=IMGTOOL_FONT_CATALOG");
    println!("cargo:rerun-if-changed={}", env_path.display());
    println!("cargo:rerun-if-changed={}", env_local_path.display());

    let catalog_path = resolve_catalog_path(workspace_root);
    println!("cargo:rerun-if-changed={}", catalog_path.display());

    let contents = fs::read_to_string(&catalog_path).unwrap_or_else(|err| {
        panic!(
            "failed to read font catalog at {}: {err}",
            catalog_path.display()
        )
    });

    let catalog: CatalogFile = toml::from_str(&contents).unwrap_or_else(|err| {
        panic!(
            "failed to parse font catalog at {}: {err}",
            catalog_path.display()
        )
    });

    if catalog.fonts.is_empty() {
        panic!("font catalog {} has no entries", catalog_path.display());
    }

    validate_entries(&catalog.fonts, &catalog_path);

    let default_font = catalog
        .default_font
        .as_deref()
        .unwrap_or(catalog.fonts[0].file.as_str());
    if !catalog.fonts.iter().any(|entry| entry.file == default_font) {
        panic!(
            "default_font '{}' not found in {}",
            default_font,
            catalog_path.display()
        );
    }

    let mut output = String::new();
    writeln!(
        &mut output,
        "pub const DEFAULT_FONT_FILE: &str = {};",
        rust_string(default_font)
    )
    .unwrap();
    writeln!(&mut output).unwrap();
    writeln!(&mut output, "pub const FONT_CATALOG: &[FontCatalogEntry] = &[").unwrap();

    for entry in &catalog.fonts {
        let file_value = if entry.file == default_font {
            "DEFAULT_FONT_FILE".to_string()
        } else {
            rust_string(&entry.file)
        };
        writeln!(&mut output, "    FontCatalogEntry {{").unwrap();
        writeln!(&mut output, "        label: {},", rust_string(&entry.label)).unwrap();
        writeln!(&mut output, "        file: {},", file_value).unwrap();
        writeln!(&mut output, "    }},").unwrap();
    }

    writeln!(&mut output, "];").unwrap();

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("missing OUT_DIR"));
    let out_path = out_dir.join("font_catalog.rs");
    fs::write(&out_path, output).unwrap_or_else(|err| {
        panic!("failed to write {}: {err}", out_path.display())
    });
}

fn resolve_catalog_path(workspace_root: &Path) -> PathBuf {
    let env_value = env::var("IMGTOOL_FONT_CATALOG").ok();
    let raw_path = match env_value {
        Some(value) if !value.trim().is_empty() => PathBuf::from(value),
        _ => workspace_root.join("config/fonts.toml"),
    };
    if raw_path.is_relative() {
        workspace_root.join(raw_path)
    } else {
        raw_path
    }
}

fn rust_string(value: &str) -> String {
    format!("{:?}", value)
}

fn validate_entries(entries: &[FontEntry], catalog_path: &Path) {
    let mut files = HashSet::new();

    for entry in entries {
        if entry.label.trim().is_empty() {
            panic!("font label cannot be empty in {}", catalog_path.display());
        }
        let file = entry.file.trim();
        if file.is_empty() {
            panic!("font file cannot be empty in {}", catalog_path.display());
        }
        if file.contains('/') || file.contains('\\') {
            panic!(
                "font '{}' must be a bare file name in {}",
                entry.file,
                catalog_path.display()
            );
        }
        let lower = file.to_ascii_lowercase();
        if !lower.ends_with(".ttf") && !lower.ends_with(".otf") {
            panic!(
                "font '{}' must be a .ttf or .otf file in {}",
                entry.file,
                catalog_path.display()
            );
        }
        if !files.insert(lower) {
            panic!(
                "duplicate font file '{}' in {}",
                entry.file,
                catalog_path.display()
            );
        }
    }
}
