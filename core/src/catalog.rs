#[derive(Clone, Copy, Debug)]
pub struct FontCatalogEntry {
    pub label: &'static str,
    pub file: &'static str,
}

include!(concat!(env!("OUT_DIR"), "/font_catalog.rs"));

pub fn font_by_file(file: &str) -> Option<&'static FontCatalogEntry> {
    let trimmed = file.trim();
    FONT_CATALOG
        .iter()
        .find(|entry| entry.file.eq_ignore_ascii_case(trimmed))
}

/// CSS family name for a font file: the file name without a `.ttf`/`.otf`
/// extension (matched case-insensitively).
pub fn font_family(file: &str) -> &str {
    let lower = file.to_ascii_lowercase();
    if lower.ends_with(".ttf") || lower.ends_with(".otf") {
        &file[..file.len() - 4]
    } else {
        file
    }
}
