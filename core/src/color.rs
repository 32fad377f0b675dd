/// Normalizes text typed into a hex colour field. Accepts `rgb` or `rrggbb`
/// with or without a leading `#`; short forms are expanded. Anything else
/// (including partial input) yields `None`.
pub fn normalize_hex_input(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if !digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return None;
    }
    match digits.len() {
        3 => {
            let mut expanded = String::with_capacity(7);
            expanded.push('#');
            for ch in digits.chars() {
                expanded.push(ch);
                expanded.push(ch);
            }
            Some(expanded)
        }
        6 => Some(format!("#{digits}")),
        _ => None,
    }
}

pub fn rgb_to_hex(red: u8, green: u8, blue: u8) -> String {
    format!("#{red:02x}{green:02x}{blue:02x}")
}

/// Reads the RGB channels of the first pixel in an RGBA buffer.
pub fn hex_from_rgba(pixel: &[u8]) -> Option<String> {
    match pixel {
        [red, green, blue, ..] => Some(rgb_to_hex(*red, *green, *blue)),
        _ => None,
    }
}
