//! Display formatting helpers for dex numbers and PokeAPI names

/// Format a dex number the way the franchise prints it: ids below 100 are
/// left-padded with zeros to width 3, larger ids keep their decimal form.
/// Id 0 is the "unknown" sentinel and renders as "000".
pub fn format_id(id: u16) -> String {
    if id >= 100 {
        id.to_string()
    } else {
        format!("{id:03}")
    }
}

/// Uppercase the first character, leaving the rest untouched.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Capitalize every space-separated word and lowercase the remainder of each.
pub fn capitalize_words(text: &str) -> String {
    text.split(' ')
        .map(|word| capitalize(&word.to_lowercase()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Map a PokeAPI gender-rate code to a human label.
pub fn gender_label(rate: i8) -> &'static str {
    match rate {
        -1 => "Genderless",
        0 => "Male only",
        8 => "Female only",
        _ => "Male/Female",
    }
}

/// Strip the "generation-" prefix and upper-case the remainder
/// ("generation-iv" -> "IV").
pub fn generation_label(name: &str) -> String {
    name.trim_start_matches("generation-").to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_id_pads_below_100() {
        assert_eq!(format_id(7), "007");
        assert_eq!(format_id(42), "042");
        assert_eq!(format_id(99), "099");
    }

    #[test]
    fn test_format_id_plain_above_100() {
        assert_eq!(format_id(100), "100");
        assert_eq!(format_id(150), "150");
        assert_eq!(format_id(1025), "1025");
    }

    #[test]
    fn test_format_id_unknown_sentinel() {
        assert_eq!(format_id(0), "000");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("pikachu"), "Pikachu");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("x"), "X");
    }

    #[test]
    fn test_capitalize_words() {
        assert_eq!(capitalize_words("official artwork"), "Official Artwork");
        assert_eq!(capitalize_words("MEWTWO"), "Mewtwo");
    }

    #[test]
    fn test_gender_label() {
        assert_eq!(gender_label(-1), "Genderless");
        assert_eq!(gender_label(0), "Male only");
        assert_eq!(gender_label(8), "Female only");
        assert_eq!(gender_label(4), "Male/Female");
        assert_eq!(gender_label(1), "Male/Female");
    }

    #[test]
    fn test_generation_label() {
        assert_eq!(generation_label("generation-i"), "I");
        assert_eq!(generation_label("generation-iv"), "IV");
    }
}
