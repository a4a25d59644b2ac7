//! IBM code page 437, the default encoding of ZIP entry names that do not
//! carry the UTF-8 flag.
//!
//! Bytes `0x00..=0x7F` map to the ASCII code points of the same value;
//! the upper half is looked up in [`HIGH`].

/// Code points for bytes `0x80..=0xFF`.
const HIGH: [char; 128] = [
    // 0x80
    'Ç', 'ü', 'é', 'â', 'ä', 'à', 'å', 'ç', 'ê', 'ë', 'è', 'ï', 'î', 'ì', 'Ä', 'Å',
    // 0x90
    'É', 'æ', 'Æ', 'ô', 'ö', 'ò', 'û', 'ù', 'ÿ', 'Ö', 'Ü', '¢', '£', '¥', '₧', 'ƒ',
    // 0xA0
    'á', 'í', 'ó', 'ú', 'ñ', 'Ñ', 'ª', 'º', '¿', '⌐', '¬', '½', '¼', '¡', '«', '»',
    // 0xB0
    '░', '▒', '▓', '│', '┤', '╡', '╢', '╖', '╕', '╣', '║', '╗', '╝', '╜', '╛', '┐',
    // 0xC0
    '└', '┴', '┬', '├', '─', '┼', '╞', '╟', '╚', '╔', '╩', '╦', '╠', '═', '╬', '╧',
    // 0xD0
    '╨', '╤', '╥', '╙', '╘', '╒', '╓', '╫', '╪', '┘', '┌', '█', '▄', '▌', '▐', '▀',
    // 0xE0
    'α', 'ß', 'Γ', 'π', 'Σ', 'σ', 'µ', 'τ', 'Φ', 'Θ', 'Ω', 'δ', '∞', 'φ', 'ε', '∩',
    // 0xF0
    '≡', '±', '≥', '≤', '⌠', '⌡', '÷', '≈', '°', '∙', '·', '√', 'ⁿ', '²', '■', '\u{00A0}',
];

/// Decode CP437 bytes. Every byte value is mapped, so this cannot fail.
pub fn decode(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| decode_byte(b)).collect()
}

fn decode_byte(b: u8) -> char {
    if b < 0x80 {
        b as char
    } else {
        HIGH[(b - 0x80) as usize]
    }
}

/// Encode text as CP437, or `None` if any character has no CP437 byte.
pub fn encode(text: &str) -> Option<Vec<u8>> {
    text.chars().map(encode_char).collect()
}

fn encode_char(c: char) -> Option<u8> {
    if c.is_ascii() {
        return Some(c as u8);
    }
    HIGH.iter()
        .position(|&h| h == c)
        .map(|i| 0x80 + i as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_byte_survives_decode_then_encode() {
        let all: Vec<u8> = (0..=255).collect();
        assert_eq!(encode(&decode(&all)).as_deref(), Some(all.as_slice()));
    }

    #[test]
    fn decodes_the_upper_half() {
        assert_eq!(decode(b"caf\x82"), "café");
        assert_eq!(decode(&[0xE1, 0xE9, 0xFF]), "ßΘ\u{00A0}");
    }

    #[test]
    fn rejects_characters_outside_the_code_page() {
        assert_eq!(encode("price €"), None);
        assert_eq!(encode("曲"), None);
        assert_eq!(encode("Ñandú").unwrap(), vec![0xA5, b'a', b'n', b'd', 0xA3]);
    }
}
