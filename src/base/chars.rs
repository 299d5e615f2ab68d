use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    struct CharClass: u8 {
        const WHITESPACE = 0b0000_0001;
        const ALPHA = 0b0000_0010;
        const QUOTE = 0b0000_0100;
    }
}

const fn classify(b: u8) -> CharClass {
    match b {
        b' ' | b'\t' | b'\n' | b'\r' | b'\x0C' => CharClass::WHITESPACE,
        b'a'..=b'z' | b'A'..=b'Z' => CharClass::ALPHA,
        b'"' | b'\'' => CharClass::QUOTE,
        _ => CharClass::empty(),
    }
}

static CHAR_CLASSES: [CharClass; 256] = {
    let mut table = [CharClass::empty(); 256];
    let mut i = 0;

    while i < 256 {
        table[i] = classify(i as u8);
        i += 1;
    }

    table
};

#[inline]
fn char_class(b: u8) -> CharClass {
    CHAR_CLASSES[b as usize]
}

#[inline]
pub fn is_whitespace(b: u8) -> bool {
    char_class(b).contains(CharClass::WHITESPACE)
}

#[inline]
pub fn is_alpha(b: u8) -> bool {
    char_class(b).contains(CharClass::ALPHA)
}

#[inline]
pub fn is_quote(b: u8) -> bool {
    char_class(b).contains(CharClass::QUOTE)
}
