//! The built-in 5x7 font: printable ASCII, the 66 letters of the Russian alphabet, and nothing
//! else. Each glyph is 5 column bytes, least significant bit on top; the renderer adds a blank
//! sixth column as letter spacing.
//!
//! Glyphs are addressed by an internal code, which is the byte produced by the text decoder:
//! plain ASCII for 0x20-0x7E, the UTF-8 continuation byte of a Cyrillic letter for 0x80-0xBF,
//! and `CODE_YO` for ё.

/// Internal code for ё, whose UTF-8 continuation byte collides with other letters.
pub const CODE_YO: u8 = 0xC0;

/// Columns per glyph, without the spacing column.
pub const GLYPH_WIDTH: u8 = 5;

/// Find the table index of the glyph for an internal code. Control codes, DEL and anything
/// without a glyph map to `None`.
pub fn glyph_index(code: u8) -> Option<usize> {
    if code < 0x20 {
        return None;
    }
    let i = (code - 0x20) as usize;
    match i {
        0..=94 => Some(i),
        // р-я, UTF-8 lead byte 0xD1
        96..=111 => Some(i + 47),
        // А-Я and а-п, UTF-8 lead byte 0xD0
        112..=159 => Some(i - 17),
        160 => Some(GLYPHS.len() - 1),
        _ => None,
    }
}

/// Column `col` of glyph `index`. Columns past the glyph width, and unknown glyphs, are blank.
pub fn glyph_column(index: usize, col: u8) -> u8 {
    GLYPHS
        .get(index)
        .and_then(|glyph| glyph.get(col as usize))
        .copied()
        .unwrap_or(0)
}

#[cfg_attr(rustfmt, rustfmt_skip)]
static GLYPHS: [[u8; GLYPH_WIDTH as usize]; 160] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // space
    [0x00, 0x00, 0x6F, 0x00, 0x00], // !
    [0x00, 0x07, 0x00, 0x07, 0x00], // "
    [0x14, 0x7F, 0x14, 0x7F, 0x14], // #
    [0x8C, 0x92, 0xFF, 0x92, 0x62], // $
    [0x23, 0x13, 0x08, 0x64, 0x62], // %
    [0x36, 0x49, 0x56, 0x20, 0x50], // &
    [0x00, 0x00, 0x07, 0x00, 0x00], // '
    [0x00, 0x1C, 0x22, 0x41, 0x00], // (
    [0x00, 0x41, 0x22, 0x1C, 0x00], // )
    [0x14, 0x08, 0x3E, 0x08, 0x14], // *
    [0x08, 0x08, 0x3E, 0x08, 0x08], // +
    [0x00, 0x50, 0x30, 0x00, 0x00], // ,
    [0x08, 0x08, 0x08, 0x08, 0x08], // -
    [0x00, 0x60, 0x60, 0x00, 0x00], // .
    [0x20, 0x10, 0x08, 0x04, 0x02], // /
    [0x3E, 0x51, 0x49, 0x45, 0x3E], // 0
    [0x00, 0x42, 0x7F, 0x40, 0x00], // 1
    [0x42, 0x61, 0x51, 0x49, 0x46], // 2
    [0x21, 0x41, 0x45, 0x4B, 0x31], // 3
    [0x18, 0x14, 0x12, 0x7F, 0x10], // 4
    [0x27, 0x45, 0x45, 0x45, 0x39], // 5
    [0x3C, 0x4A, 0x49, 0x49, 0x30], // 6
    [0x01, 0x71, 0x09, 0x05, 0x03], // 7
    [0x36, 0x49, 0x49, 0x49, 0x36], // 8
    [0x06, 0x49, 0x49, 0x29, 0x1E], // 9
    [0x00, 0x36, 0x36, 0x00, 0x00], // :
    [0x00, 0x56, 0x36, 0x00, 0x00], // ;
    [0x08, 0x14, 0x22, 0x41, 0x00], // <
    [0x14, 0x14, 0x14, 0x14, 0x14], // =
    [0x00, 0x41, 0x22, 0x14, 0x08], // >
    [0x02, 0x01, 0x51, 0x09, 0x06], // ?
    [0x3E, 0x41, 0x5D, 0x49, 0x4E], // @
    [0x7E, 0x09, 0x09, 0x09, 0x7E], // A
    [0x7F, 0x49, 0x49, 0x49, 0x36], // B
    [0x3E, 0x41, 0x41, 0x41, 0x22], // C
    [0x7F, 0x41, 0x41, 0x41, 0x3E], // D
    [0x7F, 0x49, 0x49, 0x49, 0x41], // E
    [0x7F, 0x09, 0x09, 0x09, 0x01], // F
    [0x3E, 0x41, 0x49, 0x49, 0x7A], // G
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // H
    [0x00, 0x41, 0x7F, 0x41, 0x00], // I
    [0x20, 0x40, 0x41, 0x3F, 0x01], // J
    [0x7F, 0x08, 0x14, 0x22, 0x41], // K
    [0x7F, 0x40, 0x40, 0x40, 0x40], // L
    [0x7F, 0x02, 0x0C, 0x02, 0x7F], // M
    [0x7F, 0x04, 0x08, 0x10, 0x7F], // N
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // O
    [0x7F, 0x09, 0x09, 0x09, 0x06], // P
    [0x3E, 0x41, 0x51, 0x21, 0x5E], // Q
    [0x7F, 0x09, 0x19, 0x29, 0x46], // R
    [0x46, 0x49, 0x49, 0x49, 0x31], // S
    [0x01, 0x01, 0x7F, 0x01, 0x01], // T
    [0x3F, 0x40, 0x40, 0x40, 0x3F], // U
    [0x0F, 0x30, 0x40, 0x30, 0x0F], // V
    [0x3F, 0x40, 0x30, 0x40, 0x3F], // W
    [0x63, 0x14, 0x08, 0x14, 0x63], // X
    [0x07, 0x08, 0x70, 0x08, 0x07], // Y
    [0x61, 0x51, 0x49, 0x45, 0x43], // Z
    [0x00, 0x00, 0x7F, 0x41, 0x00], // [
    [0x02, 0x04, 0x08, 0x10, 0x20], // \
    [0x00, 0x41, 0x7F, 0x00, 0x00], // ]
    [0x04, 0x02, 0x01, 0x02, 0x04], // ^
    [0x40, 0x40, 0x40, 0x40, 0x40], // _
    [0x00, 0x00, 0x03, 0x04, 0x00], // `
    [0x20, 0x54, 0x54, 0x54, 0x78], // a
    [0x7F, 0x48, 0x44, 0x44, 0x38], // b
    [0x38, 0x44, 0x44, 0x44, 0x20], // c
    [0x38, 0x44, 0x44, 0x48, 0x7F], // d
    [0x38, 0x54, 0x54, 0x54, 0x18], // e
    [0x08, 0x7E, 0x09, 0x01, 0x02], // f
    [0x0C, 0x52, 0x52, 0x52, 0x3E], // g
    [0x7F, 0x08, 0x04, 0x04, 0x78], // h
    [0x00, 0x44, 0x7D, 0x40, 0x00], // i
    [0x20, 0x40, 0x44, 0x3D, 0x00], // j
    [0x00, 0x7F, 0x10, 0x28, 0x44], // k
    [0x00, 0x41, 0x7F, 0x40, 0x00], // l
    [0x7C, 0x04, 0x18, 0x04, 0x78], // m
    [0x7C, 0x08, 0x04, 0x04, 0x78], // n
    [0x38, 0x44, 0x44, 0x44, 0x38], // o
    [0x7C, 0x14, 0x14, 0x14, 0x08], // p
    [0x08, 0x14, 0x14, 0x18, 0x7C], // q
    [0x7C, 0x08, 0x04, 0x04, 0x08], // r
    [0x48, 0x54, 0x54, 0x54, 0x20], // s
    [0x04, 0x3F, 0x44, 0x40, 0x20], // t
    [0x3C, 0x40, 0x40, 0x20, 0x7C], // u
    [0x1C, 0x20, 0x40, 0x20, 0x1C], // v
    [0x3C, 0x40, 0x30, 0x40, 0x3C], // w
    [0x44, 0x28, 0x10, 0x28, 0x44], // x
    [0x0C, 0x50, 0x50, 0x50, 0x3C], // y
    [0x44, 0x64, 0x54, 0x4C, 0x44], // z
    [0x00, 0x08, 0x36, 0x41, 0x41], // {
    [0x00, 0x00, 0x7F, 0x00, 0x00], // |
    [0x41, 0x41, 0x36, 0x08, 0x00], // }
    [0x04, 0x02, 0x04, 0x08, 0x04], // ~
    [0x7E, 0x11, 0x11, 0x11, 0x7E], // А
    [0x7F, 0x49, 0x49, 0x49, 0x33], // Б
    [0x7F, 0x49, 0x49, 0x49, 0x36], // В
    [0x7F, 0x01, 0x01, 0x01, 0x03], // Г
    [0xE0, 0x51, 0x4F, 0x41, 0xFF], // Д
    [0x7F, 0x49, 0x49, 0x49, 0x41], // Е
    [0x77, 0x08, 0x7F, 0x08, 0x77], // Ж
    [0x41, 0x49, 0x49, 0x49, 0x36], // З
    [0x7F, 0x10, 0x08, 0x04, 0x7F], // И
    [0x7C, 0x21, 0x12, 0x09, 0x7C], // Й
    [0x7F, 0x08, 0x14, 0x22, 0x41], // К
    [0x20, 0x41, 0x3F, 0x01, 0x7F], // Л
    [0x7F, 0x02, 0x0C, 0x02, 0x7F], // М
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // Н
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // О
    [0x7F, 0x01, 0x01, 0x01, 0x7F], // П
    [0x7F, 0x09, 0x09, 0x09, 0x06], // Р
    [0x3E, 0x41, 0x41, 0x41, 0x22], // С
    [0x01, 0x01, 0x7F, 0x01, 0x01], // Т
    [0x47, 0x28, 0x10, 0x08, 0x07], // У
    [0x1C, 0x22, 0x7F, 0x22, 0x1C], // Ф
    [0x63, 0x14, 0x08, 0x14, 0x63], // Х
    [0x7F, 0x40, 0x40, 0x40, 0xFF], // Ц
    [0x07, 0x08, 0x08, 0x08, 0x7F], // Ч
    [0x7F, 0x40, 0x7F, 0x40, 0x7F], // Ш
    [0x7F, 0x40, 0x7F, 0x40, 0xFF], // Щ
    [0x01, 0x7F, 0x48, 0x48, 0x30], // Ъ
    [0x7F, 0x48, 0x30, 0x00, 0x7F], // Ы
    [0x00, 0x7F, 0x48, 0x48, 0x30], // Ь
    [0x22, 0x41, 0x49, 0x49, 0x3E], // Э
    [0x7F, 0x08, 0x3E, 0x41, 0x3E], // Ю
    [0x46, 0x29, 0x19, 0x09, 0x7F], // Я
    [0x20, 0x54, 0x54, 0x54, 0x78], // а
    [0x3C, 0x4A, 0x4A, 0x49, 0x31], // б
    [0x7C, 0x54, 0x54, 0x28, 0x00], // в
    [0x7C, 0x04, 0x04, 0x0C, 0x00], // г
    [0xE0, 0x54, 0x4C, 0x44, 0xFC], // д
    [0x38, 0x54, 0x54, 0x54, 0x18], // е
    [0x6C, 0x10, 0x7C, 0x10, 0x6C], // ж
    [0x44, 0x54, 0x54, 0x28, 0x00], // з
    [0x7C, 0x20, 0x10, 0x08, 0x7C], // и
    [0x78, 0x42, 0x24, 0x12, 0x78], // й
    [0x7C, 0x10, 0x28, 0x44, 0x00], // к
    [0x20, 0x44, 0x3C, 0x04, 0x7C], // л
    [0x7C, 0x08, 0x10, 0x08, 0x7C], // м
    [0x7C, 0x10, 0x10, 0x10, 0x7C], // н
    [0x38, 0x44, 0x44, 0x44, 0x38], // о
    [0x7C, 0x04, 0x04, 0x04, 0x7C], // п
    [0x7C, 0x14, 0x14, 0x14, 0x08], // р
    [0x38, 0x44, 0x44, 0x44, 0x00], // с
    [0x04, 0x04, 0x7C, 0x04, 0x04], // т
    [0x0C, 0x50, 0x50, 0x50, 0x3C], // у
    [0x30, 0x48, 0xFE, 0x48, 0x30], // ф
    [0x44, 0x28, 0x10, 0x28, 0x44], // х
    [0x7C, 0x40, 0x40, 0x7C, 0xC0], // ц
    [0x0C, 0x10, 0x10, 0x10, 0x7C], // ч
    [0x7C, 0x40, 0x7C, 0x40, 0x7C], // ш
    [0x7C, 0x40, 0x7C, 0x40, 0xFC], // щ
    [0x04, 0x7C, 0x50, 0x50, 0x20], // ъ
    [0x7C, 0x50, 0x50, 0x20, 0x7C], // ы
    [0x7C, 0x50, 0x50, 0x20, 0x00], // ь
    [0x28, 0x44, 0x54, 0x54, 0x38], // э
    [0x7C, 0x10, 0x38, 0x44, 0x38], // ю
    [0x08, 0x54, 0x34, 0x14, 0x7C], // я
    [0x38, 0x55, 0x54, 0x55, 0x18], // ё
];

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(code: u8) -> Vec<u8> {
        let index = glyph_index(code).unwrap();
        (0..GLYPH_WIDTH).map(|col| glyph_column(index, col)).collect()
    }

    #[test]
    fn ascii() {
        assert_eq!(glyph_index(b' '), Some(0));
        assert_eq!(glyph(b'A'), [0x7E, 0x09, 0x09, 0x09, 0x7E]);
        assert_eq!(glyph(b'~'), [0x04, 0x02, 0x04, 0x08, 0x04]);
    }

    #[test]
    fn unmapped_codes() {
        assert_eq!(glyph_index(0x00), None);
        assert_eq!(glyph_index(b'\n'), None);
        assert_eq!(glyph_index(0x7F), None);
        assert_eq!(glyph_index(0xC1), None);
        assert_eq!(glyph_index(0xFF), None);
    }

    #[test]
    fn cyrillic() {
        // "А" is D0 90, "Я" D0 AF, "а" D0 B0, "п" D0 BF, "р" D1 80, "я" D1 8F.
        assert_eq!(glyph_index(0x90), Some(95));
        assert_eq!(glyph_index(0xAF), Some(126));
        assert_eq!(glyph_index(0xB0), Some(127));
        assert_eq!(glyph_index(0xBF), Some(142));
        assert_eq!(glyph_index(0x80), Some(143));
        assert_eq!(glyph_index(0x8F), Some(158));
        assert_eq!(glyph(0x90), [0x7E, 0x11, 0x11, 0x11, 0x7E]);
        assert_eq!(glyph(CODE_YO), [0x38, 0x55, 0x54, 0x55, 0x18]);
    }

    #[test]
    fn spacing_column_is_blank() {
        let index = glyph_index(b'#').unwrap();
        assert_eq!(glyph_column(index, 4), 0x14);
        assert_eq!(glyph_column(index, 5), 0);
        assert_eq!(glyph_column(500, 0), 0);
    }
}
