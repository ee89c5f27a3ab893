use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

const LIGATURES: [(&str, &str); 5] = [
    ("\u{FB00}", "ff"),
    ("\u{FB01}", "fi"),
    ("\u{FB02}", "fl"),
    ("\u{FB03}", "ffi"),
    ("\u{FB04}", "ffl"),
];

/// NFC, ligatures, bullets and replacement characters. Shared by both
/// cleanup entry points.
fn normalize_glyphs(text: &str) -> String {
    let mut result: String = text.nfc().collect();

    for (lig, replacement) in &LIGATURES {
        result = result.replace(lig, replacement);
    }

    for bullet in ['\u{25CF}', '\u{25CB}', '\u{25A0}'] {
        result = result.replace(bullet, "\u{2022}");
    }

    result.replace('\u{FFFD}', "")
}

/// Clean the text of a single span.
///
/// Runs of whitespace collapse to one space and the result is trimmed, so a
/// span that held only whitespace comes back empty.
pub fn clean_span_text(text: &str) -> String {
    static RE_WS: OnceLock<Regex> = OnceLock::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").unwrap());

    let result = normalize_glyphs(text);
    re_ws.replace_all(result.trim(), " ").to_string()
}

/// Clean the multi-line text of a whole page.
///
/// On top of [`clean_span_text`]'s glyph fixes this repairs hyphenation at
/// line breaks, caps runs of spaces at two and merges CJK characters split
/// across a line break. Paragraph breaks (`\n\n`) are preserved.
pub fn clean_page_text(text: &str) -> String {
    let mut result = normalize_glyphs(text);

    static RE_HYPHEN: OnceLock<Regex> = OnceLock::new();
    let re_hyphen = RE_HYPHEN.get_or_init(|| Regex::new(r"([a-zA-Z])-\s*\n\s*([a-z])").unwrap());
    result = re_hyphen.replace_all(&result, "$1$2").to_string();

    static RE_SPACES: OnceLock<Regex> = OnceLock::new();
    let re_spaces = RE_SPACES.get_or_init(|| Regex::new(r"[ ]{3,}").unwrap());
    result = re_spaces.replace_all(&result, "  ").to_string();

    static RE_PARA: OnceLock<Regex> = OnceLock::new();
    let re_para = RE_PARA.get_or_init(|| Regex::new(r"\n{2,}").unwrap());
    let placeholder = "\x00CJKPARA\x00";
    let protected = re_para.replace_all(&result, placeholder);

    static RE_CJK: OnceLock<Regex> = OnceLock::new();
    let re_cjk = RE_CJK.get_or_init(|| {
        Regex::new(
            r"([\p{Hangul}\p{Han}\p{Hiragana}\p{Katakana}])([^.。!?！？\n]?)\n([\p{Hangul}\p{Han}\p{Hiragana}\p{Katakana}])"
        ).unwrap()
    });
    let merged = re_cjk.replace_all(&protected, "$1$2$3").to_string();
    result = merged.replace(placeholder, "\n\n");

    result.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_passthrough() {
        assert_eq!(clean_span_text("Hello world."), "Hello world.");
    }

    #[test]
    fn test_span_collapses_whitespace() {
        assert_eq!(clean_span_text("  1.1   Overview\t "), "1.1 Overview");
        assert_eq!(clean_span_text(" \t "), "");
    }

    #[test]
    fn test_ligature_fix() {
        assert_eq!(clean_span_text("\u{FB01}nd"), "find");
        assert_eq!(clean_page_text("a\u{FB04}e"), "affle");
    }

    #[test]
    fn test_hyphenation_fix() {
        assert!(clean_page_text("infor-\nmation").contains("information"));
    }

    #[test]
    fn test_hyphenation_preserves_non_alpha() {
        let result = clean_page_text("123-\n456");
        assert!(result.contains("123-"));
    }

    #[test]
    fn test_bullet_standardization() {
        assert_eq!(clean_span_text("\u{25CF} Item"), "\u{2022} Item");
    }

    #[test]
    fn test_replacement_char_removed() {
        assert_eq!(clean_span_text("Hello\u{FFFD}World"), "HelloWorld");
    }

    #[test]
    fn test_page_excessive_whitespace() {
        assert_eq!(clean_page_text("a     b"), "a  b");
    }

    #[test]
    fn test_page_cjk_line_merge() {
        assert_eq!(clean_page_text("日本\n語"), "日本語");
        assert_eq!(clean_page_text("日本\n\n語"), "日本\n\n語");
    }

    #[test]
    fn test_nfc_normalization() {
        let result = clean_span_text("caf\u{0065}\u{0301}");
        assert_eq!(result, "caf\u{00E9}");
    }
}
