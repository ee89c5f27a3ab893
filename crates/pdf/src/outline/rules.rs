//! The heading rule table.
//!
//! Every textual heading signal lives in [`RULES`]. A row names a matcher,
//! how case is handled, which scoring roles it plays and, optionally, the
//! level it implies. Adding a locale means adding rows here; the classifier
//! and the level assigner only ever ask the table questions.

use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};

use crate::types::HeadingLevel;

/// Bumped whenever a row is added, removed or changes meaning.
pub const RULESET_VERSION: u32 = 1;

/// Admits a span below the H3 size threshold.
pub const STRONG: u8 = 1 << 0;
/// Worth +3 in the classifier.
pub const GENERAL: u8 = 1 << 1;
/// Worth +2 in the classifier.
pub const EXTRA: u8 = 1 << 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    Sensitive,
    Insensitive,
}

#[derive(Debug, Clone, Copy)]
pub enum Matcher {
    /// Anchored regex source, compiled once on first use.
    Pattern(&'static str),
    /// All upper case, longer than three characters, at most four words.
    ShortAllCaps,
}

#[derive(Debug, Clone, Copy)]
pub struct HeadingRule {
    pub id: &'static str,
    pub matcher: Matcher,
    pub case: Case,
    pub roles: u8,
    pub level: Option<HeadingLevel>,
}

const fn rule(
    id: &'static str,
    pattern: &'static str,
    case: Case,
    roles: u8,
    level: Option<HeadingLevel>,
) -> HeadingRule {
    HeadingRule {
        id,
        matcher: Matcher::Pattern(pattern),
        case,
        roles,
        level,
    }
}

use Case::{Insensitive, Sensitive};
use HeadingLevel::{H1, H2, H3};

// `(?:[^\d\s]|$)` after `\s+` reads "whitespace not followed by a digit".
// `(?:$|[^.\d]|\.(?:$|\D))` after a number reads "no further `.N` level".
pub const RULES: &[HeadingRule] = &[
    // Structural numbering and chapter markers.
    rule("chapter", r"^chapter\s+\d+", Insensitive, STRONG | GENERAL, Some(H1)),
    rule("chapter_ja", r"^第\d+章", Sensitive, STRONG | GENERAL, Some(H1)),
    rule("chapter_hi", r"^अध्याय\s+\d+", Sensitive, STRONG | GENERAL, Some(H1)),
    rule("numbered_1", r"^\d+\.\s+(?:[^\d\s]|$)", Sensitive, STRONG, Some(H1)),
    rule("numbered_1_prefix", r"^\d+\.\s", Sensitive, GENERAL, None),
    rule("numbered_2", r"^\d+\.\d+\s+(?:[^\d\s]|$)", Sensitive, STRONG, Some(H2)),
    rule("numbered_2_prefix", r"^\d+\.\d+\s", Sensitive, GENERAL, Some(H2)),
    rule("numbered_3", r"^\d+\.\d+\.\d+\s+", Sensitive, STRONG | GENERAL, Some(H3)),
    rule("roman", r"^[IVX]+\.\s+", Sensitive, STRONG, Some(H1)),
    rule("roman_prefix", r"^[IVX]+\.", Sensitive, GENERAL | EXTRA, None),
    rule("section_number", r"^section\s+\d+", Insensitive, STRONG, None),
    // Typography expressed in text.
    rule("all_caps", r"^[A-Z][^a-z]*$", Sensitive, GENERAL, None),
    rule("title_case_pair", r"^[A-Z][a-z]+\s[A-Z]", Sensitive, GENERAL, None),
    // Academic section names.
    rule(
        "academic",
        r"^(?:abstract|introduction|conclusion|references|bibliography)$",
        Insensitive,
        GENERAL,
        None,
    ),
    // Japanese.
    rule("numbered_fullwidth_1", r"^[\d０-９]+．", Sensitive, GENERAL, None),
    rule("numbered_fullwidth_2", r"^[\d０-９]+．[\d０-９]+", Sensitive, GENERAL, None),
    rule(
        "numbered_fullwidth_3",
        r"^[\d０-９]+．[\d０-９]+．[\d０-９]+",
        Sensitive,
        GENERAL,
        None,
    ),
    rule("hajimeni", r"^はじめに", Sensitive, GENERAL, None),
    rule("matome", r"^まとめ", Sensitive, GENERAL, None),
    rule("sankou_bunken", r"^参考文献", Sensitive, GENERAL, None),
    // Hindi.
    rule("numbered_devanagari", r"^\d+\.\s+[ऀ-ॿ]+", Sensitive, GENERAL, None),
    rule("parichay", r"^परिचय$", Sensitive, GENERAL, None),
    rule("nishkarsh", r"^निष्कर्ष$", Sensitive, GENERAL, None),
    rule("sandarbh", r"^संदर्भ$", Sensitive, GENERAL, None),
    // Lettered, bulleted and circled markers.
    rule("letter_dot", r"^[A-Z]\.", Sensitive, GENERAL | EXTRA, None),
    rule("letter_digit", r"^[A-Z]\d+", Sensitive, GENERAL | EXTRA, None),
    rule("bullet", r"^[-–—•]\s", Sensitive, GENERAL | EXTRA, None),
    rule("circled", r"^[①-⑳]", Sensitive, GENERAL | EXTRA, None),
    rule("part_marker", r"^PART\s+[A-Z0-9]", Sensitive, GENERAL | EXTRA, None),
    rule("section_marker", r"^SECTION\s+[A-Z0-9]", Sensitive, GENERAL | EXTRA, None),
    // Captions and appendices.
    rule("appendix", r"^appendix\s+[a-z]", Insensitive, EXTRA, Some(H1)),
    rule("figure", r"^figure\s+\d+", Insensitive, EXTRA, None),
    rule("table", r"^table\s+\d+", Insensitive, EXTRA, None),
    // Level-only rows.
    rule(
        "major_section",
        r"^(?:abstract|introduction|conclusion|references|bibliography|methodology|results|discussion|background|summary|acknowledgments|acknowledgements|executive summary|analysis|evaluation|implementation|related work|literature review|はじめに|まとめ|परिचय|निष्कर्ष)$",
        Insensitive,
        0,
        Some(H1),
    ),
    HeadingRule {
        id: "short_all_caps",
        matcher: Matcher::ShortAllCaps,
        case: Sensitive,
        roles: 0,
        level: Some(H1),
    },
    rule(
        "part_or_section_id",
        r"^(?i:part|section)\s+(?:[A-Z]\b|\d+(?:$|[^.\d]|\.(?:$|\D)))",
        Sensitive,
        0,
        Some(H1),
    ),
    rule("bare_number", r"^\d{1,2}$", Sensitive, 0, Some(H1)),
    rule("letter_dot_space", r"^[A-Z]\.\s+", Sensitive, 0, Some(H2)),
    rule("letter_digit_dot", r"^[A-Z]\d+\.\s+", Sensitive, 0, Some(H2)),
    rule(
        "part_or_section_2",
        r"^(?:section|part)\s+\d+\.\d+(?:$|[^.\d]|\.(?:$|\D))",
        Insensitive,
        0,
        Some(H2),
    ),
    rule("lower_letter_dot", r"^[a-z]\.\s+", Sensitive, 0, Some(H2)),
    rule("lower_letter_paren", r"^[a-z]\)\s+", Sensitive, 0, Some(H2)),
    rule("letter_digit_dotted", r"^[A-Z]\d+\.\d+\s+", Sensitive, 0, Some(H3)),
    rule(
        "part_or_section_3",
        r"^(?:section|part)\s+\d+\.\d+\.\d+",
        Insensitive,
        0,
        Some(H3),
    ),
];

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

struct CompiledRule {
    rule: &'static HeadingRule,
    regex: Option<Regex>,
}

impl CompiledRule {
    fn is_match(&self, text: &str) -> bool {
        match (&self.regex, self.rule.matcher) {
            (Some(re), _) => re.is_match(text),
            (None, Matcher::ShortAllCaps) => is_short_all_caps(text),
            (None, Matcher::Pattern(_)) => false,
        }
    }
}

fn compiled() -> &'static [CompiledRule] {
    static COMPILED: OnceLock<Vec<CompiledRule>> = OnceLock::new();
    COMPILED.get_or_init(|| {
        RULES
            .iter()
            .map(|rule| CompiledRule {
                rule,
                regex: match rule.matcher {
                    Matcher::Pattern(src) => Some(
                        RegexBuilder::new(src)
                            .case_insensitive(rule.case == Case::Insensitive)
                            .build()
                            .unwrap(),
                    ),
                    Matcher::ShortAllCaps => None,
                },
            })
            .collect()
    })
}

fn any_with_role(text: &str, role: u8) -> bool {
    compiled()
        .iter()
        .filter(|c| c.rule.roles & role != 0)
        .any(|c| c.is_match(text))
}

pub fn is_strong(text: &str) -> bool {
    any_with_role(text, STRONG)
}

pub fn is_general(text: &str) -> bool {
    any_with_role(text, GENERAL)
}

pub fn is_extra(text: &str) -> bool {
    any_with_role(text, EXTRA)
}

/// The first rule implying a level, trying every H1 row before any H2 row
/// and every H2 row before any H3 row.
pub fn implied_level(text: &str) -> Option<(HeadingLevel, &'static str)> {
    [H1, H2, H3].into_iter().find_map(|level| {
        compiled()
            .iter()
            .filter(|c| c.rule.level == Some(level))
            .find(|c| c.is_match(text))
            .map(|c| (level, c.rule.id))
    })
}

// ---------------------------------------------------------------------------
// Case predicates
// ---------------------------------------------------------------------------

/// At least one cased character and no lower-case ones.
pub fn is_upper(text: &str) -> bool {
    let mut cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            cased = true;
        }
    }
    cased
}

/// Every cased run starts with an upper-case character followed only by
/// lower-case ones, and there is at least one cased character.
pub fn is_title(text: &str) -> bool {
    let mut cased = false;
    let mut previous_is_cased = false;
    for c in text.chars() {
        if c.is_uppercase() {
            if previous_is_cased {
                return false;
            }
            previous_is_cased = true;
            cased = true;
        } else if c.is_lowercase() {
            if !previous_is_cased {
                return false;
            }
            previous_is_cased = true;
            cased = true;
        } else {
            previous_is_cased = false;
        }
    }
    cased
}

fn is_short_all_caps(text: &str) -> bool {
    is_upper(text) && text.chars().count() > 3 && text.split_whitespace().count() <= 4
}
