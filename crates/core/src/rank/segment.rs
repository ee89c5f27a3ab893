use unicode_segmentation::UnicodeSegmentation;

/// Splits text into sentences.
pub trait SentenceSegmenter {
    fn sentences(&self, text: &str) -> Vec<String>;
}

/// Line- and punctuation-based segmentation.
///
/// Each line is a boundary. Within a line, sentences follow the Unicode
/// sentence boundaries of UAX #29, except that a fragment ending in a bare
/// number or letter marker (`1.`, `2.3.`, `A.`) or a dotted abbreviation
/// (`e.g.`) is joined with the fragment after it.
#[derive(Debug, Clone, Copy, Default)]
pub struct PunctuationSegmenter;

fn is_marker_or_abbreviation(word: &str) -> bool {
    let Some(body) = word.strip_suffix('.') else {
        return false;
    };
    let body = body.trim_end_matches('.');
    if body.is_empty() {
        return false;
    }
    let numeric = body.chars().all(|c| c.is_ascii_digit() || c == '.');
    let single_letter = body.chars().count() == 1 && body.chars().all(char::is_alphabetic);
    numeric || single_letter || body.contains('.')
}

fn push_trimmed(sentences: &mut Vec<String>, sentence: &str) {
    let sentence = sentence.trim();
    if !sentence.is_empty() {
        sentences.push(sentence.to_string());
    }
}

impl SentenceSegmenter for PunctuationSegmenter {
    fn sentences(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();

        for line in text.lines() {
            let mut pending = String::new();
            for fragment in line.unicode_sentences() {
                pending.push_str(fragment);
                let last_word = pending.split_whitespace().last().unwrap_or_default();
                if is_marker_or_abbreviation(last_word) {
                    continue;
                }
                push_trimmed(&mut sentences, &pending);
                pending.clear();
            }
            push_trimmed(&mut sentences, &pending);
        }

        sentences
    }
}
