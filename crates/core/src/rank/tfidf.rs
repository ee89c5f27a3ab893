//! TF-IDF vectors and cosine similarity.
//!
//! The query and every section text form one corpus. Tokens are lowercase
//! runs of two or more word characters with English stop words removed;
//! features are unigrams and adjacent bigrams. Terms found in more than
//! [`MAX_DF`] of the documents are pruned, then the [`MAX_FEATURES`] most
//! frequent terms are kept. Weights use the smoothed idf
//! `ln((1 + n) / (1 + df)) + 1` and every vector is L2-normalised.

use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use regex::Regex;

use super::RankError;

pub const MAX_FEATURES: usize = 500;
pub const MAX_DF: f64 = 0.95;

pub const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst", "an",
    "and", "another", "any", "anyhow", "anyone", "anything", "anyway", "anywhere", "are",
    "around", "as", "at", "back", "be", "became", "because", "become", "becomes", "becoming",
    "been", "before", "beforehand", "behind", "being", "below", "beside", "besides", "between",
    "beyond", "both", "but", "by", "can", "cannot", "could", "do", "done", "down", "due",
    "during", "each", "either", "else", "elsewhere", "enough", "etc", "even", "ever", "every",
    "everyone", "everything", "everywhere", "except", "few", "first", "for", "former",
    "formerly", "from", "further", "had", "has", "have", "he", "hence", "her", "here",
    "hereafter", "hereby", "herein", "hereupon", "hers", "herself", "him", "himself", "his",
    "how", "however", "i", "ie", "if", "in", "indeed", "into", "is", "it", "its", "itself",
    "last", "latter", "latterly", "least", "less", "many", "may", "me", "meanwhile", "might",
    "mine", "more", "moreover", "most", "mostly", "much", "must", "my", "myself", "namely",
    "neither", "never", "nevertheless", "next", "no", "nobody", "none", "noone", "nor", "not",
    "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto", "or",
    "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own", "per",
    "perhaps", "please", "rather", "same", "seem", "seemed", "seeming", "seems", "several",
    "she", "should", "since", "so", "some", "somehow", "someone", "something", "sometime",
    "sometimes", "somewhere", "still", "such", "than", "that", "the", "their", "them",
    "themselves", "then", "thence", "there", "thereafter", "thereby", "therefore", "therein",
    "thereupon", "these", "they", "this", "those", "though", "through", "throughout", "thru",
    "thus", "to", "together", "too", "toward", "towards", "under", "until", "up", "upon", "us",
    "very", "via", "was", "we", "well", "were", "what", "whatever", "when", "whence",
    "whenever", "where", "whereafter", "whereas", "whereby", "wherein", "whereupon", "wherever",
    "whether", "which", "while", "whither", "who", "whoever", "whole", "whom", "whose", "why",
    "will", "with", "within", "without", "would", "yet", "you", "your", "yours", "yourself",
    "yourselves",
];

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\w\w+\b").unwrap())
}

fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.binary_search(&token).is_ok()
}

/// Unigram and bigram features of `text`, with repeats.
pub fn features(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let tokens: Vec<&str> = token_regex()
        .find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|t| !is_stop_word(t))
        .collect();

    let mut features: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
    features.extend(tokens.windows(2).map(|pair| format!("{} {}", pair[0], pair[1])));
    features
}

/// Term to column index.
fn build_vocabulary(documents: &[Vec<String>]) -> Result<BTreeMap<String, usize>, RankError> {
    let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
    let mut total_frequency: HashMap<&str, usize> = HashMap::new();

    for document in documents {
        let mut seen: Vec<&str> = document.iter().map(String::as_str).collect();
        for term in &seen {
            *total_frequency.entry(*term).or_insert(0) += 1;
        }
        seen.sort_unstable();
        seen.dedup();
        for term in seen {
            *document_frequency.entry(term).or_insert(0) += 1;
        }
    }

    let max_documents = MAX_DF * documents.len() as f64;
    let mut kept: Vec<(&str, usize)> = document_frequency
        .into_iter()
        .filter(|(_, df)| *df as f64 <= max_documents)
        .map(|(term, _)| (term, total_frequency[term]))
        .collect();

    if kept.is_empty() {
        return Err(RankError::EmptyVocabulary);
    }

    // Most frequent first; equal counts keep term order.
    kept.sort_by(|a, b| b.1.cmp(&a.1));
    kept.truncate(MAX_FEATURES);

    let mut terms: Vec<&str> = kept.into_iter().map(|(term, _)| term).collect();
    terms.sort_unstable();
    Ok(terms
        .into_iter()
        .enumerate()
        .map(|(i, term)| (term.to_string(), i))
        .collect())
}

fn l2_normalize(vector: &mut [f64]) {
    let norm = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        vector.iter_mut().for_each(|v| *v /= norm);
    }
}

/// TF-IDF matrix of `texts`, one normalised row per text.
pub fn vectorize(texts: &[&str]) -> Result<Vec<Vec<f64>>, RankError> {
    let documents: Vec<Vec<String>> = texts.iter().map(|t| features(t)).collect();
    let vocabulary = build_vocabulary(&documents)?;

    let n = documents.len() as f64;
    let mut df = vec![0usize; vocabulary.len()];
    let mut counts: Vec<Vec<f64>> = Vec::with_capacity(documents.len());
    for document in &documents {
        let mut row = vec![0.0; vocabulary.len()];
        for term in document {
            if let Some(&column) = vocabulary.get(term) {
                row[column] += 1.0;
            }
        }
        for (column, count) in row.iter().enumerate() {
            if *count > 0.0 {
                df[column] += 1;
            }
        }
        counts.push(row);
    }

    let idf: Vec<f64> = df
        .iter()
        .map(|&d| ((1.0 + n) / (1.0 + d as f64)).ln() + 1.0)
        .collect();

    Ok(counts
        .into_iter()
        .map(|mut row| {
            row.iter_mut().zip(&idf).for_each(|(v, w)| *v *= w);
            l2_normalize(&mut row);
            row
        })
        .collect())
}

/// Cosine similarity of two L2-normalised vectors.
fn cosine(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Similarity of each text to `query`, in `[0, 1]`.
pub fn similarities(query: &str, texts: &[String]) -> Result<Vec<f64>, RankError> {
    if texts.is_empty() {
        return Ok(Vec::new());
    }
    let corpus: Vec<&str> = std::iter::once(query)
        .chain(texts.iter().map(String::as_str))
        .collect();
    let matrix = vectorize(&corpus)?;
    let (query_vector, rows) = matrix.split_first().ok_or(RankError::EmptyVocabulary)?;
    Ok(rows
        .iter()
        .map(|row| cosine(query_vector, row).clamp(0.0, 1.0))
        .collect())
}
