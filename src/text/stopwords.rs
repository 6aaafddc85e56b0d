//! Multilingual stop-word list (English, French, Spanish).
//!
//! Entries are ASCII-only so they line up with lowercase tokenizer output.

use std::collections::HashSet;
use std::sync::LazyLock;

const ENGLISH: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "aren", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "couldn", "did", "didn", "do", "does", "doesn", "doing", "don",
    "down", "during", "each", "few", "for", "from", "further", "had", "hadn", "has", "hasn",
    "have", "haven", "having", "he", "her", "here", "hers", "herself", "him", "himself", "his",
    "how", "i", "if", "in", "into", "is", "isn", "it", "its", "itself", "just", "let", "ll", "me",
    "more", "most", "mustn", "my", "myself", "no", "nor", "not", "now", "o", "of", "off", "on",
    "once", "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "re", "s",
    "same", "shan", "she", "should", "shouldn", "so", "some", "such", "t", "than", "that", "the",
    "their", "theirs", "them", "themselves", "then", "there", "these", "they", "this", "those",
    "through", "to", "too", "under", "until", "up", "very", "was", "wasn", "we", "were", "weren",
    "what", "when", "where", "which", "while", "who", "whom", "why", "will", "with", "won",
    "would", "wouldn", "y", "you", "your", "yours", "yourself", "yourselves",
];

const FRENCH: &[&str] = &[
    "au", "aux", "ce", "ces", "cet", "cette", "dans", "de", "des", "donc", "du", "elle", "elles",
    "en", "et", "il", "ils", "je", "la", "le", "les", "leur", "leurs", "l", "mais", "ne", "ni",
    "nous", "on", "or", "ou", "pas", "plus", "pour", "qu", "que", "qui", "quoi", "sa", "sans",
    "se", "ses", "son", "sur", "tu", "un", "une", "vous",
];

const SPANISH: &[&str] = &[
    "al", "como", "con", "cuando", "de", "del", "donde", "el", "ella", "ellas", "ellos", "en",
    "es", "esa", "esas", "ese", "esos", "esta", "estas", "este", "estos", "la", "las", "lo",
    "los", "mas", "me", "mi", "mis", "mucho", "muy", "no", "nos", "o", "para", "pero", "por",
    "porque", "que", "quien", "quienes", "se", "si", "sin", "su", "sus", "te", "tu", "tus", "una",
    "unas", "uno", "unos", "ya", "y",
];

static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    ENGLISH
        .iter()
        .chain(FRENCH)
        .chain(SPANISH)
        .copied()
        .collect()
});

/// Whether `token` exactly matches a stop word.
#[must_use]
pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(token)
}
