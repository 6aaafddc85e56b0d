//! Character classification used for token boundary detection.

use unicode_categories::UnicodeCategories;

/// Classification of a code point for tokenization purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// Whitespace of any kind.
    Space,
    /// Punctuation or symbol.
    Punct,
    /// Control character.
    Control,
    /// Anything that belongs inside a token.
    Other,
}

impl CharClass {
    /// Whether this class terminates the token being built.
    #[must_use]
    pub fn is_boundary(self) -> bool {
        self != CharClass::Other
    }
}

/// Narrow classification capability consumed by the tokenizer.
pub trait CharClassifier: Send + Sync {
    /// Classify a code point.
    fn classify(&self, ch: char) -> CharClass;

    /// Append the lowercase form of `ch` to `out`.
    fn push_lowercase(&self, ch: char, out: &mut String);
}

/// Classifier backed by the Unicode character database.
///
/// ASCII follows the C `isspace`/`ispunct`/`iscntrl` classes exactly.
/// Outside ASCII, punctuation (P*) and symbol (S*) categories both count as
/// punctuation.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeClassifier;

impl CharClassifier for UnicodeClassifier {
    fn classify(&self, ch: char) -> CharClass {
        if ch.is_whitespace() {
            CharClass::Space
        } else if ch.is_control() {
            CharClass::Control
        } else if ch.is_ascii() {
            if ch.is_ascii_punctuation() {
                CharClass::Punct
            } else {
                CharClass::Other
            }
        } else if ch.is_punctuation() || ch.is_symbol() {
            CharClass::Punct
        } else {
            CharClass::Other
        }
    }

    fn push_lowercase(&self, ch: char, out: &mut String) {
        if ch.is_ascii() {
            out.push(ch.to_ascii_lowercase());
        } else {
            out.extend(ch.to_lowercase());
        }
    }
}
