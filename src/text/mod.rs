//! Text decoding, tokenization and per-document statistics.
//!
//! - [`utf8`]: strict incremental UTF-8 decoder
//! - [`classify`]: code point classification (space/punct/control/other)
//! - [`stopwords`]: fixed English/French/Spanish stop-word set
//! - [`tokenizer`]: chunked tokenizer feeding statistics
//! - [`statistics`]: token counts, the unit of comparison

pub mod classify;
pub mod statistics;
pub mod stopwords;
pub mod tokenizer;
pub mod utf8;

pub use classify::{CharClass, CharClassifier, UnicodeClassifier};
pub use statistics::{distance_to_similarity, DocumentStatistics};
pub use stopwords::is_stop_word;
pub use tokenizer::Tokenizer;
