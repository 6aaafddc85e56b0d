//! Streaming tokenizer feeding a [`DocumentStatistics`] sink.
//!
//! Bytes arrive in arbitrary chunks. Each chunk is decoded as far as
//! possible; a code point split across the chunk boundary stays in a pending
//! buffer until the next chunk (or [`Tokenizer::finish`]) completes it.
//!
//! Whitespace, punctuation, control characters and U+FFFD end the current
//! token. Everything else is lowercased and appended.
//!
//! # Example
//!
//! ```
//! use textmatch::text::{DocumentStatistics, Tokenizer};
//!
//! let mut stats = DocumentStatistics::new();
//! let mut tokenizer = Tokenizer::new(&mut stats);
//! tokenizer.add_chunk(b"Hello, W");
//! tokenizer.add_chunk(b"orld!");
//! tokenizer.finish();
//!
//! assert_eq!(stats.count("hello"), 1);
//! assert_eq!(stats.count("world"), 1);
//! ```

use std::io;

use super::classify::{CharClassifier, UnicodeClassifier};
use super::statistics::DocumentStatistics;
use super::utf8::{self, REPLACEMENT};

/// Incremental tokenizer bound to one document's statistics.
pub struct Tokenizer<'a, C: CharClassifier = UnicodeClassifier> {
    stats: &'a mut DocumentStatistics,
    pending: Vec<u8>,
    token: String,
    classifier: C,
}

impl<'a> Tokenizer<'a> {
    /// Create a tokenizer using Unicode classification.
    pub fn new(stats: &'a mut DocumentStatistics) -> Self {
        Self::with_classifier(stats, UnicodeClassifier)
    }
}

impl<'a, C: CharClassifier> Tokenizer<'a, C> {
    /// Create a tokenizer with a custom classifier.
    pub fn with_classifier(stats: &'a mut DocumentStatistics, classifier: C) -> Self {
        Self {
            stats,
            pending: Vec::new(),
            token: String::new(),
            classifier,
        }
    }

    /// Feed the next chunk of input.
    pub fn add_chunk(&mut self, data: &[u8]) {
        self.pending.extend_from_slice(data);
        self.process_pending(false);
    }

    /// Flush any incomplete trailing sequence and the last token.
    pub fn finish(mut self) {
        self.process_pending(true);
        self.stats.add_token(&mut self.token);
    }

    fn process_pending(&mut self, final_chunk: bool) {
        let mut index = 0;
        while let Some((ch, used)) = utf8::decode(&self.pending[index..], final_chunk) {
            index += used;
            if ch == REPLACEMENT || self.classifier.classify(ch).is_boundary() {
                self.stats.add_token(&mut self.token);
            } else {
                self.classifier.push_lowercase(ch, &mut self.token);
            }
        }
        self.pending.drain(..index);
        if final_chunk {
            self.pending.clear();
        }
    }
}

/// Lets readers be streamed with [`std::io::copy`].
impl<C: CharClassifier> io::Write for Tokenizer<'_, C> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.add_chunk(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
