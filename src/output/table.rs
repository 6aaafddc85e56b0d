//! Console table for most-similar results.
//!
//! ```text
//! +--------------+--------------+------------+
//! | File         | MostSimilar  |      Score |
//! +--------------+--------------+------------+
//! | .../a.txt    | .../b.txt    | 1.00000000 |
//! +--------------+--------------+------------+
//! ```
//!
//! Columns are sized to their content. When the table would be wider than
//! [`MAX_TABLE_WIDTH`], the two path columns shrink proportionally (never
//! below [`MIN_PATH_WIDTH`]) and long paths wrap onto continuation lines.

use std::io;

use super::{format_score, DisplayRow};
use crate::matching::OUTPUT_PAIR_THRESHOLD;

/// Widest table, in characters, before path columns shrink.
pub const MAX_TABLE_WIDTH: usize = 132;

/// Narrowest a path column may become.
pub const MIN_PATH_WIDTH: usize = 10;

/// Borders and padding around three columns.
const DECORATION: usize = 10;

const HEADERS: [&str; 3] = ["File", "MostSimilar", "Score"];

/// Console table formatter.
pub struct TableOutput<'a> {
    rows: &'a [DisplayRow],
}

impl<'a> TableOutput<'a> {
    /// Create a new table formatter.
    #[must_use]
    pub fn new(rows: &'a [DisplayRow]) -> Self {
        Self { rows }
    }

    /// Column widths `[file, most_similar, score]`.
    #[must_use]
    pub fn column_widths(&self) -> [usize; 3] {
        let mut file = HEADERS[0].chars().count();
        let mut best = HEADERS[1].chars().count();
        let mut score = HEADERS[2].chars().count();
        for row in self.rows {
            file = file.max(row.file.chars().count());
            best = best.max(row.most_similar.chars().count());
            score = score.max(format_score(row.score).chars().count());
        }

        if file + best + score + DECORATION > MAX_TABLE_WIDTH {
            let max_sum = MAX_TABLE_WIDTH
                .checked_sub(score + DECORATION)
                .filter(|&w| w > 0)
                .unwrap_or(2 * MIN_PATH_WIDTH);
            let total = file + best;
            let shrunk = (max_sum * file) / total.max(1);
            file = file.min(shrunk).max(MIN_PATH_WIDTH);
            best = max_sum.saturating_sub(file).max(MIN_PATH_WIDTH);
        }

        [file, best, score]
    }

    /// Render the table and its footnote.
    #[must_use]
    pub fn render(&self) -> String {
        let [file_w, best_w, score_w] = self.column_widths();
        let separator = format!(
            "+{}+{}+{}+\n",
            "-".repeat(file_w + 2),
            "-".repeat(best_w + 2),
            "-".repeat(score_w + 2)
        );

        let mut out = String::new();
        out.push_str(&separator);
        out.push_str(&format!(
            "| {:<file_w$} | {:<best_w$} | {:>score_w$} |\n",
            HEADERS[0], HEADERS[1], HEADERS[2]
        ));
        out.push_str(&separator);

        for row in self.rows {
            let file_lines = wrap(&row.file, file_w);
            let best_lines = wrap(&row.most_similar, best_w);
            let score = format_score(row.score);
            let height = file_lines.len().max(best_lines.len());
            for line in 0..height {
                let file = file_lines.get(line).map_or("", String::as_str);
                let best = best_lines.get(line).map_or("", String::as_str);
                let score = if line == 0 { score.as_str() } else { "" };
                out.push_str(&format!(
                    "| {file:<file_w$} | {best:<best_w$} | {score:>score_w$} |\n"
                ));
            }
        }
        out.push_str(&separator);
        out.push_str(&footnote());
        out
    }

    /// Write the rendered table to `writer`.
    ///
    /// # Errors
    ///
    /// Returns any error from the writer.
    pub fn write_to<W: io::Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(self.render().as_bytes())?;
        writer.flush()
    }
}

fn footnote() -> String {
    format!(
        "* Reciprocal best matches are shown once; the left column is the preferred file\n  \
         and the right column is the duplicate candidate (threshold {OUTPUT_PAIR_THRESHOLD:.8}), chosen\n  \
         by filename version/date markers, then modification time, then scan order.\n"
    )
}

/// Hard-wrap `text` into lines of at most `width` characters.
fn wrap(text: &str, width: usize) -> Vec<String> {
    if text.is_empty() || width == 0 {
        return vec![text.to_string()];
    }
    let chars: Vec<char> = text.chars().collect();
    chars.chunks(width).map(|c| c.iter().collect()).collect()
}
