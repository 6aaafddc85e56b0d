//! Filename version and date markers.
//!
//! The lowercased file stem is scanned with a fixed battery of patterns:
//!
//! 1. calendar dates, separated (`2024-01-05`, `2024_01_05T10-30`) or
//!    compact (`20240105`, `20240105103000`)
//! 2. year-month (`2024-01`) and year-quarter (`2024q3`, quarter maps to its
//!    last month)
//! 3. version numbers (`v1.2.3`, `v_2`, `-v-3`, `ver2`, `release1.4b`)
//! 4. revision markers (`r3`, `rev2a`) and tag words (`final`, `updated2`)
//!
//! Every match yields a candidate; the highest candidate under
//! [`VersionInfo::compare`] is kept. A bare tag word anywhere in the stem
//! marks the result as tagged.
//!
//! # Example
//!
//! ```
//! use std::cmp::Ordering;
//! use std::path::Path;
//! use textmatch::matching::version::extract_version_info;
//!
//! let old = extract_version_info(Path::new("report_v1.2.txt"));
//! let new = extract_version_info(Path::new("report_v1.10.txt"));
//! assert_eq!(new.compare(&old), Ordering::Greater);
//! ```

use std::cmp::Ordering;
use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// What kind of ordering key a filename carries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VersionKind {
    /// No numeric marker.
    #[default]
    None,
    /// Version number: numeric parts and a letter suffix rank (`a` = 1, … `z` = 26, none = 0).
    Numeric {
        /// Dot-separated components.
        parts: Vec<u64>,
        /// Trailing letter rank.
        suffix: u8,
    },
    /// Year, month, day, hour, minute, second (missing fields are 0).
    Date {
        /// Date components.
        parts: [u64; 6],
    },
}

/// Ordering key derived from a file name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionInfo {
    /// Numeric marker, if any.
    pub kind: VersionKind,
    /// A tag word (`final`, `rev`, `updated`, ...) is present.
    pub has_tag: bool,
}

impl VersionInfo {
    /// A numeric version.
    #[must_use]
    pub fn numeric(parts: Vec<u64>, suffix: u8, has_tag: bool) -> Self {
        Self {
            kind: VersionKind::Numeric { parts, suffix },
            has_tag,
        }
    }

    /// A date marker.
    #[must_use]
    pub fn date(parts: [u64; 6], has_tag: bool) -> Self {
        Self {
            kind: VersionKind::Date { parts },
            has_tag,
        }
    }

    /// A tag word with no number.
    #[must_use]
    pub fn tag_only() -> Self {
        Self {
            kind: VersionKind::None,
            has_tag: true,
        }
    }

    /// Whether a date marker was found.
    #[must_use]
    pub fn is_date(&self) -> bool {
        matches!(self.kind, VersionKind::Date { .. })
    }

    /// Whether any numeric marker (version or date) was found.
    #[must_use]
    pub fn has_version(&self) -> bool {
        !matches!(self.kind, VersionKind::None)
    }

    /// Order two keys; `Greater` means `self` is the newer file.
    ///
    /// - A date outranks anything that is not a date.
    /// - Two numeric keys compare part by part (shorter side zero-padded),
    ///   then by suffix, then a tagged key wins.
    /// - Against a key without numbers, a numeric key wins unless the other
    ///   side carries a tag.
    /// - Otherwise a tagged key wins.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        let tag_order = self.has_tag.cmp(&other.has_tag);
        match (&self.kind, &other.kind) {
            (VersionKind::Date { .. }, VersionKind::Numeric { .. } | VersionKind::None) => {
                Ordering::Greater
            }
            (VersionKind::Numeric { .. } | VersionKind::None, VersionKind::Date { .. }) => {
                Ordering::Less
            }
            (VersionKind::Date { parts: left }, VersionKind::Date { parts: right }) => {
                compare_parts(left, right).then(tag_order)
            }
            (
                VersionKind::Numeric {
                    parts: left,
                    suffix: left_suffix,
                },
                VersionKind::Numeric {
                    parts: right,
                    suffix: right_suffix,
                },
            ) => compare_parts(left, right)
                .then(left_suffix.cmp(right_suffix))
                .then(tag_order),
            (VersionKind::None, VersionKind::Numeric { .. }) => {
                if self.has_tag {
                    Ordering::Greater
                } else {
                    Ordering::Less
                }
            }
            (VersionKind::Numeric { .. }, VersionKind::None) => {
                if other.has_tag {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            }
            (VersionKind::None, VersionKind::None) => tag_order,
        }
    }
}

/// Element-wise comparison with the shorter side padded with zeros.
fn compare_parts(left: &[u64], right: &[u64]) -> Ordering {
    let len = left.len().max(right.len());
    (0..len)
        .map(|i| {
            let l = left.get(i).copied().unwrap_or(0);
            let r = right.get(i).copied().unwrap_or(0);
            l.cmp(&r)
        })
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}

struct Patterns {
    date: Regex,
    date_compact: Regex,
    year_month: Regex,
    quarter: Regex,
    version: Regex,
    v_separator: Regex,
    separator_v: Regex,
    prefix_version: Regex,
    revision: Regex,
    tag_version: Regex,
    tag: Regex,
}

impl Patterns {
    fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            date: Regex::new(
                r"(^|[^0-9])([0-9]{4})[-_.]?([0-9]{2})[-_.]?([0-9]{2})(?:[tT_. -]?([0-9]{2})[:_\-.]?([0-9]{2})(?:[:_\-.]?([0-9]{2}))?)?",
            )?,
            date_compact: Regex::new(r"(^|[^0-9])([0-9]{8})([0-9]{4}|[0-9]{6})?($|[^0-9])")?,
            year_month: Regex::new(r"(^|[^0-9])([0-9]{4})[-_.]?([0-9]{2})($|[^0-9])")?,
            quarter: Regex::new(r"(^|[^0-9])([0-9]{4})[-_.]?(q|quarter)([1-4])($|[^0-9])")?,
            version: Regex::new(r"(^|[^a-z0-9])v?([0-9]+(?:\.[0-9]+)*)([a-z]?)")?,
            v_separator: Regex::new(r"(^|[^a-z0-9])v[._-]+([0-9]+(?:\.[0-9]+)*)([a-z]?)")?,
            separator_v: Regex::new(r"(^|[^a-z0-9])[._-]+v[._-]+([0-9]+(?:\.[0-9]+)*)([a-z]?)")?,
            prefix_version: Regex::new(
                r"(^|[^a-z0-9])(ver|version|rel|release|build|b)([0-9]+(?:\.[0-9]+)*)([a-z]?)",
            )?,
            revision: Regex::new(r"(^|[^a-z0-9])(rev|revision|r)([0-9]+)?([a-z]?)")?,
            tag_version: Regex::new(
                r"(^|[^a-z0-9])(final|latest|new|updated|update|revised)([0-9]+)?([a-z]?)",
            )?,
            tag: Regex::new(
                r"(^|[^a-z0-9])(new|revised|revision|rev|latest|final|updated|update)($|[^a-z0-9])",
            )?,
        })
    }
}

static PATTERNS: LazyLock<Option<Patterns>> = LazyLock::new(|| match Patterns::compile() {
    Ok(patterns) => Some(patterns),
    Err(e) => {
        log::error!("Version patterns failed to compile: {}", e);
        None
    }
});

fn number(caps: &Captures<'_>, group: usize) -> Option<u64> {
    caps.get(group).map(|m| m.as_str().parse().unwrap_or(0))
}

fn parse_parts(value: &str) -> Vec<u64> {
    value
        .split('.')
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.parse().unwrap_or(0))
        .collect()
}

fn suffix_rank(suffix: &str) -> u8 {
    match suffix.as_bytes().first() {
        Some(&b) if b.is_ascii_lowercase() => b - b'a' + 1,
        _ => 0,
    }
}

fn valid_date(parts: &[u64; 6]) -> bool {
    let [_, month, day, hour, minute, second] = *parts;
    (1..=12).contains(&month) && (1..=31).contains(&day) && hour <= 23 && minute <= 59 && second <= 59
}

/// Keeps the best candidate seen so far.
#[derive(Default)]
struct Best(Option<VersionInfo>);

impl Best {
    fn consider(&mut self, candidate: VersionInfo) {
        match &self.0 {
            Some(best) if candidate.compare(best) != Ordering::Greater => {}
            _ => self.0 = Some(candidate),
        }
    }
}

/// Extract the ordering key from a file name.
#[must_use]
pub fn extract_version_info(path: &Path) -> VersionInfo {
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    extract_from_stem(&name)
}

/// Extract the ordering key from an already lowercased stem.
#[must_use]
pub fn extract_from_stem(name: &str) -> VersionInfo {
    let Some(p) = PATTERNS.as_ref() else {
        return VersionInfo::default();
    };
    let has_tag = p.tag.is_match(name);
    let mut best = Best::default();

    for caps in p.date.captures_iter(name) {
        let parts = [
            number(&caps, 2).unwrap_or(0),
            number(&caps, 3).unwrap_or(0),
            number(&caps, 4).unwrap_or(0),
            number(&caps, 5).unwrap_or(0),
            number(&caps, 6).unwrap_or(0),
            number(&caps, 7).unwrap_or(0),
        ];
        if valid_date(&parts) {
            best.consider(VersionInfo::date(parts, has_tag));
        }
    }

    for caps in p.date_compact.captures_iter(name) {
        let ymd = &caps[2];
        let field = |s: &str, range: std::ops::Range<usize>| {
            s.get(range).and_then(|v| v.parse().ok()).unwrap_or(0)
        };
        let mut parts = [field(ymd, 0..4), field(ymd, 4..6), field(ymd, 6..8), 0, 0, 0];
        if let Some(hms) = caps.get(3).map(|m| m.as_str()) {
            parts[3] = field(hms, 0..2);
            parts[4] = field(hms, 2..4);
            if hms.len() == 6 {
                parts[5] = field(hms, 4..6);
            }
        }
        if valid_date(&parts) {
            best.consider(VersionInfo::date(parts, has_tag));
        }
    }

    for caps in p.year_month.captures_iter(name) {
        let year = number(&caps, 2).unwrap_or(0);
        let month = number(&caps, 3).unwrap_or(0);
        if (1..=12).contains(&month) {
            best.consider(VersionInfo::date([year, month, 0, 0, 0, 0], has_tag));
        }
    }

    for caps in p.quarter.captures_iter(name) {
        let year = number(&caps, 2).unwrap_or(0);
        let quarter = number(&caps, 4).unwrap_or(0);
        best.consider(VersionInfo::date([year, quarter * 3, 0, 0, 0, 0], has_tag));
    }

    for re in [&p.version, &p.v_separator, &p.separator_v] {
        for caps in re.captures_iter(name) {
            best.consider(VersionInfo::numeric(
                parse_parts(&caps[2]),
                suffix_rank(&caps[3]),
                has_tag,
            ));
        }
    }

    for caps in p.prefix_version.captures_iter(name) {
        best.consider(VersionInfo::numeric(
            parse_parts(&caps[3]),
            suffix_rank(&caps[4]),
            true,
        ));
    }

    for re in [&p.revision, &p.tag_version] {
        for caps in re.captures_iter(name) {
            let suffix = caps.get(4).map_or("", |m| m.as_str());
            let candidate = match number(&caps, 3) {
                Some(n) => VersionInfo::numeric(vec![n], suffix_rank(suffix), true),
                None if !suffix.is_empty() => {
                    VersionInfo::numeric(vec![0], suffix_rank(suffix), true)
                }
                None => VersionInfo::tag_only(),
            };
            best.consider(candidate);
        }
    }

    match best.0 {
        Some(info) => info,
        None if has_tag => VersionInfo::tag_only(),
        None => VersionInfo::default(),
    }
}
