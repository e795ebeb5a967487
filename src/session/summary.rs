//! Summary decomposition for tubechat
//!
//! The backend returns a free-form narrative summary. This module splits it
//! into an abstract plus an ordered list of highlight points, using either
//! an explicit `###` section break or a line-by-line bullet heuristic.

use serde::Serialize;

/// Section-break marker separating the abstract from the highlight list
const SECTION_MARKER: &str = "###";

/// Structured form of a raw summary
///
/// Always derived from the session's raw summary text; never stored
/// independently of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryDocument {
    /// Narrative (non-bulleted) portion of the summary
    pub abstract_text: String,
    /// Ordered highlight points, in document order; may be empty
    pub points: Vec<String>,
}

impl SummaryDocument {
    /// Returns true if both the abstract and the point list are empty
    pub fn is_empty(&self) -> bool {
        self.abstract_text.is_empty() && self.points.is_empty()
    }
}

/// Decompose a raw summary into an abstract and highlight points
///
/// Two strategies are tried in order:
///
/// 1. If the text contains the literal `###` marker, everything before the
///    first occurrence (trimmed) becomes the abstract and every non-empty
///    line after it becomes a point, with any leading `-`, `*`, or `•`
///    bullet marker stripped.
/// 2. Otherwise each line is classified: lines opening with a bullet marker
///    or a decimal-number-plus-dot prefix (`1.`) become points; the
///    remaining non-empty lines, joined with single spaces, become the
///    abstract. If no point is found the original text is kept whole.
///
/// The function is pure and idempotent; empty input yields an empty
/// document.
///
/// # Examples
///
/// ```
/// use tubechat::session::parse_summary;
///
/// let doc = parse_summary("Topic A.\n###\n- point one\n- point two");
/// assert_eq!(doc.abstract_text, "Topic A.");
/// assert_eq!(doc.points, vec!["point one", "point two"]);
/// ```
pub fn parse_summary(raw: &str) -> SummaryDocument {
    if raw.trim().is_empty() {
        return SummaryDocument {
            abstract_text: String::new(),
            points: Vec::new(),
        };
    }

    if let Some(marker_idx) = raw.find(SECTION_MARKER) {
        return parse_with_marker(raw, marker_idx);
    }

    parse_heuristic(raw)
}

/// Delimiter strategy: split on the first `###` occurrence
fn parse_with_marker(raw: &str, marker_idx: usize) -> SummaryDocument {
    let abstract_text = raw[..marker_idx].trim().to_string();
    let tail = &raw[marker_idx + SECTION_MARKER.len()..];

    let points = tail
        .lines()
        .map(strip_bullet_marker)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    SummaryDocument {
        abstract_text,
        points,
    }
}

/// Heuristic strategy: classify each line as bullet point or narrative
fn parse_heuristic(raw: &str) -> SummaryDocument {
    let mut points = Vec::new();
    let mut narrative: Vec<&str> = Vec::new();

    for line in raw.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(point) = strip_point_prefix(trimmed) {
            points.push(point.to_string());
        } else {
            narrative.push(trimmed);
        }
    }

    if points.is_empty() {
        SummaryDocument {
            abstract_text: raw.to_string(),
            points,
        }
    } else {
        SummaryDocument {
            abstract_text: narrative.join(" "),
            points,
        }
    }
}

/// Strip a leading `-`, `*`, or `•` marker and surrounding whitespace
fn strip_bullet_marker(line: &str) -> &str {
    let trimmed = line.trim();
    for marker in ['-', '*', '•'] {
        if let Some(rest) = trimmed.strip_prefix(marker) {
            return rest.trim();
        }
    }
    trimmed
}

/// Classify a trimmed line as a point, returning its text without the marker
///
/// Recognizes `-`, `*`, `•`, and decimal-number-plus-dot prefixes (`1.`,
/// `12.`). Returns `None` for narrative lines.
fn strip_point_prefix(trimmed: &str) -> Option<&str> {
    for marker in ['-', '*', '•'] {
        if let Some(rest) = trimmed.strip_prefix(marker) {
            return Some(rest.trim());
        }
    }

    let digits = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        if let Some(rest) = trimmed[digits..].strip_prefix('.') {
            return Some(rest.trim());
        }
    }

    None
}
