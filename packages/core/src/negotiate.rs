//! Content negotiation: choosing one representation per call.

use std::fmt;

use crate::error::PipelineError;

/// Structured pass-through media type.
pub const JSON: &str = "application/json";

/// Semantic-web (Turtle) media type.
pub const TURTLE: &str = "text/turtle";

/// How a representation is produced from a normalized result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepresentationChoice {
    /// Serialize the normalized result as JSON.
    PassThrough,
    /// Render through the named template.
    Template(&'static str),
    /// Build a triple graph for the named operation.
    Graph(&'static str),
}

/// One concrete representation an operation can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Representation {
    pub media_type: &'static str,
    pub choice: RepresentationChoice,
}

impl Representation {
    pub const fn new(media_type: &'static str, choice: RepresentationChoice) -> Self {
        Self { media_type, choice }
    }
}

/// The caller's accepted media types, most preferred first, plus the ranges
/// it refused with `q=0`.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptList {
    ranges: Vec<String>,
    excluded: Vec<String>,
}

impl AcceptList {
    /// Build from an already ordered list of media ranges.
    pub fn new<I, S>(ranges: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            ranges: ranges
                .into_iter()
                .map(|r| essence(r.as_ref()))
                .filter(|r| !r.is_empty())
                .collect(),
            excluded: Vec::new(),
        }
    }

    /// Parse an HTTP `Accept` header.
    ///
    /// Ranges are ordered by descending `q`; equal weights keep header order.
    /// `q=0` ranges are kept apart as exclusions. A missing or blank header
    /// accepts anything.
    pub fn from_header(header: Option<&str>) -> Self {
        let Some(header) = header.filter(|h| !h.trim().is_empty()) else {
            return Self::new(["*/*"]);
        };

        let (refused, mut weighted): (Vec<(f32, String)>, Vec<_>) = header
            .split(',')
            .filter_map(|part| {
                let mut pieces = part.split(';');
                let range = essence(pieces.next()?);
                if range.is_empty() {
                    return None;
                }
                let q = pieces
                    .filter_map(|p| p.trim().strip_prefix("q="))
                    .find_map(|v| v.trim().parse::<f32>().ok())
                    .unwrap_or(1.0);
                Some((q, range))
            })
            .partition(|(q, _)| *q <= 0.0);

        // sort_by is stable, so ties keep header order
        weighted.sort_by(|a, b| b.0.total_cmp(&a.0));
        Self {
            ranges: weighted.into_iter().map(|(_, r)| r).collect(),
            excluded: refused.into_iter().map(|(_, r)| r).collect(),
        }
    }

    pub fn ranges(&self) -> &[String] {
        &self.ranges
    }

    /// Ranges refused with `q=0`.
    pub fn excluded(&self) -> &[String] {
        &self.excluded
    }

    /// Whether `media_type` is refused by an exclusion at least as specific
    /// as the accepted `range` that matched it.
    fn refuses(&self, range: &str, media_type: &str) -> bool {
        self.excluded
            .iter()
            .any(|e| matches(e, media_type) && specificity(e) >= specificity(range))
    }
}

impl fmt::Display for AcceptList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.ranges.join(", "))
    }
}

/// Pick the representation for the first accepted range the operation produces.
///
/// Wildcard ranges (`*/*`, `text/*`) match the first produced representation
/// of a compatible type, in the operation's declared order, that no equally
/// or more specific `q=0` range refuses.
pub fn select(
    accepted: &AcceptList,
    available: &[Representation],
) -> Result<Representation, PipelineError> {
    accepted
        .ranges
        .iter()
        .find_map(|range| {
            available
                .iter()
                .find(|r| matches(range, r.media_type) && !accepted.refuses(range, r.media_type))
        })
        .copied()
        .ok_or_else(|| PipelineError::NotAcceptable {
            accepted: accepted.to_string(),
            available: available
                .iter()
                .map(|r| r.media_type)
                .collect::<Vec<_>>()
                .join(", "),
        })
}

// --- helpers -----------------------------------------------------------------

/// Lowercased `type/subtype` without parameters.
fn essence(range: &str) -> String {
    range
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// `*/*` < `type/*` < `type/subtype`.
fn specificity(range: &str) -> u8 {
    if range == "*/*" {
        0
    } else if range.ends_with("/*") {
        1
    } else {
        2
    }
}

fn matches(range: &str, media_type: &str) -> bool {
    if range == "*/*" || range == media_type {
        return true;
    }
    match range.strip_suffix("/*") {
        Some(top) => media_type
            .split_once('/')
            .is_some_and(|(t, _)| t == top),
        None => false,
    }
}

// --- tests -------------------------------------------------------------------
