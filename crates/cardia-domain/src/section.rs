//! Section module - the extractor's cursor over generated text

use std::fmt;

/// Section of the structured output that subsequent lines are classified into
///
/// This is a cursor, not a property of a line: it starts at `Explanation` and
/// moves whenever a section marker is seen.
/// - Explanation: free narrative before any marker
/// - Factors: key factor bullet points
/// - Recommendations: actionable items
/// - Summary: the closing line (captured directly, never accumulated)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Section {
    /// Narrative text (initial section)
    #[default]
    Explanation,

    /// Key factors list
    Factors,

    /// Recommendations list
    Recommendations,

    /// One-line summary
    Summary,
}

impl Section {
    /// Get the section name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Explanation => "explanation",
            Section::Factors => "factors",
            Section::Recommendations => "recommendations",
            Section::Summary => "summary",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
