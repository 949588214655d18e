//! Parse raw generated text into a structured explanation
//!
//! A single pass over the non-empty lines with a section cursor. Marker
//! lines move the cursor; everything else is accumulated according to
//! where the cursor currently sits. The fallback tier then fills any gaps,
//! so `extract` never fails.

use crate::fallback::{CannedContent, FallbackSynthesizer};
use crate::rules::{ExtractionRules, LineClass};
use cardia_domain::{Section, StructuredExplanation};
use tracing::{debug, info};

/// Line-scanning extractor
#[derive(Debug, Clone, Default)]
pub struct StructuredExtractor {
    rules: ExtractionRules,
    canned: CannedContent,
}

/// Per-call scan state
#[derive(Debug, Default)]
struct ScanState {
    cursor: Section,
    explanation: String,
    key_factors: Vec<String>,
    recommendations: Vec<String>,
    summary: String,
}

impl ScanState {
    fn feed(&mut self, rules: &ExtractionRules, line: &str) {
        match rules.classify(line) {
            LineClass::Marker(section) => {
                debug!("Section marker moves cursor to {}", section);
                self.cursor = section;
                return;
            }
            LineClass::Summary => {
                // Last summary line wins
                self.summary = rules.summary_text(line);
                self.cursor = Section::Summary;
                return;
            }
            LineClass::Noise => return,
            LineClass::Content => {}
        }

        match self.cursor {
            Section::Explanation => {
                if self.explanation.chars().count() < rules.explanation_soft_cap
                    && !rules.is_list_item(line)
                {
                    self.explanation.push_str(line);
                    self.explanation.push(' ');
                }
            }
            Section::Factors => {
                if let Some(factor) = rules.accept_factor(line) {
                    self.key_factors.push(factor);
                }
            }
            Section::Recommendations => {
                if let Some(recommendation) = rules.accept_recommendation(line) {
                    self.recommendations.push(recommendation);
                }
            }
            Section::Summary => {}
        }
    }

    fn into_explanation(self) -> StructuredExplanation {
        StructuredExplanation {
            explanation: self.explanation,
            key_factors: self.key_factors,
            recommendations: self.recommendations,
            summary: self.summary,
        }
    }
}

impl StructuredExtractor {
    /// Create an extractor over custom rules and canned content
    pub fn new(rules: ExtractionRules, canned: CannedContent) -> Self {
        Self { rules, canned }
    }

    /// Primary scan only, before any fallback
    pub fn scan(&self, raw: &str) -> StructuredExplanation {
        let mut state = ScanState::default();
        for line in split_lines(raw.trim()) {
            state.feed(&self.rules, line);
        }
        state.into_explanation()
    }

    /// Scan and complete with fallback content
    ///
    /// Every field of the result is populated. Final length bounds are
    /// applied separately by the assembler.
    pub fn extract(&self, raw: &str) -> StructuredExplanation {
        let lines = split_lines(raw.trim());

        let mut state = ScanState::default();
        for line in &lines {
            state.feed(&self.rules, line);
        }
        let scanned = state.into_explanation();

        let result =
            FallbackSynthesizer::new(&self.rules, &self.canned).complete(scanned, &lines);

        info!(
            "Parsed: {} chars explanation, {} factors, {} recommendations",
            result.explanation.chars().count(),
            result.key_factors.len(),
            result.recommendations.len()
        );

        result
    }
}

fn split_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::{CANNED_FACTORS, CANNED_RECOMMENDATIONS, CANNED_SUMMARY, GENERIC_EXPLANATION};

    fn extractor() -> StructuredExtractor {
        StructuredExtractor::default()
    }

    #[test]
    fn test_empty_text_is_all_canned() {
        let result = extractor().extract("");
        assert_eq!(result.explanation, GENERIC_EXPLANATION);
        assert_eq!(result.key_factors, CANNED_FACTORS.to_vec());
        assert_eq!(result.recommendations, CANNED_RECOMMENDATIONS.to_vec());
        assert_eq!(result.summary, CANNED_SUMMARY);
    }

    #[test]
    fn test_whitespace_only_text_is_all_canned() {
        let result = extractor().extract("  \n\n \t ");
        assert_eq!(result.explanation, GENERIC_EXPLANATION);
        assert_eq!(result.summary, CANNED_SUMMARY);
    }

    #[test]
    fn test_marked_sections() {
        let raw = "🔍 KEY INSIGHTS\n- Elevated cholesterol indicates arterial risk\n💡 Recommendations:\n- Reduce sodium intake and monitor blood pressure\n\"Stay heart healthy\"";
        let result = extractor().extract(raw);

        assert_eq!(result.key_factors[0], "Elevated cholesterol indicates arterial risk");
        assert_eq!(
            result.recommendations,
            vec!["Reduce sodium intake and monitor blood pressure".to_string()]
        );
        assert_eq!(result.summary, "Stay heart healthy");
    }

    #[test]
    fn test_scan_without_fallback() {
        let raw = "Your risk is moderate because several readings are elevated.\n🔍 KEY INSIGHTS\n1. Resting BP of 140 mmHg suggests strain\n2. Cholesterol at 280 mg/dL adds to risk\n💡 YOUR PERSONALIZED PLAN\n• Monitor blood pressure weekly at home\n• Consider a lower sodium diet\n🎯 Every step counts";
        let scanned = extractor().scan(raw);

        assert_eq!(
            scanned.explanation,
            "Your risk is moderate because several readings are elevated. "
        );
        assert_eq!(
            scanned.key_factors,
            vec![
                "Resting BP of 140 mmHg suggests strain".to_string(),
                "Cholesterol at 280 mg/dL adds to risk".to_string(),
            ]
        );
        assert_eq!(
            scanned.recommendations,
            vec![
                "Monitor blood pressure weekly at home".to_string(),
                "Consider a lower sodium diet".to_string(),
            ]
        );
        assert_eq!(scanned.summary, "🎯 Every step counts");
    }

    #[test]
    fn test_marker_switches_cursor_mid_explanation() {
        let raw = "This opening sentence explains the overall cardiovascular picture clearly.\nKey Insights\nAge above 60 indicates higher baseline risk\nThis line would have been explanation text otherwise";
        let result = extractor().extract(raw);

        assert!(!result.explanation.contains("Key Insights"));
        assert!(!result.explanation.contains("otherwise"));
        assert_eq!(result.key_factors[0], "Age above 60 indicates higher baseline risk");
        assert!(result.key_factors.iter().all(|f| !f.contains("Key Insights")));
    }

    #[test]
    fn test_list_items_dropped_from_explanation() {
        let raw = "- a bulleted line before any marker\nA plain narrative line that should be kept in the explanation.";
        let scanned = extractor().scan(raw);
        assert_eq!(
            scanned.explanation,
            "A plain narrative line that should be kept in the explanation. "
        );
    }

    #[test]
    fn test_explanation_soft_cap() {
        let line = "x".repeat(150);
        let raw = format!("{l}\n{l}\n{l}\n{l}", l = line);
        let scanned = extractor().scan(&raw);
        // 151 + 151 = 302 < 400 admits a third line; 453 >= 400 stops the fourth
        assert_eq!(scanned.explanation.chars().count(), 453);
    }

    #[test]
    fn test_keyword_gate_rejects_short_and_irrelevant_lines() {
        let raw = "🔍 KEY INSIGHTS\n- BP is high\n- Sunshine and long walks on the beach\n💡 Recommendations:\n- Exercise\n- Learn to play the violin well";
        let scanned = extractor().scan(raw);
        assert!(scanned.key_factors.is_empty());
        assert!(scanned.recommendations.is_empty());
    }

    #[test]
    fn test_last_summary_wins() {
        let raw = "\"First closing line\"\nSome middle content here\n\"Second closing line\"";
        let scanned = extractor().scan(raw);
        assert_eq!(scanned.summary, "Second closing line");
    }

    #[test]
    fn test_summary_cursor_ignores_content() {
        let raw = "💪 Keep going strong\n- Reduce sodium intake and monitor blood pressure";
        let scanned = extractor().scan(raw);
        assert!(scanned.recommendations.is_empty());
        assert!(scanned.explanation.is_empty());
    }

    #[test]
    fn test_dividers_and_fragments_ignored() {
        let raw = "━━━━━━━━━━━━━━━━\nok\nA sentence long enough to be explanation text.";
        let scanned = extractor().scan(raw);
        assert_eq!(
            scanned.explanation,
            "A sentence long enough to be explanation text. "
        );
    }

    #[test]
    fn test_duplicates_kept_by_primary_scan() {
        let raw = "🔍 KEY INSIGHTS\n- Elevated cholesterol indicates risk\n- Elevated cholesterol indicates risk";
        let scanned = extractor().scan(raw);
        assert_eq!(scanned.key_factors.len(), 2);
    }

    #[test]
    fn test_crlf_line_endings() {
        let raw = "🔍 KEY INSIGHTS\r\n- Elevated cholesterol indicates arterial risk\r\n";
        let scanned = extractor().scan(raw);
        assert_eq!(
            scanned.key_factors,
            vec!["Elevated cholesterol indicates arterial risk".to_string()]
        );
    }
}
