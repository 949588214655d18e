//! Last-resort content for fields the line scan left short
//!
//! Runs after every scan and is total: each field ends up populated,
//! first from a wider pass over the raw text and then from canned content.

use crate::rules::ExtractionRules;
use cardia_domain::StructuredExplanation;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Explanation used when the raw text is empty
pub const GENERIC_EXPLANATION: &str =
    "Cardiovascular risk assessment completed with detailed parameter analysis.";

/// Key factors used when nothing qualifies
pub const CANNED_FACTORS: [&str; 3] = [
    "Multiple cardiovascular parameters analyzed for risk correlation",
    "Blood pressure and lipid profile impact arterial health",
    "Age-related factors influence baseline cardiovascular risk",
];

/// Recommendations used when nothing qualifies
pub const CANNED_RECOMMENDATIONS: [&str; 3] = [
    "Focus on heart-healthy Mediterranean-style diet with emphasis on fiber and omega-3s",
    "Maintain consistent aerobic exercise (150 minutes weekly) to improve cardiovascular efficiency",
    "Regular monitoring of key biomarkers (BP, lipid panel) for trend analysis",
];

/// Summary used when no sentence qualifies
pub const CANNED_SUMMARY: &str =
    "Your cardiovascular health data provides actionable insights for risk management.";

/// Fixed fallback strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CannedContent {
    /// Explanation for empty raw text
    pub explanation: String,

    /// Key factors list
    pub key_factors: Vec<String>,

    /// Recommendations list
    pub recommendations: Vec<String>,

    /// Summary sentence
    pub summary: String,
}

impl Default for CannedContent {
    fn default() -> Self {
        Self {
            explanation: GENERIC_EXPLANATION.to_string(),
            key_factors: CANNED_FACTORS.iter().map(|s| s.to_string()).collect(),
            recommendations: CANNED_RECOMMENDATIONS.iter().map(|s| s.to_string()).collect(),
            summary: CANNED_SUMMARY.to_string(),
        }
    }
}

impl CannedContent {
    /// Every canned field must be non-empty for extraction to stay total
    pub fn validate(&self) -> Result<(), String> {
        if self.explanation.trim().is_empty() {
            return Err("canned explanation must not be empty".to_string());
        }
        if self.summary.trim().is_empty() {
            return Err("canned summary must not be empty".to_string());
        }
        if self.key_factors.is_empty() || self.key_factors.iter().any(|f| f.trim().is_empty()) {
            return Err("canned key_factors must hold non-empty entries".to_string());
        }
        if self.recommendations.is_empty()
            || self.recommendations.iter().any(|r| r.trim().is_empty())
        {
            return Err("canned recommendations must hold non-empty entries".to_string());
        }
        Ok(())
    }
}

/// Fills in whatever the primary scan could not
pub struct FallbackSynthesizer<'a> {
    rules: &'a ExtractionRules,
    canned: &'a CannedContent,
}

impl<'a> FallbackSynthesizer<'a> {
    /// Create a synthesizer over the given rules and canned content
    pub fn new(rules: &'a ExtractionRules, canned: &'a CannedContent) -> Self {
        Self { rules, canned }
    }

    /// Complete a scan result
    ///
    /// `lines` are the trimmed non-empty lines of the raw output. Section
    /// marker lines are never drawn on by any tier.
    pub fn complete(
        &self,
        scanned: StructuredExplanation,
        lines: &[&str],
    ) -> StructuredExplanation {
        let StructuredExplanation {
            explanation,
            key_factors,
            recommendations,
            summary,
        } = scanned;

        let text = lines
            .iter()
            .copied()
            .filter(|line| self.rules.section_marker(line).is_none())
            .collect::<Vec<_>>()
            .join("\n");

        StructuredExplanation {
            explanation: self.explanation(explanation, &text),
            key_factors: self.fill_list(
                key_factors,
                lines,
                &self.rules.fallback_factor_terms,
                &self.canned.key_factors,
            ),
            recommendations: self.fill_list(
                recommendations,
                lines,
                &self.rules.fallback_recommendation_terms,
                &self.canned.recommendations,
            ),
            summary: self.summary(summary, &text),
        }
    }

    /// First sentence, then raw prefix, then the generic sentence
    fn explanation(&self, current: String, text: &str) -> String {
        if !current.is_empty() && current.chars().count() >= self.rules.min_explanation_length {
            return current;
        }
        if text.is_empty() {
            debug!("Explanation fallback: canned");
            return self.canned.explanation.clone();
        }

        let min = self.rules.explanation_sentence_length;
        match sentences(text, min).next() {
            Some(sentence) => format!("{}.", sentence),
            None => text.chars().take(self.rules.raw_prefix_length).collect(),
        }
    }

    /// Wider term scan over every non-marker line, then canned items
    fn fill_list(
        &self,
        mut items: Vec<String>,
        lines: &[&str],
        terms: &[String],
        canned: &[String],
    ) -> Vec<String> {
        if items.len() < self.rules.min_list_items {
            for line in lines {
                if self.rules.section_marker(line).is_some()
                    || !self.rules.matches_fallback(line, terms)
                {
                    continue;
                }
                let cleaned = self.rules.clean_item(line);
                if !items.iter().any(|existing| existing == cleaned) {
                    items.push(cleaned.to_string());
                }
                if items.len() >= self.rules.fallback_list_cap {
                    break;
                }
            }
        }

        if items.is_empty() {
            debug!("List fallback: canned");
            canned.to_vec()
        } else {
            items
        }
    }

    /// Last qualifying sentence, then the canned summary
    fn summary(&self, current: String, text: &str) -> String {
        if !current.trim().is_empty() {
            return current;
        }
        match sentences(text, self.rules.summary_sentence_length).last() {
            Some(sentence) => format!("{}.", sentence),
            None => self.canned.summary.clone(),
        }
    }
}

/// Period-separated segments, trimmed, longer than `min` characters
fn sentences(text: &str, min: usize) -> impl Iterator<Item = &str> {
    text.split('.')
        .map(str::trim)
        .filter(move |s| s.chars().count() > min)
}
