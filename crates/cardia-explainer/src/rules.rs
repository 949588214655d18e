//! Marker and keyword tables that drive line classification
//!
//! Every table the extractor consults lives here as data so it can be
//! loaded from TOML, replaced, and tested on its own.

use cardia_domain::Section;
use serde::{Deserialize, Serialize};

/// How a single trimmed line is treated before content accumulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    /// Section header: moves the cursor, never contributes text
    Marker(Section),
    /// Quoted or motivational closing line, captured as the summary
    Summary,
    /// Divider or fragment too short to carry content
    Noise,
    /// Anything else
    Content,
}

/// Lexical classification rules for generated text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionRules {
    /// Substrings that open the key factors section
    pub factor_markers: Vec<String>,

    /// Substrings that open the recommendations section
    pub recommendation_markers: Vec<String>,

    /// Symbols that flag a motivational closing line
    pub summary_symbols: Vec<String>,

    /// Glyphs that make up divider lines
    pub divider_glyphs: Vec<char>,

    /// Prefixes that mark a line as a list item (numbered prefixes are detected separately)
    pub list_prefixes: Vec<String>,

    /// Leading characters removed from list items
    pub strip_chars: String,

    /// Keywords a key factor must contain (lowercase)
    pub factor_keywords: Vec<String>,

    /// Keywords a recommendation must contain (lowercase)
    pub action_keywords: Vec<String>,

    /// Wider terms used by the key factor fallback scan (lowercase)
    pub fallback_factor_terms: Vec<String>,

    /// Wider terms used by the recommendation fallback scan (lowercase)
    pub fallback_recommendation_terms: Vec<String>,

    /// Explanation stops accepting lines once it reaches this many characters
    pub explanation_soft_cap: usize,

    /// Lines shorter than this are noise
    pub min_line_length: usize,

    /// A cleaned list item must be longer than this
    pub min_item_length: usize,

    /// A line must be longer than this to be picked up by a fallback scan
    pub fallback_line_length: usize,

    /// Lists with fewer entries than this trigger the fallback scan
    pub min_list_items: usize,

    /// The fallback scan stops once a list holds this many entries
    pub fallback_list_cap: usize,

    /// Explanations shorter than this are resynthesized
    pub min_explanation_length: usize,

    /// A sentence must be longer than this to become the explanation
    pub explanation_sentence_length: usize,

    /// A sentence must be longer than this to become the summary
    pub summary_sentence_length: usize,

    /// Raw text prefix used when no sentence qualifies
    pub raw_prefix_length: usize,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for ExtractionRules {
    fn default() -> Self {
        Self {
            factor_markers: strings(&[
                "🔍",
                "KEY INSIGHTS",
                "Key Insights",
                "key insights",
                "INSIGHTS:",
                "Insights:",
            ]),
            recommendation_markers: strings(&[
                "💡",
                "WELLNESS STRATEGY",
                "Wellness Strategy",
                "PERSONALIZED",
                "RECOMMENDATIONS",
                "Recommendations:",
                "recommendations:",
            ]),
            summary_symbols: strings(&["🌱", "🎯", "💪"]),
            divider_glyphs: vec!['━', '─', '═', '—', '=', '_'],
            list_prefixes: strings(&["•", "✓", "-", "*"]),
            strip_chars: "-*•✓0123456789. ".to_string(),
            factor_keywords: strings(&[
                "cholesterol",
                "blood pressure",
                "bp",
                "heart rate",
                "age",
                "mg/dl",
                "mmhg",
                "bpm",
                "angina",
                "risk",
                "indicates",
                "suggests",
                "combined",
                "relationship",
                "correlation",
                "physiological",
            ]),
            action_keywords: strings(&[
                "reduce",
                "increase",
                "maintain",
                "monitor",
                "focus",
                "aim",
                "target",
                "consult",
                "track",
                "avoid",
                "include",
                "consider",
                "diet",
                "exercise",
                "lifestyle",
                "stress",
                "sodium",
                "physical",
            ]),
            fallback_factor_terms: strings(&["cholesterol", "pressure", "heart", "risk", "age"]),
            fallback_recommendation_terms: strings(&[
                "reduce",
                "increase",
                "maintain",
                "monitor",
                "consult",
                "avoid",
                "limit",
                "diet",
                "exercise",
                "activity",
                "lifestyle",
                "check",
            ]),
            explanation_soft_cap: 400,
            min_line_length: 5,
            min_item_length: 15,
            fallback_line_length: 20,
            min_list_items: 2,
            fallback_list_cap: 3,
            min_explanation_length: 50,
            explanation_sentence_length: 30,
            summary_sentence_length: 20,
            raw_prefix_length: 300,
        }
    }
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|n| haystack.contains(n.as_str()))
}

impl ExtractionRules {
    /// Classify a trimmed, non-empty line
    ///
    /// Marker checks come first, so a header line is never mistaken for content.
    pub fn classify(&self, line: &str) -> LineClass {
        if let Some(section) = self.section_marker(line) {
            LineClass::Marker(section)
        } else if self.is_summary_line(line) {
            LineClass::Summary
        } else if self.is_noise(line) {
            LineClass::Noise
        } else {
            LineClass::Content
        }
    }

    /// The section a marker line opens, if it is one
    pub fn section_marker(&self, line: &str) -> Option<Section> {
        if contains_any(line, &self.factor_markers) {
            Some(Section::Factors)
        } else if contains_any(line, &self.recommendation_markers) {
            Some(Section::Recommendations)
        } else {
            None
        }
    }

    /// Quoted on both ends, or carrying a motivational symbol
    pub fn is_summary_line(&self, line: &str) -> bool {
        let quoted = line.len() >= 2 && line.starts_with('"') && line.ends_with('"');
        quoted || contains_any(line, &self.summary_symbols)
    }

    /// Summary text with surrounding quotes removed
    pub fn summary_text(&self, line: &str) -> String {
        line.trim_matches(|c| c == '"' || c == '\'').trim().to_string()
    }

    /// Divider lines and fragments shorter than `min_line_length`
    pub fn is_noise(&self, line: &str) -> bool {
        let trimmed = line.trim();
        trimmed.is_empty()
            || trimmed.chars().count() < self.min_line_length
            || trimmed.chars().all(|c| self.divider_glyphs.contains(&c))
    }

    /// Bulleted, dashed, checked, or numbered line
    pub fn is_list_item(&self, line: &str) -> bool {
        if self.list_prefixes.iter().any(|p| line.starts_with(p.as_str())) {
            return true;
        }
        let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
        digits > 0 && matches!(line[digits..].chars().next(), Some('.') | Some(')'))
    }

    /// Remove leading bullets, numbering and punctuation
    pub fn clean_item<'a>(&self, line: &'a str) -> &'a str {
        line.trim_start_matches(|c| self.strip_chars.contains(c))
    }

    /// Cleaned key factor candidate, if it passes the length and keyword gate
    pub fn accept_factor(&self, line: &str) -> Option<String> {
        self.accept_item(line, &self.factor_keywords)
    }

    /// Cleaned recommendation candidate, if it passes the length and keyword gate
    pub fn accept_recommendation(&self, line: &str) -> Option<String> {
        self.accept_item(line, &self.action_keywords)
    }

    fn accept_item(&self, line: &str, keywords: &[String]) -> Option<String> {
        let cleaned = self.clean_item(line);
        if cleaned.chars().count() > self.min_item_length
            && contains_any(&cleaned.to_lowercase(), keywords)
        {
            Some(cleaned.to_string())
        } else {
            None
        }
    }

    /// Whether a line qualifies for a fallback scan over `terms`
    pub fn matches_fallback(&self, line: &str, terms: &[String]) -> bool {
        line.chars().count() > self.fallback_line_length
            && contains_any(&line.to_lowercase(), terms)
    }

    /// Validate the rule set
    pub fn validate(&self) -> Result<(), String> {
        let tables = [
            ("factor_markers", &self.factor_markers),
            ("recommendation_markers", &self.recommendation_markers),
            ("factor_keywords", &self.factor_keywords),
            ("action_keywords", &self.action_keywords),
            ("fallback_factor_terms", &self.fallback_factor_terms),
            ("fallback_recommendation_terms", &self.fallback_recommendation_terms),
        ];
        for (name, table) in tables {
            if table.is_empty() {
                return Err(format!("{} must not be empty", name));
            }
            if table.iter().any(|entry| entry.is_empty()) {
                return Err(format!("{} must not contain empty entries", name));
            }
        }
        for (name, table) in [
            ("factor_keywords", &self.factor_keywords),
            ("action_keywords", &self.action_keywords),
            ("fallback_factor_terms", &self.fallback_factor_terms),
            ("fallback_recommendation_terms", &self.fallback_recommendation_terms),
        ] {
            if table.iter().any(|k| k.to_lowercase() != *k) {
                return Err(format!("{} must be lowercase", name));
            }
        }
        if self.strip_chars.chars().any(char::is_alphabetic) {
            return Err("strip_chars must not contain letters".to_string());
        }
        if self.min_list_items > self.fallback_list_cap {
            return Err("min_list_items cannot exceed fallback_list_cap".to_string());
        }
        if self.fallback_list_cap == 0 {
            return Err("fallback_list_cap must be greater than 0".to_string());
        }
        Ok(())
    }
}
