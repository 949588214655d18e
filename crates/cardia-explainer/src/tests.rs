//! Integration tests for the Explainer

#[cfg(test)]
mod tests {
    use crate::{
        Explainer, ExplainerConfig, ExplainError, GeneratorAdapter, OutputBounds,
        StructuredExtractor, CANNED_FACTORS, CANNED_RECOMMENDATIONS, CANNED_SUMMARY,
        GENERIC_EXPLANATION,
    };
    use cardia_domain::GenerationRequest;
    use cardia_llm::MockProvider;
    use serde_json::json;

    const STRUCTURED_OUTPUT: &str = r#"Your 61.3% risk reflects several readings that reinforce each other. Blood pressure and cholesterol both sit above their targets, and together they raise the strain on your arteries.

━━━━━━━━━━━━━━━━━━━━
🔍 KEY INSIGHTS
━━━━━━━━━━━━━━━━━━━━
1. Resting BP of 130 mmHg indicates early hypertension
2. Cholesterol at 250 mg/dL suggests plaque build-up risk
3. Age 45 combined with fasting blood sugar raises baseline risk
4. Max heart rate of 150 bpm shows reasonable fitness

💡 YOUR PERSONALIZED WELLNESS STRATEGY
• Reduce sodium intake below 1500 mg per day
• Aim for 150 minutes of moderate exercise weekly
• Monitor blood pressure at home twice a week
• Consult a cardiologist about a lipid panel

🌱 "Small, steady changes protect your heart for years to come."
"#;

    fn explainer(raw: &str) -> (Explainer<MockProvider>, MockProvider) {
        let provider = MockProvider::new(raw);
        let explainer = Explainer::with_defaults(GeneratorAdapter::with_backend(provider.clone()));
        (explainer, provider)
    }

    #[tokio::test]
    async fn test_full_explain_flow() {
        let (explainer, provider) = explainer(STRUCTURED_OUTPUT);

        let request = GenerationRequest::from_inputs(
            json!({"age": 45, "sex": "Male", "restingBP": 130, "cholesterol": 250}),
            json!({"risk": 0.613, "riskLevel": "Moderate"}),
        );

        let response = explainer.explain(&request).await.unwrap();

        assert_eq!(provider.call_count(), 1);
        assert!(response.explanation.starts_with("Your 61.3% risk reflects"));
        assert!(response.explanation.chars().count() <= 500);

        assert_eq!(
            response.key_factors,
            vec![
                "Resting BP of 130 mmHg indicates early hypertension".to_string(),
                "Cholesterol at 250 mg/dL suggests plaque build-up risk".to_string(),
                "Age 45 combined with fasting blood sugar raises baseline risk".to_string(),
            ]
        );
        assert_eq!(
            response.recommendations,
            vec![
                "Reduce sodium intake below 1500 mg per day".to_string(),
                "Aim for 150 minutes of moderate exercise weekly".to_string(),
                "Monitor blood pressure at home twice a week".to_string(),
            ]
        );
        assert_eq!(
            response.summary,
            "🌱 \"Small, steady changes protect your heart for years to come."
        );
    }

    #[tokio::test]
    async fn test_unstructured_output_uses_fallbacks() {
        let raw = "The patient has elevated risk due to high blood pressure. Lifestyle changes are advised to reduce overall risk.";
        let (explainer, _) = explainer(raw);

        let response = explainer
            .explain(&GenerationRequest::with_prompt("p"))
            .await
            .unwrap();

        // The whole text is one line, accumulated as explanation
        assert_eq!(response.explanation, raw);
        // Broader scan picks up the same line for both lists
        assert_eq!(response.key_factors, vec![raw.to_string()]);
        assert_eq!(response.recommendations, vec![raw.to_string()]);
        assert_eq!(
            response.summary,
            "Lifestyle changes are advised to reduce overall risk."
        );
    }

    #[tokio::test]
    async fn test_empty_output_is_fully_canned() {
        let (explainer, _) = explainer("");

        let response = explainer
            .explain(&GenerationRequest::default())
            .await
            .unwrap();

        assert_eq!(response.explanation, GENERIC_EXPLANATION);
        assert_eq!(response.key_factors, CANNED_FACTORS.to_vec());
        assert_eq!(response.recommendations, CANNED_RECOMMENDATIONS.to_vec());
        assert_eq!(response.summary, CANNED_SUMMARY);
    }

    #[tokio::test]
    async fn test_unavailable_backend_is_distinguishable_from_failure() {
        let unavailable: Explainer<MockProvider> =
            Explainer::with_defaults(GeneratorAdapter::uninitialized());
        let failing = Explainer::with_defaults(GeneratorAdapter::with_backend(
            MockProvider::failing("model crashed"),
        ));

        let request = GenerationRequest::with_prompt("p");
        assert_eq!(
            unavailable.explain(&request).await,
            Err(ExplainError::BackendUnavailable)
        );
        assert!(matches!(
            failing.explain(&request).await,
            Err(ExplainError::GenerationFailure(_))
        ));
    }

    #[test]
    fn test_marked_sections_keep_markers_out_of_every_field() {
        let raw = "🔍 KEY INSIGHTS\n- Elevated cholesterol indicates arterial risk\n💡 Recommendations:\n- Reduce sodium intake and monitor blood pressure\n\"Stay heart healthy\"";
        let extracted = StructuredExtractor::default().extract(raw);
        let bounded = OutputBounds::default().apply(extracted);

        assert!(bounded.key_factors[0].contains("cholesterol"));
        assert!(bounded.recommendations[0].contains("sodium"));
        assert_eq!(bounded.summary, "Stay heart healthy");

        // No narrative line exists, so the explanation comes from the fallback
        assert!(!bounded.explanation.is_empty());
        for field in [&bounded.explanation, &bounded.summary] {
            assert!(!field.contains("KEY INSIGHTS"));
            assert!(!field.contains("Recommendations:"));
        }
        for item in bounded.key_factors.iter().chain(bounded.recommendations.iter()) {
            assert!(!item.contains("KEY INSIGHTS"));
            assert!(!item.contains("Recommendations:"));
        }
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let extractor = StructuredExtractor::default();
        assert_eq!(
            extractor.extract(STRUCTURED_OUTPUT),
            extractor.extract(STRUCTURED_OUTPUT)
        );
    }

    #[test]
    fn test_custom_rules_change_classification() {
        let mut config = ExplainerConfig::default();
        config.rules.factor_markers = vec!["FACTORS:".to_string()];

        let extractor = StructuredExtractor::new(config.rules, config.canned);
        let scanned = extractor.scan("FACTORS:\n- Elevated cholesterol indicates arterial risk");
        assert_eq!(
            scanned.key_factors,
            vec!["Elevated cholesterol indicates arterial risk".to_string()]
        );

        // The default magnifier marker is no longer recognized
        let scanned = extractor.scan("🔍 KEY INSIGHTS\n- Elevated cholesterol indicates arterial risk");
        assert!(scanned.key_factors.is_empty());
    }

    #[test]
    fn test_bounds_on_oversized_output() {
        let long_sentence = "word ".repeat(200);
        let extractor = StructuredExtractor::default();
        let structured = extractor.extract(&format!("{}\n\"{}\"", long_sentence, long_sentence));
        let bounded = OutputBounds::default().apply(structured);
        assert!(bounded.explanation.chars().count() <= 500);
        assert!(bounded.summary.chars().count() <= 200);
    }
}

#[cfg(test)]
mod proptests {
    use crate::{OutputBounds, StructuredExtractor};
    use proptest::prelude::*;

    /// Lines built from the vocabulary the extractor reacts to
    fn line_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("🔍 KEY INSIGHTS".to_string()),
            Just("💡 Recommendations:".to_string()),
            Just("━━━━━━━━".to_string()),
            Just("\"Stay heart healthy\"".to_string()),
            Just("- Elevated cholesterol indicates arterial risk".to_string()),
            Just("- Reduce sodium intake and monitor blood pressure".to_string()),
            "[a-zA-Z .,'\"-]{0,120}",
            ".{0,80}",
        ]
    }

    proptest! {
        /// Property: every field is populated for any raw text
        #[test]
        fn test_extraction_is_total(raw in ".{0,400}") {
            let extracted = StructuredExtractor::default().extract(&raw);
            let bounded = OutputBounds::default().apply(extracted);
            prop_assert!(!bounded.explanation.is_empty());
            prop_assert!(!bounded.summary.is_empty());
            prop_assert!(!bounded.key_factors.is_empty());
            prop_assert!(!bounded.recommendations.is_empty());
        }

        /// Property: bounds hold for structured-looking text
        #[test]
        fn test_bounds_hold(lines in prop::collection::vec(line_strategy(), 0..40)) {
            let raw = lines.join("\n");
            let extracted = StructuredExtractor::default().extract(&raw);
            let bounded = OutputBounds::default().apply(extracted);
            prop_assert!(bounded.explanation.chars().count() <= 500);
            prop_assert!(bounded.summary.chars().count() <= 200);
            prop_assert!(bounded.key_factors.len() <= 3);
            prop_assert!(bounded.recommendations.len() <= 3);
            prop_assert!(bounded.is_complete());
        }

        /// Property: applying the bounds twice changes nothing
        #[test]
        fn test_bounds_are_idempotent(lines in prop::collection::vec(line_strategy(), 0..40)) {
            let raw = lines.join("\n");
            let bounds = OutputBounds::default();
            let once = bounds.apply(StructuredExtractor::default().extract(&raw));
            let twice = bounds.apply(once.clone());
            prop_assert_eq!(once, twice);
        }

        /// Property: marker lines never leak into any field
        ///
        /// Both marker glyphs are themselves markers, so any line carrying
        /// one is a marker line and must not surface anywhere.
        #[test]
        fn test_marker_lines_never_in_output(lines in prop::collection::vec(line_strategy(), 0..40)) {
            let raw = lines.join("\n");
            let extracted = StructuredExtractor::default().extract(&raw);
            let fields = [&extracted.explanation, &extracted.summary]
                .into_iter()
                .chain(extracted.key_factors.iter())
                .chain(extracted.recommendations.iter());
            for field in fields {
                prop_assert!(!field.contains('🔍'));
                prop_assert!(!field.contains('💡'));
            }
        }
    }
}
