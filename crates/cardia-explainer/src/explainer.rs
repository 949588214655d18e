//! Core Explainer implementation

use crate::adapter::GeneratorAdapter;
use crate::assembler::ResponseAssembler;
use crate::config::ExplainerConfig;
use crate::error::ExplainError;
use crate::parser::StructuredExtractor;
use crate::prompt::PromptBuilder;
use crate::types::BackendStatus;
use cardia_domain::{ExplainResponse, GenerationRequest, TextGenerator};
use std::fmt::Display;
use std::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// The Explainer turns a request into a structured explanation
///
/// Prompt selection, generation, extraction and assembly run in a fixed
/// linear order. The only failures are an uninitialized backend and a
/// failed generation call.
pub struct Explainer<G> {
    adapter: GeneratorAdapter<G>,
    extractor: StructuredExtractor,
    assembler: ResponseAssembler,
}

impl<G> Explainer<G>
where
    G: TextGenerator + Send + Sync + 'static,
    G::Error: Display,
{
    /// Create a new Explainer
    pub fn new(adapter: GeneratorAdapter<G>, config: ExplainerConfig) -> Self {
        let ExplainerConfig {
            model_identity,
            rules,
            canned,
            bounds,
        } = config;

        Self {
            adapter,
            extractor: StructuredExtractor::new(rules, canned),
            assembler: ResponseAssembler::new(bounds, model_identity),
        }
    }

    /// Create an Explainer with default configuration
    pub fn with_defaults(adapter: GeneratorAdapter<G>) -> Self {
        Self::new(adapter, ExplainerConfig::default())
    }

    /// Backend readiness and identity
    pub fn status(&self) -> BackendStatus {
        self.adapter.status()
    }

    /// Model identity attached to responses
    pub fn model_identity(&self) -> &str {
        self.assembler.model_identity()
    }

    /// Produce a structured explanation for `request`
    pub async fn explain(
        &self,
        request: &GenerationRequest,
    ) -> Result<ExplainResponse, ExplainError> {
        let span = info_span!("explain", request_id = %Uuid::now_v7());
        self.explain_inner(request).instrument(span).await
    }

    async fn explain_inner(
        &self,
        request: &GenerationRequest,
    ) -> Result<ExplainResponse, ExplainError> {
        if !self.adapter.is_ready() {
            warn!("Rejecting explain request: model not loaded");
            return Err(ExplainError::BackendUnavailable);
        }

        let start = Instant::now();

        let builder = PromptBuilder::from_request(request);
        if builder.uses_prebuilt() {
            debug!("Using caller-supplied contextual prompt");
        } else {
            debug!("Building minimal prompt from inputs and prediction");
        }
        if let Some(hint) = &request.max_length {
            debug!("Ignoring advisory max_length hint of {}", hint);
        }
        let prompt = builder.build();

        info!("Generating explanation (prompt length: {} chars)", prompt.len());

        let raw = self.adapter.generate(&prompt).await.map_err(|e| {
            warn!("Error generating explanation: {}", e);
            e
        })?;
        let raw = raw.trim();

        info!("Generated {} characters", raw.chars().count());

        let structured = self.extractor.extract(raw);
        let response = self.assembler.assemble(structured, start.elapsed());

        info!(
            "Explanation completed in {:.2}s",
            response.processing_time
        );

        Ok(response)
    }
}
