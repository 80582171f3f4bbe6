//! End-to-end request processing.

use crate::documents::DocumentExtractor;
use crate::evaluation::Evaluator;
use crate::evidence;
use crate::patterns::{condensed_document, CountingSearch, PatternTable};
use crate::prompts::PromptSet;
use crate::reasoning::Reasoner;
use crate::router::{QueryRouter, Route};
use crate::synthesis;
use crate::types::{DocumentText, ProcessResponse, RuntimeRequest};
use chrono::Utc;
use docqa_core::config::{AppConfig, PipelineConfig};
use docqa_core::AppResult;
use docqa_llm::LlmClient;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

/// Routing decision plus the counting search over a document set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub route: Route,
    pub search: CountingSearch,
}

/// Route `prompt` and run the counting search over all documents' text.
pub fn scan_documents(
    router: &QueryRouter,
    documents: &[DocumentText],
    prompt: &str,
    settings: &PipelineConfig,
) -> ScanReport {
    let route = router.route(prompt);
    let search = counting_search(router, documents, prompt, settings);
    ScanReport { route, search }
}

fn counting_search(
    router: &QueryRouter,
    documents: &[DocumentText],
    prompt: &str,
    settings: &PipelineConfig,
) -> CountingSearch {
    let combined = documents
        .iter()
        .map(|doc| doc.full_text.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    router.patterns().execute_counting_search(
        prompt,
        &combined,
        settings.context_lines,
        settings.max_condensed_matches,
    )
}

/// The composed answer pipeline.
///
/// Holds only read-only state, so one instance can serve concurrent requests.
pub struct Pipeline {
    extractor: Arc<dyn DocumentExtractor>,
    reasoner: Reasoner,
    prompts: PromptSet,
    router: QueryRouter,
    settings: PipelineConfig,
}

impl Pipeline {
    pub fn new(
        extractor: Arc<dyn DocumentExtractor>,
        reasoner: Reasoner,
        prompts: PromptSet,
        router: QueryRouter,
        settings: PipelineConfig,
    ) -> Self {
        Self {
            extractor,
            reasoner,
            prompts,
            router,
            settings,
        }
    }

    /// Assemble a pipeline from configuration and a reasoning client.
    pub fn from_config(
        config: &AppConfig,
        extractor: Arc<dyn DocumentExtractor>,
        client: Arc<dyn LlmClient>,
    ) -> AppResult<Self> {
        let patterns = Arc::new(PatternTable::with_overrides(&config.patterns)?);
        let router = QueryRouter::new(patterns)?;
        let prompts = PromptSet::load(&config.workspace)?;
        let reasoner = Reasoner::new(client, config.model.clone())
            .with_max_tokens(config.pipeline.max_tokens);

        Ok(Self::new(
            extractor,
            reasoner,
            prompts,
            router,
            config.pipeline.clone(),
        ))
    }

    pub fn provider_name(&self) -> &str {
        self.reasoner.provider_name()
    }

    /// Answer one request and score the answer.
    pub async fn process(&self, request: &RuntimeRequest) -> AppResult<ProcessResponse> {
        let span = tracing::info_span!("request", request_id = %request.request_id);

        let result = self.run(request).instrument(span.clone()).await;
        if let Err(e) = &result {
            span.in_scope(|| tracing::error!("Request failed: {}", e));
        }
        result
    }

    async fn run(&self, request: &RuntimeRequest) -> AppResult<ProcessResponse> {
        let started = Instant::now();
        tracing::info!(
            "Processing request with {} file(s): {}",
            request.file_paths.len(),
            request.prompt
        );

        let documents = self.extractor.extract(&request.file_paths).await?;
        let working_set = self.working_set(&documents, &request.prompt);

        let draft =
            synthesis::draft(&self.reasoner, &self.prompts, &working_set, &request.prompt).await?;
        let condensed =
            synthesis::condense(&self.reasoner, &self.prompts, &draft, &request.prompt).await?;

        let outcome = Evaluator::new(&self.reasoner, &self.prompts)
            .parallel(self.settings.parallel_evaluation)
            .evaluate(&request.prompt, &draft, &condensed, &working_set)
            .await?;

        let sections_used = evidence::extract(&outcome.final_answer, &documents, &request.prompt);

        let elapsed = started.elapsed().as_secs_f64();
        let processing_time_seconds = (elapsed * 100.0).round() / 100.0;

        tracing::info!(
            "Request complete in {:.2}s (overall {:.2})",
            processing_time_seconds,
            outcome.metrics.overall_score
        );

        Ok(ProcessResponse {
            request_id: request.request_id.clone(),
            agent_1_output: draft,
            agent_2_output: condensed,
            agent_3_output: outcome.report,
            final_answer: outcome.final_answer,
            metrics: outcome.metrics,
            sections_used,
            processing_time_seconds,
            timestamp: Utc::now(),
        })
    }

    /// The documents the reasoning stages see: the condensed match context on
    /// the fast path, the extracted documents otherwise.
    fn working_set(&self, documents: &[DocumentText], prompt: &str) -> Vec<DocumentText> {
        let route = self.router.route(prompt);
        if !route.fast_path {
            return documents.to_vec();
        }

        let search = counting_search(&self.router, documents, prompt, &self.settings);
        tracing::info!(
            "Fast path: {} of {} matches condensed",
            search.matches.len(),
            search.total_matches
        );

        vec![condensed_document(
            &search,
            self.settings.max_condensed_matches,
        )]
    }
}
