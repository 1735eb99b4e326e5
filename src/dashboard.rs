//! Dashboard - the user actions wired to store, gateway and session
//!
//! Each action runs synchronously to completion. Generation failures are
//! turned into displayable text here; persistence failures are returned.

use log::{debug, info, warn};

use crate::analytics::AnalyticsOverview;
use crate::config::GenerationSettings;
use crate::error::PersistenceError;
use crate::evaluation::{EvaluationOutcome, EvaluationRunner};
use crate::gateway::GenerationGateway;
use crate::session::ChatSession;
use crate::storage::{RecordStore, Role};

/// Prefix of the report-analysis prompt; the extracted report text follows it
pub const ANALYSIS_PROMPT_PREFIX: &str = "Analyze the following medical report and provide structured diagnostic insights (non-medical advice). Include Summary, Risk Factors, and Possible Next Steps:\n";

/// Reply to one chat message
#[derive(Debug, Clone, PartialEq)]
pub struct ChatTurn {
    /// Generated text, or `Error: <message>`
    pub reply: String,
    pub failed: bool,
}

/// Result of analyzing an extracted report
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    /// Analysis text, already logged
    Completed(String),
    /// Generation failed; nothing was logged
    Failed(String),
}

pub fn analysis_prompt(report_text: &str) -> String {
    format!("{}{}", ANALYSIS_PROMPT_PREFIX, report_text)
}

pub struct Dashboard {
    store: RecordStore,
    gateway: Box<dyn GenerationGateway>,
    settings: GenerationSettings,
    session: ChatSession,
}

impl Dashboard {
    pub fn new(
        store: RecordStore,
        gateway: Box<dyn GenerationGateway>,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            store,
            gateway,
            settings,
            session: ChatSession::new(),
        }
    }

    /// Send one chat message and log both sides of the exchange
    pub fn send_message(&mut self, prompt: &str) -> Result<ChatTurn, PersistenceError> {
        self.store.insert_interaction(&Role::User, prompt)?;
        self.session.append(Role::User, prompt);

        let (reply, failed) = match self.gateway.generate(prompt, &self.settings.params()) {
            Ok(text) => (text, false),
            Err(e) => {
                warn!("chat generation failed (error={})", e);
                (format!("Error: {}", e), true)
            }
        };

        self.store.insert_interaction(&Role::Assistant, &reply)?;
        self.session.append(Role::Assistant, reply.clone());
        debug!(
            "chat turn complete (history={}, failed={})",
            self.session.len(),
            failed
        );

        Ok(ChatTurn { reply, failed })
    }

    /// Ask the model for structured insights on an extracted report
    ///
    /// Only a successful analysis is logged.
    pub fn analyze_report(&self, report_text: &str) -> Result<AnalysisOutcome, PersistenceError> {
        let prompt = analysis_prompt(report_text);
        match self.gateway.generate(&prompt, &self.settings.params()) {
            Ok(analysis) => {
                let id = self.store.insert_interaction(&Role::ReportAnalysis, &analysis)?;
                info!(
                    "report analysis logged (id={}, chars={})",
                    id,
                    analysis.len()
                );
                Ok(AnalysisOutcome::Completed(analysis))
            }
            Err(e) => {
                warn!("report analysis failed (error={})", e);
                Ok(AnalysisOutcome::Failed(e.to_string()))
            }
        }
    }

    /// Run the benchmark over `prompts` with the current model and token budget
    pub fn run_evaluation<S: AsRef<str>>(
        &self,
        prompts: &[S],
    ) -> Result<Vec<EvaluationOutcome>, PersistenceError> {
        EvaluationRunner::new(&self.store, &*self.gateway).run(
            prompts,
            self.settings.model,
            self.settings.max_tokens,
        )
    }

    /// Aggregates over a fresh snapshot of both logs
    pub fn analytics_overview(
        &self,
        top_k: usize,
        bucket_count: usize,
    ) -> Result<AnalyticsOverview, PersistenceError> {
        let interactions = self.store.query_interactions()?;
        let evaluations = self.store.query_evaluations()?;
        Ok(AnalyticsOverview::compute(
            &interactions,
            &evaluations,
            top_k,
            bucket_count,
        ))
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }
}
