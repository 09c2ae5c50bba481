//! AI analysis: prompt construction plus the call to the local
//! text-generation endpoint.

pub mod guard;
pub mod ollama;

pub use guard::RequestGuard;
pub use ollama::{MockGenerator, OllamaClient};

use thiserror::Error;

use crate::grid::ReferenceData;
use crate::interpretations::InterpretationCatalog;
use crate::models::{Patient, Session};
use crate::projection::{build_evolution_prompt, build_session_prompt, NOT_ENOUGH_SESSIONS_PREFIX};

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("cannot reach Ollama at {0}")]
    Connection(String),

    #[error("request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("model '{model}' not found on Ollama")]
    ModelNotFound { model: String },

    #[error("Ollama error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("cannot parse Ollama response: {0}")]
    ResponseParsing(String),
}

/// Seam between the analysis service and the HTTP client, so tests run
/// without a live Ollama instance.
pub trait TextGenerator {
    fn generate(&self, model: &str, prompt: &str) -> Result<String, AnalysisError>;
    fn list_models(&self) -> Result<Vec<String>, AnalysisError>;

    fn is_model_available(&self, model: &str) -> Result<bool, AnalysisError> {
        Ok(self.list_models()?.iter().any(|m| m.starts_with(model)))
    }
}

/// Builds analysis prompts and runs them through a [`TextGenerator`].
///
/// Holds the [`RequestGuard`] the shell uses to drop stale responses when the
/// practitioner relaunches an analysis before the previous one returns.
pub struct AnalysisService<G> {
    generator: G,
    guard: RequestGuard,
}

impl<G: TextGenerator> AnalysisService<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            guard: RequestGuard::new(),
        }
    }

    pub fn guard(&self) -> &RequestGuard {
        &self.guard
    }

    /// Analyze one session's grids.
    pub fn analyze_session(
        &self,
        model: &str,
        patient: &Patient,
        session: &Session,
        reference: &ReferenceData,
        catalog: &InterpretationCatalog,
    ) -> Result<String, AnalysisError> {
        let prompt = build_session_prompt(patient, session, reference, catalog);
        tracing::info!(model, patient = %patient.id, "running session analysis");
        self.generator.generate(model, &prompt)
    }

    /// Analyze the evolution across a patient's recent sessions.
    ///
    /// With fewer than two sessions the sentinel message is returned as the
    /// result without contacting the model; the caller shows it to the user.
    pub fn analyze_evolution(
        &self,
        model: &str,
        patient: &Patient,
        sessions: &[Session],
    ) -> Result<String, AnalysisError> {
        let prompt = build_evolution_prompt(patient, sessions);
        if prompt.starts_with(NOT_ENOUGH_SESSIONS_PREFIX) {
            tracing::debug!(patient = %patient.id, "not enough sessions for evolution analysis");
            return Ok(prompt);
        }
        tracing::info!(model, patient = %patient.id, "running evolution analysis");
        self.generator.generate(model, &prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{GridBundle, SubFlag};
    use crate::models::Section;
    use chrono::{TimeZone, Utc};

    fn service(response: &str) -> AnalysisService<MockGenerator> {
        AnalysisService::new(MockGenerator::new(response))
    }

    fn fixtures() -> (ReferenceData, InterpretationCatalog) {
        (
            ReferenceData::bundled().unwrap(),
            InterpretationCatalog::bundled().unwrap(),
        )
    }

    #[test]
    fn session_analysis_sends_the_grid_prompt() {
        let (reference, catalog) = fixtures();
        let patient = Patient::new("Marie Dupont");
        let mut session = Session::new(patient.id);
        session.grids = GridBundle::empty()
            .toggle_sub_flag(Section::Organes, 0, 2, SubFlag::Intrinsic)
            .unwrap();

        let service = service("analyse générée");
        let result = service
            .analyze_session("llama3", &patient, &session, &reference, &catalog)
            .unwrap();
        assert_eq!(result, "analyse générée");

        let prompts = service.generator.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("FOIE: Intrinsèque"));
    }

    #[test]
    fn evolution_with_one_session_short_circuits() {
        let patient = Patient::new("Marie Dupont");
        let sessions = [Session::new(patient.id)];

        let service = service("should not be called");
        let result = service
            .analyze_evolution("llama3", &patient, &sessions)
            .unwrap();
        assert!(result.starts_with(NOT_ENOUGH_SESSIONS_PREFIX));
        // The model was never contacted.
        assert!(service.generator.prompts().is_empty());
    }

    #[test]
    fn evolution_with_history_calls_the_model() {
        let patient = Patient::new("Marie Dupont");
        let mut first = Session::new(patient.id);
        first.date = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let mut second = Session::new(patient.id);
        second.date = Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap();

        let service = service("tendance à l'amélioration");
        let result = service
            .analyze_evolution("llama3", &patient, &[first, second])
            .unwrap();
        assert_eq!(result, "tendance à l'amélioration");
        assert!(service.generator.prompts()[0].contains("Nombre de séances analysées: 2"));
    }

    #[test]
    fn stale_generation_is_rejected_by_the_guard() {
        let service = service("ok");
        let first = service.guard().begin();
        let second = service.guard().begin();
        assert!(!service.guard().accepts(first));
        assert!(service.guard().accepts(second));
    }

    #[test]
    fn generator_errors_propagate() {
        let patient = Patient::new("Marie Dupont");
        let session = Session::new(patient.id);
        let (reference, catalog) = fixtures();

        let service = AnalysisService::new(MockGenerator::failing());
        let err = service
            .analyze_session("llama3", &patient, &session, &reference, &catalog)
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Connection(_)));
    }

    #[test]
    fn text_generator_is_object_safe() {
        fn accepts(_: &dyn TextGenerator) {}
        accepts(&MockGenerator::new(""));
    }
}
