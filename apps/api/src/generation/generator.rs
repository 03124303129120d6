//! Pitch Generation: orchestrates the two Gemini calls and persistence.
//!
//! Flow: idea → pitch prompt → LLM → extract_pitch → (optional) landing prompt
//!       → LLM or fallback template → insert → outcome.
//!
//! Generation failures abort before anything is stored. Landing markup
//! failures are recovered with the fallback page. A failed insert is reported
//! but the generated pitch is still returned.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::extraction::{extract_pitch, ExtractError, ValidationMode};
use crate::generation::landing::{fallback_landing_page, fill_slots, looks_like_html};
use crate::generation::prompts::{
    DEFAULT_LANGUAGE, DEFAULT_TONE, LANDING_PROMPT_TEMPLATE, LANDING_SYSTEM,
    PITCH_PROMPT_TEMPLATE, PITCH_SYSTEM,
};
use crate::llm_client::prompts::{HTML_ONLY_SYSTEM, JSON_ONLY_SYSTEM};
use crate::llm_client::{strip_code_fences, LlmError, TextGenerator};
use crate::models::pitch::{NewPitch, PitchRecord};
use crate::notify::{NoticeKind, Notifier};
use crate::store::PitchStore;

/// Shown to the user when the pitch was generated but not stored.
pub const SAVE_FAILED_NOTICE: &str = "Pitch generated but could not be saved. Please try again.";

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("idea text cannot be empty")]
    EmptyIdea,

    #[error("generation endpoint failed: {0}")]
    Endpoint(#[from] LlmError),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Request body for pitch generation.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    pub user_id: Uuid,
    pub idea: String,
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default = "default_include_landing")]
    pub include_landing: bool,
}

fn default_include_landing() -> bool {
    true
}

/// Result of the full generate-and-save flow.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutcome {
    /// The pitch, with `landing_code` attached when it was requested.
    pub pitch: PitchRecord,
    /// Row id, or `None` when saving failed.
    pub stored_id: Option<i64>,
}

impl GenerationOutcome {
    pub fn saved(&self) -> bool {
        self.stored_id.is_some()
    }
}

#[derive(Clone)]
pub struct PitchGenerator {
    llm: Arc<dyn TextGenerator>,
    mode: ValidationMode,
}

impl PitchGenerator {
    pub fn new(llm: Arc<dyn TextGenerator>, mode: ValidationMode) -> Self {
        Self { llm, mode }
    }

    pub fn validation_mode(&self) -> ValidationMode {
        self.mode
    }

    /// One pitch call, then extraction. Never retried.
    pub async fn generate_pitch(
        &self,
        idea: &str,
        tone: Option<&str>,
        language: Option<&str>,
    ) -> Result<PitchRecord, GenerationError> {
        if idea.trim().is_empty() {
            return Err(GenerationError::EmptyIdea);
        }

        let prompt = build_pitch_prompt(idea, tone, language);
        let system = format!("{PITCH_SYSTEM} {JSON_ONLY_SYSTEM}");
        let text = self.llm.generate(&prompt, &system).await?;

        let pitch = extract_pitch(&text, self.mode).map_err(|e| {
            warn!(
                "Pitch extraction failed ({e}); output started with {:?}",
                text.chars().take(80).collect::<String>()
            );
            e
        })?;

        info!("Generated pitch '{}' ({})", pitch.name, pitch.industry);
        Ok(pitch)
    }

    /// Landing page markup for `pitch`. Always returns a renderable document:
    /// any endpoint failure or non-HTML reply yields the fallback template.
    pub async fn generate_landing_markup(&self, pitch: &PitchRecord) -> String {
        let prompt = build_landing_prompt(pitch);
        let system = format!("{LANDING_SYSTEM} {HTML_ONLY_SYSTEM}");

        match self.llm.generate(&prompt, &system).await {
            Ok(text) => {
                let markup = strip_code_fences(&text);
                if looks_like_html(markup) {
                    return markup.to_string();
                }
                warn!("Landing page reply for '{}' had no HTML; using fallback", pitch.name);
            }
            Err(e) => {
                warn!("Landing page generation for '{}' failed: {e}; using fallback", pitch.name);
            }
        }

        fallback_landing_page(pitch)
    }

    /// Generates a pitch (and landing page when requested) and stores it.
    pub async fn create_pitch(
        &self,
        store: &dyn PitchStore,
        notifier: &dyn Notifier,
        request: &GenerateRequest,
    ) -> Result<GenerationOutcome, GenerationError> {
        let mut pitch = self
            .generate_pitch(
                &request.idea,
                request.tone.as_deref(),
                request.language.as_deref(),
            )
            .await?;
        notifier.notify(&format!("Generated pitch '{}'", pitch.name), NoticeKind::Info);

        let landing_code = if request.include_landing {
            Some(self.generate_landing_markup(&pitch).await)
        } else {
            None
        };

        let stored_id = match NewPitch::from_pitch(
            &pitch,
            request.tone.as_deref().unwrap_or_default(),
            request.language.as_deref().unwrap_or_default(),
            landing_code.clone(),
        ) {
            Ok(row) => match store.insert(request.user_id, &row).await {
                Ok(id) => {
                    notifier.notify("Pitch saved successfully", NoticeKind::Success);
                    Some(id)
                }
                Err(e) => {
                    warn!("Failed to save pitch for {}: {e}", request.user_id);
                    notifier.notify(SAVE_FAILED_NOTICE, NoticeKind::Error);
                    None
                }
            },
            Err(e) => {
                warn!("Failed to serialize pitch for {}: {e}", request.user_id);
                notifier.notify(SAVE_FAILED_NOTICE, NoticeKind::Error);
                None
            }
        };

        pitch.landing_code = landing_code;
        Ok(GenerationOutcome { pitch, stored_id })
    }
}

/// Fills the pitch template. The idea is embedded verbatim.
pub fn build_pitch_prompt(idea: &str, tone: Option<&str>, language: Option<&str>) -> String {
    let pick = |value: Option<&str>, default: &'static str| -> String {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() && v != "auto" => v.to_string(),
            _ => default.to_string(),
        }
    };

    fill_slots(
        PITCH_PROMPT_TEMPLATE,
        &[
            ("tone", pick(tone, DEFAULT_TONE)),
            ("language", pick(language, DEFAULT_LANGUAGE)),
            ("idea", idea.to_string()),
        ],
    )
}

pub fn build_landing_prompt(pitch: &PitchRecord) -> String {
    let colors = pitch
        .colors
        .as_ref()
        .filter(|c| !c.is_empty())
        .map(describe_colors)
        .unwrap_or_else(|| "choose a tasteful palette".to_string());
    let audience = pitch
        .target_audience
        .as_ref()
        .map(|a| a.description.as_str())
        .filter(|d| !d.trim().is_empty())
        .unwrap_or("general audience");

    fill_slots(
        LANDING_PROMPT_TEMPLATE,
        &[
            ("name", pitch.name.clone()),
            ("tagline", pitch.tagline.clone()),
            ("problem", pitch.problem.clone()),
            ("solution", pitch.solution.clone()),
            (
                "uvp",
                pitch
                    .unique_value_proposition
                    .clone()
                    .unwrap_or_else(|| "n/a".to_string()),
            ),
            ("colors", colors),
            ("audience", audience.to_string()),
        ],
    )
}

fn describe_colors(colors: &BTreeMap<String, String>) -> String {
    colors
        .iter()
        .map(|(role, value)| format!("{role} {value}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::models::pitch::TargetAudience;
    use crate::notify::CollectingNotifier;
    use crate::store::memory::MemoryPitchStore;

    /// Replays canned replies in order and records the prompts it saw.
    struct ScriptedLlm {
        replies: Mutex<VecDeque<Result<String, LlmError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedLlm {
        fn new(replies: Vec<Result<String, LlmError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedLlm {
        async fn generate(&self, prompt: &str, _system: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(LlmError::EmptyContent))
        }
    }

    fn generator(llm: Arc<ScriptedLlm>) -> PitchGenerator {
        PitchGenerator::new(llm, ValidationMode::Permissive)
    }

    fn request(idea: &str, include_landing: bool) -> GenerateRequest {
        GenerateRequest {
            user_id: Uuid::new_v4(),
            idea: idea.to_string(),
            tone: None,
            language: None,
            include_landing,
        }
    }

    fn api_error() -> LlmError {
        LlmError::Api {
            status: 503,
            message: "overloaded".to_string(),
        }
    }

    const BUDGET_REPLY: &str =
        "Here you go:\n{\"name\":\"BudgetBuddy\",\"tagline\":\"Smart money for students\"}\n\n";

    #[tokio::test]
    async fn test_budget_buddy_scenario() {
        let llm = ScriptedLlm::new(vec![Ok(BUDGET_REPLY.to_string())]);
        let pitch = generator(llm.clone())
            .generate_pitch("A budgeting app for students", None, None)
            .await
            .unwrap();

        assert_eq!(pitch.name, "BudgetBuddy");
        assert_eq!(pitch.tagline, "Smart money for students");
        assert_eq!(pitch.industry, "");
        assert!(llm.prompts.lock().unwrap()[0].contains("\"\"\"A budgeting app for students\"\"\""));
    }

    #[tokio::test]
    async fn test_refusal_is_no_json_found_and_nothing_is_stored() {
        let llm = ScriptedLlm::new(vec![Ok("Sorry, I can't help with that.".to_string())]);
        let store = MemoryPitchStore::default();
        let notifier = CollectingNotifier::new();

        let err = generator(llm.clone())
            .create_pitch(&store, &notifier, &request("anything", true))
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::Extract(ExtractError::NoJsonFound)));
        assert_eq!(store.insert_count(), 0);
        assert_eq!(llm.calls(), 1, "no landing call after a failed pitch");
    }

    #[tokio::test]
    async fn test_endpoint_failure_is_not_retried() {
        let llm = ScriptedLlm::new(vec![Err(api_error()), Ok(BUDGET_REPLY.to_string())]);
        let err = generator(llm.clone())
            .generate_pitch("idea", None, None)
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::Endpoint(LlmError::Api { status: 503, .. })));
        assert_eq!(llm.calls(), 1);
    }

    #[tokio::test]
    async fn test_blank_idea_never_calls_endpoint() {
        let llm = ScriptedLlm::new(vec![]);
        let err = generator(llm.clone())
            .generate_pitch("   ", None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::EmptyIdea));
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_landing_markup_uses_model_html_without_fences() {
        let llm = ScriptedLlm::new(vec![Ok(
            "```html\n<!DOCTYPE html><html><body>Hi</body></html>\n```".to_string(),
        )]);
        let markup = generator(llm)
            .generate_landing_markup(&PitchRecord::default())
            .await;
        assert_eq!(markup, "<!DOCTYPE html><html><body>Hi</body></html>");
    }

    #[tokio::test]
    async fn test_landing_markup_falls_back_on_every_failure() {
        let pitch = PitchRecord {
            name: "Fallback Co".to_string(),
            ..PitchRecord::default()
        };
        let expected = fallback_landing_page(&pitch);

        let failures = vec![
            Err(api_error()),
            Err(LlmError::EmptyContent),
            Ok("I cannot build web pages.".to_string()),
            Ok(String::new()),
        ];
        for failure in failures {
            let markup = generator(ScriptedLlm::new(vec![failure]))
                .generate_landing_markup(&pitch)
                .await;
            assert!(!markup.is_empty());
            assert_eq!(markup, expected);
        }
    }

    #[tokio::test]
    async fn test_landing_markup_falls_back_on_network_failure() {
        // Nothing listens on the discard port; the connection is refused.
        let client = crate::llm_client::LlmClient::new(
            "test-key".to_string(),
            "http://127.0.0.1:9".to_string(),
        )
        .unwrap();
        let generator = PitchGenerator::new(Arc::new(client), ValidationMode::Permissive);

        let markup = generator
            .generate_landing_markup(&PitchRecord::default())
            .await;
        assert_eq!(markup, fallback_landing_page(&PitchRecord::default()));
    }

    #[tokio::test]
    async fn test_create_pitch_stores_and_attaches_landing_code() {
        let llm = ScriptedLlm::new(vec![
            Ok(BUDGET_REPLY.to_string()),
            Ok("<html><body>landing</body></html>".to_string()),
        ]);
        let store = MemoryPitchStore::default();
        let notifier = CollectingNotifier::new();
        let request = request("A budgeting app for students", true);

        let outcome = generator(llm)
            .create_pitch(&store, &notifier, &request)
            .await
            .unwrap();

        assert!(outcome.saved());
        assert_eq!(
            outcome.pitch.landing_code.as_deref(),
            Some("<html><body>landing</body></html>")
        );
        let rows = store.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].user_id, request.user_id);
        assert_eq!(rows[0].title, "BudgetBuddy");
        assert_eq!(rows[0].industry, "Unknown");
        assert_eq!(rows[0].landing_code.as_deref(), Some("<html><body>landing</body></html>"));
        assert!(notifier
            .drain()
            .iter()
            .any(|n| n.kind == NoticeKind::Success));
    }

    #[tokio::test]
    async fn test_create_pitch_without_landing_makes_one_call() {
        let llm = ScriptedLlm::new(vec![Ok(BUDGET_REPLY.to_string())]);
        let store = MemoryPitchStore::default();
        let outcome = generator(llm.clone())
            .create_pitch(&store, &CollectingNotifier::new(), &request("idea", false))
            .await
            .unwrap();

        assert_eq!(llm.calls(), 1);
        assert!(outcome.pitch.landing_code.is_none());
        assert!(store.rows()[0].landing_code.is_none());
    }

    #[tokio::test]
    async fn test_failed_insert_still_returns_pitch() {
        let llm = ScriptedLlm::new(vec![Ok(BUDGET_REPLY.to_string())]);
        let store = MemoryPitchStore::failing_inserts();
        let notifier = CollectingNotifier::new();

        let outcome = generator(llm)
            .create_pitch(&store, &notifier, &request("idea", false))
            .await
            .unwrap();

        assert!(!outcome.saved());
        assert_eq!(outcome.pitch.name, "BudgetBuddy");
        assert_eq!(store.insert_count(), 1);
        let notices = notifier.drain();
        let last = notices.last().unwrap();
        assert_eq!(last.kind, NoticeKind::Error);
        assert_eq!(last.message, SAVE_FAILED_NOTICE);
        assert!(notices.iter().all(|n| !n.message.contains("pool timed out")));
    }

    #[test]
    fn test_pitch_prompt_embeds_idea_tone_and_language() {
        let prompt = build_pitch_prompt("Drones for {name} farms", Some("fun"), Some("Roman Urdu"));
        assert!(prompt.contains("\"\"\"Drones for {name} farms\"\"\""));
        assert!(prompt.contains("tone: fun"));
        assert!(prompt.contains("language: Roman Urdu"));
        assert!(!prompt.contains("{tone}"));

        let odd_tone = build_pitch_prompt("Drones", Some("{language}"), Some("French"));
        assert!(odd_tone.contains("tone: {language}"));

        let defaults = build_pitch_prompt("x", Some("auto"), None);
        assert!(defaults.contains(DEFAULT_TONE));
        assert!(defaults.contains(DEFAULT_LANGUAGE));
    }

    #[test]
    fn test_landing_prompt_embeds_pitch_fields() {
        let pitch = PitchRecord {
            name: "BudgetBuddy".to_string(),
            tagline: "Smart money".to_string(),
            problem: "Overspending".to_string(),
            solution: "Envelopes".to_string(),
            unique_value_proposition: Some("Campus-first".to_string()),
            target_audience: Some(TargetAudience {
                description: "Students".to_string(),
                segments: vec![],
            }),
            colors: Some(BTreeMap::from([("primary".to_string(), "#3B82F6".to_string())])),
            ..PitchRecord::default()
        };
        let prompt = build_landing_prompt(&pitch);
        for expected in [
            "Startup name: BudgetBuddy",
            "Tagline: Smart money",
            "Problem: Overspending",
            "Solution: Envelopes",
            "Unique value proposition: Campus-first",
            "Brand colors: primary #3B82F6",
            "Target audience: Students",
        ] {
            assert!(prompt.contains(expected), "missing {expected:?}");
        }
    }

    #[test]
    fn test_landing_prompt_keeps_placeholder_text_in_fields() {
        let pitch = PitchRecord {
            name: "BudgetBuddy".to_string(),
            tagline: "The {name} of {solution}".to_string(),
            solution: "Envelopes".to_string(),
            problem: "Costs {uvp} too much".to_string(),
            ..PitchRecord::default()
        };
        let prompt = build_landing_prompt(&pitch);
        assert!(prompt.contains("Tagline: The {name} of {solution}\n"));
        assert!(prompt.contains("Problem: Costs {uvp} too much\n"));
        assert!(prompt.contains("Startup name: BudgetBuddy\n"));
        assert!(prompt.contains("Solution: Envelopes\n"));
    }

    #[test]
    fn test_generate_request_defaults() {
        let json = serde_json::json!({
            "user_id": Uuid::new_v4(),
            "idea": "A budgeting app for students"
        });
        let request: GenerateRequest = serde_json::from_value(json).unwrap();
        assert!(request.include_landing);
        assert!(request.tone.is_none());
    }
}
