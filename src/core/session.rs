//! Session controller
//!
//! Owns the generate flow: validation, prompt composition, adapter
//! invocation, and the user-visible state transitions. Every failure is
//! converted to a single user-facing message here; callers never see raw
//! error values.

use tracing::debug;

use crate::api::{AdapterFactory, GenerateOptions, GenerationResult};
use crate::core::config::SettingsStore;
use crate::core::registry::{self, provider_display_name};
use crate::core::themes::ThemeStore;

/// Idle is the only state a new request may start from. Validating and
/// Loading are passed through during [`SessionController::generate`];
/// Failed holds the message until it is dismissed (or the next generate
/// attempt dismisses it).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Validating,
    Loading,
    Displaying,
    Failed,
}

/// What a generate call did, for callers that render the result.
#[derive(Debug)]
pub enum GenerateOutcome {
    /// A result was produced and retained for save/print
    Completed,
    /// Validation or the adapter failed; the message is user-facing
    Failed(String),
    /// The controller was not idle; nothing was done
    Ignored,
}

struct PreparedRequest {
    model_key: String,
    api_key: String,
    prompt: String,
    options: GenerateOptions,
}

pub struct SessionController<F: AdapterFactory> {
    store: SettingsStore,
    themes: ThemeStore,
    factory: F,
    state: SessionState,
    last_result: Option<GenerationResult>,
    last_error: Option<String>,
}

impl<F: AdapterFactory> SessionController<F> {
    pub fn new(store: SettingsStore, factory: F) -> Self {
        let themes = ThemeStore::new(store.clone());
        Self {
            store,
            themes,
            factory,
            state: SessionState::Idle,
            last_result: None,
            last_error: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn last_result(&self) -> Option<&GenerationResult> {
        self.last_result.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Failed → Idle once the message has been shown.
    pub fn dismiss_error(&mut self) {
        if self.state == SessionState::Failed {
            self.state = SessionState::Idle;
        }
    }

    /// Displaying → Idle; clears the retained result.
    pub fn new_image(&mut self) {
        if self.state == SessionState::Displaying {
            self.last_result = None;
            self.state = SessionState::Idle;
        }
    }

    /// Run one generation. A call while a result is displayed or a request
    /// is in flight is a no-op; a manual retry from Failed starts over.
    pub async fn generate(&mut self, description: &str) -> GenerateOutcome {
        if self.state == SessionState::Failed {
            self.dismiss_error();
        }
        if self.state != SessionState::Idle {
            return GenerateOutcome::Ignored;
        }

        self.state = SessionState::Validating;
        let prepared = match self.prepare(description) {
            Ok(prepared) => prepared,
            Err(message) => return self.fail(message),
        };

        self.state = SessionState::Loading;
        let adapter = match self
            .factory
            .create(&prepared.model_key, &prepared.api_key)
        {
            Ok(adapter) => adapter,
            Err(err) => {
                debug!(model = %prepared.model_key, error = %err, "adapter creation failed");
                return self.fail(err.to_string());
            }
        };

        match adapter.generate(&prepared.prompt, &prepared.options).await {
            Ok(result) => {
                self.last_result = Some(result);
                self.last_error = None;
                self.state = SessionState::Displaying;
                GenerateOutcome::Completed
            }
            Err(err) => {
                debug!(model = %prepared.model_key, error = %err, "generation failed");
                self.fail(err.to_string())
            }
        }
    }

    /// Validation fails closed: no request is issued unless the description
    /// is non-empty and the selected model's provider has a stored key.
    fn prepare(&self, description: &str) -> Result<PreparedRequest, String> {
        let description = description.trim();
        if description.is_empty() {
            return Err("Describe what you want to color first".to_string());
        }

        let config = self.store.load().map_err(|e| e.to_string())?;

        let model_key = config.selected_model_key().to_string();
        let model = registry::resolve(&model_key)
            .ok_or_else(|| format!("Unknown model: {model_key}"))?;

        let api_key = config
            .api_key_for(&model.provider)
            .ok_or_else(|| {
                format!(
                    "No {} API key is set. Run `crayonbox keys set {} <key>` first",
                    provider_display_name(&model.provider),
                    model.provider
                )
            })?
            .to_string();

        let theme = self.themes.active_theme().map_err(|e| e.to_string())?;
        let active_tags = self
            .themes
            .active_style_tag_ids()
            .map_err(|e| e.to_string())?;
        let composed = self
            .themes
            .compose_prompt(&theme.id, &active_tags)
            .map_err(|e| e.to_string())?;

        let prompt = format!("{composed} <image_description>{description}</image_description>");

        Ok(PreparedRequest {
            model_key,
            api_key,
            prompt,
            options: GenerateOptions {
                orientation: config.effective_orientation(),
            },
        })
    }

    fn fail(&mut self, message: String) -> GenerateOutcome {
        self.last_error = Some(message.clone());
        self.state = SessionState::Failed;
        GenerateOutcome::Failed(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{GenerateError, ImageAdapter};
    use crate::utils::test_utils::{temp_store, temp_store_with_key};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// Factory that must never be asked for an adapter; used to prove
    /// validation failures issue no request.
    struct PanicFactory;

    impl AdapterFactory for PanicFactory {
        fn create(
            &self,
            _model_key: &str,
            _api_key: &str,
        ) -> Result<Box<dyn ImageAdapter>, GenerateError> {
            panic!("no adapter may be created when validation fails");
        }
    }

    /// Factory handing out a scripted adapter and recording the prompt it
    /// was driven with.
    struct StubFactory {
        outcome: Arc<Mutex<Option<Result<GenerationResult, GenerateError>>>>,
        seen_prompt: Arc<Mutex<Option<String>>>,
    }

    impl StubFactory {
        fn new(outcome: Result<GenerationResult, GenerateError>) -> Self {
            Self {
                outcome: Arc::new(Mutex::new(Some(outcome))),
                seen_prompt: Arc::new(Mutex::new(None)),
            }
        }
    }

    struct StubAdapter {
        outcome: Arc<Mutex<Option<Result<GenerationResult, GenerateError>>>>,
        seen_prompt: Arc<Mutex<Option<String>>>,
    }

    impl AdapterFactory for StubFactory {
        fn create(
            &self,
            _model_key: &str,
            _api_key: &str,
        ) -> Result<Box<dyn ImageAdapter>, GenerateError> {
            Ok(Box::new(StubAdapter {
                outcome: self.outcome.clone(),
                seen_prompt: self.seen_prompt.clone(),
            }))
        }
    }

    #[async_trait]
    impl ImageAdapter for StubAdapter {
        async fn generate(
            &self,
            prompt: &str,
            _options: &GenerateOptions,
        ) -> Result<GenerationResult, GenerateError> {
            *self.seen_prompt.lock().unwrap() = Some(prompt.to_string());
            self.outcome
                .lock()
                .unwrap()
                .take()
                .expect("stub adapter driven more than once")
        }
    }

    fn sample_result() -> GenerationResult {
        GenerationResult {
            image_base64: "AAAA".to_string(),
            mime_type: "image/png".to_string(),
        }
    }

    #[tokio::test]
    async fn missing_google_key_fails_without_any_request() {
        // Default model is imagen-standard; no key is stored.
        let (store, _dir) = temp_store();
        let mut session = SessionController::new(store, PanicFactory);

        let outcome = session.generate("a happy dinosaur").await;
        let GenerateOutcome::Failed(message) = outcome else {
            panic!("expected a validation failure");
        };
        assert!(message.contains("Google"), "message was: {message}");
        assert_eq!(session.state(), SessionState::Failed);
    }

    #[tokio::test]
    async fn empty_description_fails_without_any_request() {
        let (store, _dir) = temp_store_with_key("google", "g-123");
        let mut session = SessionController::new(store, PanicFactory);

        let outcome = session.generate("   ").await;
        assert!(matches!(outcome, GenerateOutcome::Failed(_)));
        assert_eq!(session.state(), SessionState::Failed);

        session.dismiss_error();
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn successful_generation_displays_and_retains_the_result() {
        let (store, _dir) = temp_store_with_key("google", "g-123");
        let factory = StubFactory::new(Ok(sample_result()));
        let seen = factory.seen_prompt.clone();
        let mut session = SessionController::new(store, factory);

        let outcome = session.generate("a happy dinosaur").await;
        assert!(matches!(outcome, GenerateOutcome::Completed));
        assert_eq!(session.state(), SessionState::Displaying);
        assert_eq!(session.last_result(), Some(&sample_result()));

        let prompt = seen.lock().unwrap().clone().expect("adapter saw a prompt");
        assert!(prompt.contains("<image_description>a happy dinosaur</image_description>"));
        // Default theme and default style tag are merged in.
        assert!(prompt.contains("animal coloring book illustration"));
        assert!(prompt.contains("KID-FRIENDLY"));
    }

    #[tokio::test]
    async fn a_second_trigger_while_displaying_is_ignored() {
        let (store, _dir) = temp_store_with_key("google", "g-123");
        let mut session =
            SessionController::new(store, StubFactory::new(Ok(sample_result())));

        session.generate("a happy dinosaur").await;
        let outcome = session.generate("another one").await;
        assert!(matches!(outcome, GenerateOutcome::Ignored));

        session.new_image();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.last_result().is_none());
    }

    #[tokio::test]
    async fn adapter_errors_surface_the_provider_message() {
        let (store, _dir) = temp_store_with_key("google", "g-123");
        let factory = StubFactory::new(Err(GenerateError::RemoteApi {
            provider: "google".to_string(),
            message: "Quota exceeded".to_string(),
        }));
        let mut session = SessionController::new(store, factory);

        let outcome = session.generate("a happy dinosaur").await;
        let GenerateOutcome::Failed(message) = outcome else {
            panic!("expected an adapter failure");
        };
        assert_eq!(message, "Quota exceeded");
        assert_eq!(session.state(), SessionState::Failed);
        assert_eq!(session.last_error(), Some("Quota exceeded"));
    }
}
