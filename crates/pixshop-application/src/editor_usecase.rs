//! Editor use case: the request controller plus the timeline facade.
//!
//! `EditorUseCase` owns the in-memory [`Timeline`] and coordinates the
//! pieces around it: resolving a [`GenerationRequest`] into exactly one
//! backend call, enforcing serialized requests (`Busy` while one is in
//! flight), materializing successful results into the timeline, and
//! fronting navigation, presets, and session persistence.
//!
//! # Concurrency
//!
//! The timeline is mutated only behind this type's internal mutex (single
//! writer). The busy flag is an atomic acquired before any await and
//! released by an RAII guard, so every exit path - success, error, or a
//! dropped (cancelled) future - returns the controller to idle. A cancelled
//! request never mutates the timeline: the append happens only after the
//! awaited backend call has returned.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{watch, Mutex};

use pixshop_core::generation::{
    GenerationBackend, GenerationOptions, GenerationPhase, GenerationRequest, PanelKind,
    SourceImage,
};
use pixshop_core::history::{HistoryItem, Timeline};
use pixshop_core::preset::{PresetRepository, PromptPreset};
use pixshop_core::secret::SecretService;
use pixshop_core::session::{SessionRepository, SessionState};
use pixshop_core::{PixshopError, Result};

use pixshop_interaction::prompts;

/// What a dispatched request produced.
#[derive(Debug, Clone)]
pub enum DispatchOutcome {
    /// A new image was generated and appended to the timeline.
    Generated(HistoryItem),
    /// The request was routed to another panel instead of generating
    /// (style extraction).
    Routed { target: PanelKind, prompt: String },
}

/// Mutable editor state guarded by the use case's mutex.
#[derive(Debug, Default)]
struct EditorState {
    timeline: Timeline,
    active_panel: Option<PanelKind>,
}

/// The application-facing editor controller.
pub struct EditorUseCase {
    state: Mutex<EditorState>,
    backend: Arc<dyn GenerationBackend>,
    secret_service: Arc<dyn SecretService>,
    session_repository: Arc<dyn SessionRepository>,
    preset_repository: Arc<dyn PresetRepository>,
    busy: AtomicBool,
    phase_tx: watch::Sender<GenerationPhase>,
}

impl EditorUseCase {
    /// Creates a new editor use case over the given collaborators.
    pub fn new(
        backend: Arc<dyn GenerationBackend>,
        secret_service: Arc<dyn SecretService>,
        session_repository: Arc<dyn SessionRepository>,
        preset_repository: Arc<dyn PresetRepository>,
    ) -> Self {
        let (phase_tx, _) = watch::channel(GenerationPhase::Idle);
        Self {
            state: Mutex::new(EditorState::default()),
            backend,
            secret_service,
            session_repository,
            preset_repository,
            busy: AtomicBool::new(false),
            phase_tx,
        }
    }

    /// Subscribes to generation progress phases (advisory, for UI display).
    pub fn subscribe_phase(&self) -> watch::Receiver<GenerationPhase> {
        self.phase_tx.subscribe()
    }

    /// Whether a generation request is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    // ========================================================================
    // Request dispatch
    // ========================================================================

    /// Resolves a generation request into at most one backend call.
    ///
    /// Protocol: fail fast without network on missing credentials or a
    /// second in-flight request; resolve the source (original upload vs.
    /// cursor item); dispatch per panel; on success append the result to
    /// the timeline. On any failure the timeline is left unchanged.
    pub async fn generate(&self, request: GenerationRequest) -> Result<DispatchOutcome> {
        let _guard = BusyGuard::acquire(&self.busy, &self.phase_tx)?;
        self.phase_tx.send_replace(GenerationPhase::Dispatching);
        tracing::info!(panel = %request.panel, "Generation request accepted");

        let secrets = self.secret_service.load_secrets().await?;
        if secrets.gemini_api_key().is_none() {
            return Err(PixshopError::authentication_required(
                "No generation API access configured",
            ));
        }

        if request.panel == PanelKind::StyleExtractor {
            return self.route_style_extraction(&request).await;
        }

        let prompt = request
            .prompt
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| PixshopError::config("A prompt is required for generation"))?
            .to_string();

        let source = self.resolve_source(&request).await?;

        let options = GenerationOptions {
            system_instruction: request
                .system_instruction_override
                .clone()
                .or_else(|| prompts::system_instruction(request.panel).map(str::to_string)),
            negative_prompt: request.negative_prompt.clone(),
        };

        self.phase_tx.send_replace(GenerationPhase::AwaitingResult);

        let generated = match source {
            Some((data, mime_type)) if !request.force_new => {
                self.backend
                    .edit_image(
                        SourceImage {
                            data: &data,
                            mime_type: &mime_type,
                        },
                        &prompt,
                        &options,
                    )
                    .await?
            }
            _ => self.backend.generate_from_text(&prompt, &options).await?,
        };

        let item = HistoryItem::generation(
            generated.bytes,
            generated.mime_type,
            request.prompt.clone(),
            generated.grounding,
        );

        let mut state = self.state.lock().await;
        state.timeline.append(item.clone());
        tracing::info!(
            panel = %request.panel,
            items = state.timeline.len(),
            "Generated image appended to timeline"
        );

        Ok(DispatchOutcome::Generated(item))
    }

    /// Style extraction never calls the generation API; it hands a derived
    /// prompt to the flux panel.
    async fn route_style_extraction(&self, request: &GenerationRequest) -> Result<DispatchOutcome> {
        let description = request
            .prompt
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                PixshopError::config("Style extraction requires a style description")
            })?;

        let target = PanelKind::Flux;
        let prompt = prompts::style_transfer_prompt(description);

        let mut state = self.state.lock().await;
        state.active_panel = Some(target);
        tracing::info!(panel = %target, "Style extraction routed");

        Ok(DispatchOutcome::Routed { target, prompt })
    }

    /// Resolves the source image bytes for the request.
    ///
    /// `use_original_source` selects the first upload ever recorded;
    /// otherwise the cursor item is used. Panels that require a source fail
    /// with `MissingSource` when no usable bytes exist; other panels fall
    /// back to text-to-image. `force_new` waives the source requirement for
    /// every panel, since the caller asked for an unconditioned generation.
    async fn resolve_source(
        &self,
        request: &GenerationRequest,
    ) -> Result<Option<(Vec<u8>, String)>> {
        let state = self.state.lock().await;
        let item = if request.use_original_source {
            state.timeline.first_upload()
        } else {
            state.timeline.current()
        };

        let bytes = item.and_then(|item| {
            item.content
                .bytes()
                .map(|(data, mime)| (data.to_vec(), mime.to_string()))
        });

        if bytes.is_none() && request.panel.requires_source() && !request.force_new {
            let message = match item {
                Some(_) => "Source item is a reference without in-memory image data",
                None => "This panel requires a source image and none is selected",
            };
            return Err(PixshopError::missing_source(message));
        }

        Ok(bytes)
    }

    // ========================================================================
    // Uploads and navigation
    // ========================================================================

    /// Appends an uploaded image (file selection or camera capture).
    pub async fn upload(&self, data: Vec<u8>, mime_type: impl Into<String>) -> HistoryItem {
        let item = HistoryItem::upload(data, mime_type);
        let mut state = self.state.lock().await;
        state.timeline.append(item.clone());
        tracing::info!(items = state.timeline.len(), "Upload appended to timeline");
        item
    }

    /// Appends an upload that references an external URL.
    pub async fn upload_reference(&self, url: impl Into<String>) -> HistoryItem {
        let item = HistoryItem::upload_reference(url);
        let mut state = self.state.lock().await;
        state.timeline.append(item.clone());
        item
    }

    /// Steps the cursor back one item.
    pub async fn undo(&self) {
        self.state.lock().await.timeline.undo();
    }

    /// Steps the cursor forward one item.
    pub async fn redo(&self) {
        self.state.lock().await.timeline.redo();
    }

    /// Moves the cursor to an absolute index (clamped by the timeline).
    pub async fn move_to(&self, index: usize) {
        self.state.lock().await.timeline.move_to(index);
    }

    /// Deselects the current item without discarding history.
    pub async fn close(&self) {
        self.state.lock().await.timeline.close();
    }

    /// The item under the cursor, if any.
    pub async fn current_item(&self) -> Option<HistoryItem> {
        self.state.lock().await.timeline.current().cloned()
    }

    pub async fn can_undo(&self) -> bool {
        self.state.lock().await.timeline.can_undo()
    }

    pub async fn can_redo(&self) -> bool {
        self.state.lock().await.timeline.can_redo()
    }

    pub async fn timeline_len(&self) -> usize {
        self.state.lock().await.timeline.len()
    }

    /// Records the panel the user is looking at (persisted with the session).
    pub async fn set_active_panel(&self, panel: PanelKind) {
        self.state.lock().await.active_panel = Some(panel);
    }

    pub async fn active_panel(&self) -> Option<PanelKind> {
        self.state.lock().await.active_panel
    }

    // ========================================================================
    // Session persistence
    // ========================================================================

    /// Saves the current session state.
    pub async fn save_session(&self) -> Result<()> {
        let snapshot = {
            let state = self.state.lock().await;
            SessionState::snapshot(&state.timeline, state.active_panel)
        };
        self.session_repository.save(&snapshot).await
    }

    /// Restores a previously saved session, replacing the in-memory
    /// timeline. Returns `false` when there was nothing to restore.
    pub async fn load_session(&self) -> Result<bool> {
        let Some(saved) = self.session_repository.load().await? else {
            return Ok(false);
        };

        let mut state = self.state.lock().await;
        state.active_panel = saved.active_panel;
        state.timeline = saved.into_timeline();
        tracing::info!(items = state.timeline.len(), "Session restored");
        Ok(true)
    }

    /// Clears the session: empties the timeline and discards the saved blob.
    pub async fn clear_session(&self) -> Result<()> {
        {
            let mut state = self.state.lock().await;
            state.timeline.clear();
            state.active_panel = None;
        }
        self.session_repository.clear().await?;
        tracing::info!("Session cleared");
        Ok(())
    }

    // ========================================================================
    // Presets
    // ========================================================================

    /// Lists saved presets for a panel, oldest first.
    pub async fn list_presets(&self, panel: PanelKind) -> Result<Vec<PromptPreset>> {
        self.preset_repository.list(panel).await
    }

    /// Saves a preset.
    pub async fn add_preset(&self, preset: &PromptPreset) -> Result<()> {
        self.preset_repository.add(preset).await
    }

    /// Deletes a preset by id.
    pub async fn delete_preset(&self, preset_id: &str) -> Result<()> {
        self.preset_repository.delete(preset_id).await
    }
}

/// RAII guard for the single in-flight request slot.
///
/// Acquired with a compare-exchange before the first await; releases the
/// flag and returns the phase to `Idle` on drop, including when the
/// dispatch future is cancelled.
struct BusyGuard<'a> {
    busy: &'a AtomicBool,
    phase_tx: &'a watch::Sender<GenerationPhase>,
}

impl<'a> BusyGuard<'a> {
    fn acquire(
        busy: &'a AtomicBool,
        phase_tx: &'a watch::Sender<GenerationPhase>,
    ) -> Result<Self> {
        if busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(PixshopError::Busy);
        }
        Ok(Self { busy, phase_tx })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::SeqCst);
        let _ = self.phase_tx.send_replace(GenerationPhase::Idle);
    }
}
