//! WorldExplorer – loading, navigation, discovery and interaction dispatch.

use log::{debug, info, warn};
use parking_lot::Mutex;
use std::sync::Arc;

use crate::error::ExplorerError;
use crate::lock::ExplorationLock;
use crate::minimap::{MiniMap, MiniMapFrame};
use crate::protocol::{InteractionReply, InteractionRequest, WorldSummary};
use crate::source::WorldSource;
use crate::state::ExplorerState;
use crate::types::{Direction, ExplorerConfig, Vec3, WorldData, WorldElement, WorldElementKind};

/// Audio cue trigger fired after a world is loaded.
pub const CUE_WORLD_ENTRY: &str = "world_entry";
/// Audio cue trigger fired after each accepted move.
pub const CUE_EXPLORATION: &str = "exploration";

// ---------------------------------------------------------------------------
// View state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    Ready,
    Error(String),
}

/// Where the loaded world came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorldOrigin {
    Source,
    /// The primary source failed with `reason`; the fallback was used.
    Fallback { reason: String },
}

/// Result of an accepted navigation command.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveReport {
    pub position: Vec3,
    /// Elements discovered by this move, in element list order.
    pub discovered: Vec<String>,
}

/// A discovered element as shown in the discoveries panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Discovery {
    pub name: String,
    pub kind: WorldElementKind,
    pub description: Option<String>,
    pub interactive: bool,
}

impl From<&WorldElement> for Discovery {
    fn from(e: &WorldElement) -> Self {
        Self {
            name: e.name.clone(),
            kind: e.kind,
            description: e.description.clone(),
            interactive: e.interactive,
        }
    }
}

// ---------------------------------------------------------------------------
// WorldExplorer
// ---------------------------------------------------------------------------

/// Client-side controller for one explorable world.
///
/// Dropping the explorer cancels any pending exploration lock timer.
/// Navigation outside a Tokio runtime is rejected with
/// [`ExplorerError::Task`].
pub struct WorldExplorer {
    world_id: String,
    config: ExplorerConfig,
    source: Arc<dyn WorldSource>,
    fallback: Arc<dyn WorldSource>,
    view: ViewState,
    world: Option<Arc<WorldData>>,
    state: Arc<Mutex<ExplorerState>>,
    lock: ExplorationLock,
    minimap: MiniMap,
    prompt: String,
    show_minimap: bool,
    audio_enabled: bool,
    pending_cue: Option<String>,
}

impl WorldExplorer {
    pub fn new(
        world_id: impl Into<String>,
        source: Arc<dyn WorldSource>,
        fallback: Arc<dyn WorldSource>,
        config: ExplorerConfig,
    ) -> Self {
        let state = Arc::new(Mutex::new(ExplorerState::new()));
        Self {
            world_id: world_id.into(),
            minimap: MiniMap::new(&config),
            config,
            source,
            fallback,
            view: ViewState::Loading,
            world: None,
            lock: ExplorationLock::new(state.clone()),
            state,
            prompt: String::new(),
            show_minimap: true,
            audio_enabled: true,
            pending_cue: None,
        }
    }

    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    /// Load the world from the primary source, falling back to the fixed
    /// descriptor on any failure. Resets the explorer to origin.
    pub async fn load(&mut self) -> Result<WorldOrigin, ExplorerError> {
        self.view = ViewState::Loading;
        self.world = None;
        self.pending_cue = None;
        self.prompt.clear();
        self.lock.release();
        self.state.lock().reset();

        let (world, origin) = match fetch_world(&self.source, &self.world_id).await {
            Ok(world) => (world, WorldOrigin::Source),
            Err(e @ ExplorerError::Task(_)) => {
                self.view = ViewState::Error(e.to_string());
                return Err(e);
            }
            Err(e) => {
                warn!(
                    "Failed to load world '{}' from {} source: {}; using {} descriptor",
                    self.world_id,
                    self.source.name(),
                    e,
                    self.fallback.name()
                );
                match fetch_world(&self.fallback, &self.world_id).await {
                    Ok(world) => (world, WorldOrigin::Fallback { reason: e.to_string() }),
                    Err(fallback_err) => {
                        self.view = ViewState::Error(fallback_err.to_string());
                        return Err(fallback_err);
                    }
                }
            }
        };

        info!(
            "Loaded world '{}' ({} elements, {:?})",
            world.id,
            world.interactive_elements.len(),
            origin
        );
        self.world = Some(Arc::new(world));
        self.view = ViewState::Ready;
        self.queue_cue(CUE_WORLD_ENTRY);
        Ok(origin)
    }

    /// Switch to `world_id` and load it as [`load`](Self::load) does.
    pub async fn load_world(
        &mut self,
        world_id: impl Into<String>,
    ) -> Result<WorldOrigin, ExplorerError> {
        let world_id = world_id.into();
        if world_id != self.world_id {
            info!("Switching world '{}' -> '{}'", self.world_id, world_id);
            self.world_id = world_id;
        }
        self.load().await
    }

    /// `GET /api/worlds/list` through the primary source.
    pub async fn list_worlds(&self) -> Result<Vec<WorldSummary>, ExplorerError> {
        let source = Arc::clone(&self.source);
        run_blocking(move || source.list_worlds()).await
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// Move one step and run discovery against the new position.
    ///
    /// Rejected without side effects while a previous move is still locked,
    /// before a world is loaded, or when no Tokio runtime can host the lock
    /// timer.
    pub fn navigate(&mut self, direction: Direction) -> Result<MoveReport, ExplorerError> {
        let world = self.world.clone().ok_or(ExplorerError::NoWorld)?;
        if self.lock.is_engaged() {
            debug!("Ignoring {} while exploring", direction);
            return Err(ExplorerError::Locked);
        }

        self.lock.engage(self.config.lock_duration())?;

        let report = {
            let mut state = self.state.lock();
            let position = state.step(direction, self.config.step);
            let discovered =
                state.discover_nearby(&world.interactive_elements, self.config.discovery_radius);
            MoveReport {
                position,
                discovered,
            }
        };

        debug!(
            "Moved {} to {} (discovered {:?})",
            direction, report.position, report.discovered
        );
        self.queue_cue(CUE_EXPLORATION);
        Ok(report)
    }

    // -----------------------------------------------------------------------
    // Prompt interaction
    // -----------------------------------------------------------------------

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Send the current prompt to the world. Returns the appended log lines.
    ///
    /// A blank prompt is rejected before any request is made. Otherwise the
    /// prompt input is cleared whether or not the request succeeds.
    pub async fn submit_prompt(&mut self) -> Result<Vec<String>, ExplorerError> {
        if self.prompt.trim().is_empty() {
            return Err(ExplorerError::EmptyPrompt);
        }
        if self.world.is_none() {
            return Err(ExplorerError::NoWorld);
        }

        let prompt = std::mem::take(&mut self.prompt);
        let request = InteractionRequest::Prompt {
            prompt: prompt.clone(),
            position: self.position(),
        };
        let reply = self.dispatch(request).await?;

        let mut lines = vec![
            format!("Você: {}", prompt),
            format!("Mundo: {}", reply.message),
        ];
        if let Some(changes) = reply.world_changes {
            lines.push(format!("Mudanças no mundo: {}", changes.join(", ")));
        }
        self.state.lock().log(lines.iter().cloned());
        Ok(lines)
    }

    /// Shorthand for [`set_prompt`](Self::set_prompt) + [`submit_prompt`](Self::submit_prompt).
    pub async fn say(&mut self, prompt: impl Into<String>) -> Result<Vec<String>, ExplorerError> {
        self.set_prompt(prompt);
        self.submit_prompt().await
    }

    // -----------------------------------------------------------------------
    // Element interaction
    // -----------------------------------------------------------------------

    /// Interact with the named element. Non-interactive elements never
    /// reach the source.
    pub async fn interact_with(&mut self, name: &str) -> Result<Vec<String>, ExplorerError> {
        let world = self.world.clone().ok_or(ExplorerError::NoWorld)?;
        let element = world
            .element(name)
            .ok_or_else(|| ExplorerError::UnknownElement(name.to_string()))?;
        if !element.interactive {
            return Err(ExplorerError::NotInteractive(element.name.clone()));
        }

        let request = InteractionRequest::CharacterInteraction {
            element_name: element.name.clone(),
            position: self.position(),
        };
        let reply = self.dispatch(request).await?;

        let lines = vec![
            format!("Interação com {}:", element.name),
            reply.dialogue.unwrap_or(reply.message),
        ];
        self.state.lock().log(lines.iter().cloned());
        Ok(lines)
    }

    async fn dispatch(&self, request: InteractionRequest) -> Result<InteractionReply, ExplorerError> {
        let source = Arc::clone(&self.source);
        let world_id = self.world_id.clone();
        let kind = request.kind();
        let result = run_blocking(move || source.interact(&world_id, &request)).await;
        if let Err(e) = &result {
            warn!("{} interaction with world '{}' failed: {}", kind, self.world_id, e);
        }
        result
    }

    // -----------------------------------------------------------------------
    // Toggles & audio
    // -----------------------------------------------------------------------

    pub fn toggle_minimap(&mut self) -> bool {
        self.show_minimap = !self.show_minimap;
        self.show_minimap
    }

    pub fn minimap_visible(&self) -> bool {
        self.show_minimap
    }

    pub fn toggle_audio(&mut self) -> bool {
        self.audio_enabled = !self.audio_enabled;
        if !self.audio_enabled {
            self.pending_cue = None;
        }
        self.audio_enabled
    }

    pub fn audio_enabled(&self) -> bool {
        self.audio_enabled
    }

    /// Sound that should play for the most recent load or move, if any.
    pub fn take_cue(&mut self) -> Option<String> {
        self.pending_cue.take()
    }

    fn queue_cue(&mut self, trigger: &str) {
        if !self.audio_enabled {
            return;
        }
        self.pending_cue = self
            .world
            .as_ref()
            .and_then(|w| w.cue_for(trigger))
            .map(str::to_string);
    }

    // -----------------------------------------------------------------------
    // Read-side accessors
    // -----------------------------------------------------------------------

    pub fn world_id(&self) -> &str {
        &self.world_id
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn world(&self) -> Option<&WorldData> {
        self.world.as_deref()
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    pub fn position(&self) -> Vec3 {
        self.state.lock().current_position
    }

    pub fn position_label(&self) -> String {
        format!("Posição: {}", self.position())
    }

    pub fn is_exploring(&self) -> bool {
        self.lock.is_engaged()
    }

    /// Discovered elements in discovery order.
    pub fn discoveries(&self) -> Vec<Discovery> {
        let Some(world) = self.world.as_ref() else {
            return Vec::new();
        };
        self.state
            .lock()
            .discovered()
            .iter()
            .filter_map(|name| world.element(name))
            .map(Discovery::from)
            .collect()
    }

    pub fn log_entries(&self) -> Vec<String> {
        self.state.lock().exploration_log.clone()
    }

    /// `None` when the overlay is hidden or no world is loaded.
    pub fn minimap(&self) -> Option<MiniMapFrame> {
        if !self.show_minimap {
            return None;
        }
        let world = self.world.as_ref()?;
        Some(self.minimap.render(world, &self.state.lock()))
    }

    /// Clone of the current state, for rendering or assertions.
    pub fn snapshot(&self) -> ExplorerState {
        self.state.lock().clone()
    }
}

// ---------------------------------------------------------------------------
// Blocking helpers
// ---------------------------------------------------------------------------

async fn fetch_world(
    source: &Arc<dyn WorldSource>,
    world_id: &str,
) -> Result<WorldData, ExplorerError> {
    let source = Arc::clone(source);
    let world_id = world_id.to_string();
    run_blocking(move || source.load_world(&world_id)).await
}

/// Run a (possibly blocking) source call on Tokio's blocking pool.
async fn run_blocking<T, F>(f: F) -> Result<T, ExplorerError>
where
    F: FnOnce() -> Result<T, ExplorerError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ExplorerError::Task(e.to_string()))?
}
