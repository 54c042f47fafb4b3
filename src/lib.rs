//! StoryLeaf World Explorer
//!
//! Client-side state and interaction model for exploring a world generated
//! from a story: fixed-step navigation, discovery radius, mini-map, and
//! prompt/element interactions relayed to the StoryLeaf backend.
//!
//! ## Architecture
//!
//! ```text
//! WorldExplorer  (explorer.rs)      ← view state, navigation, dispatch
//!   ├── ExplorerState  (state.rs)   ← position, discoveries, log
//!   ├── ExplorationLock (lock.rs)   ← cancellable move timer
//!   ├── MiniMap  (minimap.rs)       ← pure projection
//!   └── WorldSource  (source.rs)    ← pluggable data source
//!         ├── RemoteWorldSource  (remote.rs)
//!         └── FixtureWorldSource (source.rs)
//! ```
//!
//! The explorer runs on Tokio: the lock timer is a spawned task and source
//! calls go through the blocking pool.

// Data model, protocol and pure logic are always available.
pub mod error;
pub mod minimap;
pub mod protocol;
pub mod settings;
pub mod source;
pub mod state;
pub mod types;

// Runtime-backed modules require the `client` feature.
#[cfg(feature = "client")]
pub mod explorer;
#[cfg(feature = "client")]
pub mod lock;
#[cfg(feature = "client")]
pub mod remote;

// Convenience re-exports (client only)
#[cfg(feature = "client")]
pub use explorer::{Discovery, MoveReport, ViewState, WorldExplorer, WorldOrigin};
#[cfg(feature = "client")]
pub use lock::ExplorationLock;
#[cfg(feature = "client")]
pub use remote::RemoteWorldSource;
pub use error::ExplorerError;
pub use minimap::{MiniMap, MiniMapFrame};
pub use settings::{ExplorerSettings, SourceKind};
pub use source::{FixtureWorldSource, WorldSource};
pub use state::ExplorerState;
pub use types::{
    Direction, ExplorerConfig, Vec3, WorldData, WorldElement, WorldElementKind,
};
