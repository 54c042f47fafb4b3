//! Core world types shared across all modules.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

use crate::error::ExplorerError;

// ---------------------------------------------------------------------------
// Basic math
// ---------------------------------------------------------------------------

/// World-space position. Serialized as a `[x, y, z]` array on the wire.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Euclidean distance on the ground plane (x, z). Height is ignored.
    pub fn planar_distance(&self, other: &Vec3) -> f32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        (dx * dx + dz * dz).sqrt()
    }

    pub fn offset(&self, delta: Vec3) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y, self.z + delta.z)
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<Vec3> for [f32; 3] {
    fn from(v: Vec3) -> Self {
        [v.x, v.y, v.z]
    }
}

impl std::fmt::Display for Vec3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

/// One of the four directional navigation commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Forward,
        Direction::Backward,
        Direction::Left,
        Direction::Right,
    ];

    /// Displacement for one step. Forward/backward move along z,
    /// left/right along x; y never changes.
    pub fn delta(self, step: f32) -> Vec3 {
        match self {
            Direction::Forward => Vec3::new(0.0, 0.0, step),
            Direction::Backward => Vec3::new(0.0, 0.0, -step),
            Direction::Left => Vec3::new(-step, 0.0, 0.0),
            Direction::Right => Vec3::new(step, 0.0, 0.0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Backward => "backward",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl FromStr for Direction {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forward" | "w" => Ok(Direction::Forward),
            "backward" | "s" => Ok(Direction::Backward),
            "left" | "a" => Ok(Direction::Left),
            "right" | "d" => Ok(Direction::Right),
            other => Err(ExplorerError::InvalidDirection(other.to_string())),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// World elements
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WorldElementKind {
    Character,
    Object,
    Portal,
    Vehicle,
}

impl WorldElementKind {
    pub fn label(self) -> &'static str {
        match self {
            WorldElementKind::Character => "personagem",
            WorldElementKind::Object => "objeto",
            WorldElementKind::Portal => "portal",
            WorldElementKind::Vehicle => "veículo",
        }
    }
}

/// A character, object, portal or vehicle placed in a world.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorldElement {
    #[serde(rename = "type")]
    pub kind: WorldElementKind,
    /// Unique within a world; discoveries are tracked by name.
    pub name: String,
    pub position: Vec3,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub interactive: bool,
}

// ---------------------------------------------------------------------------
// World descriptor
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhysicsProperties {
    pub gravity: f32,
    pub wind_strength: f32,
    pub lighting: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AudioCue {
    pub trigger: String,
    pub sound: String,
}

/// Read-only descriptor of an explorable world. Extra fields sent by the
/// backend (resolution, fps, timestamps…) are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorldData {
    pub id: String,
    pub title: String,
    pub description: String,
    pub environment_type: String,
    pub interactive_elements: Vec<WorldElement>,
    pub physics_properties: PhysicsProperties,
    #[serde(default)]
    pub audio_cues: Vec<AudioCue>,
}

impl WorldData {
    pub fn element(&self, name: &str) -> Option<&WorldElement> {
        self.interactive_elements.iter().find(|e| e.name == name)
    }

    pub fn cue_for(&self, trigger: &str) -> Option<&str> {
        self.audio_cues
            .iter()
            .find(|c| c.trigger == trigger)
            .map(|c| c.sound.as_str())
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExplorerConfig {
    /// Distance covered by one navigation command, in world units.
    pub step: f32,
    /// Planar radius within which elements are discovered (exclusive).
    pub discovery_radius: f32,
    /// How long navigation stays locked after an accepted move.
    pub lock_ms: u64,
    /// Added to each world coordinate before mini-map scaling.
    pub minimap_offset: f32,
    /// Pixels per world unit on the mini-map.
    pub minimap_scale: f32,
}

impl ExplorerConfig {
    pub fn lock_duration(&self) -> Duration {
        Duration::from_millis(self.lock_ms)
    }
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            step: 2.0,
            discovery_radius: 3.0,
            lock_ms: 1500,
            minimap_offset: 20.0,
            minimap_scale: 2.4,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
