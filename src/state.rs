//! `ExplorerState`: mutable per-explorer state.
//!
//! Owned by a single `WorldExplorer` and
//! only shared with its exploration lock timer, which may clear
//! `is_exploring` and nothing else.

use std::collections::HashSet;

use crate::types::{Direction, Vec3, WorldElement};

/// Prefix of the single log entry written when a move discovers elements.
pub const DISCOVERY_PREFIX: &str = "Você descobriu: ";

#[derive(Debug, Clone, Default)]
pub struct ExplorerState {
    pub current_position: Vec3,
    /// Discovered element names in discovery order.
    discovered: Vec<String>,
    discovered_index: HashSet<String>,
    pub exploration_log: Vec<String>,
    /// Exploration lock flag; navigation is rejected while set.
    pub is_exploring: bool,
}

impl ExplorerState {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Movement
    // ------------------------------------------------------------------

    /// Move one step. Returns the new position.
    pub fn step(&mut self, direction: Direction, step: f32) -> Vec3 {
        self.current_position = self.current_position.offset(direction.delta(step));
        self.current_position
    }

    // ------------------------------------------------------------------
    // Discovery
    // ------------------------------------------------------------------

    /// Discover every not-yet-discovered element strictly within `radius`
    /// (planar) of the current position, in element list order.
    ///
    /// Writes at most one log entry, joining all names found by this call.
    pub fn discover_nearby(&mut self, elements: &[WorldElement], radius: f32) -> Vec<String> {
        let position = self.current_position;
        let found: Vec<String> = elements
            .iter()
            .filter(|e| !self.is_discovered(&e.name))
            .filter(|e| e.position.planar_distance(&position) < radius)
            .map(|e| e.name.clone())
            .collect();

        for name in &found {
            self.mark_discovered(name.clone());
        }

        if !found.is_empty() {
            self.exploration_log
                .push(format!("{}{}", DISCOVERY_PREFIX, found.join(", ")));
        }

        found
    }

    fn mark_discovered(&mut self, name: String) {
        if self.discovered_index.insert(name.clone()) {
            self.discovered.push(name);
        }
    }

    pub fn is_discovered(&self, name: &str) -> bool {
        self.discovered_index.contains(name)
    }

    pub fn discovered(&self) -> &[String] {
        &self.discovered
    }

    pub fn discovered_count(&self) -> usize {
        self.discovered.len()
    }

    // ------------------------------------------------------------------
    // Log
    // ------------------------------------------------------------------

    pub fn log<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.exploration_log.extend(entries);
    }

    /// Back to origin with nothing discovered (called when a world loads).
    pub fn reset(&mut self) {
        self.current_position = Vec3::zero();
        self.discovered.clear();
        self.discovered_index.clear();
        self.exploration_log.clear();
        self.is_exploring = false;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WorldElementKind;

    fn element(name: &str, x: f32, z: f32) -> WorldElement {
        WorldElement {
            kind: WorldElementKind::Object,
            name: name.into(),
            position: Vec3::new(x, 0.0, z),
            description: None,
            interactive: true,
        }
    }

    #[test]
    fn step_moves_along_the_right_axis() {
        let mut s = ExplorerState::new();
        s.step(Direction::Forward, 2.0);
        s.step(Direction::Right, 2.0);
        s.step(Direction::Right, 2.0);
        s.step(Direction::Backward, 2.0);
        assert_eq!(s.current_position, Vec3::new(4.0, 0.0, 0.0));
    }

    #[test]
    fn discovery_radius_is_exclusive() {
        let elements = vec![element("edge", 3.0, 0.0), element("inside", 0.0, 2.9)];
        let mut s = ExplorerState::new();
        let found = s.discover_nearby(&elements, 3.0);
        assert_eq!(found, vec!["inside".to_string()]);
        assert!(!s.is_discovered("edge"));
    }

    #[test]
    fn discovery_ignores_height() {
        let mut tall = element("tower", 1.0, 1.0);
        tall.position.y = 500.0;
        let mut s = ExplorerState::new();
        assert_eq!(s.discover_nearby(&[tall], 3.0).len(), 1);
    }

    #[test]
    fn simultaneous_discoveries_share_one_log_entry() {
        let elements = vec![
            element("b", 1.0, 0.0),
            element("far", 50.0, 50.0),
            element("a", 0.0, 1.0),
        ];
        let mut s = ExplorerState::new();
        let found = s.discover_nearby(&elements, 3.0);
        assert_eq!(found, vec!["b".to_string(), "a".to_string()]);
        assert_eq!(s.exploration_log, vec!["Você descobriu: b, a".to_string()]);
    }

    #[test]
    fn rediscovery_is_silent_and_monotonic() {
        let elements = vec![element("portal", 0.0, 0.0)];
        let mut s = ExplorerState::new();
        s.discover_nearby(&elements, 3.0);
        s.step(Direction::Forward, 2.0);
        assert!(s.discover_nearby(&elements, 3.0).is_empty());

        // Walk far away: still discovered.
        for _ in 0..10 {
            s.step(Direction::Forward, 2.0);
            s.discover_nearby(&elements, 3.0);
        }
        assert!(s.is_discovered("portal"));
        assert_eq!(s.discovered_count(), 1);
        assert_eq!(s.exploration_log.len(), 1);
    }

    #[test]
    fn discovery_order_is_preserved_across_moves() {
        let elements = vec![element("second", 0.0, 6.0), element("first", 0.0, 2.0)];
        let mut s = ExplorerState::new();
        s.step(Direction::Forward, 2.0);
        s.discover_nearby(&elements, 3.0);
        s.step(Direction::Forward, 2.0);
        s.step(Direction::Forward, 2.0);
        s.discover_nearby(&elements, 3.0);
        assert_eq!(s.discovered(), ["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn reset_returns_to_origin() {
        let mut s = ExplorerState::new();
        s.step(Direction::Left, 2.0);
        s.discover_nearby(&[element("x", -2.0, 0.0)], 3.0);
        s.log(["Você: olá".to_string()]);
        s.is_exploring = true;

        s.reset();

        assert_eq!(s.current_position, Vec3::zero());
        assert_eq!(s.discovered_count(), 0);
        assert!(!s.is_discovered("x"));
        assert!(s.exploration_log.is_empty());
        assert!(!s.is_exploring);
    }
}
