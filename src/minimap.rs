//! Mini-map projection.
//!
//! Pure functions of the loaded world and the explorer state; nothing is
//! cached between renders. Only the explorer and *discovered* elements are
//! ever projected, so undiscovered elements stay hidden.

use crate::state::ExplorerState;
use crate::types::{ExplorerConfig, Vec3, WorldData, WorldElementKind};

/// Side length of the on-screen overlay, in pixels.
pub const MINIMAP_SIZE_PX: f32 = 192.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub left: f32,
    pub top: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MarkerKind {
    Explorer,
    Element { name: String, kind: WorldElementKind },
}

impl MarkerKind {
    pub fn glyph(&self) -> char {
        match self {
            MarkerKind::Explorer => '@',
            MarkerKind::Element { kind, .. } => match kind {
                WorldElementKind::Character => 'C',
                WorldElementKind::Object => 'O',
                WorldElementKind::Portal => 'P',
                WorldElementKind::Vehicle => 'V',
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub kind: MarkerKind,
    pub point: ScreenPoint,
}

/// Projects world coordinates onto the overlay: x → left, z → top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MiniMap {
    pub offset: f32,
    pub scale: f32,
}

impl MiniMap {
    pub fn new(config: &ExplorerConfig) -> Self {
        Self {
            offset: config.minimap_offset,
            scale: config.minimap_scale,
        }
    }

    pub fn project(&self, position: Vec3) -> ScreenPoint {
        ScreenPoint {
            left: (position.x + self.offset) * self.scale,
            top: (position.z + self.offset) * self.scale,
        }
    }

    /// One marker for the explorer followed by one per discovered element,
    /// in element list order.
    pub fn render(&self, world: &WorldData, state: &ExplorerState) -> MiniMapFrame {
        let mut markers = Vec::with_capacity(state.discovered_count() + 1);
        markers.push(Marker {
            kind: MarkerKind::Explorer,
            point: self.project(state.current_position),
        });

        markers.extend(
            world
                .interactive_elements
                .iter()
                .filter(|e| state.is_discovered(&e.name))
                .map(|e| Marker {
                    kind: MarkerKind::Element {
                        name: e.name.clone(),
                        kind: e.kind,
                    },
                    point: self.project(e.position),
                }),
        );

        MiniMapFrame { markers }
    }
}

impl Default for MiniMap {
    fn default() -> Self {
        Self::new(&ExplorerConfig::default())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MiniMapFrame {
    pub markers: Vec<Marker>,
}

impl MiniMapFrame {
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn explorer(&self) -> Option<&Marker> {
        self.markers
            .iter()
            .find(|m| matches!(m.kind, MarkerKind::Explorer))
    }

    /// Rasterize the overlay into `cols × rows` characters. Markers outside
    /// the overlay are skipped; the explorer is drawn last so it stays on top.
    pub fn to_grid(&self, cols: usize, rows: usize) -> Vec<String> {
        if cols == 0 || rows == 0 {
            return Vec::new();
        }
        let mut grid = vec![vec!['.'; cols]; rows];

        let cell_w = MINIMAP_SIZE_PX / cols as f32;
        let cell_h = MINIMAP_SIZE_PX / rows as f32;

        let elements = self
            .markers
            .iter()
            .filter(|m| !matches!(m.kind, MarkerKind::Explorer));
        for marker in elements.chain(self.explorer()) {
            let (left, top) = (marker.point.left, marker.point.top);
            if left < 0.0 || top < 0.0 {
                continue;
            }
            let col = (left / cell_w) as usize;
            let row = (top / cell_h) as usize;
            if col < cols && row < rows {
                grid[row][col] = marker.kind.glyph();
            }
        }

        grid.into_iter().map(|row| row.into_iter().collect()).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Direction, PhysicsProperties, WorldElement};

    fn world() -> WorldData {
        let el = |kind, name: &str, x, z| WorldElement {
            kind,
            name: name.into(),
            position: Vec3::new(x, 0.0, z),
            description: None,
            interactive: true,
        };
        WorldData {
            id: "w".into(),
            title: "t".into(),
            description: "d".into(),
            environment_type: "test".into(),
            interactive_elements: vec![
                el(WorldElementKind::Portal, "portal", 0.0, 0.0),
                el(WorldElementKind::Character, "guide", 5.0, 5.0),
                el(WorldElementKind::Vehicle, "cart", 0.0, 4.0),
            ],
            physics_properties: PhysicsProperties {
                gravity: 1.0,
                wind_strength: 0.0,
                lighting: "flat".into(),
            },
            audio_cues: vec![],
        }
    }

    #[test]
    fn projection_formula() {
        let map = MiniMap::default();
        let p = map.project(Vec3::new(5.0, 99.0, -10.0));
        assert!((p.left - 60.0).abs() < 1e-4);
        assert!((p.top - 24.0).abs() < 1e-4);
    }

    #[test]
    fn origin_projects_to_overlay_centre() {
        let p = MiniMap::default().project(Vec3::zero());
        assert!((p.left - 48.0).abs() < 1e-4);
        assert!((p.top - 48.0).abs() < 1e-4);
    }

    #[test]
    fn only_explorer_before_any_discovery() {
        let frame = MiniMap::default().render(&world(), &ExplorerState::new());
        assert_eq!(frame.marker_count(), 1);
        assert!(frame.explorer().is_some());
    }

    #[test]
    fn markers_are_discovered_plus_one() {
        let w = world();
        let mut state = ExplorerState::new();
        state.step(Direction::Forward, 2.0);
        state.discover_nearby(&w.interactive_elements, 3.0);
        assert_eq!(state.discovered_count(), 2);

        let frame = MiniMap::default().render(&w, &state);
        assert_eq!(frame.marker_count(), state.discovered_count() + 1);
        assert!(frame.markers.iter().all(|m| !matches!(
            &m.kind,
            MarkerKind::Element { name, .. } if name == "guide"
        )));
    }

    #[test]
    fn glyphs_follow_element_kind() {
        let w = world();
        let mut state = ExplorerState::new();
        state.step(Direction::Forward, 2.0);
        state.discover_nearby(&w.interactive_elements, 3.0);
        let glyphs: Vec<char> = MiniMap::default()
            .render(&w, &state)
            .markers
            .iter()
            .map(|m| m.kind.glyph())
            .collect();
        assert_eq!(glyphs, vec!['@', 'P', 'V']);
    }

    #[test]
    fn markers_follow_element_list_not_discovery_order() {
        let w = world();
        let mut state = ExplorerState::new();
        state.step(Direction::Forward, 2.0);
        state.step(Direction::Forward, 2.0);
        state.discover_nearby(&w.interactive_elements, 3.0);
        state.step(Direction::Backward, 2.0);
        state.step(Direction::Backward, 2.0);
        state.discover_nearby(&w.interactive_elements, 3.0);
        assert_eq!(state.discovered(), ["cart".to_string(), "portal".to_string()]);

        let glyphs: Vec<char> = MiniMap::default()
            .render(&w, &state)
            .markers
            .iter()
            .map(|m| m.kind.glyph())
            .collect();
        assert_eq!(glyphs, vec!['@', 'P', 'V']);
    }

    #[test]
    fn grid_draws_explorer_on_top() {
        let w = world();
        let mut state = ExplorerState::new();
        state.discover_nearby(&w.interactive_elements, 3.0);
        // Explorer and portal share the origin.
        let grid = MiniMap::default().render(&w, &state).to_grid(8, 8);
        assert_eq!(grid.len(), 8);
        assert_eq!(grid[2].chars().nth(2), Some('@'));
        assert_eq!(grid.iter().filter(|r| r.contains('P')).count(), 0);
    }

    #[test]
    fn grid_skips_offscreen_markers() {
        let mut state = ExplorerState::new();
        for _ in 0..20 {
            state.step(Direction::Left, 2.0);
        }
        let grid = MiniMap::default().render(&world(), &state).to_grid(4, 4);
        assert!(grid.iter().all(|r| r == "...."));
    }
}
