//! World data sources: the `WorldSource` trait and the built-in fixture.
//!
//! The explorer never talks to HTTP directly. It is handed a primary source
//! (usually [`RemoteWorldSource`](crate::remote::RemoteWorldSource)) and a
//! fallback (usually [`FixtureWorldSource`]) and picks between them when a
//! load fails.

use crate::error::ExplorerError;
use crate::protocol::{InteractionReply, InteractionRequest, WorldSummary};
use crate::types::{AudioCue, PhysicsProperties, Vec3, WorldData, WorldElement, WorldElementKind};

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Anything that can supply world descriptors and answer interactions.
///
/// Calls may block (the remote implementation performs HTTP requests); the
/// explorer runs them on Tokio's blocking pool.
pub trait WorldSource: Send + Sync {
    /// Short name used in log lines.
    fn name(&self) -> &'static str;

    fn load_world(&self, world_id: &str) -> Result<WorldData, ExplorerError>;

    fn interact(
        &self,
        world_id: &str,
        request: &InteractionRequest,
    ) -> Result<InteractionReply, ExplorerError>;

    fn list_worlds(&self) -> Result<Vec<WorldSummary>, ExplorerError>;
}

// ---------------------------------------------------------------------------
// Fixture
// ---------------------------------------------------------------------------

/// Id reported by [`FixtureWorldSource::list_worlds`].
pub const DEMO_WORLD_ID: &str = "demo";

pub const FIXTURE_DESCRIPTION: &str = "Um mundo mágico gerado pela Árvore da Vida AI";
pub const FIXTURE_WORLD_CHANGES: [&str; 2] = ["O céu muda de cor", "Flores brotam no chão"];
pub const FIXTURE_CHARACTER_MESSAGE: &str = "O personagem responde à sua presença...";
pub const FIXTURE_CHARACTER_DIALOGUE: &str =
    "Bem-vindo, viajante! Este mundo aguardava sua chegada.";

/// Fixed, offline world used in demo mode and as the load fallback.
///
/// Every call returns the same descriptor for the same world id.
#[derive(Debug, Clone)]
pub struct FixtureWorldSource {
    story_title: String,
}

impl FixtureWorldSource {
    pub fn new(story_title: impl Into<String>) -> Self {
        Self {
            story_title: story_title.into(),
        }
    }

    /// The built-in descriptor, stamped with `world_id` and the story title.
    pub fn demo_world(&self, world_id: &str) -> WorldData {
        WorldData {
            id: world_id.to_string(),
            title: self.story_title.clone(),
            description: FIXTURE_DESCRIPTION.to_string(),
            environment_type: "fantasy_magical".to_string(),
            interactive_elements: vec![
                fixture_element(
                    WorldElementKind::Character,
                    "Guia Místico",
                    Vec3::new(5.0, 0.0, 5.0),
                    "Um ser sábio que conhece os segredos deste mundo",
                ),
                fixture_element(
                    WorldElementKind::Object,
                    "Árvore Ancestral",
                    Vec3::new(10.0, 0.0, 10.0),
                    "Uma árvore antiga que sussurra histórias do passado",
                ),
                fixture_element(
                    WorldElementKind::Portal,
                    "Portal de Retorno",
                    Vec3::zero(),
                    "O caminho de volta ao mundo real",
                ),
            ],
            physics_properties: PhysicsProperties {
                gravity: 0.8,
                wind_strength: 0.3,
                lighting: "magical_twilight".to_string(),
            },
            audio_cues: vec![
                cue("world_entry", "mystical_welcome"),
                cue("exploration", "ambient_nature"),
            ],
        }
    }
}

fn fixture_element(
    kind: WorldElementKind,
    name: &str,
    position: Vec3,
    description: &str,
) -> WorldElement {
    WorldElement {
        kind,
        name: name.to_string(),
        position,
        description: Some(description.to_string()),
        interactive: true,
    }
}

fn cue(trigger: &str, sound: &str) -> AudioCue {
    AudioCue {
        trigger: trigger.to_string(),
        sound: sound.to_string(),
    }
}

impl WorldSource for FixtureWorldSource {
    fn name(&self) -> &'static str {
        "fixture"
    }

    fn load_world(&self, world_id: &str) -> Result<WorldData, ExplorerError> {
        Ok(self.demo_world(world_id))
    }

    fn interact(
        &self,
        _world_id: &str,
        request: &InteractionRequest,
    ) -> Result<InteractionReply, ExplorerError> {
        let reply = match request {
            InteractionRequest::Prompt { prompt, .. } => InteractionReply {
                message: format!("A Árvore da Vida AI responde ao seu desejo: '{}'", prompt),
                world_changes: Some(FIXTURE_WORLD_CHANGES.iter().map(|c| c.to_string()).collect()),
                dialogue: None,
            },
            InteractionRequest::CharacterInteraction { .. } => InteractionReply {
                message: FIXTURE_CHARACTER_MESSAGE.to_string(),
                world_changes: None,
                dialogue: Some(FIXTURE_CHARACTER_DIALOGUE.to_string()),
            },
        };
        Ok(reply)
    }

    fn list_worlds(&self) -> Result<Vec<WorldSummary>, ExplorerError> {
        Ok(vec![WorldSummary::from(&self.demo_world(DEMO_WORLD_ID))])
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_is_idempotent() {
        let src = FixtureWorldSource::new("O Pequeno Príncipe");
        let a = src.load_world("w1").unwrap();
        let b = src.load_world("w1").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.id, "w1");
        assert_eq!(a.title, "O Pequeno Príncipe");
    }

    #[test]
    fn fixture_elements_are_interactive_and_unique() {
        let world = FixtureWorldSource::new("t").demo_world("w");
        assert_eq!(world.interactive_elements.len(), 3);
        assert!(world.interactive_elements.iter().all(|e| e.interactive));

        let mut names: Vec<_> = world.interactive_elements.iter().map(|e| &e.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 3);

        let guide = world.element("Guia Místico").unwrap();
        assert_eq!(guide.position, Vec3::new(5.0, 0.0, 5.0));
        assert_eq!(world.cue_for("world_entry"), Some("mystical_welcome"));
    }

    #[test]
    fn fixture_prompt_reply_quotes_the_prompt() {
        let src = FixtureWorldSource::new("t");
        let reply = src
            .interact(
                "w",
                &InteractionRequest::Prompt {
                    prompt: "acenda as estrelas".into(),
                    position: Vec3::zero(),
                },
            )
            .unwrap();
        assert!(reply.message.contains("'acenda as estrelas'"));
        assert_eq!(reply.world_changes.unwrap().len(), 2);
    }

    #[test]
    fn fixture_character_reply_has_dialogue() {
        let src = FixtureWorldSource::new("t");
        let reply = src
            .interact(
                "w",
                &InteractionRequest::CharacterInteraction {
                    element_name: "Guia Místico".into(),
                    position: Vec3::zero(),
                },
            )
            .unwrap();
        assert_eq!(reply.dialogue.as_deref(), Some(FIXTURE_CHARACTER_DIALOGUE));
        assert_eq!(reply.message, FIXTURE_CHARACTER_MESSAGE);
    }

    #[test]
    fn fixture_lists_the_demo_world() {
        let worlds = FixtureWorldSource::new("História").list_worlds().unwrap();
        assert_eq!(worlds.len(), 1);
        assert_eq!(worlds[0].id, DEMO_WORLD_ID);
        assert_eq!(worlds[0].title, "História");
    }
}
