//! storyleaf-explorer binary
//!
//! Terminal front-end for the World Explorer. Loads a world (falling back to
//! the built-in demo world when the backend is unavailable) and reads
//! commands from stdin until `quit`, EOF or Ctrl-C.
//!
//! ## Commands
//!
//! | Command              | Effect                                   |
//! |----------------------|------------------------------------------|
//! | `w` `a` `s` `d`      | move forward / left / backward / right   |
//! | `say <text>`         | send a prompt to the world               |
//! | `talk <name>`        | interact with a discovered element       |
//! | `map`                | draw the mini-map                        |
//! | `map on` / `map off` | show or hide the mini-map                |
//! | `found`              | list discoveries                         |
//! | `log`                | print the whole exploration log          |
//! | `audio`              | toggle audio cues                        |
//! | `worlds`             | list worlds known to the source          |
//! | `enter <id>`         | load another world from the start        |
//! | `quit`               | leave                                    |

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use storyleaf_explorer::{
    explorer::{WorldExplorer, WorldOrigin},
    settings::{ExplorerSettings, SourceKind},
    source::FixtureWorldSource,
    types::Direction,
    ExplorerError,
};
use tokio::io::{AsyncBufReadExt, BufReader};

const MAP_CELLS: usize = 16;

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "storyleaf-explorer", about = "StoryLeaf World Explorer", version)]
struct Args {
    /// TOML settings file
    #[arg(long, env = "EXPLORER_CONFIG")]
    config: Option<PathBuf>,

    /// Backend root URL
    #[arg(long)]
    base_url: Option<String>,

    /// World to explore
    #[arg(long)]
    world_id: Option<String>,

    /// Story title shown for the demo world
    #[arg(long)]
    story_title: Option<String>,

    /// World data source
    #[arg(long, value_enum)]
    source: Option<SourceKind>,

    /// Exploration lock after each move (ms)
    #[arg(long)]
    lock_ms: Option<u64>,
}

impl Args {
    fn apply(self, mut settings: ExplorerSettings) -> ExplorerSettings {
        if let Some(v) = self.base_url {
            settings.base_url = v;
        }
        if let Some(v) = self.world_id {
            settings.world_id = v;
        }
        if let Some(v) = self.story_title {
            settings.story_title = v;
        }
        if let Some(v) = self.source {
            settings.source = v;
        }
        if let Some(v) = self.lock_ms {
            settings.lock_ms = v;
        }
        settings
    }
}

enum Flow {
    Continue,
    Quit,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("storyleaf_explorer=debug".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let settings = ExplorerSettings::load(args.config.as_deref())
        .context("Failed to load explorer settings")?;
    let settings = args.apply(settings);

    tracing::info!(
        world_id = %settings.world_id,
        source = ?settings.source,
        base_url = %settings.base_url,
        "Starting storyleaf-explorer"
    );

    let source = settings.build_source();
    let fallback = Arc::new(FixtureWorldSource::new(settings.story_title.clone()));
    let mut explorer = WorldExplorer::new(
        settings.world_id.clone(),
        source,
        fallback,
        settings.explorer_config(),
    );

    println!("Gerando mundo mágico...");
    match explorer
        .load()
        .await
        .context("Não foi possível acessar este mundo mágico")?
    {
        WorldOrigin::Source => {}
        WorldOrigin::Fallback { reason } => {
            println!("(modo demonstração: {})", reason);
        }
    }
    print_header(&explorer);
    play_cue(&mut explorer);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut printed = explorer.log_entries().len();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                if let Flow::Quit = handle_command(&mut explorer, line.trim()).await {
                    break;
                }
                printed = print_new_entries(&explorer, printed);
                play_cue(&mut explorer);
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("storyleaf-explorer shutting down (SIGINT)");
                break;
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

async fn handle_command(explorer: &mut WorldExplorer, line: &str) -> Flow {
    let (cmd, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    let result = match cmd {
        "" => Ok(()),
        "quit" | "exit" | "sair" => return Flow::Quit,
        "say" => explorer.say(rest).await.map(|_| ()),
        "talk" => talk(explorer, rest).await,
        "map" => {
            let wanted = match rest {
                "on" => Some(true),
                "off" => Some(false),
                _ => None,
            };
            if wanted.is_some_and(|on| on != explorer.minimap_visible()) {
                explorer.toggle_minimap();
            }
            if explorer.minimap_visible() {
                print_minimap(explorer);
            } else {
                println!("Mini mapa oculto (map on para mostrar)");
            }
            Ok(())
        }
        "found" => {
            print_discoveries(explorer);
            Ok(())
        }
        "log" => {
            explorer.log_entries().iter().for_each(|e| println!("  {}", e));
            Ok(())
        }
        "audio" => {
            let on = explorer.toggle_audio();
            println!("Áudio {}", if on { "ligado" } else { "desligado" });
            Ok(())
        }
        "worlds" => match explorer.list_worlds().await {
            Ok(worlds) => {
                for w in worlds {
                    println!("  {} – {} ({})", w.id, w.title, w.environment_type);
                }
                Ok(())
            }
            Err(e) => Err(e),
        },
        "enter" if !rest.is_empty() => enter(explorer, rest).await,
        other => match other.parse::<Direction>() {
            Ok(direction) => explorer.navigate(direction).map(|report| {
                println!("Posição: {}", report.position);
            }),
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        report_error(&e);
    }
    Flow::Continue
}

async fn talk(explorer: &mut WorldExplorer, name: &str) -> Result<(), ExplorerError> {
    let discovered = explorer.discoveries().iter().any(|d| d.name == name);
    if !discovered {
        return Err(ExplorerError::UnknownElement(name.to_string()));
    }
    explorer.interact_with(name).await.map(|_| ())
}

async fn enter(explorer: &mut WorldExplorer, world_id: &str) -> Result<(), ExplorerError> {
    println!("Gerando mundo mágico...");
    if let WorldOrigin::Fallback { reason } = explorer.load_world(world_id).await? {
        println!("(modo demonstração: {})", reason);
    }
    print_header(explorer);
    Ok(())
}

fn report_error(e: &ExplorerError) {
    match e {
        ExplorerError::Locked => println!("Explorando... aguarde."),
        ExplorerError::EmptyPrompt => println!("Digite um comando ou desejo para o mundo."),
        e if e.is_remote() => println!("O mundo não respondeu ({}).", e),
        e => println!("{}", e),
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn print_header(explorer: &WorldExplorer) {
    if let Some(world) = explorer.world() {
        println!("== {} ==", world.title);
        println!("{}", world.description);
    }
    println!("{}", explorer.position_label());
    println!(
        "Comandos: w a s d | say <texto> | talk <nome> | map [on|off] | found | log | audio | worlds | enter <id> | quit"
    );
}

fn print_new_entries(explorer: &WorldExplorer, printed: usize) -> usize {
    let entries = explorer.log_entries();
    // A world switch starts a fresh log.
    let printed = if entries.len() < printed { 0 } else { printed };
    for entry in entries.iter().skip(printed) {
        println!("» {}", entry);
    }
    entries.len()
}

fn print_minimap(explorer: &WorldExplorer) {
    if let Some(frame) = explorer.minimap() {
        for row in frame.to_grid(MAP_CELLS, MAP_CELLS) {
            println!("  {}", row);
        }
        println!("  Mini Mapa ({} marcadores)", frame.marker_count());
    }
}

fn print_discoveries(explorer: &WorldExplorer) {
    let found = explorer.discoveries();
    if found.is_empty() {
        println!("Explore para descobrir elementos mágicos");
        return;
    }
    for d in found {
        match d.description {
            Some(desc) => println!("  {} [{}] – {}", d.name, d.kind.label(), desc),
            None => println!("  {} [{}]", d.name, d.kind.label()),
        }
    }
}

fn play_cue(explorer: &mut WorldExplorer) {
    if let Some(sound) = explorer.take_cue() {
        tracing::debug!(%sound, "audio cue");
    }
}
