//! Morph CLI
//!
//! Run the demo choreography headlessly and print what it does.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use morph_choreography::{ChoreographerConfig, Choreography, NodeId, PlaybackState};
use morph_core::{Color, CornerRadii};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod scene;

use scene::Scene;

#[derive(Parser)]
#[command(name = "morph")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Morph choreography CLI", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Choreographer config (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the demo scene and print sampled frames as JSON
    Play {
        /// Frame interval in milliseconds
        #[arg(short, long, default_value = "16")]
        interval: f32,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Print the compiled schedule of the demo scene
    Schedule,

    /// Print the effective configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays valid JSON
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Play { interval, pretty } => cmd_play(config, interval, pretty),
        Commands::Schedule => cmd_schedule(config),
        Commands::Config => print_json(&config, true),
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<ChoreographerConfig> {
    match path {
        Some(path) => ChoreographerConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(ChoreographerConfig::default()),
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}

// =============================================================================
// play
// =============================================================================

#[derive(Serialize)]
struct NodeFrame<'a> {
    name: &'a str,
    translation_x: f32,
    translation_y: f32,
    scale_x: f32,
    scale_y: f32,
    rotation: f32,
    alpha: f32,
    visible: bool,
    color: Color,
    corner_radii: CornerRadii,
}

#[derive(Serialize)]
struct Frame<'a> {
    elapsed_ms: f32,
    state: String,
    nodes: Vec<NodeFrame<'a>>,
}

fn sample<'a>(choreography: &Choreography, nodes: &'a [(String, NodeId)]) -> Frame<'a> {
    let nodes = nodes
        .iter()
        .filter_map(|(name, id)| {
            choreography.node(*id).map(|node| NodeFrame {
                name: name.as_str(),
                translation_x: node.translation_x(),
                translation_y: node.translation_y(),
                scale_x: node.scale_x(),
                scale_y: node.scale_y(),
                rotation: node.rotation(),
                alpha: node.alpha(),
                visible: node.is_visible(),
                color: node.color(),
                corner_radii: node.corner_radii(),
            })
        })
        .collect();

    Frame {
        elapsed_ms: choreography.elapsed_ms(),
        state: format!("{:?}", choreography.state()),
        nodes,
    }
}

fn cmd_play(config: ChoreographerConfig, interval: f32, pretty: bool) -> Result<()> {
    if interval <= 0.0 {
        anyhow::bail!("Frame interval must be positive, got {}", interval);
    }

    let mut scene = Scene::build(config)?;
    let nodes = scene.nodes.clone();
    info!(
        "Playing demo scene ({} ms, {} nodes)",
        scene.choreography.total_duration_ms(),
        nodes.len()
    );

    scene.choreography.play()?;
    scene.sync_bindings();
    let mut frames = vec![sample(&scene.choreography, &nodes)];

    while scene.choreography.state() == PlaybackState::Playing {
        scene.choreography.tick(interval)?;
        scene.sync_bindings();
        frames.push(sample(&scene.choreography, &nodes));
    }

    info!("Rendered {} frames", frames.len());
    print_json(&frames, pretty)
}

// =============================================================================
// schedule
// =============================================================================

#[derive(Serialize)]
struct StepSummary {
    step: usize,
    start_ms: f32,
    end_ms: f32,
    nodes: usize,
}

#[derive(Serialize)]
struct ScheduleSummary {
    total_duration_ms: f32,
    windows: Vec<(f32, f32)>,
    steps: Vec<StepSummary>,
}

fn cmd_schedule(config: ChoreographerConfig) -> Result<()> {
    let scene = Scene::build(config)?;
    let schedule = scene.choreography.schedule();

    let steps = schedule
        .steps()
        .iter()
        .map(|step| StepSummary {
            step: step.id.index(),
            start_ms: step.start_ms,
            end_ms: step.end_ms(),
            nodes: schedule.entries_for(step.id).count(),
        })
        .collect();

    print_json(
        &ScheduleSummary {
            total_duration_ms: schedule.total_duration_ms(),
            windows: schedule.windows(),
            steps,
        },
        true,
    )
}
