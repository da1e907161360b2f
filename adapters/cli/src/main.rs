#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that lets a player explore a generated dungeon.

mod session;

use std::{fs, io, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use dungeon_core::WorldConfig;
use dungeon_random::{RandomSource, SeededSource};
use dungeon_world::World;
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Explore a randomly generated dungeon from the terminal.
#[derive(Parser, Debug)]
#[command(name = "dungeon", version, about, long_about = None)]
struct Args {
    /// TOML file providing defaults for every other option
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of grid rows
    #[arg(long)]
    rows: Option<u32>,

    /// Number of grid columns
    #[arg(long)]
    columns: Option<u32>,

    /// Extra links added on top of the spanning tree
    #[arg(long)]
    interconnectivity: Option<u32>,

    /// Base treasure percentage (0-100), re-rolled upward at generation
    #[arg(long = "treasure")]
    treasure_percent: Option<u32>,

    /// Connect grid borders to the opposite border
    #[arg(long)]
    wrapping: Option<bool>,

    /// Stationary monsters, including the one guarding the goal
    #[arg(long = "monsters")]
    stationary_monsters: Option<u32>,

    /// Thieves lurking each turn
    #[arg(long)]
    thieves: Option<u32>,

    /// Pits placed at generation
    #[arg(long)]
    pits: Option<u32>,

    /// Mobile monsters roaming each turn
    #[arg(long = "mobile")]
    mobile_monsters: Option<u32>,

    /// Seed making generation and combat reproducible
    #[arg(long)]
    seed: Option<u64>,
}

/// Contents of the optional TOML settings file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Settings {
    seed: Option<u64>,
    world: WorldConfig,
}

impl Args {
    fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => {
                let contents = fs::read_to_string(path)
                    .with_context(|| format!("failed to read settings from {}", path.display()))?;
                toml::from_str(&contents)
                    .with_context(|| format!("failed to parse settings in {}", path.display()))?
            }
            None => Settings::default(),
        };

        let world = &mut settings.world;
        override_with(&mut world.rows, self.rows);
        override_with(&mut world.columns, self.columns);
        override_with(&mut world.interconnectivity, self.interconnectivity);
        override_with(&mut world.treasure_percent, self.treasure_percent);
        override_with(&mut world.wrapping, self.wrapping);
        override_with(&mut world.stationary_monsters, self.stationary_monsters);
        override_with(&mut world.thieves, self.thieves);
        override_with(&mut world.pits, self.pits);
        override_with(&mut world.mobile_monsters, self.mobile_monsters);
        if self.seed.is_some() {
            settings.seed = self.seed;
        }
        Ok(settings)
    }
}

fn override_with<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn random_source(seed: Option<u64>) -> Box<dyn RandomSource> {
    match seed {
        Some(seed) => Box::new(SeededSource::new(seed)),
        None => Box::new(SeededSource::from_entropy()),
    }
}

/// Entry point for the dungeon command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let settings = args.settings()?;
    info!(config = ?settings.world, seed = ?settings.seed, "settings_resolved");

    let mut world = World::new(settings.world, random_source(settings.seed))
        .context("failed to generate the dungeon")?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    session::run(&mut world, stdin.lock(), stdout.lock(), || {
        random_source(settings.seed)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_overrides_the_defaults() {
        let args = Args::parse_from(["dungeon", "--rows", "6", "--wrapping", "true", "--seed", "9"]);
        let settings = args.settings().expect("settings resolve");
        assert_eq!(settings.world.rows, 6);
        assert_eq!(settings.world.columns, 7);
        assert!(settings.world.wrapping);
        assert_eq!(settings.seed, Some(9));
    }

    #[test]
    fn settings_files_fill_missing_fields_with_defaults() {
        let settings: Settings = toml::from_str(
            "seed = 4\n\n[world]\nrows = 8\nmobile_monsters = 3\n",
        )
        .expect("settings parse");
        assert_eq!(settings.seed, Some(4));
        assert_eq!(settings.world.rows, 8);
        assert_eq!(settings.world.mobile_monsters, 3);
        assert_eq!(settings.world.columns, WorldConfig::default().columns);
    }
}
