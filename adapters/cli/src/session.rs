//! Text menu loop driving the world from a line-oriented terminal.

use std::io::{BufRead, Write};

use anyhow::Result;
use dungeon_core::{narrate, Command, CommandError, Direction, GameStatus};
use dungeon_random::RandomSource;
use dungeon_world::{self as world, query, World};
use tracing::debug;

const MAIN_PROMPT: &str = "Move, Pickup, Shoot, Restart, Quit (M-P-S-R-Q)?";
const TERMINAL_PROMPT: &str = "Restart, Quit (R-Q)?";

/// Plays the game until the player quits or the input runs dry.
///
/// `fresh_source` supplies the random source used by a restarted world.
pub(crate) fn run<R, W, F>(
    world: &mut World,
    mut input: R,
    mut output: W,
    mut fresh_source: F,
) -> Result<()>
where
    R: BufRead,
    W: Write,
    F: FnMut() -> Box<dyn RandomSource>,
{
    describe(world, &mut output)?;

    loop {
        let terminal = query::status(world).is_terminal();
        let prompt = if terminal { TERMINAL_PROMPT } else { MAIN_PROMPT };
        let Some(choice) = ask(&mut input, &mut output, prompt)? else {
            return Ok(());
        };

        let command = match choice.to_ascii_uppercase().as_str() {
            "Q" => {
                writeln!(output, "Goodbye")?;
                return Ok(());
            }
            "R" => {
                let baseline = query::baseline(world).clone();
                *world = World::restart(&baseline, fresh_source());
                writeln!(output, "The dungeon has been restored to its starting state")?;
                describe(world, &mut output)?;
                continue;
            }
            "M" if !terminal => {
                let Some(letter) = ask(&mut input, &mut output, "Where to (N-S-E-W)?")? else {
                    return Ok(());
                };
                Direction::from_letter(&letter).map(|direction| Command::Move { direction })
            }
            "P" if !terminal => {
                let Some(item) = ask(&mut input, &mut output, "What (A-T)?")? else {
                    return Ok(());
                };
                match item.to_ascii_uppercase().as_str() {
                    "A" => Ok(Command::PickArrow),
                    "T" => Ok(Command::PickTreasure),
                    _ => {
                        writeln!(output, "Pick either A for arrows or T for treasure")?;
                        continue;
                    }
                }
            }
            "S" if !terminal => {
                let Some(distance) = ask(&mut input, &mut output, "No. of caves (1-5)?")? else {
                    return Ok(());
                };
                let Ok(distance) = distance.parse::<i32>() else {
                    writeln!(output, "Distance must be a whole number")?;
                    continue;
                };
                let Some(letter) = ask(&mut input, &mut output, "Where to (N-S-E-W)?")? else {
                    return Ok(());
                };
                Direction::from_letter(&letter).map(|direction| Command::Shoot {
                    distance,
                    direction,
                })
            }
            _ => {
                writeln!(output, "Unknown option {choice:?}")?;
                continue;
            }
        };

        match command.and_then(|command| execute(world, command)) {
            Ok(report) => {
                writeln!(output, "{report}")?;
                describe(world, &mut output)?;
            }
            Err(error) => writeln!(output, "{error}")?,
        }
    }
}

fn execute(world: &mut World, command: Command) -> Result<String, CommandError> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events)?;
    debug!(?command, events = events.len(), "command_applied");
    Ok(narrate(&events))
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> Result<Option<String>> {
    writeln!(output, "{prompt}")?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_owned()))
}

fn describe<W: Write>(world: &World, output: &mut W) -> Result<()> {
    match query::status(world) {
        GameStatus::Won => {
            writeln!(output, "Congratulations, you reached the end of the dungeon!")?;
            return Ok(());
        }
        GameStatus::Dead => {
            writeln!(output, "Game over, better luck next time")?;
            return Ok(());
        }
        GameStatus::Exploring => {}
    }

    writeln!(output, "{}", query::current_location(world))?;
    writeln!(output, "Smell: {}", query::smell(world))?;
    writeln!(output, "Soil: {}", query::soil(world))?;
    let doors: Vec<String> = query::available_moves(world)
        .into_iter()
        .map(|direction| direction.letter().to_string())
        .collect();
    writeln!(output, "Doors lead to: {}", doors.join(", "))?;
    writeln!(output, "{}", query::player(world))?;
    Ok(())
}
