/// ----- IO MODULE -----
/// This module reads control commands from standard input and forwards
/// them to the main loop. It is the outside boundary through which the
/// start, request and stop calls reach the engine.

use std::io::{self, BufRead};

use crossbeam_channel::Sender;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Issue {
        start_floor: i32,
        destination_floor: i32,
        species: i32,
    },
    Stop,
    Status { json: bool },
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  start                         activate the elevator
  issue <start> <dest> <type>   request a ride (type: 0 grape, 1 sheep, 2 wolf)
  stop                          deliver everyone onboard, then deactivate
  status [json]                 print the status block
  help                          show this text
  quit                          stop the elevator if running and exit";

pub fn parse_command(line: &str) -> Result<Command, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        ["start"] => Ok(Command::Start),
        ["stop"] => Ok(Command::Stop),
        ["status"] => Ok(Command::Status { json: false }),
        ["status", "json"] => Ok(Command::Status { json: true }),
        ["help"] => Ok(Command::Help),
        ["quit"] | ["exit"] => Ok(Command::Quit),
        ["issue", start, destination, species] => Ok(Command::Issue {
            start_floor: parse_number(start)?,
            destination_floor: parse_number(destination)?,
            species: parse_number(species)?,
        }),
        ["issue", ..] => Err(String::from("usage: issue <start> <dest> <type>")),
        [] => Err(String::from("empty command")),
        [other, ..] => Err(format!("unknown command {}, try help", other)),
    }
}

fn parse_number(word: &str) -> Result<i32, String> {
    word.parse::<i32>().map_err(|_| format!("{} is not a number", word))
}

/// Forwards parsed stdin lines until end of input, then sends `Quit`.
pub fn main(command_tx: Sender<Command>) {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                warn!("could not read input: {}", err);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match parse_command(&line) {
            Ok(command) => {
                let quit = command == Command::Quit;
                if command_tx.send(command).is_err() || quit {
                    return;
                }
            }
            Err(message) => println!("{}", message),
        }
    }
    let _ = command_tx.send(Command::Quit);
}
