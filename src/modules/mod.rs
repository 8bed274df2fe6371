use std::error::Error;
use std::io::Read;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{never, select, tick, unbounded};
use tracing::{info, warn};

use crate::utilities::config::Config;
use crate::utilities::debug::Debug;
use crate::utilities::elevator_state::ElevatorState;
use crate::utilities::error::{return_code, ElevatorError};

pub mod engine;
pub mod fsm;
pub mod io;
pub mod status_file;

use engine::{ElevatorControl, Engine};
use io::Command;
use status_file::StatusFile;

pub fn run(args: &[String]) -> Result<(), Box<dyn Error>> {
    // READ CONFIGURATION
    let config = Config::get(args)?;
    info!(
        floors = config.elevator.num_floors,
        capacity = config.elevator.capacity,
        display = config.display.enabled,
        "configuration loaded"
    );

    let engine = Arc::new(Engine::from_config(&config));

    // INITIALIZE CHANNELS
    let (command_tx, command_rx) = unbounded();

    // INITIALIZE THREAD FOR CONSOLE INPUT
    thread::Builder::new()
        .name("io".to_string())
        .spawn(move || io::main(command_tx))?;

    let display_timer = if config.display.enabled {
        tick(config.display.refresh)
    } else {
        never()
    };
    let mut debug = Debug::new();
    let mut stopping = Vec::new();

    println!("{}", io::HELP);

    loop {
        select! {
            recv(command_rx) -> msg => {
                let command = msg.unwrap_or(Command::Quit);
                debug.detach();
                if !execute(&engine, command, &mut stopping)? {
                    println!("STOPPING PROGRAM...");
                    return Ok(())
                }
            },
            recv(display_timer) -> _ => {
                debug.printstatus(&engine.snapshot())?;
            }
        }
    }
}

/// Runs one console command; `false` ends the program. Stops run on their
/// own threads, collected in `stopping` so quitting can wait for the drain.
fn execute(
    engine: &Arc<Engine>,
    command: Command,
    stopping: &mut Vec<JoinHandle<()>>,
) -> std::io::Result<bool> {
    match command {
        Command::Start => report("start_elevator", engine.start_elevator()),
        Command::Issue { start_floor, destination_floor, species } => report(
            "issue_request",
            engine.issue_request(start_floor, destination_floor, species),
        ),
        Command::Stop => {
            // draining can take a while, keep the console responsive
            let engine = Arc::clone(engine);
            let handle = thread::Builder::new()
                .name("stop".to_string())
                .spawn(move || report("stop_elevator", engine.stop_elevator()))?;
            stopping.retain(|pending| !pending.is_finished());
            stopping.push(handle);
        }
        Command::Status { json: false } => {
            let mut text = String::new();
            StatusFile::open(engine).read_to_string(&mut text)?;
            print!("{}", text);
        }
        Command::Status { json: true } => match serde_json::to_string_pretty(&engine.snapshot()) {
            Ok(json) => println!("{}", json),
            Err(err) => warn!("could not serialize status: {}", err),
        },
        Command::Help => println!("{}", io::HELP),
        Command::Quit => {
            for handle in stopping.drain(..) {
                if handle.join().is_err() {
                    warn!("stop thread panicked");
                }
            }
            if engine.state() != ElevatorState::Offline {
                report("stop_elevator", engine.stop_elevator());
            }
            return Ok(false);
        }
    }
    Ok(true)
}

fn report(call: &str, result: Result<(), ElevatorError>) {
    match &result {
        Ok(()) => println!("{}: {}", call, return_code(&result)),
        Err(err) => println!("{}: {} ({})", call, return_code(&result), err),
    }
}
