//! Simulated elevator carrying wolves, sheep and grapes between floors.
//!
//! - **utilities**: passenger types, boarding rules, queues, status rendering,
//!   configuration and errors.
//! - **modules**: the engine with its control calls, the scheduler thread,
//!   the status file and the console front end.

pub mod modules;
pub mod utilities;

pub use modules::engine::{Counters, ElevatorControl, Engine};
pub use modules::status_file::StatusFile;
pub use utilities::config::{Config, ElevatorSettings, TimingSettings};
pub use utilities::elevator_state::ElevatorState;
pub use utilities::error::{ConfigError, ElevatorError, ErrorKind};
pub use utilities::snapshot::Snapshot;
pub use utilities::species::Species;
