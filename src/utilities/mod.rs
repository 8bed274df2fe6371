pub mod config;
pub mod debug;
pub mod direction;
pub mod elevator_state;
pub mod error;
pub mod load_policy;
pub mod passenger;
pub mod registry;
pub mod snapshot;
pub mod species;
