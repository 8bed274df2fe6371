//! The elevator aggregate and the three control operations.
//!
//! All engine state sits behind one lock shared with the scheduler thread.
//! Control calls take it only for their checks and mutations; the blocking
//! part of a stop (joining the scheduler) happens with it released.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::Sender;
use parking_lot::Mutex;
use tracing::{error, info, warn};

use super::fsm::{self, StopToken};
use crate::utilities::config::{Config, ElevatorSettings, TimingSettings, LOBBY};
use crate::utilities::elevator_state::ElevatorState;
use crate::utilities::error::ElevatorError;
use crate::utilities::load_policy::LoadPolicy;
use crate::utilities::passenger::Passenger;
use crate::utilities::registry::PassengerRegistry;
use crate::utilities::snapshot::Snapshot;
use crate::utilities::species::Species;

/// Entry points exposed to whatever dispatches requests into the engine.
pub trait ElevatorControl {
    fn start_elevator(&self) -> Result<(), ElevatorError>;
    fn issue_request(&self, start_floor: i32, destination_floor: i32, species: i32) -> Result<(), ElevatorError>;
    fn stop_elevator(&self) -> Result<(), ElevatorError>;
}

/// State guarded by the engine lock.
#[derive(Debug)]
pub struct Elevator {
    pub state: ElevatorState,
    pub current_floor: u8,
    pub deactivating: bool,
    pub registry: PassengerRegistry,
}

impl Elevator {
    fn new(num_floors: u8) -> Self {
        Elevator {
            state: ElevatorState::Offline,
            current_floor: LOBBY,
            deactivating: false,
            registry: PassengerRegistry::new(num_floors),
        }
    }

    /// Running and still accepting passengers.
    pub fn is_active(&self) -> bool {
        self.state != ElevatorState::Offline && !self.deactivating
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self.state, self.current_floor, &self.registry)
    }

    fn activate(&mut self) {
        self.registry.reset();
        self.state = ElevatorState::Idle;
        self.current_floor = LOBBY;
        self.deactivating = false;
    }

    fn shut_down(&mut self) {
        self.registry.clear();
        self.state = ElevatorState::Offline;
        self.deactivating = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counters {
    pub num_waiting: usize,
    pub num_serviced: usize,
}

struct Worker {
    handle: JoinHandle<()>,
    stop_tx: Sender<()>,
}

pub struct Engine {
    elevator: Arc<Mutex<Elevator>>,
    settings: ElevatorSettings,
    timing: TimingSettings,
    // Held by a start while it spawns and by a stop while it waits for the drain.
    worker: Mutex<Option<Worker>>,
}

impl Engine {
    pub fn new(settings: ElevatorSettings, timing: TimingSettings) -> Self {
        Engine {
            elevator: Arc::new(Mutex::new(Elevator::new(settings.num_floors))),
            settings,
            timing,
            worker: Mutex::new(None),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.elevator.clone(), config.timing.clone())
    }

    /// Consistent view of the whole engine, taken under a single lock.
    pub fn snapshot(&self) -> Snapshot {
        self.elevator.lock().snapshot()
    }

    /// Text status block.
    pub fn status(&self) -> String {
        self.snapshot().to_string()
    }

    pub fn state(&self) -> ElevatorState {
        self.elevator.lock().state
    }

    pub fn is_active(&self) -> bool {
        self.elevator.lock().is_active()
    }

    /// Counters of the current or most recent activation.
    pub fn counters(&self) -> Counters {
        let elevator = self.elevator.lock();
        Counters {
            num_waiting: elevator.registry.num_waiting(),
            num_serviced: elevator.registry.num_serviced(),
        }
    }

    fn parse_floor(&self, floor: i32) -> Option<u8> {
        u8::try_from(floor)
            .ok()
            .filter(|floor| (LOBBY..=self.settings.num_floors).contains(floor))
    }
}

impl ElevatorControl for Engine {
    fn start_elevator(&self) -> Result<(), ElevatorError> {
        // a draining engine is still active, reject without waiting for it
        if self.state() != ElevatorState::Offline {
            warn!("start rejected, elevator already active");
            return Err(ElevatorError::AlreadyActive);
        }

        let mut worker = self.worker.lock();
        {
            let mut elevator = self.elevator.lock();
            if elevator.state != ElevatorState::Offline {
                warn!("start rejected, elevator already active");
                return Err(ElevatorError::AlreadyActive);
            }
            elevator.activate();
        }

        let (stop_tx, stop) = StopToken::new();
        let elevator = Arc::clone(&self.elevator);
        let policy = LoadPolicy::new(self.settings.capacity as usize);
        let timing = self.timing.clone();
        let spawned = thread::Builder::new()
            .name("scheduler".to_string())
            .spawn(move || fsm::main(elevator, policy, timing, stop));

        match spawned {
            Ok(handle) => {
                *worker = Some(Worker { handle, stop_tx });
                info!(floors = self.settings.num_floors, capacity = self.settings.capacity, "elevator started");
                Ok(())
            }
            Err(err) => {
                error!("error spawning scheduler thread: {}", err);
                self.elevator.lock().state = ElevatorState::Offline;
                Err(ElevatorError::SpawnFailed(err))
            }
        }
    }

    fn issue_request(&self, start_floor: i32, destination_floor: i32, species: i32) -> Result<(), ElevatorError> {
        let mut elevator = self.elevator.lock();
        if !elevator.is_active() {
            warn!(start_floor, destination_floor, species, "request rejected, elevator not active");
            return Err(ElevatorError::NotActive);
        }

        let parsed = (
            self.parse_floor(start_floor),
            self.parse_floor(destination_floor),
            Species::from_code(species),
        );
        let (start, destination, kind) = match parsed {
            (Some(start), Some(destination), Some(kind)) => (start, destination, kind),
            _ => {
                warn!(start_floor, destination_floor, species, "request rejected, invalid");
                return Err(ElevatorError::InvalidRequest {
                    start: start_floor,
                    destination: destination_floor,
                    species,
                });
            }
        };

        elevator.registry.enqueue(start, Passenger::new(destination, kind))?;
        info!(start, destination, species = ?kind, "passenger waiting");
        Ok(())
    }

    fn stop_elevator(&self) -> Result<(), ElevatorError> {
        {
            let mut elevator = self.elevator.lock();
            if !elevator.is_active() {
                warn!("stop rejected, elevator already inactive");
                return Err(ElevatorError::AlreadyInactive);
            }
            elevator.deactivating = true;
            info!(onboard = elevator.registry.num_onboard(), "elevator deactivating");
        }

        // a start still spawning holds this until its worker is stored
        let mut worker = self.worker.lock();
        if let Some(Worker { handle, stop_tx }) = worker.take() {
            drop(stop_tx);
            if handle.join().is_err() {
                error!("scheduler thread panicked");
            }
        }

        self.elevator.lock().shut_down();
        info!("elevator stopped");
        Ok(())
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if self.worker.get_mut().is_some() {
            if let Err(err) = self.stop_elevator() {
                warn!("could not stop elevator on drop: {}", err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn idle_engine() -> Engine {
        let timing = TimingSettings {
            load: Duration::from_millis(1),
            movement: Duration::from_millis(1),
            idle_poll: Duration::from_millis(1),
        };
        Engine::new(ElevatorSettings::default(), timing)
    }

    #[test]
    fn offline_until_started() {
        let engine = idle_engine();
        assert_eq!(engine.state(), ElevatorState::Offline);
        assert_eq!(engine.status(), "Elevator state: OFFLINE\n");
        assert!(matches!(engine.issue_request(1, 2, 0), Err(ElevatorError::NotActive)));
        assert!(matches!(engine.stop_elevator(), Err(ElevatorError::AlreadyInactive)));
    }

    #[test]
    fn start_twice_is_rejected() {
        let engine = idle_engine();
        engine.start_elevator().unwrap();
        assert!(matches!(engine.start_elevator(), Err(ElevatorError::AlreadyActive)));
        engine.stop_elevator().unwrap();
        assert!(matches!(engine.stop_elevator(), Err(ElevatorError::AlreadyInactive)));
        assert_eq!(engine.state(), ElevatorState::Offline);
    }

    #[test]
    fn validates_requests() {
        let engine = idle_engine();
        engine.start_elevator().unwrap();
        for (start, destination, species) in [(0, 3, 1), (11, 3, 1), (3, 0, 1), (3, 11, 1), (3, 5, 3), (3, 5, -1), (-300, 5, 0)] {
            let result = engine.issue_request(start, destination, species);
            assert!(
                matches!(result, Err(ElevatorError::InvalidRequest { .. })),
                "({}, {}, {}) accepted",
                start,
                destination,
                species
            );
        }
        assert_eq!(engine.counters().num_waiting, 0);
        engine.stop_elevator().unwrap();
    }

    #[test]
    fn restart_resets_counters() {
        let engine = idle_engine();
        engine.start_elevator().unwrap();
        engine.stop_elevator().unwrap();
        engine.start_elevator().unwrap();
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.current_floor, LOBBY);
        assert_eq!(snapshot.num_serviced, 0);
        assert_eq!(snapshot.num_waiting, 0);
    }

    #[test]
    fn drop_stops_running_engine() {
        let engine = idle_engine();
        engine.start_elevator().unwrap();
        let elevator = Arc::clone(&engine.elevator);
        drop(engine);
        assert_eq!(elevator.lock().state, ElevatorState::Offline);
        assert_eq!(Arc::strong_count(&elevator), 1);
    }
}
