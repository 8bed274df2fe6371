/// ----- FSM MODULE -----
/// This module is the scheduler thread driving the elevator. It sweeps in
/// one direction until nothing is left that way (LOOK), stopping wherever
/// someone gets off or someone waiting travels the same way, then reverses.
/// It polls while idle and exits once stopped with an empty car.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, info};

use super::engine::Elevator;
use crate::utilities::config::TimingSettings;
use crate::utilities::direction::Direction;
use crate::utilities::elevator_state::ElevatorState;
use crate::utilities::load_policy::LoadPolicy;

/// Cancellation seen by the scheduler at its checkpoints. Raised by dropping
/// the paired sender.
#[derive(Debug, Clone)]
pub struct StopToken {
    stop_rx: Receiver<()>,
}

impl StopToken {
    pub fn new() -> (Sender<()>, StopToken) {
        let (stop_tx, stop_rx) = bounded(0);
        (stop_tx, StopToken { stop_rx })
    }

    pub fn should_stop(&self) -> bool {
        matches!(self.stop_rx.try_recv(), Err(TryRecvError::Disconnected))
    }

    /// Sleeps for `duration`, waking early if a stop is raised.
    pub fn sleep(&self, duration: Duration) {
        let _ = self.stop_rx.recv_timeout(duration);
    }
}

pub fn main(
    elevator: Arc<Mutex<Elevator>>,
    policy: LoadPolicy,
    timing: TimingSettings,
    stop: StopToken,
) {
    info!("scheduler started");
    let scheduler = Scheduler { elevator, policy, timing, stop };
    scheduler.run();
    info!("scheduler exited");
}

struct Scheduler {
    elevator: Arc<Mutex<Elevator>>,
    policy: LoadPolicy,
    timing: TimingSettings,
    stop: StopToken,
}

impl Scheduler {
    fn run(&self) {
        let (mut next, mut direction) = match self.choose_target(Direction::Up) {
            Some(target) => target,
            None => return,
        };

        while !self.can_stop() {
            let mut current = self.current_floor();
            while !self.can_stop() {
                if self.needs_stop(current, direction) {
                    self.loading(current, direction);
                    next = self.bound(direction);
                }

                self.set_state(direction.as_state());

                if current == next {
                    break;
                }

                thread::sleep(self.timing.movement);
                current = self.advance(direction);
            }

            if self.num_onboard() > 0 {
                // passengers aboard keep the car going
                direction = direction.opposite();
                next = self.bound(direction);
                debug!(?direction, next, "reversing");
            } else {
                match self.choose_target(direction) {
                    Some(target) => (next, direction) = target,
                    None => break,
                }
            }
        }
    }

    /// Stopped and nobody left to deliver.
    fn can_stop(&self) -> bool {
        let elevator = self.elevator.lock();
        self.can_stop_locked(&elevator)
    }

    fn can_stop_locked(&self, elevator: &Elevator) -> bool {
        self.stop.should_stop() && elevator.registry.num_onboard() == 0
    }

    /// Waits for a request and picks the floor and direction to head for.
    /// `None` means the scheduler was stopped while idle.
    fn choose_target(&self, direction: Direction) -> Option<(u8, Direction)> {
        let nearest = self.wait_idle()?;
        let current = self.current_floor();

        let mut next = nearest;
        if next == current {
            next = self.bound(direction);
            if next == current {
                next = self.bound(direction.opposite());
            }
        }

        let direction = if next > current {
            Direction::Up
        } else if next < current {
            Direction::Down
        } else {
            direction
        };
        debug!(nearest, next, ?direction, "target chosen");
        Some((next, direction))
    }

    fn wait_idle(&self) -> Option<u8> {
        let mut elevator = self.elevator.lock();
        let mut nearest = elevator.registry.nearest_request(elevator.current_floor);

        while !self.can_stop_locked(&elevator) && nearest.is_none() {
            elevator.state = ElevatorState::Idle;
            MutexGuard::unlocked(&mut elevator, || self.stop.sleep(self.timing.idle_poll));
            nearest = elevator.registry.nearest_request(elevator.current_floor);
        }

        if self.can_stop_locked(&elevator) {
            None
        } else {
            nearest
        }
    }

    fn needs_stop(&self, floor: u8, direction: Direction) -> bool {
        let elevator = self.elevator.lock();
        elevator.registry.needs_stop(floor, direction, elevator.is_active())
    }

    /// Unloads, pauses, then boards whoever may ride in `direction`. Nobody
    /// boards once deactivation has begun.
    fn loading(&self, floor: u8, direction: Direction) {
        let mut elevator = self.elevator.lock();
        elevator.state = ElevatorState::Loading;
        let unloaded = elevator.registry.unload_at(floor);

        MutexGuard::unlocked(&mut elevator, || thread::sleep(self.timing.load));

        let loaded = if elevator.is_active() {
            elevator.registry.load_at(floor, direction, &self.policy)
        } else {
            0
        };
        debug!(floor, unloaded, loaded, onboard = elevator.registry.num_onboard(), "loading");
    }

    /// Furthest floor still needing service in `direction`. Waiting
    /// passengers stop counting once deactivation has begun.
    fn bound(&self, direction: Direction) -> u8 {
        let elevator = self.elevator.lock();
        elevator.registry.bound(elevator.current_floor, direction, elevator.is_active())
    }

    fn advance(&self, direction: Direction) -> u8 {
        let mut elevator = self.elevator.lock();
        let top = elevator.registry.num_floors() as i16;
        let floor = (elevator.current_floor as i16 + direction.step() as i16).clamp(1, top);
        elevator.current_floor = floor as u8;
        debug!(floor, "arrived");
        elevator.current_floor
    }

    fn set_state(&self, state: ElevatorState) {
        self.elevator.lock().state = state;
    }

    fn current_floor(&self) -> u8 {
        self.elevator.lock().current_floor
    }

    fn num_onboard(&self) -> usize {
        self.elevator.lock().registry.num_onboard()
    }
}
