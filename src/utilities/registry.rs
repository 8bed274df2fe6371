//! Per-floor waiting queues and the list of passengers in the car.
//!
//! Floors are numbered from 1 (the lobby) to `num_floors`; every method taking
//! a floor expects it to be in that range.

use std::collections::VecDeque;

use tracing::trace;

use super::direction::Direction;
use super::error::ElevatorError;
use super::load_policy::{LoadPolicy, SpeciesCount};
use super::passenger::Passenger;

#[derive(Debug, Clone)]
pub struct PassengerRegistry {
    floors: Vec<VecDeque<Passenger>>,
    onboard: Vec<Passenger>,
    num_floors: u8,
    num_waiting: usize,
    num_serviced: usize,
}

impl PassengerRegistry {
    pub fn new(num_floors: u8) -> Self {
        PassengerRegistry {
            floors: vec![VecDeque::new(); num_floors as usize],
            onboard: Vec::new(),
            num_floors,
            num_waiting: 0,
            num_serviced: 0,
        }
    }

    pub fn num_floors(&self) -> u8 {
        self.num_floors
    }

    pub fn num_onboard(&self) -> usize {
        self.onboard.len()
    }

    pub fn num_waiting(&self) -> usize {
        self.num_waiting
    }

    pub fn num_serviced(&self) -> usize {
        self.num_serviced
    }

    pub fn onboard(&self) -> &[Passenger] {
        &self.onboard
    }

    pub fn waiting_at(&self, floor: u8) -> &VecDeque<Passenger> {
        &self.floors[Self::index(floor)]
    }

    /// Drops every queued and onboard passenger. The serviced count is kept.
    pub fn clear(&mut self) {
        for queue in self.floors.iter_mut() {
            queue.clear();
        }
        self.onboard.clear();
        self.num_waiting = 0;
    }

    /// Empties the registry and zeroes the counters.
    pub fn reset(&mut self) {
        self.clear();
        self.num_waiting = 0;
        self.num_serviced = 0;
    }

    /// Appends `passenger` to the tail of the queue at `floor`.
    pub fn enqueue(&mut self, floor: u8, passenger: Passenger) -> Result<(), ElevatorError> {
        let queue = &mut self.floors[Self::index(floor)];
        queue.try_reserve(1).map_err(|_| ElevatorError::OutOfMemory)?;
        queue.push_back(passenger);
        self.num_waiting += 1;
        Ok(())
    }

    /// Removes every onboard passenger headed for `floor` and returns how many left.
    pub fn unload_at(&mut self, floor: u8) -> usize {
        let before = self.onboard.len();
        self.onboard.retain(|passenger| passenger.destination != floor);
        let unloaded = before - self.onboard.len();
        self.num_serviced += unloaded;
        unloaded
    }

    /// Boards passengers waiting at `floor` in arrival order. Each candidate is
    /// checked against the car including those boarded earlier in the same call;
    /// refused passengers keep their relative order in the queue.
    pub fn load_at(&mut self, floor: u8, direction: Direction, policy: &LoadPolicy) -> usize {
        let mut composition = self.count_by_species();
        let queue = std::mem::take(&mut self.floors[Self::index(floor)]);
        let mut remaining = VecDeque::with_capacity(queue.len());
        let mut loaded = 0;

        for passenger in queue {
            match policy.check(&composition, &passenger, direction, floor) {
                None => {
                    composition.add(passenger.species);
                    self.onboard.push(passenger);
                    self.num_waiting -= 1;
                    loaded += 1;
                }
                Some(refusal) => {
                    trace!(floor, ?refusal, species = ?passenger.species, "passenger left waiting");
                    remaining.push_back(passenger);
                }
            }
        }

        self.floors[Self::index(floor)] = remaining;
        loaded
    }

    pub fn count_by_species(&self) -> SpeciesCount {
        SpeciesCount::from_passengers(&self.onboard)
    }

    /// True if the car has a reason to open at `floor` while sweeping in
    /// `direction`: someone onboard gets off here, or (when `include_waiting`)
    /// someone queued here travels that way or gets off on this same floor.
    pub fn needs_stop(&self, floor: u8, direction: Direction, include_waiting: bool) -> bool {
        if self.onboard.iter().any(|passenger| passenger.destination == floor) {
            return true;
        }
        include_waiting
            && self.waiting_at(floor).iter().any(|passenger| {
                passenger.destination == floor || direction.is_ahead(floor, passenger.destination)
            })
    }

    /// Furthest floor in `direction` from `floor` that still needs service,
    /// or `floor` itself when nothing lies that way.
    pub fn bound(&self, floor: u8, direction: Direction, include_waiting: bool) -> u8 {
        match direction {
            Direction::Up => self.upper_bound(floor, include_waiting),
            Direction::Down => self.lower_bound(floor, include_waiting),
        }
    }

    pub fn upper_bound(&self, floor: u8, include_waiting: bool) -> u8 {
        let mut upper = floor;
        if include_waiting {
            for f in floor..=self.num_floors {
                for passenger in self.waiting_at(f) {
                    upper = upper.max(f).max(passenger.destination);
                }
            }
        }
        for passenger in &self.onboard {
            upper = upper.max(passenger.destination);
        }
        upper
    }

    pub fn lower_bound(&self, floor: u8, include_waiting: bool) -> u8 {
        let mut lower = floor;
        if include_waiting {
            for f in 1..=floor {
                for passenger in self.waiting_at(f) {
                    lower = lower.min(f).min(passenger.destination);
                }
            }
        }
        for passenger in &self.onboard {
            lower = lower.min(passenger.destination);
        }
        lower
    }

    /// Closest floor with someone waiting; the lower floor wins a tie.
    pub fn nearest_request(&self, floor: u8) -> Option<u8> {
        let mut nearest: Option<(u8, u8)> = None;
        for f in 1..=self.num_floors {
            if self.waiting_at(f).is_empty() {
                continue;
            }
            let distance = f.abs_diff(floor);
            match nearest {
                Some((_, best)) if best <= distance => {}
                _ => nearest = Some((f, distance)),
            }
        }
        nearest.map(|(f, _)| f)
    }

    fn index(floor: u8) -> usize {
        floor as usize - 1
    }
}
