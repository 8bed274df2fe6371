//! Point-in-time view of the engine and its fixed text rendering.
//!
//! A [`Snapshot`] is captured while the engine lock is held and rendered
//! after it is released, so the text never mixes two states.

use std::fmt;

use super::elevator_state::ElevatorState;
use super::load_policy::SpeciesCount;
use super::passenger::Passenger;
use super::registry::PassengerRegistry;
use super::species::Species;

#[derive(serde::Serialize, Debug, Clone, PartialEq)]
pub struct FloorSnapshot {
    pub floor: u8,
    /// Waiting passengers in arrival order.
    pub waiting: Vec<Species>,
}

#[derive(serde::Serialize, Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub state: ElevatorState,
    pub current_floor: u8,
    pub species: SpeciesCount,
    pub onboard: Vec<Passenger>,
    pub num_waiting: usize,
    pub num_serviced: usize,
    /// Lobby first.
    pub floors: Vec<FloorSnapshot>,
}

impl Snapshot {
    pub fn capture(state: ElevatorState, current_floor: u8, registry: &PassengerRegistry) -> Self {
        let floors = (1..=registry.num_floors())
            .map(|floor| FloorSnapshot {
                floor,
                waiting: registry.waiting_at(floor).iter().map(|p| p.species).collect(),
            })
            .collect();

        Snapshot {
            state,
            current_floor,
            species: registry.count_by_species(),
            onboard: registry.onboard().to_vec(),
            num_waiting: registry.num_waiting(),
            num_serviced: registry.num_serviced(),
            floors,
        }
    }

    pub fn num_onboard(&self) -> usize {
        self.onboard.len()
    }

    pub fn is_offline(&self) -> bool {
        self.state == ElevatorState::Offline
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Elevator state: {}", self.state)?;
        if self.is_offline() {
            return Ok(());
        }

        writeln!(
            f,
            "Elevator status: {} wolves, {} sheep, {} grapes",
            self.species.wolves, self.species.sheep, self.species.grapes
        )?;
        writeln!(f, "Current floor: {}", self.current_floor)?;
        writeln!(f, "Number of passengers: {}", self.num_onboard())?;
        writeln!(f, "Number of passengers waiting: {}", self.num_waiting)?;
        writeln!(f, "Number passengers serviced: {}\n", self.num_serviced)?;

        for floor in self.floors.iter().rev() {
            let marker = if floor.floor == self.current_floor { '*' } else { ' ' };
            write!(f, "[{}] Floor {}: {}", marker, floor.floor, floor.waiting.len())?;
            for species in &floor.waiting {
                write!(f, " {}", species.abbreviation())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utilities::direction::Direction;
    use crate::utilities::load_policy::LoadPolicy;

    #[test]
    fn offline_renders_state_line_only() {
        let registry = PassengerRegistry::new(10);
        let snapshot = Snapshot::capture(ElevatorState::Offline, 1, &registry);
        assert_eq!(snapshot.to_string(), "Elevator state: OFFLINE\n");
    }

    #[test]
    fn renders_floors_top_down() {
        let mut registry = PassengerRegistry::new(4);
        registry.enqueue(1, Passenger::new(4, Species::Wolf)).unwrap();
        registry.load_at(1, Direction::Up, &LoadPolicy::new(10));
        registry.enqueue(3, Passenger::new(1, Species::Grape)).unwrap();
        registry.enqueue(3, Passenger::new(2, Species::Sheep)).unwrap();
        registry.enqueue(1, Passenger::new(2, Species::Grape)).unwrap();

        let snapshot = Snapshot::capture(ElevatorState::MovingUp, 2, &registry);
        let expected = "\
Elevator state: UP
Elevator status: 1 wolves, 0 sheep, 0 grapes
Current floor: 2
Number of passengers: 1
Number of passengers waiting: 3
Number passengers serviced: 0

[ ] Floor 4: 0
[ ] Floor 3: 2 G S
[*] Floor 2: 0
[ ] Floor 1: 1 G
";
        assert_eq!(snapshot.to_string(), expected);
    }

    #[test]
    fn serializes_to_json() {
        let registry = PassengerRegistry::new(2);
        let snapshot = Snapshot::capture(ElevatorState::Idle, 1, &registry);
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["state"], "Idle");
        assert_eq!(json["floors"].as_array().map(Vec::len), Some(2));
    }
}
