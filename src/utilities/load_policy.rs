//! Boarding rules.
//!
//! A waiting passenger is checked against the car as it is at that moment, so
//! the same passenger may be refused on one visit and admitted on the next.
//! Wolves eat sheep and sheep eat grapes; wolves and grapes ride together.
//! Each forbidden pair is refused whichever of the two boards second.

use super::direction::Direction;
use super::passenger::Passenger;
use super::species::Species;

/// Number of each species currently onboard.
#[derive(serde::Serialize, serde::Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SpeciesCount {
    pub wolves: usize,
    pub sheep: usize,
    pub grapes: usize,
}

impl SpeciesCount {
    pub fn from_passengers<'a>(passengers: impl IntoIterator<Item = &'a Passenger>) -> Self {
        let mut count = SpeciesCount::default();
        for passenger in passengers {
            count.add(passenger.species);
        }
        count
    }

    pub fn add(&mut self, species: Species) {
        match species {
            Species::Wolf => self.wolves += 1,
            Species::Sheep => self.sheep += 1,
            Species::Grape => self.grapes += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.wolves + self.sheep + self.grapes
    }
}

/// Why a passenger was left on the floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    Full,
    WolfOnboard,
    SheepOnboard,
    GrapeOnboard,
    WrongDirection,
}

#[derive(Debug, Clone, Copy)]
pub struct LoadPolicy {
    capacity: usize,
}

impl LoadPolicy {
    pub fn new(capacity: usize) -> Self {
        LoadPolicy { capacity }
    }

    /// Returns the first rule that keeps `candidate` off the car, `None` if
    /// it may board.
    pub fn check(
        &self,
        onboard: &SpeciesCount,
        candidate: &Passenger,
        direction: Direction,
        current_floor: u8,
    ) -> Option<Refusal> {
        if onboard.total() >= self.capacity {
            return Some(Refusal::Full);
        }
        match candidate.species {
            Species::Sheep if onboard.wolves > 0 => return Some(Refusal::WolfOnboard),
            Species::Sheep if onboard.grapes > 0 => return Some(Refusal::GrapeOnboard),
            Species::Wolf | Species::Grape if onboard.sheep > 0 => return Some(Refusal::SheepOnboard),
            _ => {}
        }
        // destination equal to the current floor passes in both directions
        if direction.opposite().is_ahead(current_floor, candidate.destination) {
            return Some(Refusal::WrongDirection);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(wolves: usize, sheep: usize, grapes: usize) -> SpeciesCount {
        SpeciesCount { wolves, sheep, grapes }
    }

    fn admits(policy: &LoadPolicy, onboard: SpeciesCount, candidate: &Passenger) -> bool {
        policy.check(&onboard, candidate, Direction::Up, 1).is_none()
    }

    #[test]
    fn refuses_when_full() {
        let policy = LoadPolicy::new(2);
        let grape = Passenger::new(5, Species::Grape);
        assert_eq!(policy.check(&count(2, 0, 0), &grape, Direction::Up, 1), Some(Refusal::Full));
        assert!(admits(&policy, count(1, 0, 0), &grape));
    }

    #[test]
    fn sheep_refused_with_wolf_or_grape() {
        let policy = LoadPolicy::new(10);
        let sheep = Passenger::new(5, Species::Sheep);
        assert_eq!(
            policy.check(&count(1, 0, 0), &sheep, Direction::Up, 1),
            Some(Refusal::WolfOnboard)
        );
        assert_eq!(
            policy.check(&count(0, 0, 1), &sheep, Direction::Up, 1),
            Some(Refusal::GrapeOnboard)
        );
        assert!(admits(&policy, count(0, 3, 0), &sheep));
    }

    #[test]
    fn sheep_keeps_wolves_and_grapes_off() {
        let policy = LoadPolicy::new(10);
        let grape = Passenger::new(5, Species::Grape);
        let wolf = Passenger::new(5, Species::Wolf);
        assert_eq!(
            policy.check(&count(0, 1, 0), &grape, Direction::Up, 1),
            Some(Refusal::SheepOnboard)
        );
        assert_eq!(
            policy.check(&count(0, 1, 0), &wolf, Direction::Up, 1),
            Some(Refusal::SheepOnboard)
        );
    }

    #[test]
    fn wolves_and_grapes_ride_together() {
        let policy = LoadPolicy::new(10);
        let wolf = Passenger::new(5, Species::Wolf);
        let grape = Passenger::new(5, Species::Grape);
        assert!(admits(&policy, count(0, 0, 2), &wolf));
        assert!(admits(&policy, count(2, 0, 1), &grape));
    }

    #[test]
    fn direction_filter() {
        let policy = LoadPolicy::new(10);
        let down = Passenger::new(2, Species::Grape);
        let up = Passenger::new(8, Species::Grape);
        let same = Passenger::new(5, Species::Grape);
        let empty = SpeciesCount::default();

        assert_eq!(policy.check(&empty, &down, Direction::Up, 5), Some(Refusal::WrongDirection));
        assert_eq!(policy.check(&empty, &up, Direction::Up, 5), None);
        assert_eq!(policy.check(&empty, &up, Direction::Down, 5), Some(Refusal::WrongDirection));
        assert_eq!(policy.check(&empty, &down, Direction::Down, 5), None);
        assert_eq!(policy.check(&empty, &same, Direction::Up, 5), None);
        assert_eq!(policy.check(&empty, &same, Direction::Down, 5), None);
    }

    #[test]
    fn counts_passengers() {
        let passengers = vec![
            Passenger::new(2, Species::Wolf),
            Passenger::new(3, Species::Grape),
            Passenger::new(4, Species::Wolf),
        ];
        let count = SpeciesCount::from_passengers(&passengers);
        assert_eq!(count, SpeciesCount { wolves: 2, sheep: 0, grapes: 1 });
        assert_eq!(count.total(), 3);
    }
}
