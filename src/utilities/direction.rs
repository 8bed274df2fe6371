use super::elevator_state::ElevatorState;

/// Direction of the current sweep.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// Floor offset of one movement step.
    pub fn step(self) -> i8 {
        match self {
            Direction::Up => 1,
            Direction::Down => -1,
        }
    }

    pub fn as_state(self) -> ElevatorState {
        match self {
            Direction::Up => ElevatorState::MovingUp,
            Direction::Down => ElevatorState::MovingDown,
        }
    }

    /// True if `floor` lies strictly beyond `from` when travelling this way.
    pub fn is_ahead(self, from: u8, floor: u8) -> bool {
        match self {
            Direction::Up => floor > from,
            Direction::Down => floor < from,
        }
    }
}
