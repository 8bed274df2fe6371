use std::fmt;

/// Lifecycle and motion state of the engine. `Offline` is both the initial and
/// the terminal state of an activation cycle.
#[derive(serde::Serialize, serde::Deserialize, PartialEq, Eq, Debug, Clone, Copy)]
pub enum ElevatorState {
    Offline,
    Idle,
    Loading,
    MovingUp,
    MovingDown,
}

impl ElevatorState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElevatorState::Offline => "OFFLINE",
            ElevatorState::Idle => "IDLE",
            ElevatorState::Loading => "LOADING",
            ElevatorState::MovingUp => "UP",
            ElevatorState::MovingDown => "DOWN",
        }
    }
}

impl fmt::Display for ElevatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
