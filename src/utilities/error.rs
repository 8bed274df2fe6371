//! Errors returned by the control API and by configuration loading.
//!
//! | Error | Kind | Code |
//! |-------|------|------|
//! | [`ElevatorError::AlreadyActive`] | StateConflict | `ELEVATOR_ALREADY_ACTIVE` |
//! | [`ElevatorError::AlreadyInactive`] | StateConflict | `ELEVATOR_ALREADY_INACTIVE` |
//! | [`ElevatorError::NotActive`] | StateConflict | `ELEVATOR_NOT_ACTIVE` |
//! | [`ElevatorError::InvalidRequest`] | Validation | `ELEVATOR_INVALID_REQUEST` |
//! | [`ElevatorError::OutOfMemory`] | ResourceExhaustion | `ELEVATOR_OUT_OF_MEMORY` |
//! | [`ElevatorError::SpawnFailed`] | Spawn | `ELEVATOR_SPAWN_FAILED` |

use thiserror::Error;

const ENOMEM: i64 = 12;
const EAGAIN: i64 = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The operation does not fit the current lifecycle phase.
    StateConflict,
    /// The request carried an out-of-range floor or an unknown species.
    Validation,
    ResourceExhaustion,
    Spawn,
}

#[derive(Debug, Error)]
pub enum ElevatorError {
    #[error("elevator is already active")]
    AlreadyActive,

    #[error("elevator is already inactive")]
    AlreadyInactive,

    #[error("elevator is not active")]
    NotActive,

    #[error("invalid request: start floor {start}, destination floor {destination}, species {species}")]
    InvalidRequest {
        start: i32,
        destination: i32,
        species: i32,
    },

    #[error("out of memory while recording passenger")]
    OutOfMemory,

    #[error("failed to spawn scheduler thread: {0}")]
    SpawnFailed(#[source] std::io::Error),
}

impl ElevatorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ElevatorError::AlreadyActive
            | ElevatorError::AlreadyInactive
            | ElevatorError::NotActive => ErrorKind::StateConflict,
            ElevatorError::InvalidRequest { .. } => ErrorKind::Validation,
            ElevatorError::OutOfMemory => ErrorKind::ResourceExhaustion,
            ElevatorError::SpawnFailed(_) => ErrorKind::Spawn,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ElevatorError::AlreadyActive => "ELEVATOR_ALREADY_ACTIVE",
            ElevatorError::AlreadyInactive => "ELEVATOR_ALREADY_INACTIVE",
            ElevatorError::NotActive => "ELEVATOR_NOT_ACTIVE",
            ElevatorError::InvalidRequest { .. } => "ELEVATOR_INVALID_REQUEST",
            ElevatorError::OutOfMemory => "ELEVATOR_OUT_OF_MEMORY",
            ElevatorError::SpawnFailed(_) => "ELEVATOR_SPAWN_FAILED",
        }
    }

    /// Numeric result in the style of the classic control calls: 1 for a
    /// refused call, a negated errno for resource and spawn failures.
    pub fn return_code(&self) -> i64 {
        match self.kind() {
            ErrorKind::StateConflict | ErrorKind::Validation => 1,
            ErrorKind::ResourceExhaustion => -ENOMEM,
            ErrorKind::Spawn => match self {
                ElevatorError::SpawnFailed(err) => -err.raw_os_error().map_or(EAGAIN, i64::from),
                _ => -EAGAIN,
            },
        }
    }
}

/// Result code of a control call: 0 on success.
pub fn return_code<T>(result: &Result<T, ElevatorError>) -> i64 {
    match result {
        Ok(_) => 0,
        Err(err) => err.return_code(),
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read configuration file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_and_codes() {
        assert_eq!(ElevatorError::AlreadyActive.kind(), ErrorKind::StateConflict);
        assert_eq!(ElevatorError::NotActive.code(), "ELEVATOR_NOT_ACTIVE");
        let invalid = ElevatorError::InvalidRequest { start: 0, destination: 3, species: 1 };
        assert_eq!(invalid.kind(), ErrorKind::Validation);
        assert!(invalid.to_string().contains("start floor 0"));
    }

    #[test]
    fn return_codes() {
        assert_eq!(return_code::<()>(&Ok(())), 0);
        assert_eq!(ElevatorError::AlreadyInactive.return_code(), 1);
        assert_eq!(ElevatorError::OutOfMemory.return_code(), -12);
        let spawn = ElevatorError::SpawnFailed(std::io::Error::from_raw_os_error(11));
        assert_eq!(spawn.return_code(), -11);
        let spawn = ElevatorError::SpawnFailed(std::io::Error::new(std::io::ErrorKind::Other, "no threads"));
        assert_eq!(spawn.return_code(), -11);
    }
}
