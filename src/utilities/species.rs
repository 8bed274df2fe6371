/// Kind of passenger riding the elevator. The discriminants are the integer
/// codes accepted by the control API.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Species {
    Grape = 0,
    Sheep = 1,
    Wolf = 2,
}

impl Species {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Species::Grape),
            1 => Some(Species::Sheep),
            2 => Some(Species::Wolf),
            _ => None,
        }
    }

    pub fn as_code(self) -> i32 {
        self as i32
    }

    /// One-letter tag used by the status listing.
    pub fn abbreviation(self) -> &'static str {
        match self {
            Species::Wolf => "W",
            Species::Sheep => "S",
            Species::Grape => "G",
        }
    }

    pub fn iter() -> impl Iterator<Item = Species> {
        [Species::Grape, Species::Sheep, Species::Wolf].iter().copied()
    }
}
