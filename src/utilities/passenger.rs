use super::species::Species;

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Passenger {
    pub destination: u8,
    pub species: Species,
}

impl Passenger {
    pub fn new(destination: u8, species: Species) -> Self {
        Passenger { destination, species }
    }
}
