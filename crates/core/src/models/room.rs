use serde::Serialize;

/// The one bookable room. Its description is fixed at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Room {
    pub name: &'static str,
    pub capacity: u32,
    pub location: &'static str,
    pub amenities: &'static [&'static str],
}

pub const CONFERENCE_SUITE: Room = Room {
    name: "AzrachIT Conference Suite",
    capacity: 10,
    location: "Prabhu Bank Building, Gabahal Road",
    amenities: &["Air Conditioning", "Sound Proof"],
};
