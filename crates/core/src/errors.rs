use thiserror::Error;

/// A booking draft rule that failed. The `Display` text is what the user sees.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in all required fields")]
    MissingFields,

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("End time must be after start time")]
    EndBeforeStart,

    #[error("Cannot book meetings in the past")]
    InPast,

    #[error("Attendees must be a positive number")]
    InvalidAttendees,

    #[error("Maximum capacity is {capacity} people")]
    ExceedsCapacity { capacity: u32 },

    #[error("Time slot overlaps an existing booking: {0}")]
    Overlap(String),
}

#[derive(Error, Debug)]
pub enum BookingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("{0}")]
    Transport(#[from] eyre::Report),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type BookingResult<T> = Result<T, BookingError>;
