use thiserror::Error;

/// Input problems whose message is shown to the user as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please choose an available username (3-20 letters, numbers or underscores)")]
    InvalidUsername,

    #[error("Username is already taken")]
    UsernameTaken,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{field} can be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("XP reward must be between {min} and {max}")]
    XpRewardOutOfRange { min: i32, max: i32 },

    #[error("Unknown stat `{0}`")]
    UnknownStat(String),

    #[error("Could not understand the date `{0}`")]
    InvalidDate(String),

    #[error("An event cannot end before it starts")]
    EventEndsBeforeStart,

    #[error("Unknown internship status `{0}`")]
    UnknownInternshipStatus(String),

    #[error("You cannot {0} yourself")]
    SelfReference(&'static str),

    #[error("You need to be signed in to do that")]
    NotSignedIn,
}
