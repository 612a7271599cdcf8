use std::str::FromStr;

use chrono::NaiveDate;
use hxbit_core::ValidationError;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InternshipStatus {
    Applied,
    Interviewing,
    Offered,
    Accepted,
    Rejected,
}

impl InternshipStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Interviewing => "interviewing",
            Self::Offered => "offered",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Applied => "Applied",
            Self::Interviewing => "Interviewing",
            Self::Offered => "Offered",
            Self::Accepted => "Accepted",
            Self::Rejected => "Rejected",
        }
    }

    /// Accepted and rejected applications no longer need follow-up.
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }
}

impl FromStr for InternshipStatus {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "applied" => Ok(Self::Applied),
            "interviewing" | "interview" => Ok(Self::Interviewing),
            "offered" | "offer" => Ok(Self::Offered),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            other => Err(ValidationError::UnknownInternshipStatus(other.to_owned())),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Internship {
    pub id: u64,
    pub user_id: Uuid,
    pub company: String,
    pub role: String,
    pub status: InternshipStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: u64,
    pub updated_at: u64,
}

#[cfg(test)]
mod tests {
    use super::InternshipStatus;

    #[test]
    fn statuses_parse_with_aliases() {
        assert_eq!("Applied".parse(), Ok(InternshipStatus::Applied));
        assert_eq!("interview".parse(), Ok(InternshipStatus::Interviewing));
        assert_eq!(" offer ".parse(), Ok(InternshipStatus::Offered));
        assert!("ghosted".parse::<InternshipStatus>().is_err());
    }

    #[test]
    fn stored_names_round_trip() {
        for status in [
            InternshipStatus::Applied,
            InternshipStatus::Interviewing,
            InternshipStatus::Offered,
            InternshipStatus::Accepted,
            InternshipStatus::Rejected,
        ] {
            assert_eq!(status.as_str().parse(), Ok(status));
        }
        assert!(InternshipStatus::Rejected.is_closed());
        assert!(!InternshipStatus::Offered.is_closed());
    }
}
