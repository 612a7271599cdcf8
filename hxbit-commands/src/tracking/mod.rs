pub mod competition;
pub mod internship;
pub mod schedule;
