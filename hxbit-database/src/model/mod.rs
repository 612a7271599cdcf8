pub mod account;
pub mod activity;
pub mod competition;
pub mod internship;
pub mod schedule;
pub mod social;
pub mod task;
