pub mod activity;
pub mod complete;
pub mod stats;
pub mod task;
pub mod tasks;
pub mod upgrade;
