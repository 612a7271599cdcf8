pub mod help;
pub mod messages;
pub mod ping;
pub mod usage;
