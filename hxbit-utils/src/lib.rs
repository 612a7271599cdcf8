/// Shared formatting helpers (XP progress, leaderboard rows, number grouping).
pub mod formatting;
/// Single source of truth for the console command prefix.
pub const COMMAND_PREFIX: char = '!';
/// Shared pagination helper utilities.
pub mod pagination;
/// Pure parser helpers.
pub mod parse;
/// Shared time helpers.
pub mod time;
