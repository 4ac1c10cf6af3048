pub mod commands;
pub mod tally;
