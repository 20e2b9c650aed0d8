pub mod game_info;
pub mod payload;
pub mod pipeline;
pub mod player_stats;
pub mod records;
pub mod schedule;
pub mod splitter;
pub mod store;
pub mod team_stats;
