pub mod contestant_stats;
pub mod fit_result;
pub mod game_mode;
pub mod match_record;
pub mod match_status;
pub mod rating_table;
pub mod score;
