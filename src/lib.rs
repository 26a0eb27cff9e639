pub mod args;
pub mod commands;
pub mod database;
pub mod feed;
pub mod model;
pub mod registry;
pub mod utils;
pub mod wager;
