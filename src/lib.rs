pub mod commands;
pub mod models;
pub mod storage;
pub mod store;
pub mod theme;
pub mod tui;
