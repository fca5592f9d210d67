pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod io;
pub mod models;
pub mod render;
pub mod store;
