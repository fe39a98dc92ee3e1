pub mod app;
pub mod auth;
pub mod blogs;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod memory;
pub mod state;
