pub mod app;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod planner;
pub mod plans;
pub mod session;
pub mod state;
