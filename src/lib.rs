pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod interactive;
pub mod reconciler;
pub mod scanner;
pub mod session;
