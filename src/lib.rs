pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod output;
pub mod services;
pub mod sources;
pub mod text;
