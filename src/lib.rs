pub mod cli;
pub mod config;
pub mod error;
pub mod exit;
pub mod filter;
pub mod graph;
pub mod render;
pub mod resolve;
pub mod rules;
pub mod source;
pub mod types;

pub use render::render;
