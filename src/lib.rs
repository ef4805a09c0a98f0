// src/lib.rs

pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod llm;
pub mod pipeline;
pub mod session;
pub mod state;
pub mod taxonomy;
