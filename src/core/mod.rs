// src/core/mod.rs

pub mod cancellation;
pub mod counter;
pub mod engine;
pub mod fingerprint;
pub mod ranking;
pub mod reader;
pub mod tokenizer;
pub mod types;
