// src/handlers/mod.rs

pub mod answers;
pub mod attendance;
pub mod questions;
pub mod scores;
