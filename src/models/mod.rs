// src/models/mod.rs

pub mod answer;
pub mod check_in;
pub mod class_score;
pub mod question;
