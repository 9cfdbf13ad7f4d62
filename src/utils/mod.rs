// src/utils/mod.rs

pub mod stats;
