// src/handlers/mod.rs

pub mod predict;
