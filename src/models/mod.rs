// src/models/mod.rs

pub mod exam_record;
pub mod prediction;
pub mod question;
