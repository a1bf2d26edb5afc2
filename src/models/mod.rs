// src/models/mod.rs

pub mod exam;
pub mod presence;
pub mod proctor;
pub mod report;
