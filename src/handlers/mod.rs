// src/handlers/mod.rs

pub mod assignment;
pub mod auth;
pub mod bootstrap;
pub mod report;
pub mod scan;
