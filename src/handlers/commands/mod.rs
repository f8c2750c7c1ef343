//! Command handlers

pub mod admin;
pub mod help;
pub mod start;
