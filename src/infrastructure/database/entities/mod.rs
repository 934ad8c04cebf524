//! Database entities module

pub mod credit;
pub mod user;

