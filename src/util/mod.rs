//! Host-side utilities

pub mod time;
