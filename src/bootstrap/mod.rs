//! Runs once in `main`, before any request is served.

pub mod logger;
