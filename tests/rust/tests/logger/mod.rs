//! Logger tests
//!
//! Identity rotation, level filtering and configuration loading through the
//! public facade.

mod config;
mod refresh;
