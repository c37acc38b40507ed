//! Command line tool for inspecting and extracting RADS releases.

pub mod commands;
