//! Library components of the `refcomp` command-line tool.

pub mod config;
pub mod logging;
pub mod pipeline;
