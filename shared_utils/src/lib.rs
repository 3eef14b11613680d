//! Small helpers shared by the workspace crates and their integration tests.

pub mod env;
