//! Unified exit codes. Part of the public contract: CI scripts branch on them.

pub const ALL_PASSED: i32 = 0;
pub const PROBLEM_FOUND: i32 = 1;
pub const HARD_ERROR: i32 = 2; // setup failure, unknown check, collaborator unavailable
