//! rich-delta-util - Shared helpers for the rich-delta crates
//!
//! UTF-16 code-unit arithmetic over Rust strings, deep JSON equality for
//! attribute values, and a seedable fuzzer used by randomized tests.

pub mod fuzzer;
pub mod json_equal;
pub mod utf16;

// Re-exports for convenience
pub use fuzzer::Fuzzer;
pub use json_equal::{attributes_equal, deep_equal};
