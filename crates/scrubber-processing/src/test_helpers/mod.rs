//! Test helpers shared with downstream crates through the `test-helpers` feature.

pub mod fixtures;
