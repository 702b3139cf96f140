//! Integration tests for the change announcer.
//!
//! - `harness.rs`      - scripted change source, recording destinations, failing store
//! - `ordering.rs`     - selection, emission order and formatting end to end
//! - `scheduling.rs`   - timer lifecycle, overlap and panic isolation
//! - `crash_resume.rs` - restart from a file-backed watermark
//! - `failures.rs`     - fetch and persistence failures, manual fetch, reset

mod failures;
