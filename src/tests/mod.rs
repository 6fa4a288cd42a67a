//! Unit tests for the Lesesaal web UI.
//!
//! The network and DOM layers are thin adapters; everything with behavior
//! worth pinning down lives in the pure modules and is tested here on the
//! host target.
//!
//! ## Test Modules
//!
//! - **parse_tests**: probe text and fragment scanning
//! - **state_tests**: tree and sharing view-models, sequencing
//! - **api_tests**: sharing form body assembly
//! - **ui_tests**: layout toggle round trip

pub mod api_tests;
pub mod parse_tests;
pub mod state_tests;
pub mod ui_tests;
