//! Common test infrastructure
//!
//! Sample exports and row builders shared by the end-to-end tests.
//! Tests should only import from this module, not from internal submodules.

mod constants;
mod fixtures;

// Public API - this is what tests import
pub use constants::*;
#[allow(unused_imports)]
pub use fixtures::{day, nielsen_row, record, triton_row, write_export};
