//! Record arithmetic validation for BARR files
//!
//! This module contains pure validation functions with no I/O dependencies.

pub mod bounds;

pub use bounds::{checked_span, records_len, validate_byte_len, validate_file_len};
