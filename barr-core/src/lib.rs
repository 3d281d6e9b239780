#![no_std]

//! BARR Core - Typed Binary Array Format Definitions
//!
//! This crate provides the format definitions, element traits and codec for
//! files that store a sequence of same-shape, same-kind N-dimensional arrays.
//! It performs no I/O.

extern crate alloc;

pub mod array;
pub mod codec;
pub mod error;
pub mod format;
pub mod traits;
pub mod validation;

pub use array::{Array, ArrayData};
pub use codec::{decode_array, decode_header, encode_array, encode_header};
pub use error::*;
pub use format::*;
pub use traits::*;

pub use num_complex::{Complex32, Complex64};
