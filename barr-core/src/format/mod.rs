//! Binary format definitions for the BARR file layout
//!
//! This module contains pure data structure definitions for the on-disk format.
//! No I/O operations - only layout, schema types and header (de)serialization.

pub mod constants;
pub mod header;
pub mod kind;
pub mod shape;

pub use header::FileHeader;
pub use kind::ElementKind;
pub use shape::Shape;
