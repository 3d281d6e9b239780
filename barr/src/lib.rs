//! BARR - Typed Binary Array Files
//!
//! This library stores a sequence of N-dimensional arrays that all share one
//! shape and one element kind in a single binary file, with random-access
//! reads, appends and in-place overwrites.
//!
//! ## Architecture
//!
//! BARR follows a clean format/implementation separation:
//!
//! - **barr-core**: Format definitions, element traits, codec and validation (no I/O)
//! - **barr**: File handles, batch operations, memory-mapped views and the CLI
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use barr::{Array, BinaryArrayFile, Complex64, OpenMode, Shape};
//!
//! fn example() -> barr::Result<()> {
//!     let shape = Shape::new(vec![2, 4, 8])?;
//!     let mut file = BinaryArrayFile::open("fields.barr", OpenMode::Write)?;
//!     file.append(&Array::from_vec(shape, vec![Complex64::new(1.0, 0.5); 64])?)?;
//!     file.close()?;
//!
//!     let file = BinaryArrayFile::open("fields.barr", OpenMode::Read)?;
//!     let first = file.get_as::<Complex64>(0)?;
//!     println!("{} arrays, first starts with {}", file.len()?, first[0]);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Random access**: Record `i` lives at a fixed offset, no index needed
//! - **Batch I/O**: `extend` and `read_range` encode and decode with rayon
//! - **Memory-mapped I/O**: Zero-copy scans through [`ArrayFileView`]
//! - **Type safety**: Thirteen element kinds including complex and bool

// Re-export core abstractions and format definitions
pub use barr_core::{
    // Data model
    Array, ArrayData, Complex32, Complex64, Element,
    // Format definitions
    ElementKind, FileHeader, Shape,
    // Codec
    CodecError,
};

pub mod array_file;
pub mod config;
pub mod error;
#[cfg(feature = "mmap")]
pub mod mmap_view;

pub use array_file::{BinaryArrayFile, FileState, Iter, OpenMode, ParseModeError};
pub use config::FileConfig;
pub use error::{Error, Result};

#[cfg(feature = "mmap")]
pub use mmap_view::ArrayFileView;
