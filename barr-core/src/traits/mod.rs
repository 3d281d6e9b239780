//! Abstract interfaces for BARR element types

pub mod element;

pub use element::Element;
