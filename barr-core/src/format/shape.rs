//! Array shape shared by every record of a file

use alloc::vec::Vec;

use crate::error::{CodecError, Result};
use crate::format::constants::MAX_RANK;

/// Ordered dimension extents; rank 0 is a scalar
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<u32>", into = "Vec<u32>"))]
pub struct Shape(Vec<u32>);

impl Shape {
    /// Build a shape, rejecting zero extents and ranks the header cannot encode
    pub fn new(extents: impl Into<Vec<u32>>) -> Result<Self> {
        let extents = extents.into();
        if extents.len() > MAX_RANK || extents.contains(&0) {
            return Err(CodecError::InvalidShape);
        }
        Ok(Self(extents))
    }

    /// Rank-0 shape holding a single element
    pub const fn scalar() -> Self {
        Self(Vec::new())
    }

    pub fn rank(&self) -> usize {
        self.0.len()
    }

    pub fn extents(&self) -> &[u32] {
        &self.0
    }

    pub fn extent(&self, dim: usize) -> Option<u32> {
        self.0.get(dim).copied()
    }

    /// Product of the extents, overflow checked
    pub fn element_count(&self) -> Result<usize> {
        self.0.iter().try_fold(1usize, |acc, &extent| {
            acc.checked_mul(extent as usize)
                .ok_or(CodecError::SizeOverflow)
        })
    }
}

impl TryFrom<Vec<u32>> for Shape {
    type Error = CodecError;

    fn try_from(extents: Vec<u32>) -> Result<Self> {
        Self::new(extents)
    }
}

impl From<Shape> for Vec<u32> {
    fn from(shape: Shape) -> Self {
        shape.0
    }
}

impl TryFrom<&[usize]> for Shape {
    type Error = CodecError;

    fn try_from(extents: &[usize]) -> Result<Self> {
        let extents = extents
            .iter()
            .map(|&e| u32::try_from(e).map_err(|_| CodecError::InvalidShape))
            .collect::<Result<Vec<u32>>>()?;
        Self::new(extents)
    }
}

impl<const N: usize> TryFrom<[u32; N]> for Shape {
    type Error = CodecError;

    fn try_from(extents: [u32; N]) -> Result<Self> {
        Self::new(extents.to_vec())
    }
}

impl core::fmt::Display for Shape {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "(")?;
        for (i, extent) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{extent}")?;
        }
        if self.0.len() == 1 {
            write!(f, ",")?;
        }
        write!(f, ")")
    }
}
