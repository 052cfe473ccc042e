use serde::{
  Deserialize,
  Serialize,
};

use crate::scene::mesh::MAX_BONE_INFLUENCES;

/// The legacy byte-packed RGBA vertex color.
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HalaColor32 {
  pub r: u8,
  pub g: u8,
  pub b: u8,
  pub a: u8,
}

/// The implementation of the byte-packed color.
impl HalaColor32 {
  /// Create a new byte-packed color.
  /// param r: The red channel.
  /// param g: The green channel.
  /// param b: The blue channel.
  /// param a: The alpha channel.
  /// return: The color.
  pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
    Self { r, g, b, a }
  }
}

impl From<[u8; 4]> for HalaColor32 {
  fn from(rgba: [u8; 4]) -> Self {
    Self::new(rgba[0], rgba[1], rgba[2], rgba[3])
  }
}

/// The skinning influences of one vertex.
/// Up to four bones, unused slots have zero weight.
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct HalaBoneWeight {
  pub bone_indices: [u32; MAX_BONE_INFLUENCES],
  pub weights: [f32; MAX_BONE_INFLUENCES],
}

/// The implementation of the bone weight.
impl HalaBoneWeight {
  /// Create a new bone weight.
  /// param bone_indices: The indices of the influencing bones.
  /// param weights: The weights of the influencing bones.
  /// return: The bone weight.
  pub fn new(bone_indices: [u32; MAX_BONE_INFLUENCES], weights: [f32; MAX_BONE_INFLUENCES]) -> Self {
    Self { bone_indices, weights }
  }
}
