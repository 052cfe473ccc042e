use glam::{
  Mat4,
  Vec2,
  Vec3,
  Vec4,
};
use serde::{
  Deserialize,
  Serialize,
};

use crate::error::HalaMeshDeleterError;
use crate::scene::{
  HalaBoneWeight,
  HalaColor32,
};

/// The number of UV channels a mesh can carry.
pub const MAX_UV_CHANNELS: usize = 4;

/// The number of bones which can influence one vertex.
pub const MAX_BONE_INFLUENCES: usize = 4;

/// A submesh is a triangle list drawn with one material slot.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct HalaSubMesh {
  /// Flat vertex index triples.
  pub indices: Vec<u32>,
  pub material_index: u32,
}

/// The implementation of the submesh.
impl HalaSubMesh {
  /// Create a new submesh.
  /// param indices: The triangle indices.
  /// param material_index: The material slot of the submesh.
  /// return: The submesh.
  pub fn new(indices: Vec<u32>, material_index: u32) -> Self {
    Self { indices, material_index }
  }

  /// Get the number of whole triangles.
  /// return: The number of triangles.
  pub fn triangle_count(&self) -> usize {
    self.indices.len() / 3
  }
}

/// One weighted frame of a blend shape.
/// Empty delta arrays stand for all-zero deltas.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct HalaBlendShapeFrame {
  pub weight: f32,
  pub delta_positions: Vec<Vec3>,
  pub delta_normals: Vec<Vec3>,
  pub delta_tangents: Vec<Vec3>,
}

/// A blend shape (morph target) is a named set of per-vertex deltas.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct HalaBlendShape {
  pub name: String,
  pub frame: HalaBlendShapeFrame,
}

/// The implementation of the blend shape.
impl HalaBlendShape {
  /// Create a new blend shape.
  /// param name: The name of the blend shape.
  /// param frame: The frame of the blend shape.
  /// return: The blend shape.
  pub fn new(name: &str, frame: HalaBlendShapeFrame) -> Self {
    Self {
      name: name.to_owned(),
      frame,
    }
  }
}

/// The raw data snapshot of a mesh.
///
/// Every per-vertex channel is either empty (unused) or as long as `positions`.
/// The submesh order matters, consumers bind materials by submesh slot.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct HalaMeshData {
  pub name: String,
  pub positions: Vec<Vec3>,
  pub normals: Vec<Vec3>,
  pub tangents: Vec<Vec4>,
  pub colors: Vec<Vec4>,
  pub colors32: Vec<HalaColor32>,
  pub uvs: [Vec<Vec2>; MAX_UV_CHANNELS],
  pub bone_weights: Vec<HalaBoneWeight>,
  pub submeshes: Vec<HalaSubMesh>,
  /// One per skeleton bone, unrelated to the vertex count.
  pub bind_poses: Vec<Mat4>,
  pub blend_shapes: Vec<HalaBlendShape>,
  /// Set on meshes produced by editing operations.
  pub dynamic: bool,
}

/// The implementation of the mesh data.
impl HalaMeshData {
  /// Create a new mesh data with only positions.
  /// param name: The name of the mesh.
  /// param positions: The vertex positions.
  /// return: The mesh data.
  pub fn new(name: &str, positions: Vec<Vec3>) -> Self {
    Self {
      name: name.to_owned(),
      positions,
      ..Default::default()
    }
  }

  /// Get the number of vertices.
  /// return: The number of vertices.
  pub fn vertex_count(&self) -> usize {
    self.positions.len()
  }

  /// Get the number of triangles in all submeshes.
  /// return: The number of triangles.
  pub fn triangle_count(&self) -> usize {
    self.submeshes.iter().map(|submesh| submesh.triangle_count()).sum()
  }

  /// Get the number of submeshes.
  /// return: The number of submeshes.
  pub fn submesh_count(&self) -> usize {
    self.submeshes.len()
  }

  /// Find a blend shape by name.
  /// param name: The name of the blend shape.
  /// return: The index of the blend shape if found.
  pub fn blend_shape_index(&self, name: &str) -> Option<usize> {
    self.blend_shapes.iter().position(|blend_shape| blend_shape.name == name)
  }

  /// Get the lengths of all per-vertex channels except positions, with their names.
  /// return: The channel names and lengths.
  fn channel_lengths(&self) -> [(&'static str, usize); 5 + MAX_UV_CHANNELS] {
    [
      ("normals", self.normals.len()),
      ("tangents", self.tangents.len()),
      ("colors", self.colors.len()),
      ("colors32", self.colors32.len()),
      ("bone_weights", self.bone_weights.len()),
      ("uv0", self.uvs[0].len()),
      ("uv1", self.uvs[1].len()),
      ("uv2", self.uvs[2].len()),
      ("uv3", self.uvs[3].len()),
    ]
  }

  /// Check the invariants of the mesh data.
  /// return: The result, describing the first broken invariant on failure.
  pub fn validate(&self) -> Result<(), HalaMeshDeleterError> {
    let vertex_count = self.vertex_count();

    for (channel, len) in self.channel_lengths() {
      if len != 0 && len != vertex_count {
        return Err(HalaMeshDeleterError::invalid_mesh_data(
          &format!("Channel \"{}\" of mesh \"{}\" has {} elements, expected 0 or {}.", channel, self.name, len, vertex_count)
        ));
      }
    }

    for (submesh_index, submesh) in self.submeshes.iter().enumerate() {
      if submesh.indices.len() % 3 != 0 {
        return Err(HalaMeshDeleterError::invalid_mesh_data(
          &format!("Submesh {} of mesh \"{}\" has {} indices, not a multiple of 3.", submesh_index, self.name, submesh.indices.len())
        ));
      }
      if let Some(index) = submesh.indices.iter().find(|&&index| index as usize >= vertex_count) {
        return Err(HalaMeshDeleterError::invalid_mesh_data(
          &format!("Submesh {} of mesh \"{}\" references vertex {} of {}.", submesh_index, self.name, index, vertex_count)
        ));
      }
    }

    for blend_shape in self.blend_shapes.iter() {
      let frame = &blend_shape.frame;
      let deltas = [
        ("positions", frame.delta_positions.len()),
        ("normals", frame.delta_normals.len()),
        ("tangents", frame.delta_tangents.len()),
      ];
      for (channel, len) in deltas {
        if len != 0 && len != vertex_count {
          return Err(HalaMeshDeleterError::invalid_mesh_data(
            &format!("Blend shape \"{}\" has {} delta {}, expected 0 or {}.", blend_shape.name, len, channel, vertex_count)
          ));
        }
      }
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn quad() -> HalaMeshData {
    let mut mesh = HalaMeshData::new("quad", vec![
      Vec3::new(0.0, 0.0, 0.0),
      Vec3::new(1.0, 0.0, 0.0),
      Vec3::new(1.0, 1.0, 0.0),
      Vec3::new(0.0, 1.0, 0.0),
    ]);
    mesh.normals = vec![Vec3::Z; 4];
    mesh.submeshes.push(HalaSubMesh::new(vec![0, 1, 2, 2, 3, 0], 0));
    mesh
  }

  #[test]
  fn counts() {
    let mesh = quad();
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.triangle_count(), 2);
    assert_eq!(mesh.submesh_count(), 1);
  }

  #[test]
  fn well_formed_mesh_validates() {
    assert!(quad().validate().is_ok());
  }

  #[test]
  fn unused_channels_are_valid() {
    let mut mesh = quad();
    mesh.normals.clear();
    assert!(mesh.validate().is_ok());
  }

  #[test]
  fn short_channel_is_rejected() {
    let mut mesh = quad();
    mesh.uvs[2] = vec![Vec2::ZERO; 3];
    let err = mesh.validate().unwrap_err();
    assert!(err.message().contains("uv2"));
  }

  #[test]
  fn partial_triangle_is_rejected() {
    let mut mesh = quad();
    mesh.submeshes[0].indices.push(1);
    assert!(mesh.validate().is_err());
  }

  #[test]
  fn out_of_range_index_is_rejected() {
    let mut mesh = quad();
    mesh.submeshes.push(HalaSubMesh::new(vec![0, 1, 4], 1));
    let err = mesh.validate().unwrap_err();
    assert!(err.message().contains("Submesh 1"));
  }

  #[test]
  fn blend_shape_deltas_must_match_vertex_count() {
    let mut mesh = quad();
    mesh.blend_shapes.push(HalaBlendShape::new("smile", HalaBlendShapeFrame {
      weight: 100.0,
      delta_positions: vec![Vec3::X; 2],
      ..Default::default()
    }));
    assert!(mesh.validate().is_err());
    assert_eq!(mesh.blend_shape_index("smile"), Some(0));
  }
}
