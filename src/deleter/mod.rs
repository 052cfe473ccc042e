pub mod vertex_filter;
pub mod triangle_remapper;
pub mod submesh_assembler;
pub mod blend_shape_projector;

pub use vertex_filter::HalaDeletionSet;
pub use submesh_assembler::HalaAssembledSubMeshes;

use crate::error::HalaMeshDeleterError;
use crate::scene::HalaMeshData;
use vertex_filter::exclude_channel;

/// What a vertex deletion did to a mesh.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HalaDeletionReport {
  pub removed_vertices: usize,
  /// Unique requested indices which were not below the vertex count.
  pub ignored_indices: usize,
  pub removed_triangles: usize,
  /// One flag per original submesh, true if it was dropped.
  pub dropped_submeshes: Vec<bool>,
}

/// The implementation of the deletion report.
impl HalaDeletionReport {
  /// Get the number of dropped submeshes.
  /// return: The number of dropped submeshes.
  pub fn dropped_submesh_count(&self) -> usize {
    self.dropped_submeshes.iter().filter(|&&dropped| dropped).count()
  }
}

/// The mesh deleter removes vertices and the triangles referencing them.
pub struct HalaMeshDeleter;

/// The implementation of the mesh deleter.
impl HalaMeshDeleter {
  /// Remove vertices from a mesh.
  /// The input mesh is left untouched so the caller can keep it for undo.
  /// param mesh: The original mesh.
  /// param vertex_indices: The vertices to delete, in any order, duplicates allowed.
  /// return: The new mesh.
  pub fn remove_vertices(mesh: &HalaMeshData, vertex_indices: &[u32]) -> Result<HalaMeshData, HalaMeshDeleterError> {
    Self::remove_vertices_with_report(mesh, vertex_indices).map(|(mesh, _)| mesh)
  }

  /// Remove vertices from a mesh and report what was removed.
  /// param mesh: The original mesh.
  /// param vertex_indices: The vertices to delete, in any order, duplicates allowed.
  /// return: The new mesh and the report.
  pub fn remove_vertices_with_report(
    mesh: &HalaMeshData,
    vertex_indices: &[u32],
  ) -> Result<(HalaMeshData, HalaDeletionReport), HalaMeshDeleterError> {
    log::debug!("Removing {} requested vertices from mesh \"{}\".", vertex_indices.len(), mesh.name);
    let deletion_set = HalaDeletionSet::canonicalize(vertex_indices, mesh.vertex_count())?;

    let mut new_mesh = Self::remove_vertex_attributes(mesh, &deletion_set);
    let assembled = submesh_assembler::assemble(&mesh.submeshes, &deletion_set);
    new_mesh.submeshes = assembled.submeshes;
    new_mesh.bind_poses = mesh.bind_poses.clone();
    new_mesh.blend_shapes = blend_shape_projector::project(&mesh.blend_shapes, &deletion_set, new_mesh.vertex_count());

    let report = HalaDeletionReport {
      removed_vertices: deletion_set.len(),
      ignored_indices: deletion_set.ignored(),
      removed_triangles: assembled.removed_triangles,
      dropped_submeshes: assembled.dropped,
    };
    log::debug!(
      "Mesh \"{}\" now has {} vertices, {} triangles and {} submeshes ({} removed vertices, {} removed triangles, {} dropped submeshes).",
      new_mesh.name,
      new_mesh.vertex_count(),
      new_mesh.triangle_count(),
      new_mesh.submesh_count(),
      report.removed_vertices,
      report.removed_triangles,
      report.dropped_submesh_count(),
    );

    Ok((new_mesh, report))
  }

  /// Compact every per-vertex channel.
  /// param mesh: The original mesh.
  /// param deletion_set: The deletion set.
  /// return: A new mesh holding only the compacted vertex channels.
  fn remove_vertex_attributes(mesh: &HalaMeshData, deletion_set: &HalaDeletionSet) -> HalaMeshData {
    HalaMeshData {
      name: mesh.name.clone(),
      positions: exclude_channel(&mesh.positions, deletion_set),
      normals: exclude_channel(&mesh.normals, deletion_set),
      tangents: exclude_channel(&mesh.tangents, deletion_set),
      colors: exclude_channel(&mesh.colors, deletion_set),
      colors32: exclude_channel(&mesh.colors32, deletion_set),
      uvs: [
        exclude_channel(&mesh.uvs[0], deletion_set),
        exclude_channel(&mesh.uvs[1], deletion_set),
        exclude_channel(&mesh.uvs[2], deletion_set),
        exclude_channel(&mesh.uvs[3], deletion_set),
      ],
      bone_weights: exclude_channel(&mesh.bone_weights, deletion_set),
      dynamic: true,
      ..Default::default()
    }
  }
}

#[cfg(test)]
mod tests {
  use glam::Vec3;

  use super::*;
  use crate::scene::HalaSubMesh;

  fn strip(vertex_count: usize, indices: Vec<u32>) -> HalaMeshData {
    let mut mesh = HalaMeshData::new("strip", (0..vertex_count).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect());
    mesh.submeshes.push(HalaSubMesh::new(indices, 0));
    mesh
  }

  #[test]
  fn empty_request_fails() {
    let mesh = strip(3, vec![0, 1, 2]);
    let err = HalaMeshDeleter::remove_vertices(&mesh, &[]).unwrap_err();
    assert!(err.is_empty_selection());
  }

  #[test]
  fn report_counts() {
    let mut mesh = strip(6, vec![0, 1, 2, 3, 4, 5]);
    mesh.submeshes.push(HalaSubMesh::new(vec![0, 2, 4], 1));
    let (new_mesh, report) = HalaMeshDeleter::remove_vertices_with_report(&mesh, &[4, 4, 12]).unwrap();

    assert_eq!(new_mesh.vertex_count(), 5);
    assert_eq!(report.removed_vertices, 1);
    assert_eq!(report.ignored_indices, 1);
    assert_eq!(report.removed_triangles, 2);
    assert_eq!(report.dropped_submeshes, vec![false, true]);
    assert_eq!(report.dropped_submesh_count(), 1);
  }

  #[test]
  fn output_is_marked_dynamic() {
    let mesh = strip(4, vec![0, 1, 2]);
    let new_mesh = HalaMeshDeleter::remove_vertices(&mesh, &[3]).unwrap();
    assert!(new_mesh.dynamic);
    assert!(!mesh.dynamic);
    assert_eq!(new_mesh.submeshes, mesh.submeshes);
  }
}
