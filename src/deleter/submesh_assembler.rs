use crate::scene::HalaSubMesh;
use super::triangle_remapper;
use super::vertex_filter::HalaDeletionSet;

/// The submeshes which survived a vertex deletion.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct HalaAssembledSubMeshes {
  /// The surviving submeshes packed into 0..k, in their original order.
  pub submeshes: Vec<HalaSubMesh>,
  /// One flag per original submesh, true if it lost all triangles.
  pub dropped: Vec<bool>,
  pub removed_triangles: usize,
}

/// Remap every submesh and drop the ones left without triangles.
/// param submeshes: The original submeshes.
/// param deletion_set: The deletion set.
/// return: The assembled submeshes.
pub fn assemble(submeshes: &[HalaSubMesh], deletion_set: &HalaDeletionSet) -> HalaAssembledSubMeshes {
  let mut assembled = HalaAssembledSubMeshes {
    submeshes: Vec::with_capacity(submeshes.len()),
    dropped: vec![false; submeshes.len()],
    removed_triangles: 0,
  };

  for (submesh_index, submesh) in submeshes.iter().enumerate() {
    let triangles = triangle_remapper::remap(&submesh.indices, deletion_set);
    let indices = triangle_remapper::compact(&triangles);
    assembled.removed_triangles += triangles.len() - indices.len() / 3;

    if indices.is_empty() {
      log::debug!("Submesh {} has no triangle left and is dropped.", submesh_index);
      assembled.dropped[submesh_index] = true;
      continue;
    }

    assembled.submeshes.push(HalaSubMesh::new(indices, submesh.material_index));
  }

  assembled
}
