use crate::error::HalaMeshDeleterError;

/// The canonical form of a deletion request.
/// Vertex indices are unique, in range and sorted ascending.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HalaDeletionSet {
  indices: Vec<u32>,
  ignored: usize,
}

/// The implementation of the deletion set.
impl HalaDeletionSet {
  /// Canonicalize a deletion request.
  /// Duplicates are collapsed, indices not below vertex_count are ignored.
  /// param requested: The requested vertex indices, in any order.
  /// param vertex_count: The number of vertices of the mesh.
  /// return: The deletion set, or an error if nothing was requested.
  pub fn canonicalize(requested: &[u32], vertex_count: usize) -> Result<Self, HalaMeshDeleterError> {
    if requested.is_empty() {
      return Err(HalaMeshDeleterError::empty_selection());
    }

    let mut indices = requested.to_vec();
    indices.sort_unstable();
    indices.dedup();

    let in_range = indices.partition_point(|&index| (index as usize) < vertex_count);
    let ignored = indices.len() - in_range;
    if ignored > 0 {
      log::warn!("Ignored {} vertex indices out of range 0..{}.", ignored, vertex_count);
      indices.truncate(in_range);
    }

    Ok(Self { indices, ignored })
  }

  /// Get the indices in ascending order.
  pub fn ascending(&self) -> &[u32] {
    &self.indices
  }

  /// Get the indices in descending order.
  pub fn descending(&self) -> impl Iterator<Item = u32> + '_ {
    self.indices.iter().rev().copied()
  }

  /// Get the number of vertices to delete.
  pub fn len(&self) -> usize {
    self.indices.len()
  }

  pub fn is_empty(&self) -> bool {
    self.indices.is_empty()
  }

  /// Get the number of unique requested indices which were out of range.
  pub fn ignored(&self) -> usize {
    self.ignored
  }

  /// Check if a vertex is deleted.
  /// param index: The vertex index.
  /// return: True if the vertex is in the set.
  pub fn contains(&self, index: u32) -> bool {
    self.indices.binary_search(&index).is_ok()
  }

  /// Count deleted vertices with an index lower than the given one.
  /// param index: The vertex index.
  /// return: The number of deleted vertices below the index.
  pub fn count_below(&self, index: u32) -> u32 {
    self.indices.partition_point(|&deleted| deleted < index) as u32
  }
}

/// Lazily yield the elements of a per-vertex array whose position is not deleted.
/// param source: The per-vertex array.
/// param deletion_set: The deletion set.
/// return: The surviving elements in their original order.
pub fn exclude<'a, T>(source: &'a [T], deletion_set: &'a HalaDeletionSet) -> impl Iterator<Item = &'a T> + 'a {
  source.iter()
    .enumerate()
    .filter(move |(index, _)| !deletion_set.contains(*index as u32))
    .map(|(_, data)| data)
}

/// Filter a per-vertex channel. An unused (empty) channel stays empty.
/// param source: The per-vertex channel.
/// param deletion_set: The deletion set.
/// return: The compacted channel.
pub fn exclude_channel<T: Clone>(source: &[T], deletion_set: &HalaDeletionSet) -> Vec<T> {
  exclude(source, deletion_set).cloned().collect()
}
