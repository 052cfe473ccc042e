use super::vertex_filter::HalaDeletionSet;

/// A triangle after remapping. None means the triangle touched a deleted vertex.
pub type HalaRemappedTriangle = Option<[u32; 3]>;

/// Warn about a trailing partial triangle, which is dropped by the remapper.
fn check_trailing(indices: &[u32]) {
  let trailing = indices.len() % 3;
  if trailing != 0 {
    log::warn!("Ignored {} trailing indices of a partial triangle.", trailing);
  }
}

/// Remap the triangles of one index buffer.
/// A triangle is removed if any of its vertices is deleted, otherwise every index is
/// shifted down by the number of deleted vertices below it.
/// param indices: The flat triangle indices.
/// param deletion_set: The deletion set.
/// return: One entry per triangle.
pub fn remap(indices: &[u32], deletion_set: &HalaDeletionSet) -> Vec<HalaRemappedTriangle> {
  check_trailing(indices);
  indices.chunks_exact(3)
    .map(|tri| {
      if tri.iter().any(|&index| deletion_set.contains(index)) {
        None
      } else {
        Some([
          tri[0] - deletion_set.count_below(tri[0]),
          tri[1] - deletion_set.count_below(tri[1]),
          tri[2] - deletion_set.count_below(tri[2]),
        ])
      }
    })
    .collect()
}

/// Remap the triangles one deleted vertex at a time, from the highest to the lowest.
/// This is the reference algorithm. The deleter itself calls `remap`; this one is
/// kept public so callers can check `remap` against it. O(deletions x triangles).
/// param indices: The flat triangle indices.
/// param deletion_set: The deletion set.
/// return: One entry per triangle.
pub fn remap_descending(indices: &[u32], deletion_set: &HalaDeletionSet) -> Vec<HalaRemappedTriangle> {
  check_trailing(indices);
  let mut triangles = indices.chunks_exact(3)
    .map(|tri| Some([tri[0], tri[1], tri[2]]))
    .collect::<Vec<_>>();

  for deleted in deletion_set.descending() {
    for triangle in triangles.iter_mut() {
      let Some(tri) = triangle else {
        continue;
      };
      if tri.contains(&deleted) {
        *triangle = None;
      } else {
        for index in tri.iter_mut() {
          if *index > deleted {
            *index -= 1;
          }
        }
      }
    }
  }

  triangles
}

/// Flatten the surviving triangles.
/// param triangles: The remapped triangles.
/// return: The flat indices of the surviving triangles.
pub fn compact(triangles: &[HalaRemappedTriangle]) -> Vec<u32> {
  triangles.iter()
    .flatten()
    .flat_map(|tri| tri.iter().copied())
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn set(indices: &[u32], vertex_count: usize) -> HalaDeletionSet {
    HalaDeletionSet::canonicalize(indices, vertex_count).unwrap()
  }

  #[test]
  fn touching_triangle_is_removed() {
    let triangles = remap(&[0, 1, 2, 3, 4, 5], &set(&[0], 6));
    assert_eq!(triangles, vec![None, Some([2, 3, 4])]);
    assert_eq!(compact(&triangles), vec![2, 3, 4]);
  }

  #[test]
  fn indices_below_deletions_are_unchanged() {
    let triangles = remap(&[0, 1, 2, 4, 6, 7], &set(&[3, 5], 8));
    assert_eq!(triangles, vec![Some([0, 1, 2]), Some([3, 4, 5])]);
  }

  #[test]
  fn trailing_partial_triangle_is_ignored() {
    let triangles = remap(&[0, 1, 2, 3], &set(&[3], 4));
    assert_eq!(triangles, vec![Some([0, 1, 2])]);
  }

  #[test]
  fn descending_algorithm_matches() {
    let indices = [
      0, 1, 2,
      2, 3, 4,
      4, 5, 6,
      6, 7, 8,
      8, 9, 0,
      1, 5, 9,
      3, 7, 9,
    ];
    let requests: [&[u32]; 5] = [&[0], &[9], &[2, 6], &[8, 1, 4], &[3, 5, 7]];
    for request in requests {
      let deletion_set = set(request, 10);
      assert_eq!(remap(&indices, &deletion_set), remap_descending(&indices, &deletion_set), "request {:?}", request);
    }
  }

  #[test]
  fn removed_triangle_stays_removed() {
    // Deleting 4 first must not let the triangle reappear when 2 is processed.
    let triangles = remap_descending(&[2, 3, 4, 0, 1, 5], &set(&[2, 4], 6));
    assert_eq!(triangles, vec![None, Some([0, 1, 3])]);
  }
}
