use glam::Vec3;

use crate::scene::{
  HalaBlendShape,
  HalaBlendShapeFrame,
};
use super::vertex_filter::{
  self,
  HalaDeletionSet,
};

/// Filter one delta array. Absent deltas become explicit zeros.
/// param deltas: The deltas sized to the original vertex count, or empty.
/// param deletion_set: The deletion set.
/// param new_vertex_count: The vertex count after deletion.
/// return: The deltas sized to the new vertex count.
fn project_deltas(deltas: &[Vec3], deletion_set: &HalaDeletionSet, new_vertex_count: usize) -> Vec<Vec3> {
  if deltas.is_empty() {
    vec![Vec3::ZERO; new_vertex_count]
  } else {
    vertex_filter::exclude_channel(deltas, deletion_set)
  }
}

/// Project the blend shapes of a mesh onto its vertices after deletion.
/// The order of the blend shapes is kept, consumers address them by position.
/// param blend_shapes: The original blend shapes.
/// param deletion_set: The deletion set used for the base attributes.
/// param new_vertex_count: The vertex count after deletion.
/// return: The projected blend shapes.
pub fn project(blend_shapes: &[HalaBlendShape], deletion_set: &HalaDeletionSet, new_vertex_count: usize) -> Vec<HalaBlendShape> {
  blend_shapes.iter()
    .map(|blend_shape| {
      let frame = &blend_shape.frame;
      HalaBlendShape::new(&blend_shape.name, HalaBlendShapeFrame {
        weight: frame.weight,
        delta_positions: project_deltas(&frame.delta_positions, deletion_set, new_vertex_count),
        delta_normals: project_deltas(&frame.delta_normals, deletion_set, new_vertex_count),
        delta_tangents: project_deltas(&frame.delta_tangents, deletion_set, new_vertex_count),
      })
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn deltas_follow_the_vertex_filter() {
    let blend_shapes = vec![
      HalaBlendShape::new("blink", HalaBlendShapeFrame {
        weight: 100.0,
        delta_positions: (0..4).map(|i| Vec3::splat(i as f32)).collect(),
        delta_normals: vec![Vec3::Y; 4],
        delta_tangents: Vec::new(),
      }),
      HalaBlendShape::new("smile", HalaBlendShapeFrame {
        weight: 50.0,
        ..Default::default()
      }),
    ];
    let deletion_set = HalaDeletionSet::canonicalize(&[1], 4).unwrap();
    let projected = project(&blend_shapes, &deletion_set, 3);

    assert_eq!(projected.len(), 2);
    assert_eq!(projected[0].name, "blink");
    assert_eq!(projected[0].frame.weight, 100.0);
    assert_eq!(projected[0].frame.delta_positions, vec![Vec3::splat(0.0), Vec3::splat(2.0), Vec3::splat(3.0)]);
    assert_eq!(projected[0].frame.delta_normals, vec![Vec3::Y; 3]);
    assert_eq!(projected[0].frame.delta_tangents, vec![Vec3::ZERO; 3]);
    assert_eq!(projected[1].name, "smile");
    assert_eq!(projected[1].frame.weight, 50.0);
    assert_eq!(projected[1].frame.delta_positions, vec![Vec3::ZERO; 3]);
  }
}
