use std::path::Path;

use glam::{
  Mat4,
  Vec2,
  Vec3,
  Vec4,
};
use serde::{
  Deserialize, Serialize
};
use serde_json;

use crate::error::{
  HalaMeshDeleterError,
  HalaMeshDeleterErrorKind,
};
use super::super::{
  mesh::{HalaBlendShape, HalaBlendShapeFrame, HalaMeshData, HalaSubMesh, MAX_UV_CHANNELS},
  vertex::{HalaBoneWeight, HalaColor32},
};

/// The glTF loader.
pub struct HalaGltfLoader;

/// The glTF mesh custom info.
#[derive(Serialize, Deserialize, Default)]
struct _MeshCustomInfo {
  #[serde(rename = "targetNames", default)]
  pub target_names: Vec<String>,
}

/// The deltas of one morph target read from one primitive.
struct _MorphTargetData {
  positions: Option<Vec<Vec3>>,
  normals: Option<Vec<Vec3>>,
  tangents: Option<Vec<Vec3>>,
}

/// The vertex streams read from one primitive.
struct _PrimitiveData {
  indices: Vec<u32>,
  material_index: u32,
  positions: Vec<Vec3>,
  normals: Option<Vec<Vec3>>,
  tangents: Option<Vec<Vec4>>,
  colors: Option<Vec<Vec4>>,
  colors32: Option<Vec<HalaColor32>>,
  uvs: [Option<Vec<Vec2>>; MAX_UV_CHANNELS],
  bone_weights: Option<Vec<HalaBoneWeight>>,
  morph_targets: Vec<_MorphTargetData>,
}

/// Concatenate one vertex channel of all primitives.
/// A channel missing on some primitives can not be kept in lock-step and is dropped.
/// param primitives: The primitives.
/// param channel: The channel name for logging.
/// param mesh_name: The mesh name for logging.
/// param get: The channel accessor.
/// return: The merged channel.
fn merge_channel<T: Clone>(
  primitives: &[_PrimitiveData],
  channel: &str,
  mesh_name: &str,
  get: impl Fn(&_PrimitiveData) -> Option<&Vec<T>>,
) -> Vec<T> {
  let present = primitives.iter().filter(|primitive| get(primitive).is_some()).count();
  if present == 0 {
    return Vec::new();
  }
  if present < primitives.len() {
    log::warn!(
      "Channel \"{}\" of mesh \"{}\" exists on {} of {} primitives and is dropped.",
      channel, mesh_name, present, primitives.len()
    );
    return Vec::new();
  }
  primitives.iter()
    .filter_map(|primitive| get(primitive))
    .flat_map(|data| data.iter().cloned())
    .collect()
}

/// Concatenate one delta channel of a morph target over all primitives.
/// Primitives without the deltas contribute zeros.
/// param primitives: The primitives.
/// param target_index: The morph target index.
/// param get: The delta accessor.
/// return: The merged deltas, empty if no primitive has them.
fn merge_deltas(
  primitives: &[_PrimitiveData],
  target_index: usize,
  get: impl Fn(&_MorphTargetData) -> Option<&Vec<Vec3>>,
) -> Vec<Vec3> {
  let any = primitives.iter()
    .any(|primitive| primitive.morph_targets.get(target_index).and_then(&get).is_some());
  if !any {
    return Vec::new();
  }

  let mut deltas = Vec::new();
  for primitive in primitives.iter() {
    match primitive.morph_targets.get(target_index).and_then(&get) {
      Some(data) => deltas.extend_from_slice(data),
      None => deltas.resize(deltas.len() + primitive.positions.len(), Vec3::ZERO),
    }
  }
  deltas
}

/// Shift the indices of one primitive into the concatenated vertex array.
/// param indices: The primitive local indices.
/// param base_vertex: The first vertex of the primitive in the concatenated array.
/// param mesh_name: The mesh name for messages.
/// return: The shifted indices.
fn offset_indices(indices: &[u32], base_vertex: u32, mesh_name: &str) -> Result<Vec<u32>, HalaMeshDeleterError> {
  indices.iter()
    .map(|index| index.checked_add(base_vertex).ok_or_else(|| HalaMeshDeleterError::invalid_mesh_data(
      &format!("Index {} of mesh \"{}\" overflows after offsetting by {}.", index, mesh_name, base_vertex)
    )))
    .collect()
}

/// Advance past one primitive in the concatenated vertex array.
/// param base_vertex: The first vertex of the primitive.
/// param vertex_count: The vertex count of the primitive.
/// param mesh_name: The mesh name for messages.
/// return: The first vertex of the next primitive.
fn next_base_vertex(base_vertex: u32, vertex_count: usize, mesh_name: &str) -> Result<u32, HalaMeshDeleterError> {
  u32::try_from(vertex_count).ok()
    .and_then(|count| base_vertex.checked_add(count))
    .ok_or_else(|| HalaMeshDeleterError::invalid_mesh_data(
      &format!("Mesh \"{}\" has more vertices than 32-bit indices can address.", mesh_name)
    ))
}

/// The implementation of the glTF loader.
impl HalaGltfLoader {
  /// Load one mesh from the glTF file at the given path.
  /// param path The path of the glTF file.
  /// param mesh_index The index of the mesh in the glTF document.
  /// return The loaded mesh data.
  pub fn load<P: AsRef<Path>>(path: P, mesh_index: usize) -> Result<HalaMeshData, HalaMeshDeleterError> {
    let path = path.as_ref();
    let (document, buffers, _) = gltf::import(path)
      .map_err(|err| HalaMeshDeleterError::new(
        HalaMeshDeleterErrorKind::Gltf,
        &format!("Load glTF file \"{}\" failed.", path.display()),
        Some(Box::new(err)),
      ))?;
    Self::load_mesh(&document, &buffers, mesh_index)
  }

  /// Load one mesh from an in-memory glTF or GLB document.
  /// param data The document bytes.
  /// param mesh_index The index of the mesh in the glTF document.
  /// return The loaded mesh data.
  pub fn load_slice(data: &[u8], mesh_index: usize) -> Result<HalaMeshData, HalaMeshDeleterError> {
    let (document, buffers, _) = gltf::import_slice(data)?;
    Self::load_mesh(&document, &buffers, mesh_index)
  }

  /// Load the mesh.
  /// All triangle primitives become submeshes sharing one concatenated vertex array.
  /// param document The gltf document.
  /// param buffers The gltf buffers.
  /// param mesh_index The index of the mesh.
  /// return The loaded mesh data.
  fn load_mesh(document: &gltf::Document, buffers: &[gltf::buffer::Data], mesh_index: usize) -> Result<HalaMeshData, HalaMeshDeleterError> {
    let mesh = document.meshes().nth(mesh_index)
      .ok_or(HalaMeshDeleterError::new(
        HalaMeshDeleterErrorKind::MissingMesh,
        &format!("Mesh {} not found, the document has {} meshes.", mesh_index, document.meshes().len()),
        None,
      ))?;
    let mesh_name = mesh.name().unwrap_or("<Unnamed>");
    log::debug!("Loading mesh \"{}\".", mesh_name);

    let custom_info = match mesh.extras() {
      Some(extras) => {
        serde_json::from_str::<_MeshCustomInfo>(extras.get())
          .map_err(|err| HalaMeshDeleterError::new(HalaMeshDeleterErrorKind::Gltf, "Parse mesh extras failed.", Some(Box::new(err))))?
      },
      None => {
        _MeshCustomInfo::default()
      },
    };

    let mut primitives = Vec::new();
    for primitive in mesh.primitives() {
      if primitive.mode() != gltf::mesh::Mode::Triangles {
        log::warn!("Skipped primitive {} of mesh \"{}\", mode {:?} is not triangles.", primitive.index(), mesh_name, primitive.mode());
        continue;
      }
      log::debug!("Loading primitive {} from mesh \"{}\".", primitive.index(), mesh_name);
      primitives.push(Self::load_primitive(&primitive, buffers, mesh_name)?);
    }

    let mut submeshes = Vec::with_capacity(primitives.len());
    let mut base_vertex = 0u32;
    for primitive in primitives.iter() {
      let indices = offset_indices(&primitive.indices, base_vertex, mesh_name)?;
      submeshes.push(HalaSubMesh::new(indices, primitive.material_index));
      base_vertex = next_base_vertex(base_vertex, primitive.positions.len(), mesh_name)?;
    }

    let target_count = primitives.iter().map(|primitive| primitive.morph_targets.len()).max().unwrap_or(0);
    let mut blend_shapes = Vec::with_capacity(target_count);
    for target_index in 0..target_count {
      let name = custom_info.target_names.get(target_index)
        .cloned()
        .unwrap_or_else(|| format!("target_{}", target_index));
      blend_shapes.push(HalaBlendShape {
        name,
        frame: HalaBlendShapeFrame {
          weight: 1.0,
          delta_positions: merge_deltas(&primitives, target_index, |target| target.positions.as_ref()),
          delta_normals: merge_deltas(&primitives, target_index, |target| target.normals.as_ref()),
          delta_tangents: merge_deltas(&primitives, target_index, |target| target.tangents.as_ref()),
        },
      });
    }

    let mesh_data = HalaMeshData {
      name: mesh_name.to_owned(),
      positions: primitives.iter().flat_map(|primitive| primitive.positions.iter().copied()).collect(),
      normals: merge_channel(&primitives, "normals", mesh_name, |primitive| primitive.normals.as_ref()),
      tangents: merge_channel(&primitives, "tangents", mesh_name, |primitive| primitive.tangents.as_ref()),
      colors: merge_channel(&primitives, "colors", mesh_name, |primitive| primitive.colors.as_ref()),
      colors32: merge_channel(&primitives, "colors32", mesh_name, |primitive| primitive.colors32.as_ref()),
      uvs: [
        merge_channel(&primitives, "uv0", mesh_name, |primitive| primitive.uvs[0].as_ref()),
        merge_channel(&primitives, "uv1", mesh_name, |primitive| primitive.uvs[1].as_ref()),
        merge_channel(&primitives, "uv2", mesh_name, |primitive| primitive.uvs[2].as_ref()),
        merge_channel(&primitives, "uv3", mesh_name, |primitive| primitive.uvs[3].as_ref()),
      ],
      bone_weights: merge_channel(&primitives, "bone_weights", mesh_name, |primitive| primitive.bone_weights.as_ref()),
      submeshes,
      bind_poses: Self::load_bind_poses(document, buffers, mesh.index()),
      blend_shapes,
      dynamic: false,
    };
    mesh_data.validate()?;

    Ok(mesh_data)
  }

  /// Load the primitive.
  /// param primitive The gltf primitive.
  /// param buffers The gltf buffers.
  /// param mesh_name The mesh name for messages.
  /// return The vertex streams of the primitive.
  fn load_primitive(primitive: &gltf::Primitive, buffers: &[gltf::buffer::Data], mesh_name: &str) -> Result<_PrimitiveData, HalaMeshDeleterError> {
    let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

    let positions = reader.read_positions()
      .ok_or(HalaMeshDeleterError::new(
        HalaMeshDeleterErrorKind::MissingAttribute,
        &format!("Read positions from mesh \"{}\" failed.", mesh_name),
        None,
      ))?
      .map(Vec3::from).collect::<Vec<_>>();
    let indices = match reader.read_indices() {
      Some(indices) => indices.into_u32().collect::<Vec<_>>(),
      // Non-indexed triangles.
      None => (0..positions.len() as u32).collect::<Vec<_>>(),
    };

    let normals = reader.read_normals()
      .map(|normals| normals.map(Vec3::from).collect::<Vec<_>>());
    let tangents = reader.read_tangents()
      .map(|tangents| tangents.map(Vec4::from).collect::<Vec<_>>());

    // Byte colors stay byte-packed, everything else is read as float.
    let (colors, colors32) = match reader.read_colors(0) {
      Some(colors @ (gltf::mesh::util::ReadColors::RgbU8(_) | gltf::mesh::util::ReadColors::RgbaU8(_))) => {
        (None, Some(colors.into_rgba_u8().map(HalaColor32::from).collect::<Vec<_>>()))
      },
      Some(colors) => {
        (Some(colors.into_rgba_f32().map(Vec4::from).collect::<Vec<_>>()), None)
      },
      None => (None, None),
    };

    let mut uvs: [Option<Vec<Vec2>>; MAX_UV_CHANNELS] = Default::default();
    for (set, uv) in uvs.iter_mut().enumerate() {
      *uv = reader.read_tex_coords(set as u32)
        .map(|tex_coords| tex_coords.into_f32().map(Vec2::from).collect::<Vec<_>>());
    }

    let bone_weights = match (reader.read_joints(0), reader.read_weights(0)) {
      (Some(joints), Some(weights)) => {
        Some(joints.into_u16()
          .zip(weights.into_f32())
          .map(|(joints, weights)| HalaBoneWeight::new(joints.map(u32::from), weights))
          .collect::<Vec<_>>())
      },
      (None, None) => None,
      _ => {
        log::warn!("Mesh \"{}\" has joints or weights but not both, skinning is dropped.", mesh_name);
        None
      },
    };

    let morph_targets = reader.read_morph_targets()
      .map(|(positions, normals, tangents)| _MorphTargetData {
        positions: positions.map(|deltas| deltas.map(Vec3::from).collect()),
        normals: normals.map(|deltas| deltas.map(Vec3::from).collect()),
        tangents: tangents.map(|deltas| deltas.map(Vec3::from).collect()),
      })
      .collect::<Vec<_>>();

    let material_index = primitive.material().index().map_or(u32::MAX, |idx| idx as u32);

    Ok(_PrimitiveData {
      indices,
      material_index,
      positions,
      normals,
      tangents,
      colors,
      colors32,
      uvs,
      bone_weights,
      morph_targets,
    })
  }

  /// Load the bind poses of the skin used together with the mesh.
  /// param document The gltf document.
  /// param buffers The gltf buffers.
  /// param mesh_index The index of the mesh.
  /// return The inverse bind matrices, empty for a mesh without skin.
  fn load_bind_poses(document: &gltf::Document, buffers: &[gltf::buffer::Data], mesh_index: usize) -> Vec<Mat4> {
    let skin = document.nodes()
      .filter(|node| node.mesh().map(|mesh| mesh.index()) == Some(mesh_index))
      .find_map(|node| node.skin());
    let Some(skin) = skin else {
      return Vec::new();
    };

    log::debug!("Loading skin \"{}\".", skin.name().unwrap_or("<Unnamed>"));
    let reader = skin.reader(|buffer| Some(&buffers[buffer.index()]));
    match reader.read_inverse_bind_matrices() {
      Some(matrices) => matrices.map(|matrix| Mat4::from_cols_array_2d(&matrix)).collect(),
      // Missing inverse bind matrices mean identity matrices.
      None => vec![Mat4::IDENTITY; skin.joints().count()],
    }
  }
}
