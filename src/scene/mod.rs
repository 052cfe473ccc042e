pub mod loader;
pub mod vertex;
pub mod mesh;

pub use vertex::{
  HalaBoneWeight,
  HalaColor32,
};
pub use mesh::{
  HalaBlendShape,
  HalaBlendShapeFrame,
  HalaMeshData,
  HalaSubMesh,
};
