pub use crate::error::{
  HalaMeshDeleterError,
  HalaMeshDeleterErrorKind,
};
pub use crate::scene::{
  HalaBlendShape,
  HalaBlendShapeFrame,
  HalaBoneWeight,
  HalaColor32,
  HalaMeshData,
  HalaSubMesh,
};
pub use crate::scene::loader::HalaGltfLoader;
pub use crate::deleter::{
  HalaDeletionReport,
  HalaDeletionSet,
  HalaMeshDeleter,
};
