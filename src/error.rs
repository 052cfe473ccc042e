use thiserror::Error;

/// The kind of the error of the hala-mesh-deleter crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalaMeshDeleterErrorKind {
  /// The deletion request contains no vertex index.
  EmptySelection,
  /// The mesh data breaks one of its invariants.
  InvalidMeshData,
  /// The glTF document could not be imported.
  Gltf,
  /// The requested mesh does not exist in the glTF document.
  MissingMesh,
  /// A required vertex attribute is absent.
  MissingAttribute,
}

/// The error type of the hala-mesh-deleter crate.
#[derive(Error, Debug)]
pub struct HalaMeshDeleterError {
  kind: HalaMeshDeleterErrorKind,
  msg: String,
  #[source]
  source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

/// The implementation of the error type of the hala-mesh-deleter crate.
impl HalaMeshDeleterError {
  /// Create a new error.
  /// param kind: The kind of the error.
  /// param msg: The message of the error.
  /// param source: The source of the error.
  /// return: The error.
  pub fn new(kind: HalaMeshDeleterErrorKind, msg: &str, source: Option<Box<dyn std::error::Error + Send + Sync>>) -> Self {
    Self {
      kind,
      msg: msg.to_string(),
      source,
    }
  }

  /// Create the error raised when no vertex is selected for deletion.
  /// return: The error.
  pub fn empty_selection() -> Self {
    Self::new(HalaMeshDeleterErrorKind::EmptySelection, "Vertices not found.", None)
  }

  /// Create the error raised when the mesh data is malformed.
  /// param msg: The description of the broken invariant.
  /// return: The error.
  pub fn invalid_mesh_data(msg: &str) -> Self {
    Self::new(HalaMeshDeleterErrorKind::InvalidMeshData, msg, None)
  }

  pub fn kind(&self) -> HalaMeshDeleterErrorKind {
    self.kind
  }

  pub fn message(&self) -> &str {
    &self.msg
  }

  /// Check if the error is caused by an empty deletion request.
  /// return: True if the selection was empty, false otherwise.
  pub fn is_empty_selection(&self) -> bool {
    self.kind == HalaMeshDeleterErrorKind::EmptySelection
  }
}

impl std::convert::From<gltf::Error> for HalaMeshDeleterError {
  fn from(err: gltf::Error) -> Self {
    Self {
      kind: HalaMeshDeleterErrorKind::Gltf,
      msg: format!("Import glTF failed: {}", err),
      source: Some(Box::new(err)),
    }
  }
}

/// The implementation Display trait for the error type of the hala-mesh-deleter crate.
impl std::fmt::Display for HalaMeshDeleterError {
  /// Format the error.
  /// param f: The formatter.
  /// return: The result.
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.msg)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_selection_kind_and_message() {
    let err = HalaMeshDeleterError::empty_selection();
    assert!(err.is_empty_selection());
    assert_eq!(err.kind(), HalaMeshDeleterErrorKind::EmptySelection);
    assert_eq!(err.to_string(), "Vertices not found.");
    assert!(std::error::Error::source(&err).is_none());
  }

  #[test]
  fn invalid_mesh_data_is_not_empty_selection() {
    let err = HalaMeshDeleterError::invalid_mesh_data("Submesh 0 has 4 indices.");
    assert!(!err.is_empty_selection());
    assert_eq!(err.message(), "Submesh 0 has 4 indices.");
  }
}
