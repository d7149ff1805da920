pub mod consts;
pub mod error;
pub mod fonts;
pub mod history;
pub mod images;
pub mod preferences;
pub mod presets;
pub mod project_store;
pub mod session;

#[cfg(test)]
pub mod test_utils;

#[doc(inline)]
pub use error::EditorError;
#[doc(inline)]
pub use pixellab_document::{Color, DocumentError, Entity, EntityId, Operation, SceneGraph};
#[doc(inline)]
pub use session::DocumentSession;
