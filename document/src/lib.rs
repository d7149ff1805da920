pub mod codec;
pub mod color;
pub mod consts;
pub mod entity;
pub mod error;
pub mod operation;
pub mod render;
pub mod response;
pub mod scene;

pub use color::Color;
pub use entity::{Entity, EntityData, EntityId};
pub use error::DocumentError;
pub use operation::Operation;
pub use response::DocumentResponse;
pub use scene::SceneGraph;
