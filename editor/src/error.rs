use crate::project_store::ProjectId;

use pixellab_document::DocumentError;
use thiserror::Error;

/// The error type used by the Pixellab editor.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum EditorError {
	#[error(transparent)]
	Document(#[from] DocumentError),

	#[error("Failed to decode the image: {0}")]
	DecodeError(String),

	#[error("Failed to load the font: {0}")]
	FontLoadError(String),

	#[error("No entity is selected")]
	NoSelection,

	#[error("No project with id {0} exists")]
	ProjectNotFound(ProjectId),

	#[error("The project store failed: {0}")]
	ProjectStore(String),

	#[error("Invalid preferences: {0}")]
	Preferences(String),
}

macro_rules! derive_from {
	($type:ty, $kind:ident) => {
		impl From<$type> for EditorError {
			fn from(error: $type) -> Self {
				EditorError::$kind(error.to_string())
			}
		}
	};
}

derive_from!(std::io::Error, ProjectStore);
derive_from!(image::ImageError, DecodeError);
