use crate::EntityId;

use thiserror::Error;

/// A set of different errors that can occur when using this crate.
/// None of them leave the scene graph partially mutated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DocumentError {
	#[error("Invalid entity: {0}")]
	InvalidEntity(String),

	#[error("No entity with id {0} exists in the scene graph")]
	NotFound(EntityId),

	#[error("The property `{key}` does not apply to {variant} entities")]
	InvalidProperty { key: String, variant: &'static str },

	#[error("Invalid value for `{key}`: {reason}")]
	InvalidValue { key: String, reason: String },

	#[error("Corrupt document: {0}")]
	CorruptDocument(String),

	#[error("Raster export failed: {0}")]
	ExportFailed(String),
}

impl DocumentError {
	pub(crate) fn invalid_value(key: impl Into<String>, reason: impl Into<String>) -> Self {
		Self::InvalidValue { key: key.into(), reason: reason.into() }
	}
}
