use super::property::{self, PropertyKey, PropertyValue};
use super::EntityGeometry;
use crate::DocumentError;

use glam::DVec2;
use std::fmt;

/// Identifies a decoded image owned by the image collaborator. The document never holds pixels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageHandle(pub String);

impl fmt::Display for ImageHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for ImageHandle {
	fn from(value: &str) -> Self {
		ImageHandle(value.to_string())
	}
}

impl From<String> for ImageHandle {
	fn from(value: String) -> Self {
		ImageHandle(value)
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageEntity {
	pub handle: ImageHandle,
	pub intrinsic_width_px: u32,
	pub intrinsic_height_px: u32,
	pub scale_x: f64,
	pub scale_y: f64,
}

impl ImageEntity {
	pub fn new(handle: ImageHandle, intrinsic_width_px: u32, intrinsic_height_px: u32) -> Self {
		Self {
			handle,
			intrinsic_width_px,
			intrinsic_height_px,
			scale_x: 1.,
			scale_y: 1.,
		}
	}

	/// Uniformly scales the image so it is displayed `width_px` wide.
	pub fn scaled_to_width(mut self, width_px: f64) -> Self {
		if self.intrinsic_width_px > 0 {
			let scale = width_px / self.intrinsic_width_px as f64;
			self.scale_x = scale;
			self.scale_y = scale;
		}
		self
	}

	/// The size the image is displayed at, before rotation.
	pub fn displayed_size(&self) -> DVec2 {
		self.local_size() * self.scale()
	}

	pub(crate) fn validate(&self) -> Result<(), DocumentError> {
		if self.handle.0.is_empty() {
			return Err(DocumentError::invalid_value(PropertyKey::Handle.as_str(), "must not be empty"));
		}
		property::positive(PropertyKey::IntrinsicWidthPx, self.intrinsic_width_px as f64)?;
		property::positive(PropertyKey::IntrinsicHeightPx, self.intrinsic_height_px as f64)?;
		property::positive(PropertyKey::ScaleX, self.scale_x)?;
		property::positive(PropertyKey::ScaleY, self.scale_y)?;
		Ok(())
	}

	pub(crate) fn property(&self, key: PropertyKey) -> Option<PropertyValue> {
		Some(match key {
			PropertyKey::Handle => PropertyValue::Text(self.handle.0.clone()),
			PropertyKey::IntrinsicWidthPx => PropertyValue::Number(self.intrinsic_width_px as f64),
			PropertyKey::IntrinsicHeightPx => PropertyValue::Number(self.intrinsic_height_px as f64),
			PropertyKey::ScaleX => PropertyValue::Number(self.scale_x),
			PropertyKey::ScaleY => PropertyValue::Number(self.scale_y),
			_ => return None,
		})
	}

	/// The handle and intrinsic size come from the decoder and are not writable.
	pub(crate) fn set_property(&mut self, key: PropertyKey, value: &PropertyValue) -> Result<bool, DocumentError> {
		match key {
			PropertyKey::ScaleX => self.scale_x = property::positive(key, value.as_number(key)?)?,
			PropertyKey::ScaleY => self.scale_y = property::positive(key, value.as_number(key)?)?,
			_ => return Ok(false),
		}
		Ok(true)
	}
}

impl EntityGeometry for ImageEntity {
	fn local_size(&self) -> DVec2 {
		DVec2::new(self.intrinsic_width_px as f64, self.intrinsic_height_px as f64)
	}

	fn scale(&self) -> DVec2 {
		DVec2::new(self.scale_x, self.scale_y)
	}
}
