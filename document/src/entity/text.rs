use super::property::{self, PropertyKey, PropertyValue};
use super::EntityGeometry;
use crate::color::Color;
use crate::consts::{DEFAULT_TEXT_BOX_WIDTH, TEXT_LINE_HEIGHT};
use crate::DocumentError;

use glam::DVec2;

/// A wrapping text box. The glyphs are shaped by the rendering surface using `font_family`;
/// the scene graph only tracks the box the text occupies.
#[derive(Debug, Clone, PartialEq)]
pub struct TextEntity {
	pub content: String,
	pub font_family: String,
	pub font_size_px: f64,
	/// Width of the text box that the content wraps within.
	pub width_px: f64,
	pub fill_color: Option<Color>,
	pub stroke_color: Option<Color>,
	pub stroke_width_px: f64,
}

impl TextEntity {
	pub fn new(content: impl Into<String>, font_family: impl Into<String>, font_size_px: f64) -> Self {
		Self {
			content: content.into(),
			font_family: font_family.into(),
			font_size_px,
			width_px: DEFAULT_TEXT_BOX_WIDTH,
			fill_color: Some(Color::BLACK),
			stroke_color: None,
			stroke_width_px: 0.,
		}
	}

	pub fn line_count(&self) -> usize {
		self.content.split('\n').count()
	}

	pub fn height_px(&self) -> f64 {
		self.line_count() as f64 * self.font_size_px * TEXT_LINE_HEIGHT
	}

	pub(crate) fn validate(&self) -> Result<(), DocumentError> {
		property::non_empty(PropertyKey::FontFamily, &self.font_family)?;
		property::positive(PropertyKey::FontSizePx, self.font_size_px)?;
		property::positive(PropertyKey::WidthPx, self.width_px)?;
		property::non_negative(PropertyKey::StrokeWidthPx, self.stroke_width_px)?;
		Ok(())
	}

	pub(crate) fn property(&self, key: PropertyKey) -> Option<PropertyValue> {
		Some(match key {
			PropertyKey::Content => PropertyValue::Text(self.content.clone()),
			PropertyKey::FontFamily => PropertyValue::Text(self.font_family.clone()),
			PropertyKey::FontSizePx => PropertyValue::Number(self.font_size_px),
			PropertyKey::WidthPx => PropertyValue::Number(self.width_px),
			PropertyKey::FillColor => PropertyValue::Color(self.fill_color),
			PropertyKey::StrokeColor => PropertyValue::Color(self.stroke_color),
			PropertyKey::StrokeWidthPx => PropertyValue::Number(self.stroke_width_px),
			_ => return None,
		})
	}

	/// Returns `Ok(false)` when `key` is not a text property.
	pub(crate) fn set_property(&mut self, key: PropertyKey, value: &PropertyValue) -> Result<bool, DocumentError> {
		match key {
			PropertyKey::Content => self.content = value.as_text(key)?.to_string(),
			PropertyKey::FontFamily => self.font_family = property::non_empty(key, value.as_text(key)?)?,
			PropertyKey::FontSizePx => self.font_size_px = property::positive(key, value.as_number(key)?)?,
			PropertyKey::WidthPx => self.width_px = property::positive(key, value.as_number(key)?)?,
			PropertyKey::FillColor => self.fill_color = value.as_color(key)?,
			PropertyKey::StrokeColor => self.stroke_color = value.as_color(key)?,
			PropertyKey::StrokeWidthPx => self.stroke_width_px = property::non_negative(key, value.as_number(key)?)?,
			_ => return Ok(false),
		}
		Ok(true)
	}
}

impl EntityGeometry for TextEntity {
	fn local_size(&self) -> DVec2 {
		DVec2::new(self.width_px, self.height_px())
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn box_grows_with_lines() {
		let mut text = TextEntity::new("Edit me", "Arial", 24.);
		assert_eq!(text.line_count(), 1);
		let single = text.local_size();
		text.content = "Edit\nme".into();
		assert_eq!(text.line_count(), 2);
		assert_eq!(text.local_size().y, single.y * 2.);
		assert_eq!(text.local_size().x, DEFAULT_TEXT_BOX_WIDTH);
	}

	#[test]
	fn empty_text_still_occupies_a_line() {
		let text = TextEntity::new("", "Arial", 10.);
		assert_eq!(text.line_count(), 1);
		assert!(text.height_px() > 0.);
	}
}
