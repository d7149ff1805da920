use super::property::{self, PropertyKey, PropertyValue};
use super::EntityGeometry;
use crate::color::Color;
use crate::DocumentError;

use glam::DVec2;
use kurbo::{Affine, BezPath, Shape as KurboShape};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
	Rectangle,
	Circle,
	Triangle,
	Path,
}

impl ShapeKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			ShapeKind::Rectangle => "rectangle",
			ShapeKind::Circle => "circle",
			ShapeKind::Triangle => "triangle",
			ShapeKind::Path => "path",
		}
	}
}

impl fmt::Display for ShapeKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// The size-defining fields of each shape kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeGeometry {
	Rectangle { width_px: f64, height_px: f64 },
	Circle { radius_px: f64 },
	/// An isosceles triangle with its apex centered on the top edge.
	Triangle { width_px: f64, height_px: f64 },
	/// SVG path data. The path is placed so that the top-left corner of its bounding box sits at the entity origin.
	Path { path_data: String },
}

impl ShapeGeometry {
	pub fn kind(&self) -> ShapeKind {
		match self {
			ShapeGeometry::Rectangle { .. } => ShapeKind::Rectangle,
			ShapeGeometry::Circle { .. } => ShapeKind::Circle,
			ShapeGeometry::Triangle { .. } => ShapeKind::Triangle,
			ShapeGeometry::Path { .. } => ShapeKind::Path,
		}
	}
}

/// A filled and/or stroked geometric primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeEntity {
	pub geometry: ShapeGeometry,
	pub fill_color: Option<Color>,
	pub stroke_color: Option<Color>,
	pub stroke_width_px: f64,
}

impl ShapeEntity {
	pub fn new(geometry: ShapeGeometry, fill_color: Option<Color>) -> Self {
		Self {
			geometry,
			fill_color,
			stroke_color: None,
			stroke_width_px: 0.,
		}
	}

	pub fn rectangle(width_px: f64, height_px: f64, fill_color: Color) -> Self {
		Self::new(ShapeGeometry::Rectangle { width_px, height_px }, Some(fill_color))
	}

	pub fn circle(radius_px: f64, fill_color: Color) -> Self {
		Self::new(ShapeGeometry::Circle { radius_px }, Some(fill_color))
	}

	pub fn triangle(width_px: f64, height_px: f64, fill_color: Color) -> Self {
		Self::new(ShapeGeometry::Triangle { width_px, height_px }, Some(fill_color))
	}

	pub fn path(path_data: impl Into<String>, fill_color: Color) -> Self {
		Self::new(ShapeGeometry::Path { path_data: path_data.into() }, Some(fill_color))
	}

	pub fn kind(&self) -> ShapeKind {
		self.geometry.kind()
	}

	pub(crate) fn validate(&self) -> Result<(), DocumentError> {
		match &self.geometry {
			ShapeGeometry::Rectangle { width_px, height_px } | ShapeGeometry::Triangle { width_px, height_px } => {
				property::positive(PropertyKey::WidthPx, *width_px)?;
				property::positive(PropertyKey::HeightPx, *height_px)?;
			}
			ShapeGeometry::Circle { radius_px } => {
				property::positive(PropertyKey::RadiusPx, *radius_px)?;
			}
			ShapeGeometry::Path { path_data } => {
				parse_path(path_data)?;
			}
		}
		property::non_negative(PropertyKey::StrokeWidthPx, self.stroke_width_px)?;
		Ok(())
	}

	pub(crate) fn property(&self, key: PropertyKey) -> Option<PropertyValue> {
		Some(match (key, &self.geometry) {
			(PropertyKey::FillColor, _) => PropertyValue::Color(self.fill_color),
			(PropertyKey::StrokeColor, _) => PropertyValue::Color(self.stroke_color),
			(PropertyKey::StrokeWidthPx, _) => PropertyValue::Number(self.stroke_width_px),
			(PropertyKey::WidthPx, ShapeGeometry::Rectangle { width_px, .. } | ShapeGeometry::Triangle { width_px, .. }) => PropertyValue::Number(*width_px),
			(PropertyKey::HeightPx, ShapeGeometry::Rectangle { height_px, .. } | ShapeGeometry::Triangle { height_px, .. }) => PropertyValue::Number(*height_px),
			(PropertyKey::RadiusPx, ShapeGeometry::Circle { radius_px }) => PropertyValue::Number(*radius_px),
			(PropertyKey::PathData, ShapeGeometry::Path { path_data }) => PropertyValue::Text(path_data.clone()),
			_ => return None,
		})
	}

	/// Returns `Ok(false)` when `key` is not a property of this shape kind.
	pub(crate) fn set_property(&mut self, key: PropertyKey, value: &PropertyValue) -> Result<bool, DocumentError> {
		match (key, &mut self.geometry) {
			(PropertyKey::FillColor, _) => self.fill_color = value.as_color(key)?,
			(PropertyKey::StrokeColor, _) => self.stroke_color = value.as_color(key)?,
			(PropertyKey::StrokeWidthPx, _) => self.stroke_width_px = property::non_negative(key, value.as_number(key)?)?,
			(PropertyKey::WidthPx, ShapeGeometry::Rectangle { width_px, .. } | ShapeGeometry::Triangle { width_px, .. }) => *width_px = property::positive(key, value.as_number(key)?)?,
			(PropertyKey::HeightPx, ShapeGeometry::Rectangle { height_px, .. } | ShapeGeometry::Triangle { height_px, .. }) => *height_px = property::positive(key, value.as_number(key)?)?,
			(PropertyKey::RadiusPx, ShapeGeometry::Circle { radius_px }) => *radius_px = property::positive(key, value.as_number(key)?)?,
			(PropertyKey::PathData, ShapeGeometry::Path { path_data }) => {
				let new_data = value.as_text(key)?;
				parse_path(new_data)?;
				*path_data = new_data.to_string();
			}
			_ => return Ok(false),
		}
		Ok(true)
	}
}

impl EntityGeometry for ShapeEntity {
	fn local_size(&self) -> DVec2 {
		match &self.geometry {
			ShapeGeometry::Rectangle { width_px, height_px } | ShapeGeometry::Triangle { width_px, height_px } => DVec2::new(*width_px, *height_px),
			ShapeGeometry::Circle { radius_px } => DVec2::splat(radius_px * 2.),
			ShapeGeometry::Path { path_data } => parse_path(path_data).map(|(_, bounds)| DVec2::new(bounds.width(), bounds.height())).unwrap_or(DVec2::ZERO),
		}
	}

	fn outline(&self) -> BezPath {
		match &self.geometry {
			ShapeGeometry::Rectangle { width_px, height_px } => kurbo::Rect::new(0., 0., *width_px, *height_px).to_path(0.),
			ShapeGeometry::Circle { radius_px } => kurbo::Circle::new((*radius_px, *radius_px), *radius_px).to_path(0.1),
			ShapeGeometry::Triangle { width_px, height_px } => {
				let mut path = BezPath::new();
				path.move_to((0., *height_px));
				path.line_to((width_px / 2., 0.));
				path.line_to((*width_px, *height_px));
				path.close_path();
				path
			}
			ShapeGeometry::Path { path_data } => match parse_path(path_data) {
				Ok((mut path, bounds)) => {
					path.apply_affine(Affine::translate((-bounds.x0, -bounds.y0)));
					path
				}
				Err(_) => BezPath::new(),
			},
		}
	}
}

/// Parses SVG path data, returning the path and its bounding box. Paths without area cannot be placed or hit.
pub(crate) fn parse_path(path_data: &str) -> Result<(BezPath, kurbo::Rect), DocumentError> {
	let key = PropertyKey::PathData.as_str();
	let path = BezPath::from_svg(path_data).map_err(|err| DocumentError::invalid_value(key, format!("malformed path data: {err}")))?;
	if path.elements().is_empty() {
		return Err(DocumentError::invalid_value(key, "path data is empty"));
	}
	let bounds = path.bounding_box();
	if !(bounds.width() > 0. && bounds.height() > 0.) {
		return Err(DocumentError::invalid_value(key, "path has a degenerate bounding box"));
	}
	Ok((path, bounds))
}

#[cfg(test)]
mod test {
	use super::*;

	const ARROW: &str = "M 0 0 L 50 50 L 40 50 L 50 40 Z";

	#[test]
	fn arrow_path_box() {
		let arrow = ShapeEntity::path(ARROW, Color::BLACK);
		assert!(arrow.validate().is_ok());
		assert_eq!(arrow.local_size(), DVec2::new(50., 50.));
	}

	#[test]
	fn offset_path_is_moved_to_origin() {
		let shape = ShapeEntity::path("M 10 20 L 30 20 L 30 60 Z", Color::BLACK);
		assert_eq!(shape.local_size(), DVec2::new(20., 40.));
		let bounds = shape.outline().bounding_box();
		assert_eq!((bounds.x0, bounds.y0), (0., 0.));
	}

	#[test]
	fn rejects_degenerate_paths() {
		assert!(parse_path("").is_err());
		assert!(parse_path("M 0 0 L 10 0").is_err());
		assert!(parse_path("not a path").is_err());
	}

	#[test]
	fn geometry_keys_follow_the_kind() {
		let mut circle = ShapeEntity::circle(50., Color::BLACK);
		assert_eq!(circle.set_property(PropertyKey::WidthPx, &PropertyValue::Number(10.)), Ok(false));
		assert_eq!(circle.set_property(PropertyKey::RadiusPx, &PropertyValue::Number(10.)), Ok(true));
		assert_eq!(circle.local_size(), DVec2::splat(20.));
		assert!(circle.set_property(PropertyKey::RadiusPx, &PropertyValue::Number(0.)).is_err());
	}
}
