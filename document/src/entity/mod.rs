pub mod image;
pub mod property;
pub mod shape;
pub mod text;

pub use image::{ImageEntity, ImageHandle};
pub use property::{PropertyKey, PropertyValue};
pub use shape::{ShapeEntity, ShapeGeometry, ShapeKind};
pub use text::TextEntity;

use crate::DocumentError;

use glam::{DAffine2, DVec2};
use kurbo::{BezPath, Shape as KurboShape};
use std::fmt;

/// Unique within one scene graph for its whole lifetime; never reassigned after removal.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Geometry shared by every entity variant. All of it lives in the entity's local space,
/// whose origin is the top-left corner of the untransformed box.
pub trait EntityGeometry {
	/// Size of the untransformed box.
	fn local_size(&self) -> DVec2;

	/// Scale applied before rotation and translation.
	fn scale(&self) -> DVec2 {
		DVec2::ONE
	}

	/// The painted outline. Defaults to the local box.
	fn outline(&self) -> BezPath {
		let size = self.local_size();
		kurbo::Rect::new(0., 0., size.x, size.y).to_path(0.)
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntityData {
	Text(TextEntity),
	Shape(ShapeEntity),
	Image(ImageEntity),
}

impl EntityData {
	pub fn inner(&self) -> &dyn EntityGeometry {
		match self {
			EntityData::Text(text) => text,
			EntityData::Shape(shape) => shape,
			EntityData::Image(image) => image,
		}
	}

	pub fn variant_name(&self) -> &'static str {
		match self {
			EntityData::Text(_) => "text",
			EntityData::Shape(_) => "shape",
			EntityData::Image(_) => "image",
		}
	}
}

/// A single placeable object: common placement and opacity plus its variant data.
/// The entity's id and z-order are owned by the scene graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
	/// Overrides the label shown in the layer panel.
	pub name: Option<String>,
	pub x: f64,
	pub y: f64,
	/// Always in `[0, 360)`.
	pub rotation_degrees: f64,
	/// Always in `[0, 1]`.
	pub opacity: f64,
	pub data: EntityData,
}

impl Entity {
	pub fn new(data: EntityData) -> Self {
		Self {
			name: None,
			x: 0.,
			y: 0.,
			rotation_degrees: 0.,
			opacity: 1.,
			data,
		}
	}

	pub fn text(text: TextEntity) -> Self {
		Self::new(EntityData::Text(text))
	}

	pub fn shape(shape: ShapeEntity) -> Self {
		Self::new(EntityData::Shape(shape))
	}

	pub fn image(image: ImageEntity) -> Self {
		Self::new(EntityData::Image(image))
	}

	pub fn at(mut self, x: f64, y: f64) -> Self {
		self.x = x;
		self.y = y;
		self
	}

	pub fn variant_name(&self) -> &'static str {
		self.data.variant_name()
	}

	/// Maps local space to document space: translate, then rotate about the origin, then scale.
	pub fn transform(&self) -> DAffine2 {
		DAffine2::from_translation(DVec2::new(self.x, self.y)) * DAffine2::from_angle(self.rotation_degrees.to_radians()) * DAffine2::from_scale(self.data.inner().scale())
	}

	pub fn local_size(&self) -> DVec2 {
		self.data.inner().local_size()
	}

	/// The four corners of the transformed box, clockwise from the origin.
	pub fn corners(&self) -> [DVec2; 4] {
		let size = self.local_size();
		let transform = self.transform();
		[DVec2::ZERO, DVec2::new(size.x, 0.), size, DVec2::new(0., size.y)].map(|corner| transform.transform_point2(corner))
	}

	/// Axis-aligned bounding box of the transformed box, as `[min, max]`.
	pub fn bounding_box(&self) -> [DVec2; 2] {
		let corners = self.corners();
		let min = corners.iter().copied().reduce(DVec2::min).unwrap_or_default();
		let max = corners.iter().copied().reduce(DVec2::max).unwrap_or_default();
		[min, max]
	}

	/// Whether the transformed box contains `point` (edges inclusive).
	pub fn contains_point(&self, point: DVec2) -> bool {
		let transform = self.transform();
		if transform.matrix2.determinant() == 0. {
			return false;
		}
		let local = transform.inverse().transform_point2(point);
		let size = self.local_size();
		(0. ..=size.x).contains(&local.x) && (0. ..=size.y).contains(&local.y)
	}

	/// Text shown for this entity in the layer panel.
	pub fn label(&self) -> String {
		if let Some(name) = &self.name {
			return name.clone();
		}
		match &self.data {
			EntityData::Text(text) if text.content.is_empty() => "Text".to_string(),
			EntityData::Text(text) => text.content.clone(),
			EntityData::Shape(shape) => shape.kind().to_string(),
			EntityData::Image(_) => "image".to_string(),
		}
	}

	/// Checks every field against its domain. Used before an entity enters a scene graph.
	pub fn validate(&self) -> Result<(), DocumentError> {
		let check = || -> Result<(), DocumentError> {
			property::finite(PropertyKey::X, self.x)?;
			property::finite(PropertyKey::Y, self.y)?;
			if !(0. ..360.).contains(&self.rotation_degrees) {
				return Err(DocumentError::invalid_value(PropertyKey::RotationDegrees.as_str(), format!("{} is outside [0, 360)", self.rotation_degrees)));
			}
			property::unit_interval(PropertyKey::Opacity, self.opacity)?;
			if self.name.as_deref() == Some("") {
				return Err(DocumentError::invalid_value(PropertyKey::Name.as_str(), "an unnamed entity has no name rather than an empty one"));
			}
			match &self.data {
				EntityData::Text(text) => text.validate(),
				EntityData::Shape(shape) => shape.validate(),
				EntityData::Image(image) => image.validate(),
			}
		};
		check().map_err(|err| DocumentError::InvalidEntity(err.to_string()))
	}

	/// Reads a property, or `None` when `key` does not apply to this variant.
	pub fn property(&self, key: PropertyKey) -> Option<PropertyValue> {
		let common = match key {
			PropertyKey::X => Some(PropertyValue::Number(self.x)),
			PropertyKey::Y => Some(PropertyValue::Number(self.y)),
			PropertyKey::RotationDegrees => Some(PropertyValue::Number(self.rotation_degrees)),
			PropertyKey::Opacity => Some(PropertyValue::Number(self.opacity)),
			PropertyKey::Name => Some(PropertyValue::Text(self.name.clone().unwrap_or_default())),
			_ => None,
		};
		common.or_else(|| match &self.data {
			EntityData::Text(text) => text.property(key),
			EntityData::Shape(shape) => shape.property(key),
			EntityData::Image(image) => image.property(key),
		})
	}

	/// Validates `value` against the domain of `key` for this variant and writes it in place.
	/// On error the entity is left untouched.
	pub fn set_property(&mut self, key: PropertyKey, value: &PropertyValue) -> Result<(), DocumentError> {
		let applied = match key {
			PropertyKey::X => {
				self.x = property::finite(key, value.as_number(key)?)?;
				true
			}
			PropertyKey::Y => {
				self.y = property::finite(key, value.as_number(key)?)?;
				true
			}
			PropertyKey::RotationDegrees => {
				self.rotation_degrees = property::rotation(value.as_number(key)?)?;
				true
			}
			PropertyKey::Opacity => {
				self.opacity = property::unit_interval(key, value.as_number(key)?)?;
				true
			}
			PropertyKey::Name => {
				let name = value.as_text(key)?;
				self.name = (!name.is_empty()).then(|| name.to_string());
				true
			}
			_ => match &mut self.data {
				EntityData::Text(text) => text.set_property(key, value)?,
				EntityData::Shape(shape) => shape.set_property(key, value)?,
				EntityData::Image(image) => image.set_property(key, value)?,
			},
		};

		if applied {
			Ok(())
		} else {
			Err(DocumentError::InvalidProperty {
				key: key.as_str().to_string(),
				variant: self.variant_name(),
			})
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::color::Color;

	fn square() -> Entity {
		Entity::shape(ShapeEntity::rectangle(100., 100., Color::BLACK)).at(150., 150.)
	}

	#[test]
	fn unrotated_box() {
		let entity = square();
		assert_eq!(entity.bounding_box(), [DVec2::new(150., 150.), DVec2::new(250., 250.)]);
		assert!(entity.contains_point(DVec2::new(150., 250.)));
		assert!(!entity.contains_point(DVec2::new(149., 200.)));
	}

	#[test]
	fn rotation_turns_about_the_origin() {
		let mut entity = square();
		entity.set_property(PropertyKey::RotationDegrees, &PropertyValue::Number(90.)).unwrap();
		let [min, max] = entity.bounding_box();
		assert!((min - DVec2::new(50., 150.)).length() < 1e-9);
		assert!((max - DVec2::new(150., 250.)).length() < 1e-9);
		assert!(entity.contains_point(DVec2::new(100., 200.)));
		assert!(!entity.contains_point(DVec2::new(200., 200.)));
	}

	#[test]
	fn image_scale_enlarges_the_box() {
		let mut image = ImageEntity::new("handle".into(), 50, 20);
		image.scale_x = 2.;
		image.scale_y = 3.;
		let entity = Entity::image(image);
		assert_eq!(entity.bounding_box(), [DVec2::ZERO, DVec2::new(100., 60.)]);
	}

	#[test]
	fn property_dispatch_per_variant() {
		let mut entity = square();
		assert!(matches!(
			entity.set_property(PropertyKey::FontSizePx, &PropertyValue::Number(24.)),
			Err(DocumentError::InvalidProperty { variant: "shape", .. })
		));
		assert!(matches!(entity.set_property(PropertyKey::Opacity, &PropertyValue::Number(1.5)), Err(DocumentError::InvalidValue { .. })));
		assert!(matches!(entity.set_property(PropertyKey::X, &PropertyValue::Text("1".into())), Err(DocumentError::InvalidValue { .. })));
		assert_eq!(entity, square());
	}

	#[test]
	fn labels() {
		assert_eq!(square().label(), "rectangle");
		assert_eq!(Entity::text(TextEntity::new("", "Arial", 12.)).label(), "Text");
		let mut named = square();
		named.set_property(PropertyKey::Name, &PropertyValue::from("Background")).unwrap();
		assert_eq!(named.label(), "Background");
	}

	#[test]
	fn validation_reports_invalid_entity() {
		let mut entity = square();
		entity.opacity = 2.;
		assert!(matches!(entity.validate(), Err(DocumentError::InvalidEntity(_))));
		let zero_width = Entity::shape(ShapeEntity::rectangle(0., 10., Color::BLACK));
		assert!(matches!(zero_width.validate(), Err(DocumentError::InvalidEntity(_))));
	}

	#[test]
	fn empty_names_are_not_names() {
		let mut entity = square();
		entity.name = Some(String::new());
		assert!(matches!(entity.validate(), Err(DocumentError::InvalidEntity(_))));

		let mut named = square();
		named.set_property(PropertyKey::Name, &PropertyValue::from("Logo")).unwrap();
		named.set_property(PropertyKey::Name, &PropertyValue::from("")).unwrap();
		assert_eq!(named.name, None);
		assert!(named.validate().is_ok());
	}
}
