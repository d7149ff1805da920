use crate::consts::*;
use crate::images::DecodedImage;

use pixellab_document::entity::{Entity, ImageEntity, ShapeEntity, TextEntity};
use std::fmt;

/// The shapes offered by the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapePreset {
	Rectangle,
	Circle,
	Triangle,
	Arrow,
}

impl ShapePreset {
	pub const ALL: [ShapePreset; 4] = [ShapePreset::Rectangle, ShapePreset::Circle, ShapePreset::Triangle, ShapePreset::Arrow];

	pub fn entity(&self) -> Entity {
		match self {
			ShapePreset::Rectangle => Entity::shape(ShapeEntity::rectangle(RECTANGLE_PRESET_SIZE_PX, RECTANGLE_PRESET_SIZE_PX, RECTANGLE_PRESET_FILL)).at(SHAPE_PRESET_POSITION.0, SHAPE_PRESET_POSITION.1),
			ShapePreset::Circle => Entity::shape(ShapeEntity::circle(CIRCLE_PRESET_RADIUS_PX, CIRCLE_PRESET_FILL)).at(SHAPE_PRESET_POSITION.0, SHAPE_PRESET_POSITION.1),
			ShapePreset::Triangle => Entity::shape(ShapeEntity::triangle(TRIANGLE_PRESET_SIZE_PX, TRIANGLE_PRESET_SIZE_PX, TRIANGLE_PRESET_FILL)).at(SHAPE_PRESET_POSITION.0, SHAPE_PRESET_POSITION.1),
			ShapePreset::Arrow => Entity::shape(ShapeEntity::path(ARROW_PRESET_PATH, ARROW_PRESET_FILL)).at(ARROW_PRESET_POSITION.0, ARROW_PRESET_POSITION.1),
		}
	}
}

impl fmt::Display for ShapePreset {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			ShapePreset::Rectangle => "Rectangle",
			ShapePreset::Circle => "Circle",
			ShapePreset::Triangle => "Triangle",
			ShapePreset::Arrow => "Arrow",
		};
		f.write_str(name)
	}
}

/// The "Add Text" toolbar entity.
pub fn text_entity() -> Entity {
	let text = TextEntity {
		fill_color: Some(TEXT_PRESET_FILL),
		..TextEntity::new(TEXT_PRESET_CONTENT, TEXT_PRESET_FONT_FAMILY, TEXT_PRESET_FONT_SIZE_PX)
	};
	Entity::text(text).at(TEXT_PRESET_POSITION.0, TEXT_PRESET_POSITION.1)
}

/// An imported image, scaled uniformly to the import width and placed at the origin.
pub fn image_entity(image: &DecodedImage) -> Entity {
	Entity::image(ImageEntity::new(image.handle.clone(), image.intrinsic_width_px, image.intrinsic_height_px).scaled_to_width(IMPORTED_IMAGE_WIDTH_PX))
}

#[cfg(test)]
mod test {
	use super::*;
	use glam::DVec2;
	use pixellab_document::entity::{EntityData, ShapeKind};
	use pixellab_document::Color;

	#[test]
	fn every_preset_is_a_valid_entity() {
		for preset in ShapePreset::ALL {
			assert!(preset.entity().validate().is_ok(), "{preset}");
		}
		assert!(text_entity().validate().is_ok());
	}

	#[test]
	fn presets_match_the_toolbar() {
		let rectangle = ShapePreset::Rectangle.entity();
		assert_eq!(rectangle.bounding_box(), [DVec2::new(150., 150.), DVec2::new(250., 250.)]);
		let EntityData::Shape(shape) = &rectangle.data else { panic!("expected a shape") };
		assert_eq!(shape.fill_color, Some(Color::from_rgb8(0x4f, 0x46, 0xe5)));

		let arrow = ShapePreset::Arrow.entity();
		let EntityData::Shape(shape) = &arrow.data else { panic!("expected a shape") };
		assert_eq!(shape.kind(), ShapeKind::Path);
		assert_eq!(arrow.local_size(), DVec2::new(50., 50.));

		let text = text_entity();
		assert_eq!(text.label(), "Edit me");
		assert_eq!((text.x, text.y), (100., 100.));
	}

	#[test]
	fn imported_images_are_scaled_to_width() {
		let image = DecodedImage {
			handle: "image-1".into(),
			intrinsic_width_px: 800,
			intrinsic_height_px: 400,
		};
		let entity = image_entity(&image);
		assert_eq!(entity.bounding_box(), [DVec2::ZERO, DVec2::new(200., 100.)]);
	}
}
