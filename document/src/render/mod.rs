//! Turns a scene graph into draw commands for a [`RenderSurface`].
//!
//! The scene graph does not paint anything itself. Renderers walk [`draw_commands`] in paint order,
//! which keeps the document free of any view state.

pub mod raster;
pub mod svg;

pub use raster::{export_raster, rasterize, ExportOptions, ImageSource, RasterFormat};
pub use svg::SvgSurface;

use crate::color::Color;
use crate::consts::TEXT_LINE_HEIGHT;
use crate::entity::{EntityData, EntityGeometry, EntityId, ImageHandle};
use crate::scene::{Background, SceneGraph};

use glam::{DAffine2, DVec2};
use kurbo::{Affine, BezPath};

pub(crate) fn glam_to_kurbo(transform: DAffine2) -> Affine {
	Affine::new(transform.to_cols_array())
}

/// What one draw command paints, in the entity's local space.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
	Fill {
		outline: BezPath,
		color: Color,
	},
	Stroke {
		outline: BezPath,
		color: Color,
		width_px: f64,
	},
	/// Glyph shaping and layout is left to the surface.
	Text {
		content: String,
		font_family: String,
		font_size_px: f64,
		box_width_px: f64,
		line_height_px: f64,
		fill_color: Option<Color>,
		stroke: Option<(Color, f64)>,
	},
	/// The image covers the local box `(0, 0)` to `(width_px, height_px)`.
	Image {
		handle: ImageHandle,
		width_px: u32,
		height_px: u32,
	},
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
	pub entity: EntityId,
	/// Local space to device space, including the output scale.
	pub transform: DAffine2,
	pub opacity: f64,
	pub paint: Paint,
}

/// A target that draws commands. Commands arrive bottom first.
pub trait RenderSurface {
	/// Called once before any command, with the device size of the output.
	fn begin(&mut self, width: u32, height: u32, background: Background);

	fn draw(&mut self, command: &DrawCommand);
}

/// The commands that paint `graph` at `scale` device pixels per document pixel, in paint order.
/// A shape produces its fill followed by its stroke; entities with nothing to paint produce nothing.
pub fn draw_commands(graph: &SceneGraph, scale: f64) -> Vec<DrawCommand> {
	let output_scale = DAffine2::from_scale(DVec2::splat(scale));
	let mut commands = Vec::with_capacity(graph.len());

	for (id, entity) in graph.entities() {
		let transform = output_scale * entity.transform();
		let command = |paint| DrawCommand {
			entity: id,
			transform,
			opacity: entity.opacity,
			paint,
		};

		match &entity.data {
			EntityData::Shape(shape) => {
				let outline = shape.outline();
				if let Some(color) = shape.fill_color {
					commands.push(command(Paint::Fill { outline: outline.clone(), color }));
				}
				if let Some(color) = shape.stroke_color.filter(|_| shape.stroke_width_px > 0.) {
					commands.push(command(Paint::Stroke {
						outline,
						color,
						width_px: shape.stroke_width_px,
					}));
				}
			}
			EntityData::Text(text) => {
				let stroke = text.stroke_color.filter(|_| text.stroke_width_px > 0.).map(|color| (color, text.stroke_width_px));
				if text.content.is_empty() || (text.fill_color.is_none() && stroke.is_none()) {
					continue;
				}
				commands.push(command(Paint::Text {
					content: text.content.clone(),
					font_family: text.font_family.clone(),
					font_size_px: text.font_size_px,
					box_width_px: text.width_px,
					line_height_px: text.font_size_px * TEXT_LINE_HEIGHT,
					fill_color: text.fill_color,
					stroke,
				}));
			}
			EntityData::Image(image) => commands.push(command(Paint::Image {
				handle: image.handle.clone(),
				width_px: image.intrinsic_width_px,
				height_px: image.intrinsic_height_px,
			})),
		}
	}

	commands
}

/// Drives `surface` through the whole graph.
pub fn render(graph: &SceneGraph, scale: f64, surface: &mut impl RenderSurface) {
	let width = (graph.canvas_width() as f64 * scale).round() as u32;
	let height = (graph.canvas_height() as f64 * scale).round() as u32;
	surface.begin(width, height, graph.background());
	for command in draw_commands(graph, scale) {
		surface.draw(&command);
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::entity::{Entity, ImageEntity, PropertyKey, ShapeEntity, TextEntity};

	#[test]
	fn commands_follow_paint_order() {
		let mut graph = SceneGraph::default();
		let image = graph.add_entity(Entity::image(ImageEntity::new("photo".into(), 10, 10))).unwrap();
		let rect = graph.add_entity(Entity::shape(ShapeEntity::rectangle(10., 10., Color::BLACK))).unwrap();
		graph.set_property(rect, PropertyKey::StrokeColor, Color::WHITE.into()).unwrap();
		graph.set_property(rect, PropertyKey::StrokeWidthPx, 2.0.into()).unwrap();

		let commands = draw_commands(&graph, 1.);
		let order: Vec<_> = commands.iter().map(|command| command.entity).collect();
		assert_eq!(order, vec![image, rect, rect]);
		assert!(matches!(commands[1].paint, Paint::Fill { .. }));
		assert!(matches!(commands[2].paint, Paint::Stroke { width_px, .. } if width_px == 2.));
	}

	#[test]
	fn scale_applies_to_the_device_transform() {
		let mut graph = SceneGraph::default();
		graph.add_entity(Entity::shape(ShapeEntity::rectangle(10., 10., Color::BLACK)).at(5., 5.)).unwrap();
		let commands = draw_commands(&graph, 2.);
		assert_eq!(commands[0].transform.transform_point2(DVec2::new(10., 10.)), DVec2::new(30., 30.));
	}

	#[test]
	fn invisible_entities_are_skipped() {
		let mut graph = SceneGraph::default();
		let mut shape = ShapeEntity::rectangle(10., 10., Color::BLACK);
		shape.fill_color = None;
		shape.stroke_color = Some(Color::BLACK);
		graph.add_entity(Entity::shape(shape)).unwrap();
		graph.add_entity(Entity::text(TextEntity::new("", "Arial", 12.))).unwrap();
		assert!(draw_commands(&graph, 1.).is_empty());
	}
}
