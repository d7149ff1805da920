//! The persisted document: a versioned, camelCase JSON record of a scene graph.
//!
//! ```json
//! { "formatVersion": 1, "canvasWidth": 800, "canvasHeight": 600, "background": "transparent",
//!   "entities": [{ "variant": "shape", "id": 1, "zIndex": 0, "x": 150, "y": 150, ... }] }
//! ```
//!
//! Omitted optional fields take these defaults: `rotationDegrees` 0, `opacity` 1, `name` none,
//! `fillColor` and `strokeColor` none (no paint), `strokeWidthPx` 0, text `widthPx` 200,
//! image `scaleX`/`scaleY` 1.

use crate::color::Color;
use crate::consts::{DEFAULT_TEXT_BOX_WIDTH, FORMAT_VERSION};
use crate::entity::{Entity, EntityData, EntityId, ImageEntity, ShapeEntity, ShapeGeometry, TextEntity};
use crate::scene::{Background, SceneGraph};
use crate::DocumentError;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedDocument {
	format_version: u32,
	canvas_width: u32,
	canvas_height: u32,
	#[serde(with = "background_format")]
	background: Background,
	/// Lowest id the document may hand out next. Older files may omit it.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	next_id: Option<u64>,
	entities: Vec<EntityRecord>,
}

/// Read first so that a file from another version fails on its version rather than on its layout.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VersionHeader {
	format_version: u32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntityRecord {
	id: u64,
	z_index: usize,
	x: f64,
	y: f64,
	#[serde(default)]
	rotation_degrees: f64,
	#[serde(default = "full_opacity")]
	opacity: f64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	name: Option<String>,
	#[serde(flatten)]
	data: VariantRecord,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "camelCase", rename_all_fields = "camelCase")]
enum VariantRecord {
	Text {
		content: String,
		font_family: String,
		font_size_px: f64,
		#[serde(default = "default_text_width")]
		width_px: f64,
		#[serde(default)]
		fill_color: Option<Color>,
		#[serde(default)]
		stroke_color: Option<Color>,
		#[serde(default)]
		stroke_width_px: f64,
	},
	Shape {
		kind: String,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		width_px: Option<f64>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		height_px: Option<f64>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		radius_px: Option<f64>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		path_data: Option<String>,
		#[serde(default)]
		fill_color: Option<Color>,
		#[serde(default)]
		stroke_color: Option<Color>,
		#[serde(default)]
		stroke_width_px: f64,
	},
	Image {
		handle: String,
		intrinsic_width_px: u32,
		intrinsic_height_px: u32,
		#[serde(default = "unit_scale")]
		scale_x: f64,
		#[serde(default = "unit_scale")]
		scale_y: f64,
	},
}

fn full_opacity() -> f64 {
	1.
}

fn unit_scale() -> f64 {
	1.
}

fn default_text_width() -> f64 {
	DEFAULT_TEXT_BOX_WIDTH
}

mod background_format {
	use super::*;

	pub fn serialize<S: Serializer>(background: &Background, serializer: S) -> Result<S::Ok, S::Error> {
		match background {
			Background::Transparent => serializer.serialize_str("transparent"),
			Background::Color(color) => serializer.serialize_str(&color.to_hex()),
		}
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Background, D::Error> {
		let value = String::deserialize(deserializer)?;
		if value == "transparent" {
			return Ok(Background::Transparent);
		}
		Color::from_hex(&value).map(Background::Color).ok_or_else(|| serde::de::Error::custom(format!("`{value}` is neither \"transparent\" nor a hex color")))
	}
}

impl EntityRecord {
	fn from_entity(id: EntityId, z_index: usize, entity: &Entity) -> Self {
		let data = match &entity.data {
			EntityData::Text(text) => VariantRecord::Text {
				content: text.content.clone(),
				font_family: text.font_family.clone(),
				font_size_px: text.font_size_px,
				width_px: text.width_px,
				fill_color: text.fill_color,
				stroke_color: text.stroke_color,
				stroke_width_px: text.stroke_width_px,
			},
			EntityData::Shape(shape) => {
				let (mut width_px, mut height_px, mut radius_px, mut path_data) = (None, None, None, None);
				match &shape.geometry {
					ShapeGeometry::Rectangle { width_px: w, height_px: h } | ShapeGeometry::Triangle { width_px: w, height_px: h } => {
						width_px = Some(*w);
						height_px = Some(*h);
					}
					ShapeGeometry::Circle { radius_px: r } => radius_px = Some(*r),
					ShapeGeometry::Path { path_data: d } => path_data = Some(d.clone()),
				}
				VariantRecord::Shape {
					kind: shape.kind().as_str().to_string(),
					width_px,
					height_px,
					radius_px,
					path_data,
					fill_color: shape.fill_color,
					stroke_color: shape.stroke_color,
					stroke_width_px: shape.stroke_width_px,
				}
			}
			EntityData::Image(image) => VariantRecord::Image {
				handle: image.handle.0.clone(),
				intrinsic_width_px: image.intrinsic_width_px,
				intrinsic_height_px: image.intrinsic_height_px,
				scale_x: image.scale_x,
				scale_y: image.scale_y,
			},
		};

		Self {
			id: id.0,
			z_index,
			x: entity.x,
			y: entity.y,
			rotation_degrees: entity.rotation_degrees,
			opacity: entity.opacity,
			name: entity.name.clone(),
			data,
		}
	}

	/// Builds the entity. Domain checks happen when it is inserted into the graph.
	fn into_entity(self) -> Result<(EntityId, Entity), DocumentError> {
		let id = EntityId(self.id);
		let missing = |field: &str| DocumentError::CorruptDocument(format!("entity {id} is missing `{field}`"));

		let data = match self.data {
			VariantRecord::Text {
				content,
				font_family,
				font_size_px,
				width_px,
				fill_color,
				stroke_color,
				stroke_width_px,
			} => EntityData::Text(TextEntity {
				content,
				font_family,
				font_size_px,
				width_px,
				fill_color,
				stroke_color,
				stroke_width_px,
			}),
			VariantRecord::Shape {
				kind,
				width_px,
				height_px,
				radius_px,
				path_data,
				fill_color,
				stroke_color,
				stroke_width_px,
			} => {
				let allowed: &[&str] = match kind.as_str() {
					"rectangle" | "triangle" => &["widthPx", "heightPx"],
					"circle" => &["radiusPx"],
					"path" => &["pathData"],
					_ => &[],
				};
				let present = [
					("widthPx", width_px.is_some()),
					("heightPx", height_px.is_some()),
					("radiusPx", radius_px.is_some()),
					("pathData", path_data.is_some()),
				];
				if let Some((field, _)) = present.iter().find(|(field, set)| *set && !allowed.contains(field)) {
					return Err(DocumentError::CorruptDocument(format!("entity {id} is a `{kind}` shape but has `{field}`")));
				}

				let geometry = match kind.as_str() {
					"rectangle" => ShapeGeometry::Rectangle {
						width_px: width_px.ok_or_else(|| missing("widthPx"))?,
						height_px: height_px.ok_or_else(|| missing("heightPx"))?,
					},
					"triangle" => ShapeGeometry::Triangle {
						width_px: width_px.ok_or_else(|| missing("widthPx"))?,
						height_px: height_px.ok_or_else(|| missing("heightPx"))?,
					},
					"circle" => ShapeGeometry::Circle {
						radius_px: radius_px.ok_or_else(|| missing("radiusPx"))?,
					},
					"path" => ShapeGeometry::Path {
						path_data: path_data.ok_or_else(|| missing("pathData"))?,
					},
					other => return Err(DocumentError::CorruptDocument(format!("entity {id} has unknown shape kind `{other}`"))),
				};
				EntityData::Shape(ShapeEntity {
					geometry,
					fill_color,
					stroke_color,
					stroke_width_px,
				})
			}
			VariantRecord::Image {
				handle,
				intrinsic_width_px,
				intrinsic_height_px,
				scale_x,
				scale_y,
			} => EntityData::Image(ImageEntity {
				handle: handle.into(),
				intrinsic_width_px,
				intrinsic_height_px,
				scale_x,
				scale_y,
			}),
		};

		let entity = Entity {
			name: self.name.filter(|name| !name.is_empty()),
			x: self.x,
			y: self.y,
			rotation_degrees: self.rotation_degrees,
			opacity: self.opacity,
			data,
		};
		Ok((id, entity))
	}
}

/// Serializes the whole scene graph, entities in paint order.
pub fn encode(graph: &SceneGraph) -> Result<Vec<u8>, DocumentError> {
	let document = PersistedDocument {
		format_version: FORMAT_VERSION,
		canvas_width: graph.canvas_width(),
		canvas_height: graph.canvas_height(),
		background: graph.background(),
		next_id: Some(graph.next_id().0),
		entities: graph.entities().enumerate().map(|(z_index, (id, entity))| EntityRecord::from_entity(id, z_index, entity)).collect(),
	};
	serde_json::to_vec(&document).map_err(|err| DocumentError::CorruptDocument(format!("failed to encode the document: {err}")))
}

/// Rebuilds a scene graph from persisted bytes, applying the same validation as adding entities.
/// Every failure is reported as [`DocumentError::CorruptDocument`].
pub fn decode(bytes: &[u8]) -> Result<SceneGraph, DocumentError> {
	let header: VersionHeader = serde_json::from_slice(bytes).map_err(|err| DocumentError::CorruptDocument(format!("unreadable document: {err}")))?;
	if header.format_version != FORMAT_VERSION {
		return Err(DocumentError::CorruptDocument(format!(
			"unsupported format version {} (expected {FORMAT_VERSION})",
			header.format_version
		)));
	}

	let document: PersistedDocument = serde_json::from_slice(bytes).map_err(|err| DocumentError::CorruptDocument(err.to_string()))?;
	if document.canvas_width == 0 || document.canvas_height == 0 {
		return Err(DocumentError::CorruptDocument(format!("canvas size {}x{} is empty", document.canvas_width, document.canvas_height)));
	}

	let mut records = document.entities;
	records.sort_by_key(|record| record.z_index);
	if let Some((expected, record)) = records.iter().enumerate().find(|(expected, record)| record.z_index != *expected) {
		return Err(DocumentError::CorruptDocument(format!("zIndex {} of entity {} leaves a gap or duplicate at {expected}", record.z_index, record.id)));
	}

	let mut graph = SceneGraph::new(document.canvas_width, document.canvas_height).with_background(document.background);
	for record in records {
		let (id, entity) = record.into_entity()?;
		graph.insert_with_id(id, entity).map_err(|err| DocumentError::CorruptDocument(format!("entity {id}: {err}")))?;
	}
	if let Some(next_id) = document.next_id {
		graph.reserve_ids_below(EntityId(next_id));
	}

	log::trace!("Decoded a {}x{} document with {} entities", graph.canvas_width(), graph.canvas_height(), graph.len());
	Ok(graph)
}
