//! Flattened image export. The graph is drawn through [`SvgSurface`] and the markup is rendered with resvg.

use super::{SvgSurface, render};
use crate::consts::{RASTER_MAX_DIMENSION, RASTER_MAX_PIXELS};
use crate::entity::{EntityData, ImageHandle};
use crate::scene::SceneGraph;
use crate::DocumentError;

use image::{DynamicImage, ImageFormat, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;
use usvg::{ImageHrefResolver, ImageKind, ImageRendering};

/// Resolves image handles to decoded pixels.
pub trait ImageSource {
	fn image(&self, handle: &ImageHandle) -> Option<&RgbaImage>;
}

impl ImageSource for HashMap<ImageHandle, RgbaImage> {
	fn image(&self, handle: &ImageHandle) -> Option<&RgbaImage> {
		self.get(handle)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RasterFormat {
	#[default]
	Png,
	/// No alpha channel, so transparent areas come out black.
	Jpeg,
	Bmp,
}

impl RasterFormat {
	pub fn extension(&self) -> &'static str {
		match self {
			RasterFormat::Png => "png",
			RasterFormat::Jpeg => "jpg",
			RasterFormat::Bmp => "bmp",
		}
	}

	pub fn mime_type(&self) -> &'static str {
		match self {
			RasterFormat::Png => "image/png",
			RasterFormat::Jpeg => "image/jpeg",
			RasterFormat::Bmp => "image/bmp",
		}
	}

	fn image_format(&self) -> ImageFormat {
		match self {
			RasterFormat::Png => ImageFormat::Png,
			RasterFormat::Jpeg => ImageFormat::Jpeg,
			RasterFormat::Bmp => ImageFormat::Bmp,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportOptions {
	/// Output pixels per document pixel. Must be at least 1.
	pub scale_multiplier: f64,
	pub format: RasterFormat,
}

impl Default for ExportOptions {
	fn default() -> Self {
		Self {
			scale_multiplier: 1.,
			format: RasterFormat::Png,
		}
	}
}

/// The output size in pixels, or why the graph cannot be exported at `scale`.
fn output_size(graph: &SceneGraph, scale: f64) -> Result<(u32, u32), DocumentError> {
	if !scale.is_finite() || scale < 1. {
		return Err(DocumentError::invalid_value("scaleMultiplier", format!("{scale} must be at least 1")));
	}
	let width = (graph.canvas_width() as f64 * scale).round();
	let height = (graph.canvas_height() as f64 * scale).round();
	if width > RASTER_MAX_DIMENSION as f64 || height > RASTER_MAX_DIMENSION as f64 {
		return Err(DocumentError::ExportFailed(format!("{width}x{height} exceeds the largest exportable size of {RASTER_MAX_DIMENSION}px per side")));
	}
	if width * height > RASTER_MAX_PIXELS as f64 {
		return Err(DocumentError::ExportFailed(format!("{width}x{height} exceeds the largest exportable area of {RASTER_MAX_PIXELS} pixels")));
	}
	Ok((width as u32, height as u32))
}

/// PNG data for every image the graph references and `images` can resolve, keyed by handle.
fn encoded_images(graph: &SceneGraph, images: &dyn ImageSource) -> Result<HashMap<String, Arc<Vec<u8>>>, DocumentError> {
	let mut encoded = HashMap::new();
	for (_, entity) in graph.entities() {
		let EntityData::Image(image) = &entity.data else { continue };
		if encoded.contains_key(&image.handle.0) {
			continue;
		}
		let Some(pixels) = images.image(&image.handle) else {
			log::warn!("Skipping image `{}` during export because its pixels are not available", image.handle);
			continue;
		};
		let mut bytes = Vec::new();
		pixels
			.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
			.map_err(|err| DocumentError::ExportFailed(format!("image `{}`: {err}", image.handle)))?;
		encoded.insert(image.handle.0.clone(), Arc::new(bytes));
	}
	Ok(encoded)
}

fn parse_options<'a>(fonts: &[&[u8]], encoded_images: HashMap<String, Arc<Vec<u8>>>) -> usvg::Options<'a> {
	let mut options = usvg::Options::default();
	options.image_rendering = ImageRendering::OptimizeSpeed;
	options.image_href_resolver = ImageHrefResolver {
		resolve_data: ImageHrefResolver::default_data_resolver(),
		resolve_string: Box::new(move |href: &str, _: &usvg::Options| encoded_images.get(href).cloned().map(ImageKind::PNG)),
	};

	let database = options.fontdb_mut();
	for font in fonts {
		database.load_font_data(font.to_vec());
	}
	database.load_system_fonts();

	// Families that are not installed fall back to the generic families, so point those at a face that exists
	let fallback = database.faces().find_map(|face| face.families.first().map(|(name, _)| name.clone()));
	match fallback {
		Some(family) => {
			database.set_serif_family(family.clone());
			database.set_sans_serif_family(family.clone());
			options.font_family = family;
		}
		None => log::warn!("No fonts are available, so text will be missing from the export"),
	}
	options
}

/// Paints the whole graph at `scale` device pixels per document pixel.
///
/// Text uses `fonts` (raw TrueType or OpenType data) and the fonts installed on the system.
/// Images that `images` cannot resolve are skipped.
pub fn rasterize(graph: &SceneGraph, scale: f64, images: &dyn ImageSource, fonts: &[&[u8]]) -> Result<RgbaImage, DocumentError> {
	let (width, height) = output_size(graph, scale)?;

	let mut surface = SvgSurface::new();
	render(graph, scale, &mut surface);
	let svg = surface.finish();

	let options = parse_options(fonts, encoded_images(graph, images)?);
	let tree = usvg::Tree::from_str(&svg, &options).map_err(|err| DocumentError::ExportFailed(err.to_string()))?;
	let mut pixmap = Pixmap::new(width, height).ok_or_else(|| DocumentError::ExportFailed(format!("cannot allocate a {width}x{height} image")))?;
	resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());

	let bytes = pixmap
		.pixels()
		.iter()
		.flat_map(|pixel| {
			let color = pixel.demultiply();
			[color.red(), color.green(), color.blue(), color.alpha()]
		})
		.collect();
	RgbaImage::from_raw(width, height, bytes).ok_or_else(|| DocumentError::ExportFailed("the rendered image has the wrong size".into()))
}

/// Composites the whole graph at `options.scale_multiplier` and encodes it in the requested format.
/// The output only depends on the graph, the options, the image pixels and the available fonts.
pub fn export_raster(graph: &SceneGraph, options: &ExportOptions, images: &dyn ImageSource, fonts: &[&[u8]]) -> Result<Vec<u8>, DocumentError> {
	let image = rasterize(graph, options.scale_multiplier, images, fonts)?;
	log::info!("Exporting a {}x{} {} image", image.width(), image.height(), options.format.extension());
	encode_image(image, options.format)
}

fn encode_image(image: RgbaImage, format: RasterFormat) -> Result<Vec<u8>, DocumentError> {
	let mut bytes = Vec::new();
	let image = match format {
		RasterFormat::Jpeg => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(image).to_rgb8()),
		RasterFormat::Png | RasterFormat::Bmp => DynamicImage::ImageRgba8(image),
	};
	image.write_to(&mut Cursor::new(&mut bytes), format.image_format()).map_err(|err| DocumentError::ExportFailed(err.to_string()))?;
	Ok(bytes)
}
