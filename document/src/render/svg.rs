use super::{DrawCommand, Paint, RenderSurface};
use crate::color::Color;
use crate::scene::Background;

use glam::DAffine2;
use std::fmt::Write;

const OPACITY_PRECISION: usize = 3;

fn format_opacity(attribute: &str, opacity: f64) -> String {
	if (opacity - 1.).abs() > 10_f64.powi(-(OPACITY_PRECISION as i32)) {
		format!(r#" {attribute}="{opacity:.precision$}""#, precision = OPACITY_PRECISION)
	} else {
		String::new()
	}
}

fn format_paint(name: &str, color: Option<Color>) -> String {
	match color {
		Some(color) => format!(r##" {name}="#{}"{}"##, color.rgb_hex(), format_opacity(&format!("{name}-opacity"), color.alpha_f64())),
		None => format!(r#" {name}="none""#),
	}
}

fn format_matrix(transform: DAffine2) -> String {
	// Adding zero turns `-0` into `0`
	transform.to_cols_array().iter().map(|entry| (entry + 0.).to_string()).collect::<Vec<_>>().join(",")
}

fn escape(text: &str) -> String {
	let mut escaped = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			_ => escaped.push(c),
		}
	}
	escaped
}

/// Renders draw commands as a standalone SVG document. Images reference their handle as the `href`.
#[derive(Debug, Default, Clone)]
pub struct SvgSurface {
	svg: String,
}

impl SvgSurface {
	pub fn new() -> Self {
		Self::default()
	}

	/// Closes the document and returns the markup.
	pub fn finish(mut self) -> String {
		self.svg.push_str("</svg>");
		self.svg
	}
}

impl RenderSurface for SvgSurface {
	fn begin(&mut self, width: u32, height: u32, background: Background) {
		self.svg.clear();
		let _ = write!(
			self.svg,
			r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
		);
		if let Background::Color(color) = background {
			let _ = write!(self.svg, r#"<rect width="{width}" height="{height}"{} />"#, format_paint("fill", Some(color)));
		}
	}

	fn draw(&mut self, command: &DrawCommand) {
		if !command.transform.inverse().is_finite() {
			let _ = write!(self.svg, "<!-- Entity {} has an invalid transform -->", command.entity);
			return;
		}

		let matrix = format_matrix(command.transform);
		let opacity = format_opacity("opacity", command.opacity);

		match &command.paint {
			Paint::Fill { outline, color } => {
				let _ = write!(self.svg, r#"<path d="{}" transform="matrix({matrix})"{}{opacity} />"#, outline.to_svg(), format_paint("fill", Some(*color)));
			}
			Paint::Stroke { outline, color, width_px } => {
				let _ = write!(
					self.svg,
					r#"<path d="{}" transform="matrix({matrix})" fill="none"{} stroke-width="{width_px}"{opacity} />"#,
					outline.to_svg(),
					format_paint("stroke", Some(*color)),
				);
			}
			Paint::Text {
				content,
				font_family,
				font_size_px,
				line_height_px,
				fill_color,
				stroke,
				..
			} => {
				let stroke = match stroke {
					Some((color, width)) => format!(r#"{} stroke-width="{width}""#, format_paint("stroke", Some(*color))),
					None => String::new(),
				};
				let _ = write!(
					self.svg,
					r#"<text transform="matrix({matrix})" font-family="{}" font-size="{font_size_px}"{}{stroke}{opacity}>"#,
					escape(font_family),
					format_paint("fill", *fill_color),
				);
				for (index, line) in content.split('\n').enumerate() {
					let baseline = font_size_px + index as f64 * line_height_px;
					let _ = write!(self.svg, r#"<tspan x="0" y="{baseline}">{}</tspan>"#, escape(line));
				}
				self.svg.push_str("</text>");
			}
			Paint::Image { handle, width_px, height_px } => {
				let _ = write!(
					self.svg,
					r#"<image width="{width_px}" height="{height_px}" preserveAspectRatio="none" transform="matrix({matrix})" href="{}"{opacity} />"#,
					escape(&handle.0)
				);
			}
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::entity::{Entity, ShapeEntity, TextEntity};
	use crate::render::render;
	use crate::SceneGraph;

	#[test]
	fn shapes_and_text_become_svg_elements() {
		let mut graph = SceneGraph::new(100, 50).with_background(Background::Color(Color::WHITE));
		graph.add_entity(Entity::shape(ShapeEntity::rectangle(10., 10., Color::from_rgb8(0x4f, 0x46, 0xe5))).at(5., 5.)).unwrap();
		let mut text = Entity::text(TextEntity::new("a < b\nc", "Arial", 10.));
		text.opacity = 0.5;
		graph.add_entity(text).unwrap();

		let mut surface = SvgSurface::new();
		render(&graph, 1., &mut surface);
		let svg = surface.finish();

		assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="50""#));
		assert!(svg.contains(r##"<rect width="100" height="50" fill="#ffffff" />"##));
		assert!(svg.contains(r##"fill="#4f46e5""##));
		assert!(svg.contains("transform=\"matrix(1,0,0,1,5,5)\""));
		assert!(svg.contains("<tspan x=\"0\" y=\"10\">a &lt; b</tspan>"));
		assert!(svg.contains(r#" opacity="0.500""#));
		assert!(svg.ends_with("</svg>"));
	}

	#[test]
	fn translucent_colors_get_an_opacity_attribute() {
		assert_eq!(format_paint("fill", Some(Color::from_rgba8(0, 0, 0, 0))), r##" fill="#000000" fill-opacity="0.000""##);
		assert_eq!(format_paint("stroke", None), r#" stroke="none""#);
	}
}
