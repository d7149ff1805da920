use crate::preferences::EditorPreferences;
use crate::session::DocumentSession;

use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

pub fn init_logger() {
	let _ = env_logger::builder().is_test(true).try_init();
}

/// A 40x30 session exported at twice its size, small enough to rasterize quickly.
pub fn small_session() -> DocumentSession {
	init_logger();
	let preferences = EditorPreferences {
		canvas_width: 40,
		canvas_height: 30,
		export_scale_multiplier: 2.,
		..Default::default()
	};
	DocumentSession::new(&preferences).expect("default preferences produce a session")
}

/// PNG file data for an opaque red image.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
	let image = RgbaImage::from_pixel(width, height, Rgba([255, 0, 0, 255]));
	let mut bytes = Vec::new();
	image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).expect("encoding a PNG in memory");
	bytes
}

