use crate::EditorError;

use image::RgbaImage;
use pixellab_document::entity::ImageHandle;
use pixellab_document::render::ImageSource;
use std::collections::HashMap;

/// What the image collaborator hands back after decoding: a handle plus the intrinsic size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
	pub handle: ImageHandle,
	pub intrinsic_width_px: u32,
	pub intrinsic_height_px: u32,
}

/// Owns the decoded pixels of every imported image. Documents only store the handles.
#[derive(Debug, Default, Clone)]
pub struct ImageLibrary {
	images: HashMap<ImageHandle, RgbaImage>,
	next_handle: u64,
}

impl ImageLibrary {
	pub fn new() -> Self {
		Self::default()
	}

	/// Decodes PNG, JPEG, or BMP bytes and keeps the pixels under a fresh handle.
	pub fn decode(&mut self, bytes: &[u8]) -> Result<DecodedImage, EditorError> {
		let image = image::load_from_memory(bytes)?.to_rgba8();
		if image.width() == 0 || image.height() == 0 {
			return Err(EditorError::DecodeError("the image has no pixels".into()));
		}
		Ok(self.insert(image))
	}

	/// Keeps already decoded pixels under a fresh handle.
	pub fn insert(&mut self, image: RgbaImage) -> DecodedImage {
		self.next_handle += 1;
		let handle = ImageHandle(format!("image-{}", self.next_handle));
		let decoded = DecodedImage {
			handle: handle.clone(),
			intrinsic_width_px: image.width(),
			intrinsic_height_px: image.height(),
		};
		log::debug!("Stored {}x{} image as `{handle}`", image.width(), image.height());
		self.images.insert(handle, image);
		decoded
	}

	pub fn get(&self, handle: &ImageHandle) -> Option<&RgbaImage> {
		self.images.get(handle)
	}

	pub fn contains(&self, handle: &ImageHandle) -> bool {
		self.images.contains_key(handle)
	}

	pub fn len(&self) -> usize {
		self.images.len()
	}

	pub fn is_empty(&self) -> bool {
		self.images.is_empty()
	}
}

impl ImageSource for ImageLibrary {
	fn image(&self, handle: &ImageHandle) -> Option<&RgbaImage> {
		self.get(handle)
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::test_utils::png_bytes;

	#[test]
	fn decoding_assigns_distinct_handles() {
		let mut library = ImageLibrary::new();
		let first = library.decode(&png_bytes(3, 2)).unwrap();
		let second = library.decode(&png_bytes(1, 1)).unwrap();
		assert_ne!(first.handle, second.handle);
		assert_eq!((first.intrinsic_width_px, first.intrinsic_height_px), (3, 2));
		assert!(library.contains(&first.handle));
		assert_eq!(library.image(&second.handle).map(|image| image.dimensions()), Some((1, 1)));
	}

	#[test]
	fn garbage_is_a_decode_error() {
		let mut library = ImageLibrary::new();
		assert!(matches!(library.decode(b"definitely not an image"), Err(EditorError::DecodeError(_))));
		assert!(library.is_empty());
	}
}
