use crate::consts::{BUILTIN_FONT_FAMILIES, FONT_FILE_EXTENSIONS};
use crate::EditorError;

use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
	/// Provided by the platform, always available to the text shaping subsystem.
	Builtin,
	/// TrueType or OpenType file data uploaded by the user.
	Loaded(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFamily {
	pub name: String,
	pub source: FontSource,
}

/// Every font family a text entity may reference, in the order they are listed in the font picker.
#[derive(Debug, Clone)]
pub struct FontLibrary {
	fonts: Vec<FontFamily>,
}

impl Default for FontLibrary {
	fn default() -> Self {
		let fonts = BUILTIN_FONT_FAMILIES
			.iter()
			.map(|name| FontFamily {
				name: name.to_string(),
				source: FontSource::Builtin,
			})
			.collect();
		Self { fonts }
	}
}

impl FontLibrary {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn contains(&self, name: &str) -> bool {
		self.fonts.iter().any(|font| font.name == name)
	}

	pub fn families(&self) -> impl Iterator<Item = &str> {
		self.fonts.iter().map(|font| font.name.as_str())
	}

	pub fn get(&self, name: &str) -> Option<&FontFamily> {
		self.fonts.iter().find(|font| font.name == name)
	}

	/// File data of every uploaded font, in registration order.
	pub fn loaded_font_data(&self) -> impl Iterator<Item = &[u8]> {
		self.fonts.iter().filter_map(|font| match &font.source {
			FontSource::Loaded(bytes) => Some(bytes.as_slice()),
			FontSource::Builtin => None,
		})
	}

	/// Registers `bytes` under `name` once they parse as a font. On success `name` may be used as a `fontFamily`.
	pub fn register(&mut self, name: &str, bytes: Vec<u8>) -> Result<(), EditorError> {
		let name = name.trim();
		if name.is_empty() {
			return Err(EditorError::FontLoadError("a font name is required".into()));
		}
		if self.contains(name) {
			return Err(EditorError::FontLoadError(format!("a font named `{name}` is already loaded")));
		}
		skrifa::FontRef::new(&bytes).map_err(|err| EditorError::FontLoadError(format!("`{name}` is not a TrueType or OpenType font: {err}")))?;

		log::info!("Registered font `{name}` ({} bytes)", bytes.len());
		self.fonts.push(FontFamily {
			name: name.to_string(),
			source: FontSource::Loaded(bytes),
		});
		Ok(())
	}

	/// Registers an uploaded font file, naming it after the file when no name is given. Returns the registered name.
	pub fn register_file(&mut self, file_name: &str, name: Option<&str>, bytes: Vec<u8>) -> Result<String, EditorError> {
		let path = Path::new(file_name);
		let extension = path.extension().and_then(|extension| extension.to_str()).map(str::to_ascii_lowercase).unwrap_or_default();
		if !FONT_FILE_EXTENSIONS.contains(&extension.as_str()) {
			return Err(EditorError::FontLoadError(format!("`{file_name}` is not a TTF or OTF font file")));
		}

		let name = match name.map(str::trim).filter(|name| !name.is_empty()) {
			Some(name) => name.to_string(),
			None => path.file_stem().and_then(|stem| stem.to_str()).unwrap_or_default().to_string(),
		};
		self.register(&name, bytes)?;
		Ok(name)
	}
}
