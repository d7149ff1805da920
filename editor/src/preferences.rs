use crate::consts::{DEFAULT_EXPORT_SCALE_MULTIPLIER, DEFAULT_PROJECT_NAME, MAX_UNDO_HISTORY_LEN};
use crate::EditorError;

use pixellab_document::consts::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH};
use pixellab_document::render::RasterFormat;
use pixellab_document::scene::Background;
use pixellab_document::Color;
use serde::{Deserialize, Serialize};

/// User preferences for new sessions. Missing fields fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorPreferences {
	pub max_undo_history_len: usize,
	pub canvas_width: u32,
	pub canvas_height: u32,
	/// `None` is a transparent canvas.
	pub background_color: Option<Color>,
	pub project_name: String,
	pub export_scale_multiplier: f64,
	pub export_format: RasterFormat,
}

impl Default for EditorPreferences {
	fn default() -> Self {
		Self {
			max_undo_history_len: MAX_UNDO_HISTORY_LEN,
			canvas_width: DEFAULT_CANVAS_WIDTH,
			canvas_height: DEFAULT_CANVAS_HEIGHT,
			background_color: None,
			project_name: DEFAULT_PROJECT_NAME.to_string(),
			export_scale_multiplier: DEFAULT_EXPORT_SCALE_MULTIPLIER,
			export_format: RasterFormat::Png,
		}
	}
}

impl EditorPreferences {
	pub fn from_json(json: &str) -> Result<Self, EditorError> {
		let value: serde_json::Value = serde_json::from_str(json).map_err(|err| EditorError::Preferences(err.to_string()))?;
		// A sequence would otherwise fill the fields positionally
		if !value.is_object() {
			return Err(EditorError::Preferences("preferences must be a JSON object".into()));
		}
		let preferences: Self = serde_json::from_value(value).map_err(|err| EditorError::Preferences(err.to_string()))?;
		preferences.validate()?;
		Ok(preferences)
	}

	pub fn to_json(&self) -> Result<String, EditorError> {
		serde_json::to_string_pretty(self).map_err(|err| EditorError::Preferences(err.to_string()))
	}

	pub fn background(&self) -> Background {
		self.background_color.map_or(Background::Transparent, Background::Color)
	}

	fn validate(&self) -> Result<(), EditorError> {
		if self.max_undo_history_len == 0 {
			return Err(EditorError::Preferences("maxUndoHistoryLen must be at least 1".into()));
		}
		if self.canvas_width == 0 || self.canvas_height == 0 {
			return Err(EditorError::Preferences(format!("the canvas size {}x{} is empty", self.canvas_width, self.canvas_height)));
		}
		if !(self.export_scale_multiplier.is_finite() && self.export_scale_multiplier >= 1.) {
			return Err(EditorError::Preferences(format!("exportScaleMultiplier {} must be at least 1", self.export_scale_multiplier)));
		}
		Ok(())
	}
}
