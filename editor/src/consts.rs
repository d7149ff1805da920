use pixellab_document::Color;

// DOCUMENT
pub const DEFAULT_PROJECT_NAME: &str = "My Design";
pub const FILE_EXTENSION: &str = "pixellab";
/// Oldest checkpoints are evicted past this length.
pub const MAX_UNDO_HISTORY_LEN: usize = 100;

// EXPORT
pub const DEFAULT_EXPORT_SCALE_MULTIPLIER: f64 = 2.;

// TEXT PRESET
pub const TEXT_PRESET_CONTENT: &str = "Edit me";
pub const TEXT_PRESET_POSITION: (f64, f64) = (100., 100.);
pub const TEXT_PRESET_FONT_FAMILY: &str = "Arial";
pub const TEXT_PRESET_FONT_SIZE_PX: f64 = 24.;
pub const TEXT_PRESET_FILL: Color = Color::BLACK;

// SHAPE PRESETS
pub const SHAPE_PRESET_POSITION: (f64, f64) = (150., 150.);
pub const RECTANGLE_PRESET_SIZE_PX: f64 = 100.;
pub const RECTANGLE_PRESET_FILL: Color = Color::from_rgb8(0x4f, 0x46, 0xe5);
pub const CIRCLE_PRESET_RADIUS_PX: f64 = 50.;
pub const CIRCLE_PRESET_FILL: Color = Color::from_rgb8(0xec, 0x48, 0x99);
pub const TRIANGLE_PRESET_SIZE_PX: f64 = 100.;
pub const TRIANGLE_PRESET_FILL: Color = Color::from_rgb8(0x0e, 0xa5, 0xe9);
pub const ARROW_PRESET_PATH: &str = "M 0 0 L 50 50 L 40 50 L 50 40 Z";
pub const ARROW_PRESET_POSITION: (f64, f64) = (100., 100.);
pub const ARROW_PRESET_FILL: Color = Color::from_rgb8(0x10, 0xb9, 0x81);

// IMAGE IMPORT
/// Imported images are scaled uniformly to this displayed width.
pub const IMPORTED_IMAGE_WIDTH_PX: f64 = 200.;

// FONTS
pub const BUILTIN_FONT_FAMILIES: [&str; 5] = ["Arial", "Helvetica", "Times New Roman", "Georgia", "Courier New"];
pub const FONT_FILE_EXTENSIONS: [&str; 2] = ["ttf", "otf"];

// PROJECT STORE
pub const PROJECT_INDEX_FILE_NAME: &str = "pixellab-projects.json";
