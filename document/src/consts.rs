// PERSISTED DOCUMENT
/// Bumped whenever the persisted document layout changes. Decoders reject every other version.
pub const FORMAT_VERSION: u32 = 1;

// CANVAS
pub const DEFAULT_CANVAS_WIDTH: u32 = 800;
pub const DEFAULT_CANVAS_HEIGHT: u32 = 600;

// TEXT
/// Height of one text line as a multiple of the font size.
pub const TEXT_LINE_HEIGHT: f64 = 1.16;
pub const DEFAULT_TEXT_BOX_WIDTH: f64 = 200.;

// RASTER EXPORT
/// Largest side length, in pixels, of an exported raster.
pub const RASTER_MAX_DIMENSION: u32 = 16_384;
/// Largest pixel count of an exported raster, 256 MiB of RGBA.
pub const RASTER_MAX_PIXELS: u64 = 8192 * 8192;
