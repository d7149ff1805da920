use crate::fonts::FontLibrary;
use crate::history::History;
use crate::images::{DecodedImage, ImageLibrary};
use crate::preferences::EditorPreferences;
use crate::presets::{self, ShapePreset};
use crate::project_store::{ProjectId, ProjectStore};
use crate::EditorError;

use glam::DVec2;
use pixellab_document::codec;
use pixellab_document::entity::{Entity, PropertyKey, PropertyValue};
use pixellab_document::render::{self, ExportOptions, SvgSurface};
use pixellab_document::scene::ReorderDirection;
use pixellab_document::{DocumentError, DocumentResponse, EntityId, Operation, SceneGraph};

/// One row of the layer panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerPanelEntry {
	pub id: EntityId,
	pub label: String,
	/// `"text"`, `"shape"` or `"image"`.
	pub kind: &'static str,
	pub selected: bool,
}

/// An open document: the scene graph together with its history, selection, imported images and loaded fonts.
///
/// Every mutation goes through [`DocumentSession::dispatch`], which applies the operation and records exactly one checkpoint,
/// or fails and leaves the document as it was.
#[derive(Debug, Clone)]
pub struct DocumentSession {
	name: String,
	graph: SceneGraph,
	history: History,
	selection: Option<EntityId>,
	saved_hash: Option<u64>,
	images: ImageLibrary,
	fonts: FontLibrary,
	export_options: ExportOptions,
}

impl DocumentSession {
	/// An empty document sized and named after the preferences.
	pub fn new(preferences: &EditorPreferences) -> Result<Self, EditorError> {
		let graph = SceneGraph::new(preferences.canvas_width, preferences.canvas_height).with_background(preferences.background());
		let history = History::new(&graph, preferences.max_undo_history_len)?;
		let mut session = Self {
			name: preferences.project_name.clone(),
			graph,
			history,
			selection: None,
			saved_hash: None,
			images: ImageLibrary::new(),
			fonts: FontLibrary::new(),
			export_options: ExportOptions {
				scale_multiplier: preferences.export_scale_multiplier,
				format: preferences.export_format,
			},
		};
		session.set_save_state(true);
		Ok(session)
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn set_name(&mut self, name: impl Into<String>) {
		self.name = name.into();
	}

	/// Read-only view of the live document.
	pub fn graph(&self) -> &SceneGraph {
		&self.graph
	}

	pub fn history(&self) -> &History {
		&self.history
	}

	pub fn images(&self) -> &ImageLibrary {
		&self.images
	}

	pub fn fonts(&self) -> &FontLibrary {
		&self.fonts
	}

	/// Fonts registered here are used by text entities in raster exports.
	pub fn fonts_mut(&mut self) -> &mut FontLibrary {
		&mut self.fonts
	}

	pub fn export_options(&self) -> ExportOptions {
		self.export_options
	}

	/// Applies `operation` and commits the result. Operations that change nothing return no responses and leave the history alone.
	pub fn dispatch(&mut self, operation: Operation) -> Result<Vec<DocumentResponse>, EditorError> {
		let backup = self.graph.clone();
		let Some(responses) = self.graph.handle_operation(&operation)? else {
			log::trace!("Skipped checkpoint for no-op {operation:?}");
			return Ok(Vec::new());
		};

		if let Err(err) = self.history.commit(&self.graph) {
			log::warn!("Reverting an operation whose checkpoint could not be recorded: {err}");
			self.graph = backup;
			return Err(err.into());
		}

		for response in &responses {
			if let DocumentResponse::DeletedEntity { id } = response {
				if self.selection == Some(*id) {
					self.selection = None;
				}
			}
		}
		Ok(responses)
	}

	/// Returns whether anything was undone.
	pub fn undo(&mut self) -> Result<bool, EditorError> {
		let Some(graph) = self.history.undo()? else { return Ok(false) };
		self.replace_graph(graph);
		Ok(true)
	}

	/// Returns whether anything was redone.
	pub fn redo(&mut self) -> Result<bool, EditorError> {
		let Some(graph) = self.history.redo()? else { return Ok(false) };
		self.replace_graph(graph);
		Ok(true)
	}

	pub fn can_undo(&self) -> bool {
		self.history.can_undo()
	}

	pub fn can_redo(&self) -> bool {
		self.history.can_redo()
	}

	/// Swaps in a restored checkpoint without handing out any id the live graph has already used.
	fn replace_graph(&mut self, mut graph: SceneGraph) {
		graph.reserve_ids_below(self.graph.next_id());
		self.graph = graph;
		if self.selection.is_some_and(|id| !self.graph.contains(id)) {
			self.selection = None;
		}
	}

	// SELECTION

	pub fn selected_entity(&self) -> Option<EntityId> {
		self.selection
	}

	pub fn select(&mut self, id: EntityId) -> Result<(), EditorError> {
		if !self.graph.contains(id) {
			return Err(DocumentError::NotFound(id).into());
		}
		self.selection = Some(id);
		Ok(())
	}

	/// Selects the top-most entity under `point`. Clicking empty canvas deselects.
	pub fn select_at(&mut self, point: DVec2) -> Option<EntityId> {
		self.selection = self.graph.hit_test(point);
		self.selection
	}

	pub fn deselect(&mut self) {
		self.selection = None;
	}

	fn require_selection(&self) -> Result<EntityId, EditorError> {
		self.selection.ok_or(EditorError::NoSelection)
	}

	// TOOLBAR

	/// Adds the entity on top and selects it.
	pub fn add_entity(&mut self, entity: Entity) -> Result<EntityId, EditorError> {
		let responses = self.dispatch(Operation::AddEntity { entity })?;
		let id = responses
			.iter()
			.find_map(|response| match response {
				DocumentResponse::CreatedEntity { id } => Some(*id),
				_ => None,
			})
			.ok_or_else(|| DocumentError::InvalidEntity("the entity was not created".into()))?;
		self.selection = Some(id);
		Ok(id)
	}

	pub fn add_text(&mut self) -> Result<EntityId, EditorError> {
		self.add_entity(presets::text_entity())
	}

	pub fn add_shape(&mut self, preset: ShapePreset) -> Result<EntityId, EditorError> {
		self.add_entity(preset.entity())
	}

	/// Adds an image the image collaborator has already decoded.
	pub fn import_image(&mut self, image: &DecodedImage) -> Result<EntityId, EditorError> {
		self.add_entity(presets::image_entity(image))
	}

	/// Decodes the bytes into the session's image library, then adds the image. A decode failure leaves the document untouched.
	pub fn import_image_bytes(&mut self, bytes: &[u8]) -> Result<EntityId, EditorError> {
		let image = self.images.decode(bytes)?;
		self.import_image(&image)
	}

	// PROPERTIES PANEL

	pub fn set_selected_property(&mut self, key: PropertyKey, value: impl Into<PropertyValue>) -> Result<Vec<DocumentResponse>, EditorError> {
		let id = self.require_selection()?;
		self.dispatch(Operation::SetProperty { id, key, value: value.into() })
	}

	pub fn set_selected_properties(&mut self, changes: Vec<(PropertyKey, PropertyValue)>) -> Result<Vec<DocumentResponse>, EditorError> {
		let id = self.require_selection()?;
		self.dispatch(Operation::SetProperties { id, changes })
	}

	pub fn remove_selected(&mut self) -> Result<Vec<DocumentResponse>, EditorError> {
		let id = self.require_selection()?;
		self.dispatch(Operation::RemoveEntity { id })
	}

	pub fn reorder_selected(&mut self, direction: ReorderDirection) -> Result<Vec<DocumentResponse>, EditorError> {
		let id = self.require_selection()?;
		self.dispatch(Operation::Reorder { id, direction })
	}

	// LAYER PANEL

	/// Every entity, top-most first.
	pub fn layer_panel(&self) -> Vec<LayerPanelEntry> {
		self.graph
			.entities()
			.rev()
			.map(|(id, entity)| LayerPanelEntry {
				id,
				label: entity.label(),
				kind: entity.variant_name(),
				selected: self.selection == Some(id),
			})
			.collect()
	}

	// SAVE AND LOAD

	pub fn encode(&self) -> Result<Vec<u8>, EditorError> {
		Ok(codec::encode(&self.graph)?)
	}

	/// Replaces the document with the decoded one. The history starts over and the selection is cleared.
	/// A corrupt document leaves the session untouched.
	pub fn load(&mut self, bytes: &[u8]) -> Result<(), EditorError> {
		let graph = codec::decode(bytes)?;
		self.history.reset(&graph)?;
		self.graph = graph;
		self.selection = None;
		self.set_save_state(true);
		log::info!("Loaded `{}` with {} entities", self.name, self.graph.len());
		Ok(())
	}

	pub fn save_to(&mut self, store: &mut impl ProjectStore) -> Result<ProjectId, EditorError> {
		let bytes = self.encode()?;
		let id = store.save(&self.name, &bytes)?;
		self.set_save_state(true);
		Ok(id)
	}

	pub fn load_from(&mut self, store: &impl ProjectStore, id: ProjectId) -> Result<(), EditorError> {
		let summary = store.list()?.into_iter().find(|project| project.id == id).ok_or(EditorError::ProjectNotFound(id))?;
		let bytes = store.load(id)?;
		self.load(&bytes)?;
		self.name = summary.name;
		Ok(())
	}

	pub fn is_saved(&self) -> bool {
		self.saved_hash == Some(self.history.current().identifier())
	}

	pub fn set_save_state(&mut self, is_saved: bool) {
		self.saved_hash = is_saved.then(|| self.history.current().identifier());
	}

	// EXPORT

	/// Rasterizes the document with the session's export options.
	pub fn export_raster(&self) -> Result<Vec<u8>, EditorError> {
		self.export_raster_with(&self.export_options)
	}

	pub fn export_raster_with(&self, options: &ExportOptions) -> Result<Vec<u8>, EditorError> {
		let fonts: Vec<&[u8]> = self.fonts.loaded_font_data().collect();
		Ok(render::export_raster(&self.graph, options, &self.images, &fonts)?)
	}

	pub fn export_svg(&self) -> String {
		let mut surface = SvgSurface::new();
		render::render(&self.graph, 1., &mut surface);
		surface.finish()
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::project_store::MemoryProjectStore;
	use crate::test_utils::{init_logger, png_bytes, small_session};
	use pixellab_document::render::RasterFormat;
	use pixellab_document::scene::Background;
	use pixellab_document::Color;

	#[test]
	fn reordered_scene_survives_save_and_load() {
		init_logger();
		let mut session = small_session();
		let r1 = session.add_shape(ShapePreset::Rectangle).unwrap();
		let t1 = session.add_text().unwrap();
		assert_eq!(session.graph().z_index(r1), Ok(0));
		assert_eq!(session.graph().z_index(t1), Ok(1));

		session.select(r1).unwrap();
		session.reorder_selected(ReorderDirection::Top).unwrap();
		assert_eq!(session.graph().z_index(r1), Ok(1));
		assert_eq!(session.graph().z_index(t1), Ok(0));

		let bytes = session.encode().unwrap();
		let mut reopened = small_session();
		reopened.load(&bytes).unwrap();
		assert_eq!(reopened.graph(), session.graph());
		assert_eq!(reopened.graph().entity_ids(), &[t1, r1]);
		assert!(!reopened.can_undo());
	}

	#[test]
	fn each_mutation_is_one_undo_step() {
		init_logger();
		let mut session = small_session();
		let empty = session.graph().clone();
		let rect = session.add_shape(ShapePreset::Rectangle).unwrap();
		let with_rect = session.graph().clone();
		session.set_selected_property(PropertyKey::Opacity, 0.5).unwrap();
		assert_eq!(session.history().len(), 3);

		assert!(session.undo().unwrap());
		assert_eq!(session.graph(), &with_rect);
		assert!(session.undo().unwrap());
		assert_eq!(session.graph(), &empty);
		assert!(!session.undo().unwrap());

		assert!(session.redo().unwrap());
		assert_eq!(session.graph(), &with_rect);
		assert!(session.graph().contains(rect));
	}

	#[test]
	fn removing_the_selection_clears_it() {
		let mut session = small_session();
		let circle = session.add_shape(ShapePreset::Circle).unwrap();
		assert_eq!(session.selected_entity(), Some(circle));

		let responses = session.dispatch(Operation::RemoveEntity { id: circle }).unwrap();
		assert!(responses.contains(&DocumentResponse::DeletedEntity { id: circle }));
		assert_eq!(session.selected_entity(), None);
		assert_eq!(session.remove_selected(), Err(EditorError::NoSelection));
	}

	#[test]
	fn undo_clears_a_selection_that_no_longer_exists() {
		let mut session = small_session();
		let triangle = session.add_shape(ShapePreset::Triangle).unwrap();
		session.undo().unwrap();
		assert!(!session.graph().contains(triangle));
		assert_eq!(session.selected_entity(), None);
	}

	#[test]
	fn ids_are_not_reused_after_undo() {
		let mut session = small_session();
		let first = session.add_shape(ShapePreset::Rectangle).unwrap();
		session.undo().unwrap();
		let second = session.add_shape(ShapePreset::Rectangle).unwrap();
		assert_ne!(first, second);
	}

	#[test]
	fn property_domains_are_enforced() {
		let mut session = small_session();
		let rect = session.add_shape(ShapePreset::Rectangle).unwrap();
		let before = session.graph().clone();
		let history_len = session.history().len();

		let result = session.set_selected_property(PropertyKey::Opacity, 1.5);
		assert!(matches!(result, Err(EditorError::Document(DocumentError::InvalidValue { .. }))));
		let result = session.set_selected_property(PropertyKey::FontSizePx, 24.);
		assert!(matches!(result, Err(EditorError::Document(DocumentError::InvalidProperty { .. }))));
		let result = session.dispatch(Operation::RemoveEntity { id: EntityId(rect.0 + 100) });
		assert!(matches!(result, Err(EditorError::Document(DocumentError::NotFound(_)))));

		assert_eq!(session.graph(), &before);
		assert_eq!(session.history().len(), history_len);
	}

	#[test]
	fn no_op_edits_do_not_create_checkpoints() {
		let mut session = small_session();
		session.add_shape(ShapePreset::Rectangle).unwrap();
		let history_len = session.history().len();

		assert_eq!(session.set_selected_property(PropertyKey::Opacity, 1.), Ok(Vec::new()));
		assert_eq!(session.reorder_selected(ReorderDirection::Up), Ok(Vec::new()));
		assert_eq!(session.history().len(), history_len);
	}

	#[test]
	fn image_resize_is_a_single_commit() {
		let mut session = small_session();
		let id = session.import_image_bytes(&png_bytes(4, 2)).unwrap();
		assert_eq!(session.graph().bounding_box(id).unwrap(), [DVec2::ZERO, DVec2::new(200., 100.)]);
		let history_len = session.history().len();

		session.set_selected_properties(vec![(PropertyKey::ScaleX, 25.0.into()), (PropertyKey::ScaleY, 25.0.into())]).unwrap();
		assert_eq!(session.history().len(), history_len + 1);
		assert_eq!(session.graph().bounding_box(id).unwrap(), [DVec2::ZERO, DVec2::new(100., 50.)]);

		assert!(matches!(session.import_image_bytes(b"not an image"), Err(EditorError::DecodeError(_))));
		assert_eq!(session.history().len(), history_len + 1);
	}

	#[test]
	fn clicking_selects_the_top_most_entity() {
		let mut session = small_session();
		let rect = session.add_shape(ShapePreset::Rectangle).unwrap();
		let circle = session.add_shape(ShapePreset::Circle).unwrap();
		assert_eq!(session.select_at(DVec2::new(200., 200.)), Some(circle));

		session.select(circle).unwrap();
		session.reorder_selected(ReorderDirection::Bottom).unwrap();
		assert_eq!(session.select_at(DVec2::new(200., 200.)), Some(rect));

		assert_eq!(session.select_at(DVec2::new(5., 5.)), None);
		assert_eq!(session.selected_entity(), None);
		assert!(session.select(EntityId(999)).is_err());
	}

	#[test]
	fn layer_panel_lists_top_most_first() {
		let mut session = small_session();
		let text = session.add_text().unwrap();
		let arrow = session.add_shape(ShapePreset::Arrow).unwrap();
		session.select(text).unwrap();
		session.set_selected_property(PropertyKey::Content, "").unwrap();

		let panel = session.layer_panel();
		assert_eq!(panel.len(), 2);
		assert_eq!((panel[0].id, panel[0].label.as_str(), panel[0].kind, panel[0].selected), (arrow, "path", "shape", false));
		assert_eq!((panel[1].id, panel[1].label.as_str(), panel[1].kind, panel[1].selected), (text, "Text", "text", true));
	}

	#[test]
	fn save_state_tracks_the_history_cursor() {
		let mut store = MemoryProjectStore::new();
		let mut session = small_session();
		assert!(session.is_saved());

		session.add_shape(ShapePreset::Rectangle).unwrap();
		assert!(!session.is_saved());
		let id = session.save_to(&mut store).unwrap();
		assert!(session.is_saved());

		session.undo().unwrap();
		assert!(!session.is_saved());
		session.redo().unwrap();
		assert!(session.is_saved());

		let mut reopened = small_session();
		reopened.load_from(&store, id).unwrap();
		assert_eq!(reopened.graph(), session.graph());
		assert_eq!(reopened.name(), session.name());
		assert_eq!(reopened.load_from(&store, ProjectId(id.0 + 1)), Err(EditorError::ProjectNotFound(ProjectId(id.0 + 1))));
	}

	#[test]
	fn corrupt_loads_leave_the_session_untouched() {
		let mut session = small_session();
		session.add_text().unwrap();
		let before = session.graph().clone();
		assert!(matches!(session.load(b"{}"), Err(EditorError::Document(DocumentError::CorruptDocument(_)))));
		assert_eq!(session.graph(), &before);
		assert!(session.can_undo());
	}

	#[test]
	fn exports_use_the_scale_multiplier() {
		let mut session = small_session();
		session.dispatch(Operation::SetBackground { background: Background::Color(Color::WHITE) }).unwrap();

		let bytes = session.export_raster().unwrap();
		let image = image::load_from_memory(&bytes).unwrap();
		assert_eq!((image.width(), image.height()), (80, 60));

		let options = ExportOptions { scale_multiplier: 1., format: RasterFormat::Bmp };
		let image = image::load_from_memory(&session.export_raster_with(&options).unwrap()).unwrap();
		assert_eq!((image.width(), image.height()), (40, 30));

		let svg = session.export_svg();
		assert!(svg.starts_with("<svg"));
		assert!(svg.contains(r#"width="40""#));
	}

	#[test]
	fn exported_text_is_visible() {
		let mut session = small_session();
		session.dispatch(Operation::SetBackground { background: Background::Color(Color::WHITE) }).unwrap();
		session.add_text().unwrap();
		session.set_selected_property(PropertyKey::FillColor, Color::BLACK).unwrap();
		session.set_selected_property(PropertyKey::FontSizePx, 20.).unwrap();
		session.set_selected_property(PropertyKey::X, 0.).unwrap();
		session.set_selected_property(PropertyKey::Y, 0.).unwrap();

		let options = ExportOptions { scale_multiplier: 1., format: RasterFormat::Png };
		let image = image::load_from_memory(&session.export_raster_with(&options).unwrap()).unwrap().to_rgba8();
		assert!(image.pixels().any(|pixel| pixel.0[0] < 128), "the text entity left no pixels in the export");
	}
}
