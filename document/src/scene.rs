use crate::color::Color;
use crate::consts::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH};
use crate::entity::{Entity, EntityId, PropertyKey, PropertyValue};
use crate::{DocumentError, DocumentResponse, Operation};

use glam::DVec2;

/// What the canvas is filled with underneath every entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Background {
	#[default]
	Transparent,
	Color(Color),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReorderDirection {
	/// One step towards the top of the paint order.
	Up,
	/// One step towards the bottom of the paint order.
	Down,
	Top,
	Bottom,
}

/// The document: an ordered sequence of entities plus the canvas they are placed on.
/// The sequence order is the paint order, so index 0 paints first (bottom) and an entity's
/// z-index is always its position in the sequence.
#[derive(Debug, Clone)]
pub struct SceneGraph {
	canvas_width: u32,
	canvas_height: u32,
	background: Background,
	/// The IDs of the entities, parallel to `entities`
	entity_ids: Vec<EntityId>,
	entities: Vec<Entity>,
	/// The ID that will be assigned to the next entity that is added
	next_id: u64,
}

impl Default for SceneGraph {
	fn default() -> Self {
		Self::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT)
	}
}

/// Structural equality: same canvas, same entities with the same ids in the same order.
/// The id allocator is bookkeeping and does not take part.
impl PartialEq for SceneGraph {
	fn eq(&self, other: &Self) -> bool {
		self.canvas_width == other.canvas_width
			&& self.canvas_height == other.canvas_height
			&& self.background == other.background
			&& self.entity_ids == other.entity_ids
			&& self.entities == other.entities
	}
}

impl SceneGraph {
	/// An empty, transparent canvas. Zero dimensions are raised to 1.
	pub fn new(canvas_width: u32, canvas_height: u32) -> Self {
		Self {
			canvas_width: canvas_width.max(1),
			canvas_height: canvas_height.max(1),
			background: Background::Transparent,
			entity_ids: Vec::new(),
			entities: Vec::new(),
			next_id: 1,
		}
	}

	pub fn with_background(mut self, background: Background) -> Self {
		self.background = background;
		self
	}

	pub fn canvas_width(&self) -> u32 {
		self.canvas_width
	}

	pub fn canvas_height(&self) -> u32 {
		self.canvas_height
	}

	pub fn background(&self) -> Background {
		self.background
	}

	pub fn len(&self) -> usize {
		self.entities.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entities.is_empty()
	}

	/// Entity IDs in paint order, bottom first.
	pub fn entity_ids(&self) -> &[EntityId] {
		&self.entity_ids
	}

	/// Entities in paint order, bottom first.
	pub fn entities(&self) -> impl DoubleEndedIterator<Item = (EntityId, &Entity)> + ExactSizeIterator {
		self.entity_ids.iter().copied().zip(self.entities.iter())
	}

	pub fn contains(&self, id: EntityId) -> bool {
		self.entity_ids.contains(&id)
	}

	pub fn entity(&self, id: EntityId) -> Result<&Entity, DocumentError> {
		let index = self.z_index(id)?;
		Ok(&self.entities[index])
	}

	/// Position of the entity in the paint order, always within `0..len()`.
	pub fn z_index(&self, id: EntityId) -> Result<usize, DocumentError> {
		self.entity_ids.iter().position(|x| *x == id).ok_or(DocumentError::NotFound(id))
	}

	/// The id the next added entity will receive.
	pub fn next_id(&self) -> EntityId {
		EntityId(self.next_id)
	}

	/// Makes sure ids below `floor` are never handed out again, even if they do not appear in this graph.
	pub fn reserve_ids_below(&mut self, floor: EntityId) {
		self.next_id = self.next_id.max(floor.0);
	}

	/// Validates the entity and appends it at the top of the paint order.
	pub fn add_entity(&mut self, entity: Entity) -> Result<EntityId, DocumentError> {
		entity.validate()?;
		let id = EntityId(self.next_id);
		self.next_id += 1;
		self.entity_ids.push(id);
		self.entities.push(entity);
		Ok(id)
	}

	/// Appends an entity that already carries an id, as the decoder does.
	pub(crate) fn insert_with_id(&mut self, id: EntityId, entity: Entity) -> Result<(), DocumentError> {
		entity.validate()?;
		if self.contains(id) {
			return Err(DocumentError::InvalidEntity(format!("duplicate entity id {id}")));
		}
		self.next_id = self.next_id.max(id.0.saturating_add(1));
		self.entity_ids.push(id);
		self.entities.push(entity);
		Ok(())
	}

	/// Removes the entity. Entities above it each move down one z-index, keeping the order contiguous.
	pub fn remove_entity(&mut self, id: EntityId) -> Result<Entity, DocumentError> {
		let index = self.z_index(id)?;
		self.entity_ids.remove(index);
		Ok(self.entities.remove(index))
	}

	/// Moves the entity within the paint order. Returns whether anything moved;
	/// moving past either end is a no-op.
	pub fn reorder(&mut self, id: EntityId, direction: ReorderDirection) -> Result<bool, DocumentError> {
		let index = self.z_index(id)?;
		let top = self.entities.len() - 1;
		let destination = match direction {
			ReorderDirection::Up => (index + 1).min(top),
			ReorderDirection::Down => index.saturating_sub(1),
			ReorderDirection::Top => top,
			ReorderDirection::Bottom => 0,
		};
		if destination == index {
			return Ok(false);
		}

		let entity_id = self.entity_ids.remove(index);
		let entity = self.entities.remove(index);
		self.entity_ids.insert(destination, entity_id);
		self.entities.insert(destination, entity);
		Ok(true)
	}

	/// Validates and writes one property. Returns whether the stored value changed.
	pub fn set_property(&mut self, id: EntityId, key: PropertyKey, value: PropertyValue) -> Result<bool, DocumentError> {
		self.set_properties(id, &[(key, value)])
	}

	/// Like [`SceneGraph::set_property`], with the key given by its persisted name (e.g. `"fontSizePx"`).
	pub fn set_property_by_name(&mut self, id: EntityId, key: &str, value: PropertyValue) -> Result<bool, DocumentError> {
		let entity = self.entity(id)?;
		let key = key.parse::<PropertyKey>().map_err(|_| DocumentError::InvalidProperty {
			key: key.to_string(),
			variant: entity.variant_name(),
		})?;
		self.set_property(id, key, value)
	}

	/// Applies every change or none of them. Returns whether the entity ended up different.
	pub fn set_properties(&mut self, id: EntityId, changes: &[(PropertyKey, PropertyValue)]) -> Result<bool, DocumentError> {
		let index = self.z_index(id)?;
		let mut edited = self.entities[index].clone();
		for (key, value) in changes {
			edited.set_property(*key, value)?;
		}
		if edited == self.entities[index] {
			return Ok(false);
		}
		self.entities[index] = edited;
		Ok(true)
	}

	/// Returns whether the size changed.
	pub fn set_canvas_size(&mut self, width: u32, height: u32) -> Result<bool, DocumentError> {
		if width == 0 || height == 0 {
			return Err(DocumentError::invalid_value("canvasSize", format!("{width}x{height} must be at least 1x1")));
		}
		let changed = (width, height) != (self.canvas_width, self.canvas_height);
		self.canvas_width = width;
		self.canvas_height = height;
		Ok(changed)
	}

	/// Returns whether the background changed.
	pub fn set_background(&mut self, background: Background) -> bool {
		let changed = background != self.background;
		self.background = background;
		changed
	}

	/// The top-most entity whose transformed box contains `point`.
	pub fn hit_test(&self, point: DVec2) -> Option<EntityId> {
		self.entities().rev().find(|(_, entity)| entity.contains_point(point)).map(|(id, _)| id)
	}

	/// Every entity whose transformed box contains `point`, top-most first.
	pub fn hit_test_all(&self, point: DVec2) -> Vec<EntityId> {
		self.entities().rev().filter(|(_, entity)| entity.contains_point(point)).map(|(id, _)| id).collect()
	}

	/// Axis-aligned bounding box of the entity after its transform, as `[min, max]`.
	pub fn bounding_box(&self, id: EntityId) -> Result<[DVec2; 2], DocumentError> {
		Ok(self.entity(id)?.bounding_box())
	}

	/// The union of the bounding boxes of all entities, if there are any.
	pub fn combined_bounding_box(&self) -> Option<[DVec2; 2]> {
		self.entities.iter().map(Entity::bounding_box).reduce(|a, b| [a[0].min(b[0]), a[1].max(b[1])])
	}

	/// Mutate the document by applying the `operation` to it.
	/// Returns `None` when the operation was valid but changed nothing, otherwise what changed.
	pub fn handle_operation(&mut self, operation: &Operation) -> Result<Option<Vec<DocumentResponse>>, DocumentError> {
		use DocumentResponse::*;

		let responses = match operation {
			Operation::AddEntity { entity } => {
				let id = self.add_entity(entity.clone())?;
				log::debug!("Added {} entity {id} at z-index {}", entity.variant_name(), self.len() - 1);
				Some(vec![DocumentChanged, CreatedEntity { id }, OrderChanged])
			}
			Operation::RemoveEntity { id } => {
				let entity = self.remove_entity(*id)?;
				log::debug!("Removed {} entity {id}", entity.variant_name());
				Some(vec![DocumentChanged, DeletedEntity { id: *id }, OrderChanged])
			}
			Operation::Reorder { id, direction } => self.reorder(*id, *direction)?.then(|| {
				log::debug!("Moved entity {id} {direction:?} to z-index {}", self.z_index(*id).unwrap_or_default());
				vec![DocumentChanged, OrderChanged]
			}),
			Operation::SetProperty { id, key, value } => self.set_property(*id, *key, value.clone())?.then(|| vec![DocumentChanged, EntityChanged { id: *id }]),
			Operation::SetProperties { id, changes } => self.set_properties(*id, changes)?.then(|| vec![DocumentChanged, EntityChanged { id: *id }]),
			Operation::SetCanvasSize { width, height } => self.set_canvas_size(*width, *height)?.then(|| vec![DocumentChanged, CanvasChanged]),
			Operation::SetBackground { background } => self.set_background(*background).then(|| vec![DocumentChanged, CanvasChanged]),
		};
		Ok(responses)
	}
}
