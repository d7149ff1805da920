use crate::entity::{Entity, EntityId, PropertyKey, PropertyValue};
use crate::scene::{Background, ReorderDirection};

/// A single atomic change to a scene graph. Applying an operation either fully succeeds or leaves the graph untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
	/// Appends the entity on top of the paint order under a freshly generated id.
	AddEntity {
		entity: Entity,
	},
	RemoveEntity {
		id: EntityId,
	},
	Reorder {
		id: EntityId,
		direction: ReorderDirection,
	},
	SetProperty {
		id: EntityId,
		key: PropertyKey,
		value: PropertyValue,
	},
	/// Several fields of one entity edited together, such as both scale axes of an image.
	SetProperties {
		id: EntityId,
		changes: Vec<(PropertyKey, PropertyValue)>,
	},
	SetCanvasSize {
		width: u32,
		height: u32,
	},
	SetBackground {
		background: Background,
	},
}

impl Operation {
	/// The entity this operation targets, if it targets an existing one.
	pub fn target(&self) -> Option<EntityId> {
		match self {
			Operation::RemoveEntity { id } | Operation::Reorder { id, .. } | Operation::SetProperty { id, .. } | Operation::SetProperties { id, .. } => Some(*id),
			Operation::AddEntity { .. } | Operation::SetCanvasSize { .. } | Operation::SetBackground { .. } => None,
		}
	}
}
