use crate::EntityId;

use std::fmt;

/// Tells observers (the renderer, layer panel, and session) what an applied operation changed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocumentResponse {
	/// For the purposes of rendering, this triggers a re-render of the entire document.
	DocumentChanged,
	CreatedEntity {
		id: EntityId,
	},
	DeletedEntity {
		id: EntityId,
	},
	/// Triggers an update of the entity in the properties and layer panels.
	EntityChanged {
		id: EntityId,
	},
	/// The paint order changed; the layer panel has to be rebuilt.
	OrderChanged,
	CanvasChanged,
}

impl fmt::Display for DocumentResponse {
	fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
		let name = match self {
			DocumentResponse::DocumentChanged => "DocumentChanged",
			DocumentResponse::CreatedEntity { .. } => "CreatedEntity",
			DocumentResponse::DeletedEntity { .. } => "DeletedEntity",
			DocumentResponse::EntityChanged { .. } => "EntityChanged",
			DocumentResponse::OrderChanged => "OrderChanged",
			DocumentResponse::CanvasChanged => "CanvasChanged",
		};

		formatter.write_str(name)
	}
}
