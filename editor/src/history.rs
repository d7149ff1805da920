use pixellab_document::codec;
use pixellab_document::{DocumentError, SceneGraph};

use std::collections::hash_map::DefaultHasher;
use std::collections::VecDeque;
use std::hash::{Hash, Hasher};

/// An immutable, fully serialized snapshot of a scene graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
	bytes: Vec<u8>,
	identifier: u64,
}

impl Checkpoint {
	pub fn capture(graph: &SceneGraph) -> Result<Self, DocumentError> {
		Ok(Self::from_bytes(codec::encode(graph)?))
	}

	fn from_bytes(bytes: Vec<u8>) -> Self {
		let mut hasher = DefaultHasher::new();
		bytes.hash(&mut hasher);
		Self { identifier: hasher.finish(), bytes }
	}

	pub fn bytes(&self) -> &[u8] {
		&self.bytes
	}

	/// Equal for checkpoints of identical documents. Used to tell whether a document has unsaved changes.
	pub fn identifier(&self) -> u64 {
		self.identifier
	}

	pub fn restore(&self) -> Result<SceneGraph, DocumentError> {
		codec::decode(&self.bytes)
	}
}

/// The undo/redo state machine: a sequence of checkpoints and a cursor pointing at the live state.
///
/// `cursor` is always within `0..len()`. Committing while the cursor is not at the end prunes the redo branch,
/// and once `capacity` is exceeded the oldest checkpoints are evicted.
#[derive(Debug, Clone)]
pub struct History {
	checkpoints: VecDeque<Checkpoint>,
	cursor: usize,
	capacity: usize,
}

impl History {
	/// Starts a history whose only checkpoint is `graph`.
	pub fn new(graph: &SceneGraph, capacity: usize) -> Result<Self, DocumentError> {
		Ok(Self::from_checkpoint(Checkpoint::capture(graph)?, capacity))
	}

	pub fn from_checkpoint(checkpoint: Checkpoint, capacity: usize) -> Self {
		Self {
			checkpoints: VecDeque::from([checkpoint]),
			cursor: 0,
			capacity: capacity.max(1),
		}
	}

	pub fn len(&self) -> usize {
		self.checkpoints.len()
	}

	pub fn is_empty(&self) -> bool {
		self.checkpoints.is_empty()
	}

	pub fn cursor(&self) -> usize {
		self.cursor
	}

	pub fn capacity(&self) -> usize {
		self.capacity
	}

	/// The checkpoint of the live state.
	pub fn current(&self) -> &Checkpoint {
		&self.checkpoints[self.cursor]
	}

	pub fn can_undo(&self) -> bool {
		self.cursor > 0
	}

	pub fn can_redo(&self) -> bool {
		self.cursor + 1 < self.checkpoints.len()
	}

	/// Records `graph` as the new live state, discarding everything after the cursor.
	pub fn commit(&mut self, graph: &SceneGraph) -> Result<(), DocumentError> {
		let checkpoint = Checkpoint::capture(graph)?;
		self.checkpoints.truncate(self.cursor + 1);
		self.checkpoints.push_back(checkpoint);
		while self.checkpoints.len() > self.capacity {
			self.checkpoints.pop_front();
		}
		self.cursor = self.checkpoints.len() - 1;
		Ok(())
	}

	/// Steps back one checkpoint and returns its graph, or `None` when already at the oldest checkpoint.
	pub fn undo(&mut self) -> Result<Option<SceneGraph>, DocumentError> {
		if !self.can_undo() {
			return Ok(None);
		}
		self.step_to(self.cursor - 1).map(Some)
	}

	/// Steps forward one checkpoint and returns its graph, or `None` when already at the newest checkpoint.
	pub fn redo(&mut self) -> Result<Option<SceneGraph>, DocumentError> {
		if !self.can_redo() {
			return Ok(None);
		}
		self.step_to(self.cursor + 1).map(Some)
	}

	/// Drops every checkpoint and starts over from `graph`.
	pub fn reset(&mut self, graph: &SceneGraph) -> Result<(), DocumentError> {
		*self = Self::new(graph, self.capacity)?;
		Ok(())
	}

	/// The cursor only moves once the checkpoint has been decoded.
	fn step_to(&mut self, index: usize) -> Result<SceneGraph, DocumentError> {
		let graph = self.checkpoints[index].restore().inspect_err(|err| log::warn!("Checkpoint {index} could not be restored: {err}"))?;
		self.cursor = index;
		Ok(graph)
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::test_utils::init_logger;
	use pixellab_document::entity::{Entity, ShapeEntity};
	use pixellab_document::Color;

	fn graph_with(count: usize) -> SceneGraph {
		let mut graph = SceneGraph::default();
		for i in 0..count {
			graph.add_entity(Entity::shape(ShapeEntity::rectangle(10., 10., Color::BLACK)).at(i as f64, 0.)).unwrap();
		}
		graph
	}

	#[test]
	fn undo_then_commit_prunes_the_redo_branch() {
		init_logger();
		let mut history = History::new(&graph_with(0), 100).unwrap();
		for count in 1..=3 {
			history.commit(&graph_with(count)).unwrap();
		}
		assert_eq!(history.len(), 4);
		assert_eq!(history.cursor(), 3);

		assert_eq!(history.undo().unwrap(), Some(graph_with(2)));
		assert_eq!(history.undo().unwrap(), Some(graph_with(1)));
		assert_eq!(history.cursor(), 1);
		assert!(history.can_redo());

		let mut branch = graph_with(1);
		branch.add_entity(Entity::shape(ShapeEntity::circle(5., Color::WHITE))).unwrap();
		history.commit(&branch).unwrap();

		// Everything after checkpoint 1 is gone; the new checkpoint sits right after it
		assert_eq!(history.len(), 3);
		assert_eq!(history.cursor(), 2);
		assert!(!history.can_redo());
		assert_eq!(history.redo().unwrap(), None);
		assert_eq!(history.cursor(), 2);

		assert_eq!(history.undo().unwrap(), Some(graph_with(1)));
	}

	#[test]
	fn boundaries_are_no_ops() {
		let mut history = History::new(&graph_with(1), 100).unwrap();
		assert!(!history.can_undo());
		assert!(!history.can_redo());
		assert_eq!(history.undo().unwrap(), None);
		assert_eq!(history.redo().unwrap(), None);
		assert_eq!(history.cursor(), 0);
	}

	#[test]
	fn redo_restores_what_undo_reverted() {
		let mut history = History::new(&graph_with(0), 100).unwrap();
		history.commit(&graph_with(1)).unwrap();
		assert_eq!(history.undo().unwrap(), Some(graph_with(0)));
		assert_eq!(history.redo().unwrap(), Some(graph_with(1)));
		assert_eq!(history.current(), &Checkpoint::capture(&graph_with(1)).unwrap());
	}

	#[test]
	fn capacity_evicts_oldest_first() {
		let mut history = History::new(&graph_with(0), 3).unwrap();
		for count in 1..=5 {
			history.commit(&graph_with(count)).unwrap();
		}
		assert_eq!(history.len(), 3);
		assert_eq!(history.cursor(), 2);
		assert_eq!(history.undo().unwrap(), Some(graph_with(4)));
		assert_eq!(history.undo().unwrap(), Some(graph_with(3)));
		assert_eq!(history.undo().unwrap(), None);
	}

	#[test]
	fn identifiers_follow_content() {
		let a = Checkpoint::capture(&graph_with(2)).unwrap();
		let b = Checkpoint::capture(&graph_with(2)).unwrap();
		let c = Checkpoint::capture(&graph_with(3)).unwrap();
		assert_eq!(a.identifier(), b.identifier());
		assert_ne!(a.identifier(), c.identifier());
	}
}
