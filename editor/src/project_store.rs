//! Storage for saved projects, keyed by an id and listed by name.

use crate::consts::{DEFAULT_PROJECT_NAME, FILE_EXTENSION, PROJECT_INDEX_FILE_NAME};
use crate::EditorError;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub u64);

impl fmt::Display for ProjectId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
	pub id: ProjectId,
	pub name: String,
	pub saved_at: DateTime<Utc>,
}

/// Every save creates a new entry, even when a project with the same name exists.
pub trait ProjectStore {
	/// Saved projects, oldest first.
	fn list(&self) -> Result<Vec<ProjectSummary>, EditorError>;

	fn save(&mut self, name: &str, bytes: &[u8]) -> Result<ProjectId, EditorError>;

	fn load(&self, id: ProjectId) -> Result<Vec<u8>, EditorError>;

	fn delete(&mut self, id: ProjectId) -> Result<(), EditorError>;
}

fn project_name(name: &str) -> String {
	let name = name.trim();
	if name.is_empty() { DEFAULT_PROJECT_NAME.to_string() } else { name.to_string() }
}

fn next_project_id(projects: &[ProjectSummary]) -> ProjectId {
	ProjectId(projects.iter().map(|project| project.id.0).max().map_or(1, |id| id + 1))
}

/// Keeps projects in memory for the lifetime of the store.
#[derive(Debug, Default, Clone)]
pub struct MemoryProjectStore {
	projects: Vec<(ProjectSummary, Vec<u8>)>,
}

impl MemoryProjectStore {
	pub fn new() -> Self {
		Self::default()
	}
}

impl ProjectStore for MemoryProjectStore {
	fn list(&self) -> Result<Vec<ProjectSummary>, EditorError> {
		Ok(self.projects.iter().map(|(summary, _)| summary.clone()).collect())
	}

	fn save(&mut self, name: &str, bytes: &[u8]) -> Result<ProjectId, EditorError> {
		let summaries = self.list()?;
		let summary = ProjectSummary {
			id: next_project_id(&summaries),
			name: project_name(name),
			saved_at: Utc::now(),
		};
		let id = summary.id;
		self.projects.push((summary, bytes.to_vec()));
		Ok(id)
	}

	fn load(&self, id: ProjectId) -> Result<Vec<u8>, EditorError> {
		self.projects.iter().find(|(summary, _)| summary.id == id).map(|(_, bytes)| bytes.clone()).ok_or(EditorError::ProjectNotFound(id))
	}

	fn delete(&mut self, id: ProjectId) -> Result<(), EditorError> {
		let index = self.projects.iter().position(|(summary, _)| summary.id == id).ok_or(EditorError::ProjectNotFound(id))?;
		self.projects.remove(index);
		Ok(())
	}
}

/// Keeps projects in a directory: a JSON index of summaries plus one file per project.
#[derive(Debug, Clone)]
pub struct DirectoryProjectStore {
	root: PathBuf,
}

impl DirectoryProjectStore {
	/// Opens the store at `root`, creating the directory if needed.
	pub fn open(root: impl Into<PathBuf>) -> Result<Self, EditorError> {
		let root = root.into();
		fs::create_dir_all(&root)?;
		Ok(Self { root })
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	fn index_path(&self) -> PathBuf {
		self.root.join(PROJECT_INDEX_FILE_NAME)
	}

	fn project_path(&self, id: ProjectId) -> PathBuf {
		self.root.join(format!("{id}.{FILE_EXTENSION}"))
	}

	fn write_index(&self, projects: &[ProjectSummary]) -> Result<(), EditorError> {
		let json = serde_json::to_vec_pretty(projects).map_err(|err| EditorError::ProjectStore(err.to_string()))?;
		fs::write(self.index_path(), json)?;
		Ok(())
	}
}

impl ProjectStore for DirectoryProjectStore {
	fn list(&self) -> Result<Vec<ProjectSummary>, EditorError> {
		let path = self.index_path();
		if !path.exists() {
			return Ok(Vec::new());
		}
		let json = fs::read(&path)?;
		serde_json::from_slice(&json).map_err(|err| EditorError::ProjectStore(format!("{} is unreadable: {err}", path.display())))
	}

	fn save(&mut self, name: &str, bytes: &[u8]) -> Result<ProjectId, EditorError> {
		let mut projects = self.list()?;
		let summary = ProjectSummary {
			id: next_project_id(&projects),
			name: project_name(name),
			saved_at: Utc::now(),
		};
		let id = summary.id;

		// The project file goes first so the index never lists a project without data
		fs::write(self.project_path(id), bytes)?;
		projects.push(summary);
		self.write_index(&projects)?;
		log::info!("Saved project {id} to {}", self.root.display());
		Ok(id)
	}

	fn load(&self, id: ProjectId) -> Result<Vec<u8>, EditorError> {
		if !self.list()?.iter().any(|project| project.id == id) {
			return Err(EditorError::ProjectNotFound(id));
		}
		Ok(fs::read(self.project_path(id))?)
	}

	fn delete(&mut self, id: ProjectId) -> Result<(), EditorError> {
		let mut projects = self.list()?;
		let index = projects.iter().position(|project| project.id == id).ok_or(EditorError::ProjectNotFound(id))?;
		projects.remove(index);
		self.write_index(&projects)?;

		let path = self.project_path(id);
		if path.exists() {
			fs::remove_file(path)?;
		}
		Ok(())
	}
}
