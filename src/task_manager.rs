use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::list_view::{ItemMode, ListView};
use crate::storage::{KeyValueStore, TaskStorage};
use crate::task::{Counts, Task, TaskUpdate};

/// Outcome of saving an item that was open for editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditSave {
    Saved,
    /// Blank title; the item stays in Edit mode.
    Rejected,
    NotEditing,
}

/// Owns the task list for the lifetime of the app.
///
/// Every successful mutation writes the whole list through the storage
/// adapter and then rebuilds the list view.
#[derive(Debug)]
pub struct TaskManager<S> {
    storage: TaskStorage<S>,
    tasks: Vec<Task>,
    view: ListView,
}

impl<S: KeyValueStore> TaskManager<S> {
    pub fn new(storage: TaskStorage<S>) -> Self {
        let tasks = storage.load();
        tracing::debug!(count = tasks.len(), "loaded tasks");
        let mut manager = Self {
            storage,
            tasks,
            view: ListView::new(),
        };
        manager.render();
        manager
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn find(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn view(&self) -> &ListView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ListView {
        &mut self.view
    }

    pub fn add(&mut self, title: &str, desc: &str) -> Result<()> {
        self.add_at(title, desc, Utc::now())
    }

    pub fn add_at(&mut self, title: &str, desc: &str, now: DateTime<Utc>) -> Result<()> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(());
        }
        let task = Task::new(title.to_string(), desc.trim().to_string(), now);
        tracing::info!(id = %task.id, "task added");
        self.tasks.insert(0, task);
        self.commit()
    }

    pub fn update(&mut self, id: &str, fields: TaskUpdate) -> Result<()> {
        if fields.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(Error::EmptyTitle);
        }
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(());
        };
        task.merge(fields);
        tracing::info!(id, "task updated");
        self.commit()
    }

    pub fn toggle_complete(&mut self, id: &str) -> Result<()> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(());
        };
        task.completed = !task.completed;
        tracing::info!(id, completed = task.completed, "task toggled");
        self.commit()
    }

    pub fn delete(&mut self, id: &str) -> Result<()> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return Ok(());
        }
        tracing::info!(id, "task deleted");
        self.commit()
    }

    pub fn clear_all(&mut self) -> Result<()> {
        tracing::info!(count = self.tasks.len(), "tasks cleared");
        self.tasks.clear();
        self.commit()
    }

    pub fn counts(&self) -> Counts {
        Counts::of(&self.tasks)
    }

    /// Saves the draft of the item at `index` if its title is not blank.
    pub fn save_edit(&mut self, index: usize) -> Result<EditSave> {
        let Some(item) = self.view.item(index) else {
            return Ok(EditSave::NotEditing);
        };
        let ItemMode::Edit(draft) = &item.mode else {
            return Ok(EditSave::NotEditing);
        };
        let Some((title, desc)) = draft.submission() else {
            return Ok(EditSave::Rejected);
        };
        let id = item.id.clone();
        self.update(&id, TaskUpdate::text(title, desc))?;
        Ok(EditSave::Saved)
    }

    /// Drops every open draft.
    pub fn cancel_edit(&mut self) {
        self.render();
    }

    fn commit(&mut self) -> Result<()> {
        self.storage.save(&self.tasks)?;
        self.render();
        Ok(())
    }

    fn render(&mut self) {
        let counts = self.counts();
        self.view.rebuild(&self.tasks, counts);
    }
}
