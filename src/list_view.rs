//! Display list for the task manager.
//!
//! The view is rebuilt from scratch after every mutation. Each item is either
//! in Read mode or in Edit mode; a rebuild puts every item back in Read mode.

use tui_textarea::TextArea;

use crate::input::{contents, text_area};
use crate::task::{Counts, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditField {
    #[default]
    Title,
    Desc,
}

impl EditField {
    pub fn next(self) -> Self {
        match self {
            Self::Title => Self::Desc,
            Self::Desc => Self::Title,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EditDraft {
    pub title: TextArea<'static>,
    pub desc: TextArea<'static>,
    pub field: EditField,
}

impl EditDraft {
    fn from_task(item: &ItemView) -> Self {
        Self {
            title: text_area(&item.title),
            desc: text_area(&item.desc),
            field: EditField::Title,
        }
    }

    /// Trimmed title and description, or `None` when the title is blank.
    pub fn submission(&self) -> Option<(String, String)> {
        let title = contents(&self.title);
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        Some((title.to_string(), contents(&self.desc).trim().to_string()))
    }
}

#[derive(Debug, Clone, Default)]
pub enum ItemMode {
    #[default]
    Read,
    Edit(EditDraft),
}

#[derive(Debug, Clone)]
pub struct ItemView {
    pub id: String,
    pub title: String,
    pub desc: String,
    pub completed: bool,
    pub mode: ItemMode,
}

impl ItemView {
    fn from_task(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            desc: task.desc.clone(),
            completed: task.completed,
            mode: ItemMode::Read,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, ItemMode::Edit(_))
    }

    pub fn draft_mut(&mut self) -> Option<&mut EditDraft> {
        match &mut self.mode {
            ItemMode::Edit(draft) => Some(draft),
            ItemMode::Read => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListView {
    items: Vec<ItemView>,
    counts: Counts,
    selected: usize,
}

impl ListView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards every item and rebuilds one per task, head first.
    pub fn rebuild(&mut self, tasks: &[Task], counts: Counts) {
        self.items = tasks.iter().map(ItemView::from_task).collect();
        self.counts = counts;
        self.selected = self.selected.min(self.items.len().saturating_sub(1));
    }

    /// Switches one item to Edit mode. Other open edits are not touched.
    pub fn open_edit(&mut self, index: usize) -> bool {
        let Some(item) = self.items.get_mut(index) else {
            return false;
        };
        if !item.is_editing() {
            item.mode = ItemMode::Edit(EditDraft::from_task(item));
        }
        true
    }

    pub fn items(&self) -> &[ItemView] {
        &self.items
    }

    pub fn item(&self, index: usize) -> Option<&ItemView> {
        self.items.get(index)
    }

    pub fn selected_item(&self) -> Option<&ItemView> {
        self.items.get(self.selected)
    }

    pub fn selected_item_mut(&mut self) -> Option<&mut ItemView> {
        self.items.get_mut(self.selected)
    }

    pub fn counts(&self) -> Counts {
        self.counts
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.items.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    #[cfg(test)]
    pub fn editing_count(&self) -> usize {
        self.items.iter().filter(|i| i.is_editing()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn tasks(titles: &[&str]) -> Vec<Task> {
        titles
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let now = Utc.timestamp_millis_opt(i as i64).single().unwrap();
                Task::new((*t).to_string(), String::new(), now)
            })
            .collect()
    }

    #[test]
    fn rebuild_follows_task_order_and_counts() {
        let list = tasks(&["B", "A"]);
        let mut view = ListView::new();
        view.rebuild(&list, Counts::of(&list));
        let titles: Vec<_> = view.items().iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["B", "A"]);
        assert_eq!(view.counts().total, 2);
    }

    #[test]
    fn rebuild_resets_every_item_to_read_mode() {
        let list = tasks(&["A", "B"]);
        let mut view = ListView::new();
        view.rebuild(&list, Counts::of(&list));
        view.open_edit(0);
        view.open_edit(1);
        view.rebuild(&list, Counts::of(&list));
        assert_eq!(view.editing_count(), 0);
    }

    #[test]
    fn opening_second_edit_keeps_the_first_open() {
        let list = tasks(&["A", "B"]);
        let mut view = ListView::new();
        view.rebuild(&list, Counts::of(&list));
        assert!(view.open_edit(0));
        assert!(view.open_edit(1));
        assert_eq!(view.editing_count(), 2);
        assert!(!view.open_edit(5));
    }

    #[test]
    fn draft_is_seeded_from_item_and_kept_on_reopen() {
        let list = tasks(&["A"]);
        let mut view = ListView::new();
        view.rebuild(&list, Counts::of(&list));
        view.open_edit(0);
        let draft = view.selected_item_mut().unwrap().draft_mut().unwrap();
        assert_eq!(contents(&draft.title), "A");
        draft.title.insert_char('!');
        view.open_edit(0);
        let draft = view.selected_item_mut().unwrap().draft_mut().unwrap();
        assert_eq!(contents(&draft.title), "A!");
    }

    #[test]
    fn blank_title_has_no_submission() {
        let draft = EditDraft {
            title: text_area("   "),
            desc: text_area(" d "),
            field: EditField::Title,
        };
        assert_eq!(draft.submission(), None);
        let draft = EditDraft {
            title: text_area(" t "),
            ..draft
        };
        assert_eq!(draft.submission(), Some(("t".into(), "d".into())));
    }

    #[test]
    fn selection_clamps_after_shrink() {
        let list = tasks(&["A", "B", "C"]);
        let mut view = ListView::new();
        view.rebuild(&list, Counts::of(&list));
        view.select_next();
        view.select_next();
        assert_eq!(view.selected(), 2);
        view.rebuild(&list[..1], Counts::of(&list[..1]));
        assert_eq!(view.selected(), 0);
    }
}
