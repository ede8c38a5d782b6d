use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use tui_textarea::TextArea;

use crate::config::Config;
use crate::controls::{NavMenu, PanelGroup, Section, ThemeController};
use crate::error::Result;
use crate::input::{contents, input_single_line};
use crate::list_view::{EditField, ItemMode, ItemView};
use crate::storage::{KeyValueStore, TaskStorage};
use crate::task_manager::{EditSave, TaskManager};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Form(FormField),
    List,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    Delete(String),
    ClearAll,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    Confirm {
        message: &'static str,
        action: PendingAction,
    },
    Alert(&'static str),
}

#[derive(Debug, Clone, Default)]
pub struct TaskForm {
    pub title: TextArea<'static>,
    pub desc: TextArea<'static>,
}

/// Screen areas from the last frame, used to route mouse clicks.
#[derive(Debug, Clone, Default)]
pub struct HitAreas {
    pub nav_toggle: Rect,
    pub nav_menu: Option<Rect>,
    pub theme_toggle: Rect,
    pub clear_all: Option<Rect>,
    pub panel_headers: Vec<Rect>,
}

pub struct App<S> {
    pub config: Config,
    pub tasks: TaskManager<S>,
    pub theme: ThemeController<S>,
    pub nav: NavMenu,
    pub panels: PanelGroup,
    pub section: Section,
    pub focus: Focus,
    pub form: TaskForm,
    pub panel_cursor: usize,
    pub prompt: Option<Prompt>,
    pub status: Option<String>,
    pub hits: HitAreas,
    pub should_quit: bool,
}

impl<S: KeyValueStore + Clone> App<S> {
    pub fn new(config: Config, store: S) -> Self {
        let panels = PanelGroup::new(config.panels());
        Self {
            tasks: TaskManager::new(TaskStorage::new(store.clone())),
            theme: ThemeController::load(store),
            nav: NavMenu::default(),
            panels,
            section: Section::Home,
            focus: Focus::Form(FormField::Title),
            form: TaskForm::default(),
            panel_cursor: 0,
            prompt: None,
            status: None,
            hits: HitAreas::default(),
            should_quit: false,
            config,
        }
    }
}

impl<S: KeyValueStore> App<S> {
    /// True while keystrokes go into a text field.
    pub fn is_typing(&self) -> bool {
        if self.section != Section::Tasks || self.nav.is_active() {
            return false;
        }
        match self.focus {
            Focus::Form(_) => true,
            Focus::List => self
                .tasks
                .view()
                .selected_item()
                .is_some_and(ItemView::is_editing),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }
        if let Some(prompt) = self.prompt.take() {
            self.handle_prompt_key(prompt, key);
            return;
        }
        match key.code {
            KeyCode::F(2) => {
                self.nav.toggle();
                return;
            }
            KeyCode::F(3) => {
                self.toggle_theme();
                return;
            }
            _ => {}
        }
        if self.nav.is_active() {
            self.handle_nav_key(key);
            return;
        }
        if !self.is_typing() {
            match key.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                    return;
                }
                KeyCode::Char(c @ '1'..='3') => {
                    let index = c as usize - '1' as usize;
                    self.section = Section::ALL[index];
                    return;
                }
                _ => {}
            }
        }
        match self.section {
            Section::Home => {}
            Section::Projects => self.handle_projects_key(key),
            Section::Tasks => self.handle_tasks_key(key),
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) || self.prompt.is_some() {
            return;
        }
        let at = Position::new(mouse.column, mouse.row);
        if self.hits.nav_toggle.contains(at) {
            self.nav.toggle();
            return;
        }
        if self.nav.is_active() {
            if let Some(menu) = self.hits.nav_menu.filter(|m| m.contains(at)) {
                // one row of border above the first entry
                let row = usize::from(at.y.saturating_sub(menu.y + 1));
                self.choose_section(row);
                return;
            }
            self.nav.click_outside();
        }
        if self.hits.theme_toggle.contains(at) {
            self.toggle_theme();
        } else if self.hits.clear_all.is_some_and(|r| r.contains(at)) {
            self.confirm_clear_all();
        } else if let Some(index) = self.hits.panel_headers.iter().position(|r| r.contains(at)) {
            self.panel_cursor = index;
            self.panels.toggle(index);
        }
    }

    fn handle_prompt_key(&mut self, prompt: Prompt, key: KeyEvent) {
        match prompt {
            Prompt::Alert(_) => {}
            Prompt::Confirm { message, action } => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => self.run_action(action),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {}
                _ => self.prompt = Some(Prompt::Confirm { message, action }),
            },
        }
    }

    fn run_action(&mut self, action: PendingAction) {
        let result = match action {
            PendingAction::Delete(id) => self.tasks.delete(&id),
            PendingAction::ClearAll => self.tasks.clear_all(),
        };
        self.report(result);
    }

    fn handle_nav_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.nav.highlight_prev(),
            KeyCode::Down => self.nav.highlight_next(),
            KeyCode::Enter => self.choose_section(self.nav.highlighted()),
            KeyCode::Esc => self.nav.close(),
            _ => {}
        }
    }

    fn choose_section(&mut self, index: usize) {
        if let Some(section) = self.nav.choose(index) {
            self.section = section;
        }
    }

    fn handle_projects_key(&mut self, key: KeyEvent) {
        let count = self.panels.panels().len();
        match key.code {
            KeyCode::Up => self.panel_cursor = self.panel_cursor.saturating_sub(1),
            KeyCode::Down if self.panel_cursor + 1 < count => self.panel_cursor += 1,
            KeyCode::Enter | KeyCode::Char(' ') => self.panels.toggle(self.panel_cursor),
            _ => {}
        }
    }

    fn handle_tasks_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::BackTab {
            self.focus = match self.focus {
                Focus::Form(FormField::Title) => Focus::List,
                Focus::Form(FormField::Desc) => Focus::Form(FormField::Title),
                Focus::List => Focus::Form(FormField::Desc),
            };
            return;
        }
        match self.focus {
            Focus::Form(field) => self.handle_form_key(field, key),
            Focus::List if self.is_typing() => self.handle_edit_key(key),
            Focus::List => self.handle_read_key(key),
        }
    }

    fn handle_form_key(&mut self, field: FormField, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match (field, key.code) {
            (_, KeyCode::Tab) => {
                self.focus = match field {
                    FormField::Title => Focus::Form(FormField::Desc),
                    FormField::Desc => Focus::List,
                };
            }
            (_, KeyCode::Char('s')) if ctrl => self.submit_form(),
            (FormField::Title, KeyCode::Enter) => self.submit_form(),
            (FormField::Desc, KeyCode::Enter) if ctrl => self.submit_form(),
            (FormField::Title, _) => input_single_line(&mut self.form.title, key),
            (FormField::Desc, _) => {
                self.form.desc.input(key);
            }
        }
    }

    /// Adds the form's task, then empties the form and refocuses the title.
    pub fn submit_form(&mut self) {
        let result = self
            .tasks
            .add(&contents(&self.form.title), &contents(&self.form.desc));
        self.report(result);
        self.form = TaskForm::default();
        self.focus = Focus::Form(FormField::Title);
    }

    fn handle_read_key(&mut self, key: KeyEvent) {
        let selected = self.tasks.view().selected_item().map(|i| i.id.clone());
        match key.code {
            KeyCode::Tab => self.focus = Focus::Form(FormField::Title),
            KeyCode::Up => self.tasks.view_mut().select_prev(),
            KeyCode::Down => self.tasks.view_mut().select_next(),
            KeyCode::Char(' ') => {
                if let Some(id) = selected {
                    let result = self.tasks.toggle_complete(&id);
                    self.report(result);
                }
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                let index = self.tasks.view().selected();
                self.tasks.view_mut().open_edit(index);
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = selected {
                    self.prompt = Some(Prompt::Confirm {
                        message: "Delete this task?",
                        action: PendingAction::Delete(id),
                    });
                }
            }
            KeyCode::Char('C') => self.confirm_clear_all(),
            _ => {}
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        let index = self.tasks.view().selected();
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        // Up/Down leave a title line but move inside a description.
        let on_title = self
            .tasks
            .view()
            .selected_item()
            .is_some_and(|item| match &item.mode {
                ItemMode::Edit(draft) => draft.field == EditField::Title,
                ItemMode::Read => false,
            });
        match key.code {
            KeyCode::Enter if ctrl || on_title => self.save_edit(index),
            KeyCode::Char('s') if ctrl => self.save_edit(index),
            KeyCode::Esc => self.tasks.cancel_edit(),
            KeyCode::Up if on_title => self.tasks.view_mut().select_prev(),
            KeyCode::Down if on_title => self.tasks.view_mut().select_next(),
            KeyCode::Char('t') if ctrl => {
                if let Some(id) = self.tasks.view().selected_item().map(|i| i.id.clone()) {
                    let result = self.tasks.toggle_complete(&id);
                    self.report(result);
                }
            }
            _ => {
                let Some(draft) = self
                    .tasks
                    .view_mut()
                    .selected_item_mut()
                    .and_then(ItemView::draft_mut)
                else {
                    return;
                };
                match (key.code, draft.field) {
                    (KeyCode::Tab, _) => draft.field = draft.field.next(),
                    (_, EditField::Title) => input_single_line(&mut draft.title, key),
                    (_, EditField::Desc) => {
                        draft.desc.input(key);
                    }
                }
            }
        }
    }

    fn save_edit(&mut self, index: usize) {
        match self.tasks.save_edit(index) {
            Ok(EditSave::Rejected) => self.prompt = Some(Prompt::Alert("Title cannot be empty")),
            Ok(EditSave::Saved | EditSave::NotEditing) => {}
            Err(err) => self.report(Err(err)),
        }
    }

    fn confirm_clear_all(&mut self) {
        self.prompt = Some(Prompt::Confirm {
            message: "Clear all tasks?",
            action: PendingAction::ClearAll,
        });
    }

    fn toggle_theme(&mut self) {
        let result = self.theme.toggle().map(|_| ());
        self.report(result);
    }

    /// Storage faults are not retried; they end the operation and are shown.
    fn report(&mut self, result: Result<()>) {
        match result {
            Ok(()) => self.status = None,
            Err(err) => {
                tracing::error!(error = %err, "operation failed");
                self.status = Some(format!("Save failed: {err}"));
            }
        }
    }
}
