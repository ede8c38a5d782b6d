use crate::app::{App, Focus, FormField, Prompt};
use crate::controls::{Section, Theme};
use crate::input::styled;
use crate::list_view::{EditDraft, EditField, ItemMode, ItemView, ListView};
use crate::storage::KeyValueStore;
use chrono::{Datelike, Local};
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy)]
struct Palette {
    fg: Color,
    bg: Color,
    accent: Color,
    muted: Color,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                fg: Color::White,
                bg: Color::Black,
                accent: Color::Cyan,
                muted: Color::DarkGray,
            },
            Theme::Light => Self {
                fg: Color::Black,
                bg: Color::White,
                accent: Color::Blue,
                muted: Color::Gray,
            },
        }
    }

    fn base(self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }
}

pub fn run_app<B: Backend, S: KeyValueStore>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
) -> io::Result<()> {
    while !app.should_quit {
        terminal.draw(|f| draw(f, app))?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
            Event::Mouse(mouse) => app.handle_mouse(mouse),
            _ => {}
        }
    }
    Ok(())
}

pub fn draw<S: KeyValueStore>(f: &mut Frame, app: &mut App<S>) {
    let palette = Palette::for_theme(app.theme.theme());
    f.render_widget(Block::default().style(palette.base()), f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(f, app, palette, chunks[0]);
    app.hits.clear_all = None;
    app.hits.panel_headers.clear();
    match app.section {
        Section::Home => draw_home(f, app, palette, chunks[1]),
        Section::Projects => draw_projects(f, app, palette, chunks[1]),
        Section::Tasks => draw_tasks(f, app, palette, chunks[1]),
    }
    draw_footer(f, app, palette, chunks[2]);

    app.hits.nav_menu = None;
    if app.nav.is_active() {
        draw_nav_menu(f, app, palette, chunks[1]);
    }
    if let Some(prompt) = &app.prompt {
        draw_prompt(f, prompt, palette);
    }
}

fn draw_header<S: KeyValueStore>(f: &mut Frame, app: &mut App<S>, palette: Palette, area: Rect) {
    let toggle_label = format!(" ☰ Menu [{}] ", app.nav.aria_expanded());
    let theme_label = format!(" {} ", app.theme.icon());
    let toggle_width = toggle_label.chars().count() as u16;
    let theme_width = 4;

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Length(toggle_width),
            Constraint::Min(1),
            Constraint::Length(theme_width),
        ])
        .split(area);

    let toggle_style = if app.nav.is_active() {
        Style::default().fg(palette.bg).bg(palette.accent)
    } else {
        Style::default().fg(palette.accent)
    };
    f.render_widget(Paragraph::new(Span::styled(toggle_label, toggle_style)), chunks[0]);

    let title = Line::from(vec![
        Span::styled(
            app.config.owner.as_str(),
            Style::default().fg(palette.fg).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" · {}", app.config.tagline),
            Style::default().fg(palette.muted),
        ),
    ]);
    f.render_widget(Paragraph::new(title).alignment(Alignment::Center), chunks[1]);
    f.render_widget(Paragraph::new(theme_label), chunks[2]);

    app.hits.nav_toggle = chunks[0];
    app.hits.theme_toggle = chunks[2];
}

fn draw_home<S>(f: &mut Frame, app: &App<S>, palette: Palette, area: Rect) {
    let text = vec![
        Line::from(Span::styled(
            format!("Hi, I'm {}.", app.config.owner),
            Style::default().fg(palette.fg).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            app.config.tagline.as_str(),
            Style::default().fg(palette.fg),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "1 Home · 2 Projects · 3 Tasks",
            Style::default().fg(palette.muted),
        )),
    ];
    let paragraph = Paragraph::new(text)
        .block(section_block(Section::Home, palette))
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn draw_projects<S>(f: &mut Frame, app: &mut App<S>, palette: Palette, area: Rect) {
    let block = section_block(Section::Projects, palette);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut y = inner.y;
    let bottom = inner.y + inner.height;
    for (i, panel) in app.panels.panels().iter().enumerate() {
        if y >= bottom {
            break;
        }
        let open = app.panels.is_open(i);
        let marker = if open { "▾" } else { "▸" };
        let mut style = Style::default().fg(palette.fg);
        if i == app.panel_cursor {
            style = style.fg(palette.accent).add_modifier(Modifier::BOLD);
        }
        let header = Rect::new(inner.x, y, inner.width, 1);
        f.render_widget(
            Paragraph::new(Span::styled(format!("{marker} {}", panel.title), style)),
            header,
        );
        app.hits.panel_headers.push(header);
        y += 1;

        if open && y < bottom {
            let body_height = (bottom - y).min(3);
            let body = Rect::new(inner.x + 2, y, inner.width.saturating_sub(2), body_height);
            f.render_widget(
                Paragraph::new(panel.body.as_str())
                    .style(Style::default().fg(palette.muted))
                    .wrap(Wrap { trim: true }),
                body,
            );
            y += body_height;
        }
    }
}

fn draw_tasks<S: KeyValueStore>(f: &mut Frame, app: &mut App<S>, palette: Palette, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Min(3),
        ])
        .split(area);

    let field_style = Style::default().fg(palette.fg);
    let title_focused = app.focus == Focus::Form(FormField::Title);
    let desc_focused = app.focus == Focus::Form(FormField::Desc);
    let title = styled(
        &app.form.title,
        field_style,
        title_focused,
        Some(input_block("New task", title_focused, palette)),
    );
    f.render_widget(&title, chunks[0]);
    let desc = styled(
        &app.form.desc,
        field_style,
        desc_focused,
        Some(input_block("Description (Ctrl+S to add)", desc_focused, palette)),
    );
    f.render_widget(&desc, chunks[1]);

    let counts = app.tasks.view().counts();
    let clear_label = " [Clear all] ";
    let counter_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Min(1),
            Constraint::Length(clear_label.chars().count() as u16),
        ])
        .split(chunks[2]);
    f.render_widget(
        Paragraph::new(format!(
            "Total: {}  Completed: {}",
            counts.total, counts.completed
        ))
        .style(Style::default().fg(palette.fg)),
        counter_chunks[0],
    );
    f.render_widget(
        Paragraph::new(Span::styled(clear_label, Style::default().fg(Color::Red))),
        counter_chunks[1],
    );
    app.hits.clear_all = Some(counter_chunks[1]);

    let list_focused = app.focus == Focus::List;
    let block = section_block(Section::Tasks, palette).border_style(if list_focused {
        Style::default().fg(palette.accent)
    } else {
        Style::default().fg(palette.muted)
    });
    let inner = block.inner(chunks[3]);
    f.render_widget(block, chunks[3]);
    draw_items(f, app.tasks.view(), list_focused, palette, inner);
}

/// Rows an item takes: title, description lines and, while editing, the key hint.
fn item_height(item: &ItemView) -> u16 {
    let rows = match &item.mode {
        ItemMode::Read => 1 + item.desc.lines().count(),
        ItemMode::Edit(draft) => 2 + draft.desc.lines().len(),
    };
    rows as u16
}

fn draw_items(f: &mut Frame, view: &ListView, focused: bool, palette: Palette, area: Rect) {
    let items = view.items();
    if items.is_empty() {
        return;
    }
    let selected = view.selected();
    let heights: Vec<u16> = items.iter().map(item_height).collect();
    let mut first = 0;
    while first < selected && heights[first..=selected].iter().sum::<u16>() > area.height {
        first += 1;
    }

    let mut y = area.y;
    for (i, item) in items.iter().enumerate().skip(first) {
        if y >= area.bottom() {
            break;
        }
        let height = heights[i].min(area.bottom() - y);
        let rect = Rect::new(area.x, y, area.width, height);
        let current = focused && i == selected;
        match &item.mode {
            ItemMode::Read => draw_read_item(f, item, current, palette, rect),
            ItemMode::Edit(draft) => draw_edit_item(f, item, draft, current, palette, rect),
        }
        y += height;
    }
}

fn marker(current: bool) -> &'static str {
    if current {
        "› "
    } else {
        "  "
    }
}

fn checkbox(item: &ItemView) -> &'static str {
    if item.completed {
        "[x] "
    } else {
        "[ ] "
    }
}

fn draw_read_item(f: &mut Frame, item: &ItemView, current: bool, palette: Palette, area: Rect) {
    let mut title_style = Style::default().fg(palette.fg);
    if item.completed {
        title_style = title_style
            .fg(palette.muted)
            .add_modifier(Modifier::CROSSED_OUT);
    }
    if current {
        title_style = title_style.add_modifier(Modifier::BOLD);
    }
    let mut lines = vec![Line::from(vec![
        Span::raw(marker(current)),
        Span::raw(checkbox(item)),
        Span::styled(item.title.as_str(), title_style),
        Span::styled("  ✏️ e  🗑️ d", Style::default().fg(palette.muted)),
    ])];
    for desc_line in item.desc.lines() {
        lines.push(Line::from(Span::styled(
            format!("      {desc_line}"),
            Style::default().fg(palette.muted),
        )));
    }
    f.render_widget(Paragraph::new(lines), area);
}

fn draw_edit_item(
    f: &mut Frame,
    item: &ItemView,
    draft: &EditDraft,
    current: bool,
    palette: Palette,
    area: Rect,
) {
    let prefix = format!("{}{}", marker(current), checkbox(item));
    let indent = (prefix.chars().count() as u16).min(area.width);
    f.render_widget(
        Paragraph::new(prefix),
        Rect::new(area.x, area.y, indent, 1),
    );

    let field_x = area.x + indent;
    let field_width = area.width - indent;
    let field_style = |field: EditField| {
        if draft.field == field {
            Style::default().fg(palette.accent).add_modifier(Modifier::UNDERLINED)
        } else {
            Style::default().fg(palette.fg)
        }
    };
    let title = styled(
        &draft.title,
        field_style(EditField::Title),
        current && draft.field == EditField::Title,
        None,
    );
    f.render_widget(&title, Rect::new(field_x, area.y, field_width, 1));

    let desc_height = (draft.desc.lines().len() as u16).min(area.height.saturating_sub(1));
    if desc_height > 0 {
        let desc = styled(
            &draft.desc,
            field_style(EditField::Desc),
            current && draft.field == EditField::Desc,
            None,
        );
        f.render_widget(&desc, Rect::new(field_x, area.y + 1, field_width, desc_height));
    }

    let hint_y = area.y + 1 + desc_height;
    if hint_y < area.bottom() {
        f.render_widget(
            Paragraph::new(Span::styled(
                "💾 Ctrl+S  ✖ Esc  Tab field  ✔ Ctrl+T",
                Style::default().fg(palette.muted),
            )),
            Rect::new(field_x, hint_y, field_width, 1),
        );
    }
}

fn input_block(title: &'static str, focused: bool, palette: Palette) -> Block<'static> {
    let border = if focused { palette.accent } else { palette.muted };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
}

fn draw_nav_menu<S>(f: &mut Frame, app: &mut App<S>, palette: Palette, body: Rect) {
    let height = Section::ALL.len() as u16 + 2;
    let area = Rect::new(body.x, body.y, 14.min(body.width), height.min(body.height));
    let items: Vec<ListItem> = Section::ALL
        .iter()
        .map(|s| ListItem::new(s.label()))
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.accent)),
        )
        .style(palette.base())
        .highlight_style(Style::default().fg(palette.bg).bg(palette.accent));
    let mut state = ListState::default();
    state.select(Some(app.nav.highlighted()));

    f.render_widget(Clear, area);
    f.render_stateful_widget(list, area, &mut state);
    app.hits.nav_menu = Some(area);
}

fn draw_prompt(f: &mut Frame, prompt: &Prompt, palette: Palette) {
    let (title, message, hint) = match prompt {
        Prompt::Confirm { message, .. } => ("Confirm", *message, "y / n"),
        Prompt::Alert(message) => ("Alert", *message, "any key"),
    };
    let area = centered(f.area(), 40, 5);
    let paragraph = Paragraph::new(vec![
        Line::from(message),
        Line::from(Span::styled(hint, Style::default().fg(palette.muted))),
    ])
    .alignment(Alignment::Center)
    .style(palette.base())
    .block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.accent)),
    );
    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}

fn draw_footer<S>(f: &mut Frame, app: &App<S>, palette: Palette, area: Rect) {
    let line = match &app.status {
        Some(status) => Line::from(Span::styled(status.as_str(), Style::default().fg(Color::Red))),
        None => Line::from(Span::styled(
            format!(
                "© {} {} · F2 menu · F3 theme · q quit",
                Local::now().year(),
                app.config.owner
            ),
            Style::default().fg(palette.muted),
        )),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn section_block(section: Section, palette: Palette) -> Block<'static> {
    Block::default()
        .title(section.label())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.muted))
        .style(Style::default().fg(palette.fg))
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::storage::MemoryStore;
    use ratatui::backend::TestBackend;

    fn screen(app: &mut App<MemoryStore>) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn tasks_section_shows_counters_and_items() {
        let mut app = App::new(Config::default(), MemoryStore::new());
        app.section = Section::Tasks;
        app.tasks.add("Buy milk", "2%").unwrap();
        let text = screen(&mut app);
        assert!(text.contains("Buy milk"));
        assert!(text.contains("Total: 1  Completed: 0"));
        assert!(app.hits.clear_all.is_some());
    }

    fn rows(app: &mut App<MemoryStore>) -> Vec<String> {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .chunks(80)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect())
            .collect()
    }

    #[test]
    fn multi_line_description_keeps_its_rows() {
        let mut app = App::new(Config::default(), MemoryStore::new());
        app.section = Section::Tasks;
        app.tasks.add("Plan", "line one\nline two").unwrap();

        let read = rows(&mut app);
        let at = read.iter().position(|r| r.contains("line one")).unwrap();
        assert!(read[at + 1].contains("line two"));

        app.focus = Focus::List;
        app.tasks.view_mut().open_edit(0);
        let edit = rows(&mut app);
        let at = edit.iter().position(|r| r.contains("line one")).unwrap();
        assert!(!edit[at].contains("line two"));
        assert!(edit[at + 1].contains("line two"));
        assert!(edit[at + 2].contains("Ctrl+S"));
    }

    #[test]
    fn header_reflects_nav_state_and_records_hit_areas() {
        let mut app = App::new(Config::default(), MemoryStore::new());
        app.nav.toggle();
        let text = screen(&mut app);
        assert!(text.contains("Menu [true]"));
        assert!(text.contains("Projects"));
        assert!(app.hits.nav_menu.is_some());
        assert_eq!(app.hits.nav_toggle.y, 0);
    }

    #[test]
    fn open_panel_shows_its_body() {
        let mut app = App::new(Config::default(), MemoryStore::new());
        app.section = Section::Projects;
        app.panels.toggle(0);
        let text = screen(&mut app);
        assert!(text.contains("local storage"));
        assert_eq!(app.hits.panel_headers.len(), 2);
    }

    #[test]
    fn prompt_is_drawn_over_the_page() {
        let mut app = App::new(Config::default(), MemoryStore::new());
        app.prompt = Some(Prompt::Alert("Title cannot be empty"));
        let text = screen(&mut app);
        assert!(text.contains("Title cannot be empty"));
    }
}
