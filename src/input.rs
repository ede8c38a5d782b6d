//! Helpers around `tui_textarea::TextArea` for the task form and edit drafts.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Block;
use tui_textarea::{CursorMove, TextArea};

/// Text area holding `value`, cursor at the end of the last line.
pub fn text_area(value: &str) -> TextArea<'static> {
    let mut area = TextArea::from(value.lines());
    area.move_cursor(CursorMove::Bottom);
    area.move_cursor(CursorMove::End);
    area
}

/// Lines joined with `\n`.
pub fn contents(area: &TextArea) -> String {
    area.lines().join("\n")
}

/// Feeds a key to a single-line field; keys that would break the line are dropped.
pub fn input_single_line(area: &mut TextArea, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => {}
        KeyCode::Char('m' | 'j') if ctrl => {}
        _ => {
            area.input(key);
        }
    }
}

/// Copy of `area` styled for one frame; only the focused one shows a cursor.
pub fn styled<'a>(
    area: &TextArea<'a>,
    style: Style,
    focused: bool,
    block: Option<Block<'a>>,
) -> TextArea<'a> {
    let mut area = area.clone();
    area.set_style(style);
    area.set_cursor_line_style(Style::default());
    if focused {
        area.set_cursor_style(Style::default().add_modifier(Modifier::REVERSED));
    } else {
        area.set_cursor_style(style);
    }
    if let Some(block) = block {
        area.set_block(block);
    }
    area
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_lines_and_puts_cursor_at_end() {
        let area = text_area("line one\nline two");
        assert_eq!(area.lines(), ["line one", "line two"]);
        assert_eq!(area.cursor(), (1, 8));
        assert_eq!(contents(&area), "line one\nline two");
    }

    #[test]
    fn empty_value_gives_one_empty_line() {
        let area = text_area("");
        assert_eq!(area.lines().len(), 1);
        assert_eq!(contents(&area), "");
    }

    #[test]
    fn single_line_field_ignores_newline_keys() {
        let mut area = text_area("title");
        input_single_line(&mut area, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        input_single_line(&mut area, KeyEvent::new(KeyCode::Char('j'), KeyModifiers::CONTROL));
        input_single_line(&mut area, KeyEvent::new(KeyCode::Char('!'), KeyModifiers::NONE));
        assert_eq!(area.lines(), ["title!"]);
    }

    #[test]
    fn typing_appends_at_cursor() {
        let mut area = text_area("caf");
        area.insert_char('é');
        area.insert_newline();
        area.insert_str("au lait");
        assert_eq!(contents(&area), "café\nau lait");
    }
}
