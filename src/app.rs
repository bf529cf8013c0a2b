use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use tracing::debug;

use crate::layout::TargetId;
use crate::session::Session;
use crate::ui;

/// Longest number the player can type: enough for `MAX_TARGET_COUNT`
const MAX_INPUT_DIGITS: usize = 5;

/// What the event loop should do after an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Input handling on top of a [`Session`]; the presentation layer's state
#[derive(Debug)]
pub struct App {
    pub session: Session,
    /// Digits typed so far: a target id while playing, a target count otherwise
    pub number_input: String,
}

impl App {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            number_input: String::new(),
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Flow {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Flow::Quit;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Flow::Quit,
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if self.number_input.len() < MAX_INPUT_DIGITS {
                    self.number_input.push(c);
                }
            }
            KeyCode::Backspace => {
                self.number_input.pop();
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Char('p') => self.session.start(),
            KeyCode::Char('a') => self.session.toggle_autoplay(),
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Up => {
                let count = self.session.target_count().saturating_add(1);
                self.session.configure(count);
            }
            KeyCode::Char('-') | KeyCode::Down => {
                let count = self.session.target_count().saturating_sub(1);
                self.session.configure(count);
            }
            _ => {}
        }
        Flow::Continue
    }

    /// Left clicks on a target activate it. `area` is the whole frame.
    pub fn on_mouse(&mut self, mouse: MouseEvent, area: Rect) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let board = ui::board::board_rect(ui::board_area(area));
        let hit = ui::board::target_at(board, &self.session.snapshot(), mouse.column, mouse.row);
        if let Some(id) = hit {
            debug!(target_id = id, "clicked");
            self.session.activate(id);
        }
    }

    pub fn on_tick(&mut self, delta_ms: u32) {
        self.session.tick(delta_ms);
    }

    fn submit(&mut self) {
        let input = std::mem::take(&mut self.number_input);
        let Ok(number) = input.parse::<TargetId>() else {
            // empty buffer: Enter is the play/restart button
            self.session.start();
            return;
        };

        if self.session.phase().is_playing() {
            self.session.activate(number);
        } else {
            self.session.configure(number);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Outcome, Phase, Tuning};

    fn app(count: u32) -> App {
        let mut session = Session::with_seed(Tuning::default(), 11);
        session.configure(count);
        App::new(session)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_number(app: &mut App, n: u32) {
        for c in n.to_string().chars() {
            app.on_key(key(KeyCode::Char(c)));
        }
        app.on_key(key(KeyCode::Enter));
    }

    fn click(col: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: col,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_quit_keys() {
        let mut a = app(3);
        assert_eq!(a.on_key(key(KeyCode::Esc)), Flow::Quit);
        assert_eq!(a.on_key(key(KeyCode::Char('q'))), Flow::Quit);
        assert_eq!(
            a.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Flow::Quit
        );
        assert_eq!(a.on_key(key(KeyCode::Char('x'))), Flow::Continue);
    }

    #[test]
    fn test_enter_with_empty_input_starts() {
        let mut a = app(3);
        a.on_key(key(KeyCode::Enter));
        assert_eq!(a.session.phase(), Phase::Playing);
    }

    #[test]
    fn test_typed_number_configures_when_idle() {
        let mut a = app(3);
        type_number(&mut a, 12);
        assert_eq!(a.session.target_count(), 12);
        assert_eq!(a.session.phase(), Phase::Idle);
        assert!(a.number_input.is_empty());
    }

    #[test]
    fn test_typed_number_activates_when_playing() {
        let mut a = app(3);
        a.on_key(key(KeyCode::Char('p')));
        type_number(&mut a, 1);
        assert_eq!(a.session.expected_next(), 2);
        type_number(&mut a, 3);
        assert_eq!(a.session.phase(), Phase::Ended(Outcome::Failed));
    }

    #[test]
    fn test_backspace_and_digit_limit() {
        let mut a = app(3);
        for _ in 0..8 {
            a.on_key(key(KeyCode::Char('9')));
        }
        assert_eq!(a.number_input, "99999");
        a.on_key(key(KeyCode::Backspace));
        assert_eq!(a.number_input, "9999");
    }

    #[test]
    fn test_plus_minus_adjust_count() {
        let mut a = app(1);
        a.on_key(key(KeyCode::Char('-')));
        assert_eq!(a.session.target_count(), 1);
        a.on_key(key(KeyCode::Char('+')));
        assert_eq!(a.session.target_count(), 2);
    }

    #[test]
    fn test_autoplay_key() {
        let mut a = app(3);
        a.on_key(key(KeyCode::Char('a')));
        assert!(!a.session.autoplay());
        a.on_key(key(KeyCode::Enter));
        a.on_key(key(KeyCode::Char('a')));
        assert!(a.session.autoplay());
    }

    #[test]
    fn test_click_activates_target_under_cursor() {
        let mut a = app(3);
        a.session.start();
        let area = Rect::new(0, 0, 80, 30);
        let board = ui::board::board_rect(ui::board_area(area));
        let inner = ui::board::inner(board);

        let first = *a
            .session
            .targets()
            .iter()
            .find(|t| t.id == 1)
            .expect("target 1");
        let rect = ui::board::label_rect(inner, &first);

        a.on_mouse(click(rect.x, rect.y), area);
        assert_eq!(a.session.activated(), &[1]);
    }

    #[test]
    fn test_click_on_empty_cell_does_nothing() {
        let mut a = app(3);
        a.session.start();
        a.on_mouse(click(0, 0), Rect::new(0, 0, 80, 30));
        assert!(a.session.activated().is_empty());
    }

    #[test]
    fn test_ignores_non_left_clicks() {
        let mut a = app(1);
        a.session.start();
        let area = Rect::new(0, 0, 80, 30);
        let board = ui::board::board_rect(ui::board_area(area));
        let rect = ui::board::label_rect(ui::board::inner(board), &a.session.targets()[0]);
        a.on_mouse(
            MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Right),
                column: rect.x,
                row: rect.y,
                modifiers: KeyModifiers::NONE,
            },
            area,
        );
        assert!(a.session.activated().is_empty());
    }
}
