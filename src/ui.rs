pub mod board;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::snapshot::{Banner, Snapshot};
use crate::App;

const HORIZONTAL_MARGIN: u16 = 2;

const ORANGE: Color = Color::Rgb(255, 165, 0);

/// Opacity below which a fading target is drawn dim
const DIM_BELOW: f64 = 0.5;

fn sections(area: Rect) -> [Rect; 6] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(1), // banner
            Constraint::Length(1), // points / time / input
            Constraint::Length(1), // controls
            Constraint::Min(3),    // board
            Constraint::Length(1), // next
            Constraint::Length(1), // legend
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2], chunks[3], chunks[4], chunks[5]]
}

/// Region the board is fitted into, for a frame of size `area`
pub fn board_area(area: Rect) -> Rect {
    sections(area)[3]
}

fn banner_style(banner: Banner) -> Style {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    match banner {
        Banner::LetsPlay => bold,
        Banner::AllCleared => bold.fg(Color::Green),
        Banner::GameOver => bold.fg(ORANGE),
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let snapshot = self.session.snapshot();
        let [banner, status, controls, board_area, next, legend] = sections(area);

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let headline = snapshot.banner();
        Paragraph::new(Span::styled(headline.text(), banner_style(headline))).render(banner, buf);

        let mut status_spans = vec![
            Span::styled("Points: ", dim_style),
            Span::styled(snapshot.target_count.to_string(), bold_style),
            Span::raw("   "),
            Span::styled("Time: ", dim_style),
            Span::styled(snapshot.elapsed_label(), bold_style),
        ];
        if let Some(hits) = snapshot.hits_label() {
            status_spans.push(Span::raw("   "));
            status_spans.push(Span::styled("Hits: ", dim_style));
            status_spans.push(Span::styled(hits, bold_style));
        }
        if !self.number_input.is_empty() {
            status_spans.push(Span::raw("   "));
            status_spans.push(Span::styled("> ", dim_style));
            status_spans.push(Span::styled(
                format!("{}_", self.number_input),
                bold_style.fg(Color::Cyan),
            ));
        }
        Paragraph::new(Line::from(status_spans)).render(status, buf);

        let mut control_spans = vec![Span::styled(
            format!("[enter] {}", snapshot.start_label()),
            bold_style,
        )];
        if let Some(label) = snapshot.autoplay_label() {
            control_spans.push(Span::raw("   "));
            control_spans.push(Span::styled(format!("[a] {label}"), bold_style));
        }
        Paragraph::new(Line::from(control_spans)).render(controls, buf);

        render_board(&snapshot, board::board_rect(board_area), buf);

        if let Some(label) = snapshot.next_label() {
            Paragraph::new(Span::raw(label)).render(next, buf);
        }

        Paragraph::new(Span::styled(
            "click a target or type its number + enter / (+/-) points / (esc)ape",
            italic_style,
        ))
        .alignment(Alignment::Center)
        .render(legend, buf);
    }
}

fn target_style(snapshot: &Snapshot<'_>, id: u32) -> Style {
    let base = Style::default().add_modifier(Modifier::BOLD);
    let mut style = if snapshot.is_activated(id) {
        base.fg(Color::White).bg(Color::Red)
    } else {
        base.fg(Color::Gray)
    };

    if !snapshot.is_playing() || snapshot.opacity(id) < DIM_BELOW {
        style = style.add_modifier(Modifier::DIM);
    }
    style
}

/// Draw every visible target, last generated on top
fn render_board(snapshot: &Snapshot<'_>, board: Rect, buf: &mut Buffer) {
    Block::default().borders(Borders::ALL).render(board, buf);

    let inner = board::inner(board);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    for target in snapshot.visible_targets() {
        let style = target_style(snapshot, target.id);
        let label = board::label(target.id);
        let rect = board::centered_span(inner, board::anchor(inner, target), &label);
        buf.set_stringn(rect.x, rect.y, &label, rect.width as usize, style);

        if let Some(countdown) = snapshot.countdown_label(target.id) {
            // under the label, or above it on the bottom row
            let row = if rect.y + 1 < inner.y + inner.height {
                Some(rect.y + 1)
            } else {
                rect.y.checked_sub(1).filter(|row| *row >= inner.y)
            };
            if let Some(row) = row {
                let pos = ratatui::layout::Position {
                    x: rect.x + rect.width / 2,
                    y: row,
                };
                let rect = board::centered_span(inner, pos, &countdown);
                buf.set_stringn(
                    rect.x,
                    rect.y,
                    &countdown,
                    rect.width as usize,
                    Style::default().add_modifier(Modifier::DIM),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Session, Tuning};

    fn create_test_app(count: u32) -> App {
        let mut session = Session::with_seed(Tuning::default(), 5);
        session.configure(count);
        App::new(session)
    }

    fn rendered(app: &App, area: Rect) -> String {
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_idle_screen() {
        let app = create_test_app(4);
        let text = rendered(&app, Rect::new(0, 0, 80, 24));
        assert!(text.contains("LET'S PLAY"));
        assert!(text.contains("Points: 4"));
        assert!(text.contains("Time: 0.0s"));
        assert!(text.contains("[enter] Play"));
        assert!(!text.contains("Auto Play"));
        assert!(!text.contains("Next:"));
        assert!(!text.contains("Hits:"));
    }

    #[test]
    fn test_playing_screen_shows_targets() {
        let mut app = create_test_app(3);
        app.session.start();
        let text = rendered(&app, Rect::new(0, 0, 80, 24));
        assert!(text.contains("Restart"));
        assert!(text.contains("[a] Auto Play OFF"));
        assert!(text.contains("Next: 1"));
        assert!(text.contains("Hits: 0/3"));
        assert!(text.contains("[1]"));
    }

    #[test]
    fn test_activated_target_shows_countdown() {
        let mut app = create_test_app(1);
        app.session.start();
        app.session.activate(1);
        app.session.tick(500);
        let text = rendered(&app, Rect::new(0, 0, 80, 24));
        assert!(text.contains("2.0s"));
    }

    #[test]
    fn test_faded_target_is_not_drawn() {
        let mut app = create_test_app(2);
        app.session.start();
        app.session.activate(1);
        app.session.tick(1500);
        let text = rendered(&app, Rect::new(0, 0, 80, 24));
        assert!(!text.contains("[1]"));
        assert!(text.contains("[2]"));
    }

    #[test]
    fn test_game_over_banner() {
        let mut app = create_test_app(3);
        app.session.start();
        app.session.activate(2);
        let text = rendered(&app, Rect::new(0, 0, 80, 24));
        assert!(text.contains("GAME OVER"));
        assert!(!text.contains("Next:"));
    }

    #[test]
    fn test_number_input_echoed() {
        let mut app = create_test_app(3);
        app.number_input = "42".into();
        let text = rendered(&app, Rect::new(0, 0, 80, 24));
        assert!(text.contains("42_"));
    }

    #[test]
    fn test_extreme_sizes() {
        let mut app = create_test_app(50);
        app.session.start();

        for area in [
            Rect::new(0, 0, 10, 5),
            Rect::new(0, 0, 3, 3),
            Rect::new(0, 0, 300, 120),
        ] {
            let mut buffer = Buffer::empty(area);
            (&app).render(area, &mut buffer);
            assert!(*buffer.area() == area);
        }
    }

    #[test]
    fn test_banner_styles() {
        assert_eq!(banner_style(Banner::AllCleared).fg, Some(Color::Green));
        assert_eq!(banner_style(Banner::GameOver).fg, Some(ORANGE));
        assert_eq!(banner_style(Banner::LetsPlay).fg, None);
    }
}
