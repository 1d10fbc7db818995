use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
    Frame,
};

use clack::{
    viewport::{line_of, wrap_lines},
    Mark, Phase, SessionDuration,
};

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const ACTIVE_WORD_BG: Color = Color::Rgb(34, 44, 62);

/// Width available to the wrapped text for a terminal `total` columns wide.
pub fn text_width(total: u16) -> usize {
    total.saturating_sub(HORIZONTAL_MARGIN * 2).max(1) as usize
}

pub fn draw(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let visible_lines = self.scroll.visible_lines() as u16;
        let used = 2 + 1 + visible_lines + 1 + 1;
        let pad = area.height.saturating_sub(used) / 2;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(pad),
                Constraint::Length(1), // live stats
                Constraint::Length(1), // duration picker
                Constraint::Length(1),
                Constraint::Length(visible_lines),
                Constraint::Length(1),
                Constraint::Length(1), // legend
                Constraint::Min(0),
            ])
            .split(area);

        let metrics = self.test.metrics();
        let stats = Paragraph::new(Span::styled(
            format!(
                "{}s   {} wpm   {} cpm   {}% acc",
                metrics.time_left, metrics.wpm, metrics.cpm, metrics.accuracy
            ),
            bold_style,
        ))
        .alignment(Alignment::Center);
        stats.render(chunks[1], buf);

        let picker = SessionDuration::ALL
            .iter()
            .flat_map(|d| {
                let style = if *d == self.selected {
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                } else {
                    dim_style
                };
                [Span::styled(d.to_string(), style), Span::raw("  ")]
            })
            .collect::<Vec<Span>>();
        Paragraph::new(Line::from(picker))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);

        render_text(self, chunks[4], buf);

        let legend = match self.test.phase() {
            Phase::NotStarted => "(enter) start / ←→ duration / (esc)ape",
            Phase::Running => "type the words / (backspace) fix / (esc)ape",
            Phase::Over => "(enter) or (r)estart / ←→ duration / (esc)ape",
        };
        Paragraph::new(Span::styled(legend, italic_style)).render(chunks[6], buf);

        if self.show_results && self.test.status().is_over {
            render_results(self, area, buf);
        }
    }
}

fn render_text(app: &App, area: Rect, buf: &mut Buffer) {
    let sequence = app.test.sequence();
    let cursor = app.test.state().cursor;
    let chars = sequence.chars();
    let lines = wrap_lines(chars, area.width as usize);
    let active_word = sequence.word_at(cursor);

    let base = if app.revealed {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        // hidden behind a dim veil until the user starts
        Style::default().add_modifier(Modifier::DIM)
    };
    let pending_style = base.patch(Style::default().add_modifier(Modifier::DIM));

    let top = app.scroll.top_line().min(line_of(&lines, chars.len()));
    let text = lines
        .iter()
        .skip(top)
        .take(app.scroll.visible_lines())
        .map(|range| {
            let spans = range
                .clone()
                .map(|idx| {
                    let expected = chars[idx];
                    let mut style = match sequence.mark(idx) {
                        Mark::Correct => base.fg(Color::Green),
                        Mark::Incorrect => base.fg(Color::Red),
                        Mark::Unmarked => pending_style,
                    };
                    if active_word.as_ref().is_some_and(|w| w.contains(&idx)) {
                        style = style.bg(ACTIVE_WORD_BG);
                    }
                    if idx == cursor && !app.test.status().is_over {
                        style = style.add_modifier(Modifier::UNDERLINED);
                    }
                    let symbol = match (expected, sequence.mark(idx)) {
                        (' ', Mark::Incorrect) => '·',
                        (c, _) => c,
                    };
                    Span::styled(symbol.to_string(), style)
                })
                .collect::<Vec<Span>>();
            Line::from(spans)
        })
        .collect::<Vec<Line>>();

    Paragraph::new(text).render(area, buf);
}

fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let width = 36.min(area.width);
    let height = 7.min(area.height);
    let popup = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };

    let metrics = app.test.metrics();
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(Span::styled(format!("{} wpm", metrics.wpm), bold_style)),
        Line::from(Span::styled(format!("{} cpm", metrics.cpm), bold_style)),
        Line::from(Span::styled(
            format!("{}% accuracy", metrics.accuracy),
            bold_style,
        )),
        Line::from(Span::styled(
            "(r)estart / (c)lose",
            Style::default().add_modifier(Modifier::ITALIC),
        )),
    ];

    Clear.render(popup, buf);
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} results ", app.test.duration())),
        )
        .render(popup, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clack::config::Config;
    use clack::language::Language;
    use ratatui::{backend::TestBackend, Terminal};

    fn create_test_app() -> App {
        App::new(Language::builtin("english").unwrap(), Config::default())
    }

    fn rendered(app: &App, area: Rect) -> String {
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_text_width() {
        assert_eq!(text_width(80), 70);
        assert_eq!(text_width(4), 1);
    }

    #[test]
    fn test_fresh_app_shows_initial_stats() {
        let app = create_test_app();
        let out = rendered(&app, Rect::new(0, 0, 80, 24));

        assert!(out.contains("60s   0 wpm   0 cpm   100% acc"));
        assert!(out.contains("(enter) start"));
    }

    #[test]
    fn test_renders_start_of_text() {
        let app = create_test_app();
        let first_word: String = app
            .test
            .sequence()
            .chars()
            .iter()
            .take_while(|c| **c != ' ')
            .collect();
        let out = rendered(&app, Rect::new(0, 0, 80, 24));
        assert!(out.contains(&first_word));
    }

    #[test]
    fn test_incorrect_space_is_visible() {
        let mut app = create_test_app();
        let word_len = app
            .test
            .sequence()
            .chars()
            .iter()
            .position(|c| *c == ' ')
            .unwrap();
        for _ in 0..word_len {
            let c = app.test.sequence().expected(app.test.state().cursor).unwrap();
            app.test.forward_keystroke(c);
        }
        app.test.forward_keystroke('x');

        let out = rendered(&app, Rect::new(0, 0, 80, 24));
        assert!(out.contains('·'));
        assert!(out.contains("type the words"));
    }

    #[test]
    fn test_results_overlay() {
        let mut app = create_test_app();
        app.test.forward_keystroke('#');
        app.test.force_over();
        app.sync(std::time::Instant::now());

        let out = rendered(&app, Rect::new(0, 0, 80, 24));
        assert!(out.contains("60s results"));
        assert!(out.contains("0% accuracy"));

        app.show_results = false;
        let out = rendered(&app, Rect::new(0, 0, 80, 24));
        assert!(!out.contains("60s results"));
        assert!(out.contains("(r)estart"));
    }

    #[test]
    fn test_tiny_and_huge_areas() {
        let app = create_test_app();
        for area in [
            Rect::new(0, 0, 1, 1),
            Rect::new(0, 0, 12, 4),
            Rect::new(0, 0, 300, 80),
        ] {
            let mut buffer = Buffer::empty(area);
            (&app).render(area, &mut buffer);
            assert_eq!(*buffer.area(), area);
        }
    }

    #[test]
    fn test_draw_through_terminal() {
        let app = create_test_app();
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| draw(&app, f)).unwrap();

        let content: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(content.contains("wpm"));
    }
}
