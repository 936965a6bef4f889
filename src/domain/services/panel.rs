#[cfg(test)]
#[path = "panel_test.rs"]
mod tests;

use ratatui::prelude::Backend;
use ratatui::prelude::Rect;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Padding;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Wrap;
use ratatui::Frame;

use super::Submission;

/// Status line plus the encouragement block, which only shows up once a
/// session has produced one.
pub struct Panel<'a> {
    status: &'a str,
    encouragement: &'a str,
}

impl<'a> Panel<'a> {
    pub fn new(submission: &'a Submission) -> Panel<'a> {
        return Panel {
            status: submission.status(),
            encouragement: submission.encouragement(),
        };
    }

    pub fn lines(&self) -> Vec<Line<'a>> {
        let mut lines = vec![Line::from(self.status)];

        if !self.encouragement.is_empty() {
            lines.push(Line::from(""));
            for text in self.encouragement.split('\n') {
                lines.push(Line::from(Span::styled(
                    text,
                    Style::default().add_modifier(Modifier::BOLD),
                )));
            }
        }

        return lines;
    }

    pub fn render<B: Backend>(&self, frame: &mut Frame<B>, rect: Rect) {
        frame.render_widget(
            Paragraph::new(self.lines())
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .padding(Padding::new(1, 1, 0, 0)),
                )
                .wrap(Wrap { trim: false }),
            rect,
        );
    }
}
