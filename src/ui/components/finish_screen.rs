use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::quiz::state::QuizState;
use crate::ui::theme::Theme;

pub fn percentage(score: u32, max: u32) -> f64 {
    if max == 0 {
        return 0.0;
    }
    score as f64 / max as f64 * 100.0
}

pub fn verdict(percent: f64) -> &'static str {
    if percent >= 100.0 {
        "Perfect!"
    } else if percent >= 80.0 {
        "Excellent"
    } else if percent >= 50.0 {
        "Not bad"
    } else if percent > 0.0 {
        "Keep practicing"
    } else {
        "Better luck next time"
    }
}

pub struct FinishScreen<'a> {
    pub state: &'a QuizState,
    pub theme: &'a Theme,
}

impl<'a> FinishScreen<'a> {
    pub fn new(state: &'a QuizState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }
}

impl Widget for FinishScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Quiz Complete ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(2),
            ])
            .split(inner);

        let max = self.state.max_possible_points();
        let percent = percentage(self.state.score, max);

        let title = Paragraph::new(Line::from(Span::styled(
            verdict(percent),
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center);
        title.render(layout[0], buf);

        let score_color = if percent >= 80.0 {
            colors.success()
        } else if percent >= 50.0 {
            colors.warning()
        } else {
            colors.error()
        };
        let score_line = Line::from(vec![
            Span::styled("  Score:      ", Style::default().fg(colors.fg())),
            Span::styled(
                format!("{} / {}", self.state.score, max),
                Style::default().fg(score_color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  ({percent:.0}%)"),
                Style::default().fg(colors.text_muted()),
            ),
        ]);
        Paragraph::new(score_line).render(layout[1], buf);

        let record = self.state.score > 0 && self.state.score == self.state.high_score;
        let mut high_spans = vec![
            Span::styled("  High score: ", Style::default().fg(colors.fg())),
            Span::styled(
                format!("{} points", self.state.high_score),
                Style::default().fg(colors.accent()),
            ),
        ];
        if record {
            high_spans.push(Span::styled(
                "  new record",
                Style::default()
                    .fg(colors.success())
                    .add_modifier(Modifier::BOLD),
            ));
        }
        Paragraph::new(Line::from(high_spans)).render(layout[2], buf);

        let time_text = if self.state.seconds_remaining == 0 {
            "time ran out".to_string()
        } else {
            format!("{}s left on the clock", self.state.seconds_remaining)
        };
        Paragraph::new(Line::from(vec![
            Span::styled("  Timer:      ", Style::default().fg(colors.fg())),
            Span::styled(time_text, Style::default().fg(colors.text_muted())),
        ]))
        .render(layout[3], buf);

        Paragraph::new(Line::from(vec![
            Span::styled("  [r] Restart quiz  ", Style::default().fg(colors.accent())),
            Span::styled("[q] Quit", Style::default().fg(colors.accent())),
        ]))
        .render(layout[5], buf);
    }
}
