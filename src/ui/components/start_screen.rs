use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::quiz::question::DifficultyFilter;
use crate::quiz::state::QuizState;
use crate::ui::theme::Theme;

pub struct StartScreen<'a> {
    pub state: &'a QuizState,
    pub theme: &'a Theme,
}

impl<'a> StartScreen<'a> {
    pub fn new(state: &'a QuizState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }
}

impl Widget for StartScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(inner);

        let title = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "Welcome to the quiz!",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(Alignment::Center);
        title.render(layout[0], buf);

        let num = self.state.num_questions();
        let count_text = if num == 0 {
            "No questions match this difficulty".to_string()
        } else {
            format!("{num} questions to test your knowledge")
        };
        Paragraph::new(Line::from(Span::styled(
            count_text,
            Style::default().fg(if num == 0 { colors.warning() } else { colors.fg() }),
        )))
        .alignment(Alignment::Center)
        .render(layout[1], buf);

        Paragraph::new(Line::from(vec![
            Span::styled("High score: ", Style::default().fg(colors.text_muted())),
            Span::styled(
                format!("{} points", self.state.high_score),
                Style::default()
                    .fg(colors.success())
                    .add_modifier(Modifier::BOLD),
            ),
        ]))
        .alignment(Alignment::Center)
        .render(layout[2], buf);

        let mut spans = vec![Span::styled(
            "Difficulty: ",
            Style::default().fg(colors.text_muted()),
        )];
        for filter in DifficultyFilter::ALL {
            let style = if filter == self.state.difficulty_filter {
                Style::default()
                    .fg(colors.option_selected())
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().fg(colors.fg())
            };
            spans.push(Span::styled(format!(" {filter} "), style));
            spans.push(Span::raw(" "));
        }
        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .render(layout[3], buf);

        let hint = if num == 0 {
            "[\u{2190}/\u{2192}] Difficulty"
        } else {
            "[Enter] Let's start  [\u{2190}/\u{2192}] Difficulty"
        };
        Paragraph::new(Line::from(Span::styled(
            hint,
            Style::default().fg(colors.accent()),
        )))
        .alignment(Alignment::Center)
        .render(layout[5], buf);
    }
}
