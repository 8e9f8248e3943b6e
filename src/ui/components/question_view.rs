use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::quiz::question::Question;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionMark {
    Plain,
    Highlighted,
    Correct,
    Wrong,
}

/// How an option is drawn. Before answering only the cursor is shown; after
/// answering the correct option and a wrong pick are revealed.
pub fn option_mark(question: &Question, index: usize, cursor: usize, answer: Option<usize>) -> OptionMark {
    match answer {
        None if index == cursor => OptionMark::Highlighted,
        None => OptionMark::Plain,
        Some(_) if question.is_correct(index) => OptionMark::Correct,
        Some(chosen) if chosen == index => OptionMark::Wrong,
        Some(_) => OptionMark::Plain,
    }
}

pub struct QuestionView<'a> {
    pub question: &'a Question,
    pub cursor: usize,
    pub answer: Option<usize>,
    pub theme: &'a Theme,
}

impl<'a> QuestionView<'a> {
    pub fn new(question: &'a Question, cursor: usize, answer: Option<usize>, theme: &'a Theme) -> Self {
        Self {
            question,
            cursor,
            answer,
            theme,
        }
    }
}

impl Widget for QuestionView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(
                " {} \u{00b7} {} points ",
                self.question.difficulty.as_str(),
                self.question.points
            ))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut constraints = vec![Constraint::Length(3)];
        constraints.extend(self.question.options.iter().map(|_| Constraint::Length(2)));
        constraints.push(Constraint::Min(0));
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        Paragraph::new(Line::from(Span::styled(
            self.question.text.as_str(),
            Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
        )))
        .wrap(Wrap { trim: true })
        .render(layout[0], buf);

        for (i, option) in self.question.options.iter().enumerate() {
            let mark = option_mark(self.question, i, self.cursor, self.answer);
            let (indicator, style) = match mark {
                OptionMark::Plain => (" ", Style::default().fg(colors.fg())),
                OptionMark::Highlighted => (
                    ">",
                    Style::default()
                        .fg(colors.option_selected())
                        .add_modifier(Modifier::BOLD),
                ),
                OptionMark::Correct => (
                    "\u{2713}",
                    Style::default()
                        .fg(colors.answer_correct())
                        .add_modifier(Modifier::BOLD),
                ),
                OptionMark::Wrong => (
                    "\u{2717}",
                    Style::default()
                        .fg(colors.answer_incorrect())
                        .add_modifier(Modifier::BOLD),
                ),
            };
            let text = format!(" {indicator} [{}] {option}", i + 1);
            Paragraph::new(Line::from(Span::styled(text, style))).render(layout[i + 1], buf);
        }
    }
}
