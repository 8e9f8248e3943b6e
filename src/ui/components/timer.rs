use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::ui::theme::Theme;

const LOW_TIME_SECS: u32 = 10;

pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

pub struct Timer<'a> {
    pub seconds_remaining: u32,
    pub theme: &'a Theme,
}

impl<'a> Timer<'a> {
    pub fn new(seconds_remaining: u32, theme: &'a Theme) -> Self {
        Self {
            seconds_remaining,
            theme,
        }
    }
}

impl Widget for Timer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let color = if self.seconds_remaining <= LOW_TIME_SECS {
            colors.error()
        } else {
            colors.fg()
        };
        Paragraph::new(Line::from(vec![
            Span::styled(" \u{23f1} ", Style::default().fg(colors.text_muted())),
            Span::styled(
                format_clock(self.seconds_remaining),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
        ]))
        .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(59), "00:59");
        assert_eq!(format_clock(450), "07:30");
    }
}
