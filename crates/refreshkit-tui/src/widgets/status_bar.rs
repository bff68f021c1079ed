use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let config = app.controller.config();
        let flag = |on: bool| if on { "on" } else { "off" };

        let status_text = if let Some(msg) = &app.status_message {
            format!(" {} | {}", app.phase_label(), msg)
        } else {
            format!(
                " {} | Items: {} | Pull: {} | Auto-load: {}",
                app.phase_label(),
                app.items.len(),
                flag(config.header_refresh_enabled),
                flag(config.footer_refresh_enabled),
            )
        };

        let status_color = if app.status_is_error {
            theme.error
        } else {
            theme.fg0
        };

        let help_hint = " q:quit j/k:scroll drag:pull r:refresh H/F:toggle ";
        let padding_len = (area.width as usize)
            .saturating_sub(status_text.width() + help_hint.width());

        let line = Line::from(vec![
            Span::styled(status_text, Style::default().fg(status_color).bg(theme.bg2)),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg2)),
            Span::styled(help_hint, Style::default().fg(theme.grey2).bg(theme.bg2)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
