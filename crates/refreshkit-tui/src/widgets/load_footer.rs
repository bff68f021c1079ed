use ratatui::{style::Style, text::Line};

use crate::indicator::LoadFooter;
use crate::theme::Theme;

use super::centered;

pub struct LoadFooterWidget;

impl LoadFooterWidget {
    /// The row shown directly below the last item
    pub fn line(footer: &LoadFooter, width: u16, theme: &Theme) -> Line<'static> {
        if footer.is_spinning() {
            let text = format!("{} Loading older items…", footer.spinner());
            centered(text, width, Style::default().fg(theme.spinner))
        } else if footer.is_hidden() {
            Line::default()
        } else {
            centered("·".to_string(), width, Style::default().fg(theme.grey0))
        }
    }
}
