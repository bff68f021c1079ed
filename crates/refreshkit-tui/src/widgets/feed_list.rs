use chrono::Local;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::source::FeedItem;
use crate::theme::Theme;

use super::{LoadFooterWidget, RefreshHeaderWidget};

/// What occupies one screen row of the list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowContent {
    /// Space above the content revealed by a pull; `last` marks the row
    /// touching the first item
    Header { last: bool },
    Item(usize),
    /// First row below the last item
    Footer,
    Blank,
}

/// Map screen rows to content, given the offset in points
pub fn layout_rows(offset: f64, units_per_row: f64, rows: u16, items: usize) -> Vec<RowContent> {
    let first = (offset / units_per_row).floor() as i64;
    (0..rows as i64)
        .map(|r| {
            let row = first + r;
            if row < 0 {
                RowContent::Header { last: row == -1 }
            } else if (row as usize) < items {
                RowContent::Item(row as usize)
            } else if row as usize == items {
                RowContent::Footer
            } else {
                RowContent::Blank
            }
        })
        .collect()
}

pub struct FeedListWidget;

impl FeedListWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let block = Block::default()
            .title(" Feed ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .style(Style::default().bg(theme.bg0));
        let inner = block.inner(area);

        let viewport = app.viewport();
        let header = app.header.borrow();
        let footer = app.footer.borrow();

        let lines: Vec<Line> = layout_rows(
            viewport.offset(),
            viewport.units_per_row(),
            inner.height,
            app.items.len(),
        )
        .into_iter()
        .map(|row| match row {
            RowContent::Header { last: true } => {
                RefreshHeaderWidget::line(&header, inner.width, theme)
            }
            RowContent::Header { last: false } => RefreshHeaderWidget::filler(&header, theme),
            RowContent::Item(index) => Self::item_line(&app.items[index], inner.width, theme),
            RowContent::Footer => LoadFooterWidget::line(&footer, inner.width, theme),
            RowContent::Blank => Line::default(),
        })
        .collect();

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn item_line(item: &FeedItem, width: u16, theme: &Theme) -> Line<'static> {
        let marker = Span::styled(" ● ", Style::default().fg(theme.grey0));
        let time = item
            .published
            .with_timezone(&Local)
            .format("%H:%M ")
            .to_string();
        let available = (width as usize).saturating_sub(3 + time.width());
        let title = if item.title.width() > available {
            item.title.chars().take(available).collect()
        } else {
            item.title.clone()
        };
        Line::from(vec![
            marker,
            Span::styled(time, Style::default().fg(theme.grey2)),
            Span::styled(title, Style::default().fg(theme.fg0)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_at_rest() {
        let rows = layout_rows(0.0, 10.0, 4, 2);
        assert_eq!(
            rows,
            vec![
                RowContent::Item(0),
                RowContent::Item(1),
                RowContent::Footer,
                RowContent::Blank
            ]
        );
    }

    #[test]
    fn test_rows_while_pulled() {
        let rows = layout_rows(-25.0, 10.0, 4, 20);
        assert_eq!(
            rows,
            vec![
                RowContent::Header { last: false },
                RowContent::Header { last: false },
                RowContent::Header { last: true },
                RowContent::Item(0),
            ]
        );
    }

    #[test]
    fn test_rows_scrolled() {
        let rows = layout_rows(35.0, 10.0, 2, 20);
        assert_eq!(rows, vec![RowContent::Item(3), RowContent::Item(4)]);
    }
}
