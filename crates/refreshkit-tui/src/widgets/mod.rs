mod feed_list;
mod load_footer;
mod refresh_header;
mod status_bar;

use ratatui::{
    style::Style,
    text::{Line, Span},
};
use unicode_width::UnicodeWidthStr;

pub use feed_list::FeedListWidget;
pub use load_footer::LoadFooterWidget;
pub use refresh_header::RefreshHeaderWidget;
pub use status_bar::StatusBarWidget;

/// Single styled line, horizontally centered in `width` columns
fn centered(text: String, width: u16, style: Style) -> Line<'static> {
    let pad = (width as usize).saturating_sub(text.width()) / 2;
    Line::from(vec![Span::raw(" ".repeat(pad)), Span::styled(text, style)])
}
