use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use refreshkit_core::HeaderIndicator;

use crate::indicator::RefreshHeader;
use crate::theme::Theme;

use super::centered;

pub struct RefreshHeaderWidget;

impl RefreshHeaderWidget {
    /// Gauge cells in the pull progress bar
    const GAUGE_WIDTH: usize = 10;

    /// The header row shown directly above the first item
    pub fn line(header: &RefreshHeader, width: u16, theme: &Theme) -> Line<'static> {
        if header.is_hidden() {
            return Line::default();
        }

        if header.is_spinning() {
            let text = format!("{} {}", header.spinner(), header.label());
            return centered(text, width, Style::default().fg(theme.spinner));
        }

        let filled = (header.ratio().clamp(0.0, 1.0) * Self::GAUGE_WIDTH as f64).round() as usize;
        let gauge = format!(
            "[{}{}]",
            "█".repeat(filled),
            "·".repeat(Self::GAUGE_WIDTH - filled)
        );
        let style = if header.ratio() >= 1.0 {
            Style::default().fg(theme.ready).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.grey2)
        };
        let text = format!("{} {}", gauge, header.label());
        centered(text, width, style)
    }

    /// Arrow drawn in the rows above the header line
    pub fn filler(header: &RefreshHeader, theme: &Theme) -> Line<'static> {
        if header.is_hidden() || header.is_spinning() {
            return Line::default();
        }
        Line::from(Span::styled("  ↓", Style::default().fg(theme.grey0)))
    }
}
