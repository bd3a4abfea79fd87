//! Transient notifications (link opened, copy failed, theme switched)
//!
//! Drawn last, over the bottom-right of the screen, and dropped by the app
//! tick once expired.

use crate::tui::theme::Theme;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::time::{Duration, Instant};

const SHOW_FOR: Duration = Duration::from_secs(2);
/// Failures stay up a little longer
const SHOW_ERROR_FOR: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Error,
}

impl ToastKind {
    fn icon(&self) -> &'static str {
        match self {
            ToastKind::Info => "✓",
            ToastKind::Error => "✗",
        }
    }

    fn color(&self, theme: &Theme) -> Color {
        match self {
            ToastKind::Info => theme.success,
            ToastKind::Error => theme.error,
        }
    }
}

#[derive(Debug)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    shown_at: Instant,
    ttl: Duration,
}

impl Toast {
    pub fn info(message: impl Into<String>) -> Self {
        Self::build(message.into(), ToastKind::Info, SHOW_FOR)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::build(message.into(), ToastKind::Error, SHOW_ERROR_FOR)
    }

    fn build(message: String, kind: ToastKind, ttl: Duration) -> Self {
        Self {
            message,
            kind,
            shown_at: Instant::now(),
            ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.shown_at.elapsed() >= self.ttl
    }

    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let accent = self.kind.color(theme);
        let line = Line::from(vec![
            Span::styled(format!("{} ", self.kind.icon()), Style::default().fg(accent)),
            Span::styled(self.message.as_str(), Style::default().fg(theme.foreground)),
        ]);

        // icon + space + message, one column of padding each side, borders
        let wanted = line.width() as u16 + 4;
        let width = wanted.min(area.width.saturating_sub(4));
        let popup = Rect::new(
            area.right().saturating_sub(width + 2),
            area.bottom().saturating_sub(5),
            width,
            3.min(area.height),
        );

        let body = Paragraph::new(line).centered().block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(theme.border_type)
                .border_style(Style::default().fg(accent))
                .style(Style::default().bg(theme.background)),
        );
        f.render_widget(Clear, popup);
        f.render_widget(body, popup);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_toast_is_visible() {
        let toast = Toast::info("Link copied");
        assert_eq!(toast.kind, ToastKind::Info);
        assert!(!toast.is_expired());
    }

    #[test]
    fn test_expiry_uses_kind_duration() {
        let mut toast = Toast::error("Copy failed");
        assert_eq!(toast.ttl, SHOW_ERROR_FOR);
        toast.shown_at = Instant::now() - SHOW_ERROR_FOR;
        assert!(toast.is_expired());
    }
}
