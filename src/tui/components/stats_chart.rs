// Level distribution chart
//
// One bar per stats bucket, coloured by level. Stats are account-wide and do
// not follow the level/search filter.

use crate::api::StatBucket;
use crate::tui::theme::Theme;
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, stats: &[StatBucket], theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.border))
        .title(" Level Distribution ");

    if stats.is_empty() {
        let empty = Paragraph::new("No data yet")
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.muted))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let bars: Vec<Bar> = stats
        .iter()
        .map(|bucket| {
            let color = theme.bucket_color(&bucket.name);
            Bar::default()
                .label(bucket.name.clone().into())
                .value(bucket.value)
                .style(Style::default().fg(color))
                .value_style(Style::default().fg(theme.background).bg(color))
        })
        .collect();

    // Fit the bars to the available width
    let inner_width = area.width.saturating_sub(2) as usize;
    let count = bars.len().max(1);
    let bar_width = ((inner_width / count).saturating_sub(1)).clamp(3, 12) as u16;

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1);

    f.render_widget(chart, area);
}
