//! Per-string status rows with RMS meters

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Gauge},
    Frame,
};

use super::state::{note_name, StringLevels, StringState, STRING_COUNT};

/// Meter range in dB below full scale
const METER_RANGE_DB: f32 = 60.0;

fn meter_ratio(rms: f32) -> f64 {
    if rms <= 0.0 {
        return 0.0;
    }
    let db = 20.0 * rms.log10();
    ((db + METER_RANGE_DB) / METER_RANGE_DB).clamp(0.0, 1.0) as f64
}

pub fn render_strings(
    frame: &mut Frame,
    area: Rect,
    strings: &[StringState; STRING_COUNT],
    levels: &StringLevels,
    selected: usize,
) {
    let block = Block::default().title(" Strings ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1); STRING_COUNT])
        .split(inner);

    for (i, (string, &rms)) in strings.iter().zip(levels.rms.iter()).enumerate() {
        let color = if string.bowing {
            Color::Yellow
        } else {
            Color::Blue
        };
        let mut style = Style::default().fg(color);
        if i == selected {
            style = style.add_modifier(Modifier::BOLD);
        }

        let marker = if i == selected { '>' } else { ' ' };
        let label = format!(
            "{marker} {} {:>4} {:7.1} Hz {}",
            i + 1,
            note_name(string.frequency),
            string.frequency,
            if string.bowing { "bow" } else { "   " },
        );

        let gauge = Gauge::default()
            .gauge_style(style)
            .ratio(meter_ratio(rms))
            .label(label);
        frame.render_widget(gauge, rows[i]);
    }
}
