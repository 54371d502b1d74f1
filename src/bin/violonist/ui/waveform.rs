//! Bridge signal oscilloscope

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

use sfdsp::dsp::CircularBuffer;

/// Render the most recent `N` samples, oldest on the left
pub fn render_waveform<const N: usize>(frame: &mut Frame, area: Rect, scope: &CircularBuffer<N>) {
    let block = Block::default().title(" Bridge ").borders(Borders::ALL);

    let count = scope.count();
    let data: Vec<(f64, f64)> = (0..count)
        .map(|i| (i as f64 / N as f64, scope[i] as f64))
        .collect();

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-1.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
