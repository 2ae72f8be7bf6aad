use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Legend, Plot};

use data_sweeper::data::chart::numeric_series;
use data_sweeper::data::Table;

use crate::color::series_colors;

// ---------------------------------------------------------------------------
// Bar chart of numeric columns
// ---------------------------------------------------------------------------

/// Render the first `max_columns` numeric columns of `table` as grouped bars,
/// one group per row.
pub fn numeric_bar_chart(ui: &mut Ui, id: &str, table: &Table, max_columns: usize) {
    let series = numeric_series(table, max_columns);
    if series.is_empty() {
        ui.label("No numeric columns to chart.");
        return;
    }

    let colors = series_colors(series.len());
    let bar_width = 0.8 / series.len() as f64;

    Plot::new(id)
        .legend(Legend::default())
        .x_axis_label("Row")
        .height(240.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (idx, (s, color)) in series.iter().zip(colors).enumerate() {
                // Offset each series inside the row's slot so bars sit side by side.
                let offset = (idx as f64 + 0.5) * bar_width - 0.4;
                let bars: Vec<Bar> = s
                    .points()
                    .map(|(row, value)| Bar::new(row as f64 + offset, value).width(bar_width))
                    .collect();

                let chart = BarChart::new(bars).name(&s.name).color(color);
                plot_ui.bar_chart(chart);
            }
        });
}
