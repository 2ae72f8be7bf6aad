use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use data_sweeper::data::{ExportFormat, ExportedFile, Table};

use crate::state::{AppState, FileSession};
use crate::ui::plot;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_files_dialog(state);
                ui.close_menu();
            }
            if ui.button("Clear").clicked() {
                state.clear();
                ui.close_menu();
            }
        });

        ui.separator();

        if !state.files.is_empty() {
            let failed = state.files.iter().filter(|f| f.source.is_none()).count();
            ui.label(format!("{} files loaded, {failed} failed", state.files.len()));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Central panel – one card per file
// ---------------------------------------------------------------------------

/// Render every uploaded file as a collapsible card.
pub fn file_list(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Data Sweeper");
    ui.label("Transform your files between CSV and Excel formats with built-in data cleaning and visualization.");
    ui.separator();

    if state.files.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open CSV or Excel files to start  (File → Open…)");
        });
        return;
    }

    let preview_rows = state.config.preview_rows;
    let chart_columns = state.config.chart_columns;

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (idx, session) in state.files.iter_mut().enumerate() {
                ui.push_id(idx, |ui: &mut Ui| {
                    egui::CollapsingHeader::new(RichText::new(&session.file.name).strong())
                        .default_open(true)
                        .show(ui, |ui: &mut Ui| {
                            file_card(ui, session, preview_rows, chart_columns);
                        });
                });
                ui.separator();
            }
            ui.label(RichText::new("All files processed!").color(Color32::GREEN));
        });
}

fn file_card(ui: &mut Ui, session: &mut FileSession, preview_rows: usize, chart_columns: usize) {
    ui.label(format!("File size: {:.2} KiB", session.file.size_kib()));

    if let Some(err) = &session.error {
        ui.label(RichText::new(err).color(Color32::RED));
    }

    let Some(source) = &session.source else {
        return;
    };

    // ---- Preview ----
    ui.strong("Preview (first rows)");
    preview_table(ui, &source.head(preview_rows));
    let columns = source.column_names();

    // ---- Cleaning ----
    ui.add_space(6.0);
    let mut changed = ui
        .checkbox(&mut session.clean_enabled, format!("Clean data for {}", session.file.name))
        .changed();
    if session.clean_enabled {
        ui.horizontal(|ui: &mut Ui| {
            let cleaning = &mut session.request.cleaning;
            changed |= ui
                .checkbox(&mut cleaning.remove_duplicates, "Remove duplicates")
                .changed();
            changed |= ui
                .checkbox(&mut cleaning.fill_missing_numeric, "Fill missing values")
                .changed();
        });
    }
    if changed {
        session.refresh();
    }

    // ---- Column selection ----
    ui.add_space(6.0);
    ui.strong("Columns to convert");
    let mut toggled = None;
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for column in &columns {
            let mut checked = session
                .request
                .selection
                .as_ref()
                .is_some_and(|s| s.contains(column));
            if ui.checkbox(&mut checked, column.as_str()).changed() {
                toggled = Some(column.clone());
            }
        }
    });
    if let Some(column) = toggled {
        session.toggle_column(&column);
    }

    // ---- Visualization ----
    ui.add_space(6.0);
    ui.checkbox(&mut session.show_chart, "Show visualization");
    if session.show_chart {
        if let Some(view) = &session.view {
            plot::numeric_bar_chart(ui, &format!("chart_{}", session.file.name), view, chart_columns);
        }
    }

    // ---- Conversion ----
    ui.add_space(6.0);
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Convert to:");
        for format in ExportFormat::ALL {
            ui.radio_value(&mut session.export_format, format, format.label());
        }
        if ui
            .add_enabled(session.view.is_some(), egui::Button::new("Convert"))
            .clicked()
        {
            session.export_message = match session.convert() {
                Some(Ok(exported)) => save_export_dialog(&exported),
                Some(Err(e)) => {
                    log::error!("{e}");
                    Some(format!("Error: {e}"))
                }
                None => None,
            };
        }
    });
    if let Some(msg) = &session.export_message {
        ui.label(msg.as_str());
    }
}

/// Head of the table, one egui column per table column.
fn preview_table(ui: &mut Ui, table: &Table) {
    if table.n_cols() == 0 {
        ui.label(format!("{} rows, no columns", table.n_rows()));
        return;
    }
    egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .columns(TableColumn::auto().resizable(true), table.n_cols())
            .header(20.0, |mut header| {
                for column in table.columns() {
                    header.col(|ui: &mut Ui| {
                        ui.strong(format!("{} ({})", column.name, column.column_type()));
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, table.n_rows(), |mut row| {
                    let index = row.index();
                    for cell in table.row(index) {
                        row.col(|ui: &mut Ui| {
                            if cell.is_missing() {
                                ui.label(RichText::new("<missing>").weak());
                            } else {
                                ui.label(cell.to_string());
                            }
                        });
                    }
                });
            });
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_files_dialog(state: &mut AppState) {
    let files = rfd::FileDialog::new()
        .set_title("Upload CSV or Excel files")
        .add_filter("Supported files", &["csv", "xlsx"])
        .add_filter("CSV", &["csv"])
        .add_filter("Excel", &["xlsx"])
        .pick_files();

    if let Some(paths) = files {
        state.status_message = None;
        state.add_paths(paths);
    }
}

/// Ask where to save an export and write it. Returns the message to show.
fn save_export_dialog(exported: &ExportedFile) -> Option<String> {
    let path = rfd::FileDialog::new()
        .set_title("Save converted file")
        .set_file_name(&exported.file_name)
        .save_file()?;

    match std::fs::write(&path, &exported.content) {
        Ok(()) => {
            log::info!(
                "Saved {} ({}, {} bytes) to {}",
                exported.file_name,
                exported.mime_type,
                exported.len(),
                path.display()
            );
            Some(format!("Saved {}", path.display()))
        }
        Err(e) => {
            log::error!("Failed to save {}: {e}", path.display());
            Some(format!("Error: failed to save {}: {e}", path.display()))
        }
    }
}
