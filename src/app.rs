use eframe::egui;

use data_sweeper::config::SweeperConfig;

use crate::state::AppState;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DataSweeperApp {
    pub state: AppState,
}

impl DataSweeperApp {
    pub fn new(config: SweeperConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for DataSweeperApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: one card per uploaded file ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::file_list(ui, &mut self.state);
        });
    }
}
