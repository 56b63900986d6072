use eframe::egui;

use crate::network::session::ConnectionState;
use crate::ui::state::AppState;

pub fn render(ui: &mut egui::Ui, state: &AppState) {
    ui.heading("Connection");
    ui.separator();

    // Hiển thị trạng thái kết nối hiện tại
    ui.horizontal(|ui| {
        let (color, label) = match state.connection {
            ConnectionState::Connected => (egui::Color32::GREEN, "connected"),
            ConnectionState::Connecting => (egui::Color32::YELLOW, "connecting..."),
            ConnectionState::Disconnected => (egui::Color32::RED, "disconnected"),
            ConnectionState::Disposed => (egui::Color32::GRAY, "stopped"),
        };
        ui.colored_label(color, "●");
        ui.label(label);
    });

    ui.separator();

    // Hiển thị log events gần đây
    ui.label("Recent Events:");
    egui::ScrollArea::vertical()
        .id_salt("connection-log")
        .max_height(300.0)
        .show(ui, |ui| {
            for event in state.debug_events.iter().rev().take(20) {
                let time_str = event.timestamp.format("%H:%M:%S");
                let color = match event.event_type.as_str() {
                    "CONNECTED" => egui::Color32::GREEN,
                    "DISCONNECTED" => egui::Color32::RED,
                    "RECONNECT_SCHEDULED" | "CONNECTING" => egui::Color32::YELLOW,
                    _ => egui::Color32::WHITE,
                };

                ui.horizontal(|ui| {
                    ui.colored_label(color, format!("[{}]", time_str));
                    ui.label(&event.message);
                });
            }
        });
}
