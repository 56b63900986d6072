use std::collections::VecDeque;

use eframe::egui;

use crate::ui::render::{RenderRow, RenderStrategy};
use crate::ui::state::AppState;

pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    let scroll_to = state.scroll_to.take();
    let strategy = state.strategy();
    let rows = &state.rows;

    egui::ScrollArea::vertical()
        .id_salt("chat-text")
        .auto_shrink([false, false])
        .show(ui, |ui| match strategy {
            RenderStrategy::Table => table(ui, rows, scroll_to),
            RenderStrategy::Paragraph => paragraphs(ui, rows, scroll_to),
        });
}

fn table(ui: &mut egui::Ui, rows: &VecDeque<RenderRow>, scroll_to: Option<usize>) {
    egui::Grid::new("chat-text-table")
        .num_columns(3)
        .striped(true)
        .show(ui, |ui| {
            for (index, row) in rows.iter().enumerate() {
                ui.label(egui::RichText::new(row.time.as_deref().unwrap_or_default()).weak());

                let color = row
                    .color
                    .as_deref()
                    .and_then(|hex| egui::Color32::from_hex(hex).ok())
                    .unwrap_or(ui.visuals().text_color());
                ui.label(
                    egui::RichText::new(format!("{}:", row.username))
                        .strong()
                        .color(color),
                );

                let response = ui.label(&row.text);
                if scroll_to == Some(index) {
                    response.scroll_to_me(Some(egui::Align::Center));
                }
                ui.end_row();
            }
        });
}

fn paragraphs(ui: &mut egui::Ui, rows: &VecDeque<RenderRow>, scroll_to: Option<usize>) {
    for (index, row) in rows.iter().enumerate() {
        let response = ui.label(row.line());
        if scroll_to == Some(index) {
            response.scroll_to_me(Some(egui::Align::BOTTOM));
        }
    }
}
