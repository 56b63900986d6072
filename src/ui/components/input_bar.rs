use eframe::egui;

use crate::common::ChatMessage;
use crate::ui::state::{AppState, local_time};

const USERNAME_ID: &str = "input-username";
const TEXT_ID: &str = "input-text";

/// The send form. Returns the message to send when the user submits.
///
/// Both fields stay editable while disconnected; only Send and Enter wait for the socket.
pub fn render(ui: &mut egui::Ui, state: &mut AppState, include_time: bool) -> Option<ChatMessage> {
    let can_submit = state.can_submit();
    let mut send = false;

    ui.horizontal(|ui| {
        ui.add(
            egui::TextEdit::singleline(&mut state.username_input)
                .id(egui::Id::new(USERNAME_ID))
                .hint_text("Username")
                .desired_width(120.0),
        );

        let response = ui.add(
            egui::TextEdit::singleline(&mut state.text_input)
                .id(egui::Id::new(TEXT_ID))
                .hint_text("Message"),
        );

        if ui.add_enabled(can_submit, egui::Button::new("Send")).clicked() {
            send = true;
        }

        if can_submit && response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            send = true;
            response.request_focus();
        }
    });

    if !send {
        return None;
    }

    state.submit(include_time.then(local_time))
}
