use eframe::egui;
use tokio::sync::mpsc;

use crate::common::{ChatMessage, NetworkCommand, NetworkEvent};
use crate::config::AppConfig;

use super::components::{chat_area, debug_panel, input_bar};
use super::state::AppState;

/// The chat window. Dropping it drops the command sender, which disposes the
/// network client.
pub struct ChatApp {
    state: AppState,
    include_time: bool,
    command_sender: mpsc::Sender<NetworkCommand>,
    event_receiver: mpsc::Receiver<NetworkEvent>,
}

impl ChatApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: &AppConfig,
        command_sender: mpsc::Sender<NetworkCommand>,
        event_receiver: mpsc::Receiver<NetworkEvent>,
    ) -> Self {
        let mut state = AppState::new(config.render, config.clear_on_reconnect);
        if let Some(username) = &config.username {
            state.username_input = username.clone();
        }

        Self {
            state,
            include_time: config.include_time,
            command_sender,
            event_receiver,
        }
    }

    fn handle_network_events(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            self.state.apply(event);
        }
    }

    fn send_command(&mut self, message: ChatMessage) {
        if let Err(err) = self
            .command_sender
            .try_send(NetworkCommand::SendMessage(message))
        {
            log::warn!("Failed to send command to network: {err}");
        }
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_network_events();

        egui::SidePanel::right("debug_panel")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| {
                debug_panel::render(ui, &self.state);
            });

        egui::TopBottomPanel::bottom("input-form").show(ctx, |ui| {
            ui.add_space(4.0);
            if let Some(message) = input_bar::render(ui, &mut self.state, self.include_time) {
                self.send_command(message);
            }
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Chat");
            ui.separator();
            chat_area::render(ui, &mut self.state);
        });

        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}
