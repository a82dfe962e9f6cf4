//! egui shell around the estimate page.
//!
//! The UI thread owns the [`EstimatePage`] and both controllers. Network
//! work is queued to the backend worker and its results are applied through
//! the controllers' `finish` step, which drops superseded results.

use client_core::{EstimateController, EstimateOutcome, EstimatePage, LocationLoader, Ticket};
use crossbeam_channel::{Receiver, Sender};
use shared::domain::{LocationList, LocationSource, LOCATION_PLACEHOLDER};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{events::UiEvent, orchestration::dispatch_backend_command};

pub struct EstimatorApp {
    page: EstimatePage,
    estimates: EstimateController,
    locations: LocationLoader,
    /// Tickets queued to the worker and not yet rendered.
    pending_estimate: Option<Ticket>,
    pending_load: Option<Ticket>,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    status: String,
}

impl EstimatorApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        let mut app = Self {
            page: EstimatePage::new(),
            estimates: EstimateController::new(),
            locations: LocationLoader::new(),
            pending_estimate: None,
            pending_load: None,
            cmd_tx,
            ui_rx,
            status: "Loading locations...".to_string(),
        };
        app.reload_locations();
        app
    }

    fn reload_locations(&mut self) {
        let ticket = self.locations.begin();
        if dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::LoadLocations { ticket },
            &mut self.status,
        ) {
            self.pending_load = Some(ticket);
        } else {
            self.pending_load = None;
            self.locations
                .finish(&mut self.page, ticket, &LocationList::fallback());
        }
    }

    fn estimate_price(&mut self) {
        let Ok(pending) = self.estimates.begin(&mut self.page) else {
            return;
        };
        if dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::EstimatePrice {
                ticket: pending.ticket,
                request: pending.request,
            },
            &mut self.status,
        ) {
            self.pending_estimate = Some(pending.ticket);
        } else {
            self.pending_estimate = None;
            self.estimates.finish(
                &mut self.page,
                pending.ticket,
                &EstimateOutcome::ConnectionFailed,
            );
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.apply_event(event);
        }
    }

    fn apply_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Info(message) => self.status = message,
            UiEvent::EstimateFinished { ticket, outcome } => {
                if self.estimates.finish(&mut self.page, ticket, &outcome) {
                    self.pending_estimate = None;
                }
            }
            UiEvent::LocationsLoaded { ticket, list } => {
                if self.locations.finish(&mut self.page, ticket, &list) {
                    self.pending_load = None;
                    self.status = location_status(&list);
                }
            }
            UiEvent::BackendFailed(message) => {
                tracing::error!(%message, "backend worker unavailable");
                self.settle_pending_actions();
                self.status = message;
            }
        }
    }

    /// Commands queued before the worker stopped will never be answered.
    fn settle_pending_actions(&mut self) {
        if let Some(ticket) = self.pending_load.take() {
            self.locations
                .finish(&mut self.page, ticket, &LocationList::fallback());
        }
        if let Some(ticket) = self.pending_estimate.take() {
            self.estimates
                .finish(&mut self.page, ticket, &EstimateOutcome::ConnectionFailed);
        }
    }

    fn show_form(&mut self, ui: &mut egui::Ui) {
        ui.heading("Home Price Estimate");
        ui.add_space(8.0);

        egui::Grid::new("estimate_form")
            .num_columns(2)
            .spacing([16.0, 10.0])
            .show(ui, |ui| {
                ui.label("Area (Square Feet)");
                ui.add(
                    egui::TextEdit::singleline(&mut self.page.square_footage)
                        .hint_text("1000")
                        .desired_width(160.0),
                );
                ui.end_row();

                ui.label("BHK");
                ui.horizontal(|ui| {
                    for count in self.page.bhk.choices().to_vec() {
                        if ui
                            .radio(self.page.bhk.is_checked(count), count.to_string())
                            .clicked()
                        {
                            self.page.bhk.check(count);
                        }
                    }
                });
                ui.end_row();

                ui.label("Bath");
                ui.horizontal(|ui| {
                    for count in self.page.bath.choices().to_vec() {
                        if ui
                            .radio(self.page.bath.is_checked(count), count.to_string())
                            .clicked()
                        {
                            self.page.bath.check(count);
                        }
                    }
                });
                ui.end_row();

                ui.label("Location");
                ui.horizontal(|ui| {
                    self.show_location_combo(ui);
                    if ui
                        .button("Reload")
                        .on_hover_text("Fetch the location list again")
                        .clicked()
                    {
                        self.reload_locations();
                    }
                });
                ui.end_row();
            });

        ui.add_space(12.0);
        if ui.button("Estimate Price").clicked() {
            self.estimate_price();
        }

        ui.add_space(12.0);
        let price = self.page.price.text();
        if !price.is_empty() {
            ui.label(egui::RichText::new(price).size(20.0).strong());
        }
    }

    fn show_location_combo(&mut self, ui: &mut egui::Ui) {
        let selected_label = self
            .page
            .locations
            .selected()
            .map_or(LOCATION_PLACEHOLDER, |option| option.label.as_str())
            .to_string();
        let current = self.page.locations.value().to_string();
        let mut picked = current.clone();

        egui::ComboBox::from_id_salt("location_select")
            .selected_text(selected_label)
            .width(220.0)
            .show_ui(ui, |ui| {
                for option in self.page.locations.options() {
                    if option.disabled {
                        ui.add_enabled(false, egui::Label::new(egui::RichText::new(&option.label).weak()));
                    } else {
                        ui.selectable_value(&mut picked, option.value.clone(), &option.label);
                    }
                }
            });

        if picked != current {
            self.page.locations.select(&picked);
        }
    }

    fn show_alert(&mut self, ctx: &egui::Context) {
        let Some(message) = self.page.alert().map(str::to_string) else {
            return;
        };

        let mut dismissed = false;
        egui::Window::new("alert_window")
            .title_bar(false)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(&message);
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });

        if dismissed {
            self.page.take_alert();
        }
    }
}

impl eframe::App for EstimatorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.small(&self.status);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            // The alert is modal: the form is inert until it is dismissed.
            let blocked = self.page.alert().is_some();
            ui.add_enabled_ui(!blocked, |ui| self.show_form(ui));
        });
        self.show_alert(ctx);

        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}

fn location_status(list: &LocationList) -> String {
    match list.source {
        LocationSource::Server => {
            format!("Loaded {} locations from server", list.len())
        }
        LocationSource::Fallback => {
            "Server unavailable; showing built-in locations".to_string()
        }
    }
}
