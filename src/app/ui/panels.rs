use eframe::egui::{self, Align, Context, Key, Layout};
use tracing::debug;

use crate::notes::{CategoryTaxonomy, Note};
use crate::view::{RenderConfig, RenderOutcome};
use crate::viewport::interaction::NavigationRequest;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn new(
        notes: Vec<Note>,
        taxonomy: CategoryTaxonomy,
        config: RenderConfig,
    ) -> Self {
        Self {
            notes,
            taxonomy,
            config,
            view: None,
            search: String::new(),
            search_match_cache: None,
            selected: None,
            fullscreen: false,
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        source_label: &str,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        if self.fullscreen && ctx.input(|input| input.key_pressed(Key::Escape)) {
            self.set_fullscreen(ctx, false);
        }

        if !self.fullscreen {
            egui::TopBottomPanel::top("top_bar")
                .resizable(false)
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        ui.heading("constellation");
                        ui.separator();
                        ui.label(format!("source: {source_label}"));
                        ui.label(format!("notes: {}", self.notes.len()));
                        if let Some(handle) = self.view.as_ref().and_then(RenderOutcome::handle) {
                            ui.label(format!("stars: {}", handle.graph().node_count()));
                            ui.label(format!("links: {}", handle.graph().edge_count()));
                        }
                        let reload_button =
                            ui.add_enabled(!is_loading, egui::Button::new("Reload notes"));
                        if reload_button.clicked() {
                            *reload_requested = true;
                        }
                        if ui.button("Redraw").clicked() {
                            self.discard_view();
                        }
                        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                            if let Some(handle) = self.view.as_ref().and_then(RenderOutcome::handle)
                            {
                                ui.label(format!("zoom {:.2}×", handle.transform().scale));
                                if !handle.simulation().is_settled() {
                                    ui.spinner();
                                }
                            }
                        });
                    });
                });

            egui::SidePanel::left("notes")
                .resizable(true)
                .default_width(300.0)
                .show(ctx, |ui| self.draw_controls(ui));

            egui::SidePanel::right("details")
                .resizable(true)
                .default_width(340.0)
                .show(ctx, |ui| self.draw_details(ui));
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                if is_loading {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Reloading notes...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                } else {
                    self.draw_graph(ui);
                }
            });
    }

    /// Drops the current view so the next frame renders from scratch.
    pub(in crate::app) fn discard_view(&mut self) {
        if let Some(RenderOutcome::Active(handle)) = self.view.take() {
            handle.teardown();
        }
        self.search_match_cache = None;
    }

    pub(in crate::app) fn set_fullscreen(&mut self, ctx: &Context, fullscreen: bool) {
        if self.fullscreen == fullscreen {
            return;
        }
        self.fullscreen = fullscreen;
        ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(fullscreen));
    }

    pub(in crate::app) fn navigate(&mut self, request: NavigationRequest) {
        debug!(note = %request.note_id, "opening note");
        self.set_selected(Some(request.note_id));
    }

    pub(in crate::app) fn set_selected(&mut self, selected: Option<String>) {
        if self.selected != selected {
            self.selected = selected;
        }
    }

    pub(in crate::app) fn note_by_id(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.usable_id() == Some(id))
    }
}
