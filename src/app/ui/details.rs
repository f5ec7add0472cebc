use eframe::egui::{self, RichText, Ui};

use crate::similarity::WeightBand;
use crate::util::truncate_chars;
use crate::view::RenderOutcome;

use super::super::ViewModel;

struct Connection {
    id: String,
    label: String,
    band: WeightBand,
    weight: f64,
    shared: String,
}

impl ViewModel {
    fn connections_of(&self, id: &str) -> Vec<Connection> {
        let Some(graph) = self
            .view
            .as_ref()
            .and_then(RenderOutcome::handle)
            .map(|handle| handle.graph())
        else {
            return Vec::new();
        };
        let Some(index) = graph.index_of(id) else {
            return Vec::new();
        };

        let mut connections = graph
            .edges_of(index)
            .iter()
            .filter_map(|&edge_index| {
                let edge = graph.edges.get(edge_index)?;
                let other = graph.nodes.get(edge.other_end(index)?)?;
                Some(Connection {
                    id: other.id.clone(),
                    label: other.display_content.clone(),
                    band: edge.band(),
                    weight: edge.weight,
                    shared: edge.shared_labels.join(", "),
                })
            })
            .collect::<Vec<_>>();
        connections.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        connections
    }

    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Note");
        ui.add_space(6.0);

        let Some(selected_id) = self.selected.clone() else {
            ui.label("Click a star or pick a note from the list to open it.");
            return;
        };

        let Some(note) = self.note_by_id(&selected_id) else {
            ui.label("This note is no longer in the store.");
            return;
        };

        let content = note.display_content();
        let category = self.taxonomy.normalize(&note.parent_category);
        let group = self.taxonomy.group_of(&category).map(str::to_owned);
        let tags = note.tags.clone();
        let date = note.date.clone();
        let body = note.body.trim().to_owned();

        ui.label(RichText::new(content.as_str()).strong());
        ui.small(selected_id.as_str());
        ui.add_space(6.0);

        match group {
            Some(group) => ui.label(format!("Category: {category} ({group})")),
            None => ui.label(format!("Category: {category}")),
        };
        if !tags.is_empty() {
            ui.label(format!("Tags: {}", tags.join(", ")));
        }
        if !date.is_empty() {
            ui.label(format!("Captured: {date}"));
        }

        if !body.is_empty() && body != content {
            ui.separator();
            egui::ScrollArea::vertical()
                .id_salt("note_body_scroll")
                .max_height(220.0)
                .show(ui, |ui| {
                    ui.label(body);
                });
        }

        ui.separator();
        ui.label(RichText::new("Connections").strong());
        let connections = self.connections_of(&selected_id);
        if connections.is_empty() {
            ui.label("No other note is close enough to link.");
            return;
        }

        let mut next = None;
        egui::ScrollArea::vertical()
            .id_salt("connections_scroll")
            .auto_shrink([false, false])
            .show_rows(ui, 22.0, connections.len(), |ui, row_range| {
                for connection in &connections[row_range] {
                    let label = format!(
                        "{}  [{} {:.2}]",
                        truncate_chars(&connection.label, 36),
                        connection.band.label(),
                        connection.weight,
                    );
                    let hover = if connection.shared.is_empty() {
                        connection.id.clone()
                    } else {
                        format!("shared: {}", connection.shared)
                    };
                    if ui.link(label).on_hover_text(hover).clicked() {
                        next = Some(connection.id.clone());
                    }
                }
            });

        if let Some(id) = next {
            self.set_selected(Some(id));
        }
    }
}
