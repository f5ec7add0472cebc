use eframe::egui::{self, RichText, Ui};

use crate::util::truncate_chars;

use super::super::ViewModel;

const LIST_PREVIEW_CHARS: usize = 42;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Notes");
        ui.separator();
        ui.add_space(4.0);

        ui.label("Search")
            .on_hover_text("Fuzzy-highlight notes by content, category or tag.");
        ui.text_edit_singleline(&mut self.search)
            .on_hover_text("Matching stars get a ring; the rest are dimmed.");

        ui.separator();

        if self.notes.is_empty() {
            ui.label("No notes captured yet.");
            return;
        }

        let mut selected_id = None;
        egui::ScrollArea::vertical()
            .id_salt("notes_by_category")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for (category, notes) in self.taxonomy.bucket_notes(&self.notes) {
                    let header = format!("{category} ({})", notes.len());
                    egui::CollapsingHeader::new(RichText::new(header).strong())
                        .id_salt(("category", category.as_str()))
                        .default_open(true)
                        .show(ui, |ui| {
                            for note in notes {
                                let Some(id) = note.usable_id() else {
                                    ui.weak(truncate_chars(
                                        &note.display_content(),
                                        LIST_PREVIEW_CHARS,
                                    ))
                                    .on_hover_text("This note has no id and is not on the map.");
                                    continue;
                                };

                                let content = note.display_content();
                                let is_selected = self.selected.as_deref() == Some(id);
                                let mut row = ui.selectable_label(
                                    is_selected,
                                    truncate_chars(&content, LIST_PREVIEW_CHARS),
                                );
                                if !note.date.is_empty() {
                                    row = row.on_hover_text(note.date.as_str());
                                }
                                if row.clicked() {
                                    selected_id = Some(id.to_owned());
                                }
                            }
                        });
                }
            });

        if let Some(id) = selected_id {
            self.set_selected(Some(id));
        }
    }
}
