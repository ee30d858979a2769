use eframe::egui::{self, Align, Color32, Context, Layout, RichText};

use crate::util::safe_hostname;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn show(&mut self, ctx: &Context, reload_requested: &mut bool, is_loading: bool) {
        self.update_fps_counter(ctx);
        if self.scene_dirty {
            self.rebuild_scene();
        }

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| self.draw_header(ui, reload_requested, is_loading));

        egui::TopBottomPanel::bottom("sources")
            .resizable(false)
            .show(ctx, |ui| self.draw_sources(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                if self.visible_count == 0 && self.scene.is_empty() {
                    self.draw_no_matches(ui);
                } else {
                    self.draw_bubbles(ui);
                }
            });
    }

    fn draw_header(&mut self, ui: &mut egui::Ui, reload_requested: &mut bool, is_loading: bool) {
        ui.horizontal(|ui| {
            ui.heading(
                RichText::new("B3 Market Physics")
                    .strong()
                    .color(Color32::from_rgb(74, 222, 128)),
            );
            ui.separator();
            ui.label(
                RichText::new("Drag bubbles to throw them.").color(Color32::from_gray(150)),
            );

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                let refresh = ui.add_enabled(
                    !is_loading,
                    egui::Button::new(if is_loading { "Updating" } else { "Refresh" }),
                );
                if refresh.clicked() {
                    *reload_requested = true;
                }
                if is_loading {
                    ui.spinner();
                }

                let search = ui.add(
                    egui::TextEdit::singleline(&mut self.search)
                        .hint_text("Search...")
                        .desired_width(180.0),
                );
                if search.changed() {
                    self.scene_dirty = true;
                }

                ui.separator();
                ui.label(self.bubble_count_text());
                if let Some(fps_text) = self.fps_display_text() {
                    ui.label(RichText::new(fps_text).color(Color32::from_gray(140)));
                }
            });
        });
    }

    fn draw_sources(&self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            if !self.snapshot.sources.is_empty() {
                ui.label(RichText::new("Sources:").strong());
                for source in &self.snapshot.sources {
                    if source.starts_with("http://") || source.starts_with("https://") {
                        ui.hyperlink_to(safe_hostname(source), source);
                    } else {
                        ui.label(source);
                    }
                }
                ui.separator();
            }
            ui.small("Physics engine v1.0 • No friction");
        });
    }

    fn draw_no_matches(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(160.0);
            ui.label(
                RichText::new("No matches found for")
                    .size(18.0)
                    .color(Color32::from_gray(160)),
            );
            ui.label(RichText::new(format!("\"{}\"", self.search.trim())).size(20.0).strong());
            ui.add_space(12.0);
            if ui.button("Clear Search").clicked() {
                self.search.clear();
                self.scene_dirty = true;
            }
        });
    }
}
