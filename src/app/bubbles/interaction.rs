use eframe::egui::{self, Rect, Ui, Vec2};

use super::super::ViewModel;

impl ViewModel {
    /// Forwards this frame's pointer activity to the scene before the frame's
    /// simulation tick runs.
    pub(in crate::app) fn handle_bubble_pointer(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        let (pointer, time_secs, pressed, released, moved) = ui.input(|input| {
            (
                input.pointer.latest_pos(),
                input.time,
                input.pointer.primary_pressed(),
                input.pointer.primary_released(),
                input.pointer.delta() != Vec2::ZERO,
            )
        });
        let time_ms = time_secs * 1000.0;

        let Some(screen_pos) = pointer.filter(|pos| rect.contains(*pos)) else {
            if self.pointer_inside {
                self.scene.pointer_leave();
                self.pointer_inside = false;
            }
            return;
        };

        let local = (screen_pos - rect.min).to_pos2();
        let entered = !self.pointer_inside;
        self.pointer_inside = true;

        if pressed && response.hovered() {
            self.scene.pointer_down(local, time_ms);
        }
        if moved || pressed || entered {
            self.scene.pointer_move(local, screen_pos, time_ms);
        }
        if released {
            self.scene.pointer_up();
        }

        let cursor = if self.scene.captured().is_some() {
            Some(egui::CursorIcon::Grabbing)
        } else if self.scene.tooltip().is_some() {
            Some(egui::CursorIcon::Grab)
        } else {
            None
        };
        if let Some(cursor) = cursor {
            ui.output_mut(|output| output.cursor_icon = cursor);
        }
    }
}
