use eframe::egui::Context;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn update_fps_counter(&mut self, ctx: &Context) {
        const FPS_SAMPLE_WINDOW: usize = 180;

        let dt = ctx.input(|input| input.stable_dt);
        if dt <= f32::EPSILON {
            return;
        }

        self.fps_current = (1.0 / dt).clamp(0.0, 1000.0);
        self.fps_samples.push_back(self.fps_current);
        while self.fps_samples.len() > FPS_SAMPLE_WINDOW {
            self.fps_samples.pop_front();
        }
    }

    pub(in crate::app) fn fps_display_text(&self) -> Option<String> {
        if self.fps_current <= f32::EPSILON {
            return None;
        }

        let mut parts = vec![format!("FPS {:.0}", self.fps_current)];
        if !self.fps_samples.is_empty() {
            let avg = self.fps_samples.iter().sum::<f32>() / self.fps_samples.len() as f32;
            parts.push(format!("avg {avg:.1}"));
        }
        parts.push(format!("{:.1} ms", 1000.0 / self.fps_current));
        parts.push(format!("step {}", self.scene.ticks()));

        Some(parts.join(" | "))
    }

    pub(in crate::app) fn bubble_count_text(&self) -> String {
        let total = self.snapshot.records.len();
        let count = if self.visible_count == total {
            format!("{total} instruments")
        } else {
            format!("{} of {total} instruments", self.visible_count)
        };

        if self.scene.is_running() {
            count
        } else {
            format!("{count} (paused)")
        }
    }
}
