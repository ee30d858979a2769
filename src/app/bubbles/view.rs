use eframe::egui::{Align2, Color32, FontId, Sense, Stroke, Ui, vec2};

use crate::sim::{Stacking, Viewport};
use crate::util::format_price;

use super::super::ViewModel;
use super::super::render_utils::{
    GAIN_FILL, GAIN_HOVER, LOSS_FILL, LOSS_HOVER, blend_color, draw_background, draw_glow,
    with_alpha,
};

const LABEL_PRICE_MIN_RADIUS: f32 = 40.0;

impl ViewModel {
    /// Binds a visual handle to every body that does not have one yet, the
    /// way an element ref attaches after the bubbles are (re)built.
    fn bind_bubble_visuals(&mut self, ui: &Ui) {
        if self.scene.bound_visuals() >= self.scene.bodies().len() {
            return;
        }

        let ids = self
            .scene
            .bodies()
            .iter()
            .map(|body| body.id.clone())
            .collect::<Vec<_>>();
        for id in ids {
            let handle = ui.make_persistent_id(("bubble", id.as_str()));
            self.scene.bind_visual(&id, handle);
        }
    }

    pub(in crate::app) fn draw_bubbles(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect);

        self.scene.resize(Viewport::new(rect.width(), rect.height()));
        self.bind_bubble_visuals(ui);
        self.handle_bubble_pointer(ui, rect, &response);

        if self.scene.frame() {
            ui.ctx().request_repaint();
        }

        let hovered_ticker = self.scene.tooltip().map(|tooltip| tooltip.ticker.clone());
        let mut hover_animating = false;

        for (index, handle, visual) in self.scene.visuals() {
            let body = &self.scene.bodies()[index];
            let center = rect.min + visual.center().to_vec2();
            let radius = visual.scaled_radius();
            let palette = visual.palette();

            let hover_mix =
                ui.ctx()
                    .animate_bool(handle, hovered_ticker.as_deref() == Some(body.id.as_str()));
            if hover_mix > 0.0 && hover_mix < 1.0 {
                hover_animating = true;
            }

            if let Some(glow) = visual.glow {
                draw_glow(&painter, center, radius, glow.color, glow.blur, glow.shadow_alpha);
            }

            let fill = if visual.gain { GAIN_FILL } else { LOSS_FILL };
            painter.circle_filled(center, radius, with_alpha(fill, 0.3));

            let hover_color = if visual.gain { GAIN_HOVER } else { LOSS_HOVER };
            let border = match visual.glow {
                Some(glow) => with_alpha(glow.color, glow.border_alpha),
                None => with_alpha(blend_color(palette, hover_color, hover_mix), 0.5 + hover_mix * 0.4),
            };
            painter.circle_stroke(center, radius, Stroke::new(2.0, border));

            if visual.stacking == Stacking::Captured {
                painter.circle_stroke(
                    center,
                    radius + 3.0,
                    Stroke::new(1.0, Color32::from_white_alpha(90)),
                );
            }

            let record = body.record();
            let show_price = body.radius() > LABEL_PRICE_MIN_RADIUS;
            let ticker_offset = if show_price { vec2(0.0, -7.0) } else { vec2(0.0, 0.0) };
            painter.text(
                center + ticker_offset,
                Align2::CENTER_CENTER,
                &record.id,
                FontId::proportional(15.0 * visual.scale),
                Color32::WHITE,
            );
            if show_price {
                painter.text(
                    center + vec2(0.0, 10.0),
                    Align2::CENTER_CENTER,
                    format_price(record.price, 0),
                    FontId::proportional(11.0 * visual.scale),
                    Color32::from_white_alpha(205),
                );
            }
        }

        if hover_animating {
            ui.ctx().request_repaint();
        }

        if let Some(tooltip) = self.scene.tooltip() {
            Self::draw_tooltip(ui.ctx(), tooltip);
        }
    }
}
