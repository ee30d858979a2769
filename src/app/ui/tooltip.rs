use eframe::egui::{self, Color32, Context, FontId, Pos2, Rect, Stroke, StrokeKind, vec2};

use crate::sim::Tooltip;
use crate::util::{format_change, format_price};

use super::super::ViewModel;
use super::super::render_utils::{GAIN_HOVER, LOSS_HOVER};

const PADDING: f32 = 10.0;
const LINE_GAP: f32 = 3.0;
const POINTER_GAP: f32 = 10.0;

impl ViewModel {
    /// Card centred above the pointer, on the tooltip layer so it is never
    /// clipped by the canvas.
    pub(in crate::app) fn draw_tooltip(ctx: &Context, tooltip: &Tooltip) {
        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Tooltip,
            egui::Id::new("bubble_tooltip"),
        ));

        let change_color = if tooltip.change_percent >= 0.0 {
            GAIN_HOVER
        } else {
            LOSS_HOVER
        };
        let lines = [
            (tooltip.ticker.clone(), FontId::proportional(18.0), Color32::WHITE),
            (
                tooltip.name.clone(),
                FontId::proportional(13.0),
                Color32::from_white_alpha(230),
            ),
            (
                format_price(tooltip.price, 2),
                FontId::monospace(18.0),
                Color32::WHITE,
            ),
            (
                format_change(tooltip.change_percent),
                FontId::proportional(13.0),
                change_color,
            ),
        ];

        let galleys = lines
            .into_iter()
            .filter(|(text, _, _)| !text.is_empty())
            .map(|(text, font, color)| painter.layout_no_wrap(text, font, color))
            .collect::<Vec<_>>();

        let content_width = galleys
            .iter()
            .map(|galley| galley.size().x)
            .fold(0.0_f32, f32::max);
        let content_height = galleys.iter().map(|galley| galley.size().y).sum::<f32>()
            + LINE_GAP * galleys.len().saturating_sub(1) as f32;
        let size = vec2(content_width, content_height) + vec2(PADDING, PADDING) * 2.0;

        let anchor = tooltip.screen_pos;
        let min = Pos2::new(anchor.x - size.x * 0.5, anchor.y - size.y - POINTER_GAP);
        let card = Rect::from_min_size(min, size);

        painter.rect_filled(card, 8.0, Color32::from_rgba_unmultiplied(30, 41, 59, 225));
        painter.rect_stroke(
            card,
            8.0,
            Stroke::new(1.0, Color32::from_white_alpha(50)),
            StrokeKind::Inside,
        );

        let mut cursor = card.min + vec2(PADDING, PADDING);
        for galley in galleys {
            let height = galley.size().y;
            painter.galley(cursor, galley, Color32::WHITE);
            cursor.y += height + LINE_GAP;
        }
    }
}
