use eframe::egui::{Color32, Painter, Pos2, Rect};

pub(super) const GAIN_FILL: Color32 = Color32::from_rgb(22, 163, 74);
pub(super) const LOSS_FILL: Color32 = Color32::from_rgb(220, 38, 38);
pub(super) const GAIN_HOVER: Color32 = Color32::from_rgb(134, 239, 172);
pub(super) const LOSS_HOVER: Color32 = Color32::from_rgb(252, 165, 165);

pub(super) fn with_alpha(color: Color32, alpha: f32) -> Color32 {
    Color32::from_rgba_unmultiplied(
        color.r(),
        color.g(),
        color.b(),
        (alpha.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

/// Slate gradient from the top-left corner to near black at the bottom.
pub(super) fn draw_background(painter: &Painter, rect: Rect) {
    const TOP: Color32 = Color32::from_rgb(15, 23, 42);
    const BOTTOM: Color32 = Color32::from_rgb(6, 8, 12);
    const BANDS: usize = 24;

    let band_height = rect.height() / BANDS as f32;
    for band in 0..BANDS {
        let t = band as f32 / (BANDS - 1) as f32;
        let top = rect.top() + band as f32 * band_height;
        let band_rect = Rect::from_min_max(
            Pos2::new(rect.left(), top),
            Pos2::new(rect.right(), (top + band_height + 1.0).min(rect.bottom())),
        );
        painter.rect_filled(band_rect, 0.0, blend_color(TOP, BOTTOM, t));
    }
}

/// Soft halo approximated with concentric translucent rings.
pub(super) fn draw_glow(painter: &Painter, center: Pos2, radius: f32, color: Color32, blur: f32, alpha: f32) {
    const RINGS: usize = 5;

    for ring in (1..=RINGS).rev() {
        let t = ring as f32 / RINGS as f32;
        let ring_alpha = alpha * (1.0 - t) * 0.45;
        painter.circle_filled(center, radius + blur * 0.5 * t, with_alpha(color, ring_alpha));
    }
}
