use eframe::egui::Color32;

use crate::scenario::Zone;

pub(super) fn zone_color(zone: Zone) -> Color32 {
    match zone {
        Zone::Ai => Color32::from_rgb(0, 102, 255),
        Zone::Shared => Color32::from_rgb(191, 90, 242),
        Zone::Human => Color32::from_rgb(255, 149, 0),
    }
}

/// Faint lane background tint for a zone.
pub(super) fn zone_tint(zone: Zone) -> Color32 {
    let color = zone_color(zone);
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), 14)
}

pub(super) fn edge_color(zone: Zone) -> Color32 {
    let color = zone_color(zone);
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), 153)
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
