use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};

use crate::models::Contour;

/// Extract the external boundary of every connected foreground region using
/// Suzuki-Abe border following. Hole borders are discarded.
pub fn find_external_contours(binary: &GrayImage) -> Vec<Contour> {
    find_contours::<i32>(binary)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer)
        .map(|c| Contour::new(c.points))
        .collect()
}

/// Pick the contour with maximal enclosed area; ties keep the one extracted
/// first. `None` when nothing was segmented this frame.
pub fn largest_contour(contours: Vec<Contour>) -> Option<Contour> {
    let mut best: Option<(f64, Contour)> = None;
    for contour in contours {
        let area = contour.area();
        match &best {
            Some((best_area, _)) if area <= *best_area => {}
            _ => best = Some((area, contour)),
        }
    }
    best.map(|(_, contour)| contour)
}
