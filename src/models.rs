use anyhow::bail;
use imageproc::point::Point;

/// HSV segmentation target with per-channel tolerances.
///
/// All fields use the segmentation engine's native ranges: hue on the cyclic
/// 0-180 half-scale, saturation and value on 0-255.
#[derive(Debug, Clone, Copy)]
pub struct SegmentationColor {
    pub hue: f32,
    pub saturation: f32,
    pub value: f32,
    pub hue_tolerance: f32,
    pub saturation_tolerance: f32,
    pub value_tolerance: f32,
}

impl SegmentationColor {
    pub fn new(
        hue: f32,
        saturation: f32,
        value: f32,
        hue_tolerance: f32,
        saturation_tolerance: f32,
        value_tolerance: f32,
    ) -> Self {
        Self {
            hue,
            saturation,
            value,
            hue_tolerance,
            saturation_tolerance,
            value_tolerance,
        }
    }

    /// Build from user-facing ranges: hue in degrees (0-360), saturation and
    /// value in percent (0-100). Hue is halved and saturation/value scaled by
    /// 2.55, tolerances included.
    pub fn from_user(
        hue_degrees: f32,
        saturation_percent: f32,
        value_percent: f32,
        hue_tolerance_degrees: f32,
        saturation_tolerance_percent: f32,
        value_tolerance_percent: f32,
    ) -> Self {
        Self {
            hue: hue_degrees / 2.0,
            saturation: saturation_percent * 2.55,
            value: value_percent * 2.55,
            hue_tolerance: hue_tolerance_degrees / 2.0,
            saturation_tolerance: saturation_tolerance_percent * 2.55,
            value_tolerance: value_tolerance_percent * 2.55,
        }
    }

    /// Reject malformed threshold colors before any pixel is touched.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.hue_tolerance < 0.0 || self.saturation_tolerance < 0.0 || self.value_tolerance < 0.0
        {
            bail!("segmentation color tolerances must be non-negative");
        }
        if !(0.0..=180.0).contains(&self.hue) {
            bail!("hue {} outside the 0-180 half-scale domain", self.hue);
        }
        if self.hue_tolerance > 180.0 {
            bail!(
                "hue tolerance {} outside the 0-180 half-scale domain",
                self.hue_tolerance
            );
        }
        if !(0.0..=255.0).contains(&self.saturation) || !(0.0..=255.0).contains(&self.value) {
            bail!("saturation and value must lie in 0-255");
        }
        Ok(())
    }
}

/// Ordered boundary polygon of a connected foreground region.
///
/// Point order follows the border walk, so neighboring indices are adjacent
/// along the boundary. An empty contour is the idle "no detection" state.
#[derive(Debug, Clone, Default)]
pub struct Contour {
    pub points: Vec<Point<i32>>,
}

impl Contour {
    pub fn new(points: Vec<Point<i32>>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Enclosed area via the shoelace formula.
    pub fn area(&self) -> f64 {
        if self.points.len() < 3 {
            return 0.0;
        }
        let mut doubled: i64 = 0;
        for (i, p) in self.points.iter().enumerate() {
            let q = &self.points[(i + 1) % self.points.len()];
            doubled += p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64;
        }
        (doubled as f64 / 2.0).abs()
    }
}

/// Concavity between two consecutive hull points.
///
/// `start`, `end` and `far` index into the contour; `far` is the boundary
/// point between them with maximal perpendicular distance (`depth`) to the
/// start-end chord.
#[derive(Debug, Clone, Copy)]
pub struct ConvexityDefect {
    pub start: usize,
    pub end: usize,
    pub far: usize,
    pub depth: f64,
}

/// A detected fingertip position in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingertip {
    pub x: i32,
    pub y: i32,
}

/// Per-frame detection result: the fingertip list and the contour it was
/// derived from (kept for caller-side visualization).
#[derive(Debug, Clone, Default)]
pub struct Detection {
    pub fingertips: Vec<Fingertip>,
    pub contour: Contour,
}

/// Euclidean distance between two contour points.
pub fn point_distance(u: Point<i32>, v: Point<i32>) -> f64 {
    let dx = (u.x - v.x) as f64;
    let dy = (u.y - v.y) as f64;
    (dx * dx + dy * dy).sqrt()
}
