//! Fixed palette, color gradients and layout constants shared by the
//! renderers. The hex colors and label offsets come from the original
//! visualization styling.

use plotters::style::RGBColor;

use dpv_core::StrategicSource;

/// Bar color for the best-performing group (`#2E8B57`).
pub const BEST_GREEN: RGBColor = RGBColor(46, 139, 87);
/// Bar color for the worst-performing group (`#8B0000`).
pub const WORST_RED: RGBColor = RGBColor(139, 0, 0);
/// Histogram fill color.
pub const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
/// Top-10 bar fill color.
pub const LIGHT_CORAL: RGBColor = RGBColor(240, 128, 128);
/// Fill color for the strategic-assets scatter tier.
pub const ASSET_PURPLE: RGBColor = RGBColor(128, 0, 128);

/// Pixels per typographic point at the 300-DPI export scale.
pub const PX_PER_PT: f64 = 300.0 / 72.0;

/// Offset vectors (in points) cycled by point index when labelling scatter
/// points, chosen to spread neighbouring labels apart.
pub const LABEL_OFFSETS: [(i32, i32); 15] = [
    (5, 5),
    (-5, 5),
    (5, -5),
    (-5, -5),
    (10, 0),
    (-10, 0),
    (0, 10),
    (0, -10),
    (8, 8),
    (-8, 8),
    (8, -8),
    (-8, -8),
    (12, 3),
    (-12, 3),
    (3, 12),
];

/// Maps `value` into `[0, 1]` over the `min..max` range, clamping outside
/// values and degenerating to 0.5 when the range is empty.
pub fn unit_scale(value: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if span.abs() < 1e-12 {
        return 0.5;
    }
    ((value - min) / span).clamp(0.0, 1.0)
}

/// Pads a value range by 15% on each side so points stay off the axes.
pub fn padded_range(min: f64, max: f64) -> (f64, f64) {
    let range = (max - min).abs();
    let padding = if range < 1e-6 { 0.5 } else { range * 0.15 };
    (min - padding, max + padding)
}

fn lerp(a: u8, b: u8, t: f64) -> u8 {
    (a as f64 + (b as f64 - a as f64) * t).round().clamp(0.0, 255.0) as u8
}

fn gradient(stops: &[(f64, (u8, u8, u8))], t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    for pair in stops.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if t <= t1 {
            let local = if t1 > t0 { (t - t0) / (t1 - t0) } else { 0.0 };
            return RGBColor(
                lerp(c0.0, c1.0, local),
                lerp(c0.1, c1.1, local),
                lerp(c0.2, c1.2, local),
            );
        }
    }
    let (_, last) = stops[stops.len() - 1];
    RGBColor(last.0, last.1, last.2)
}

/// Diverging blue→yellow→red gradient used for the seasonal heatmap: low
/// values read cool, high values read hot.
pub fn red_yellow_blue(t: f64) -> RGBColor {
    gradient(
        &[
            (0.0, (49, 54, 149)),
            (0.5, (255, 255, 191)),
            (1.0, (165, 0, 38)),
        ],
        t,
    )
}

/// Diverging green→yellow→red gradient used for the performance matrix:
/// low (good) values read green.
pub fn green_yellow_red(t: f64) -> RGBColor {
    gradient(
        &[
            (0.0, (0, 104, 55)),
            (0.5, (255, 255, 191)),
            (1.0, (165, 0, 38)),
        ],
        t,
    )
}

/// Compact viridis-like gradient used to grade scatter points by revenue.
pub fn viridis(t: f64) -> RGBColor {
    gradient(
        &[
            (0.0, (68, 1, 84)),
            (0.25, (59, 82, 139)),
            (0.5, (33, 145, 140)),
            (0.75, (94, 201, 98)),
            (1.0, (253, 231, 37)),
        ],
        t,
    )
}

/// How the strategic scatter styles its points for a given data tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterStyle {
    /// Divisor applied to the sample count before sizing the point area.
    pub area_divisor: f64,
    /// Fill opacity of the points.
    pub alpha: f64,
    /// Solid fill color; `None` grades the fill by revenue share instead.
    pub solid: Option<RGBColor>,
}

/// Styling for each strategic data tier: the revenue-weighted tier grades
/// points by revenue with area `count / 20`, strategic assets render solid
/// purple with area `count / 50`, the sample tier keeps raw counts at a
/// lighter alpha.
pub fn scatter_style(source: StrategicSource) -> ScatterStyle {
    match source {
        StrategicSource::RevenueWeighted => ScatterStyle {
            area_divisor: 20.0,
            alpha: 0.7,
            solid: None,
        },
        StrategicSource::StrategicAssets => ScatterStyle {
            area_divisor: 50.0,
            alpha: 0.7,
            solid: Some(ASSET_PURPLE),
        },
        StrategicSource::SampleData => ScatterStyle {
            area_divisor: 1.0,
            alpha: 0.6,
            solid: None,
        },
    }
}

/// Radius in pixels for a scatter point backed by `sample_count` samples,
/// with the point area proportional to `count / area_divisor`.
pub fn point_radius(sample_count: u32, area_divisor: f64) -> i32 {
    let area_pt2 = sample_count as f64 / area_divisor;
    let radius_pt = (area_pt2 / std::f64::consts::PI).sqrt();
    (radius_pt * PX_PER_PT).max(8.0).round() as i32
}
