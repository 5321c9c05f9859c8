use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SeverityBand {
    Low,
    Medium,
    High,
}

/// Coarse classification of a severity (or an average of severities) used by
/// the presentation layer to pick a color. The band is the contract here;
/// the color palette lives entirely in the frontend.
pub fn severity_band(severity: f64) -> SeverityBand {
    if severity <= 3.0 {
        SeverityBand::Low
    } else if severity <= 6.0 {
        SeverityBand::Medium
    } else {
        SeverityBand::High
    }
}

/// Linear mapping of a 0-10 severity onto the 180° speedometer sweep,
/// clamped so that whatever the presentation layer passes still renders.
/// `record` is the strict validation point; this is only render robustness.
pub fn gauge_angle(severity: f64) -> f64 {
    ((severity / 10.0) * 180.0).clamp(0.0, 180.0)
}

/// Endpoint of the colored gauge arc in SVG coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GaugeArc {
    pub x: f64,
    pub y: f64,
    pub large_arc: bool,
}

/// Computes where the colored arc ends for a half-circle gauge centered at
/// (`center_x`, `center_y`). The sweep starts at the left end of the dial
/// and advances clockwise with severity.
pub fn gauge_arc(severity: f64, center_x: f64, center_y: f64, radius: f64) -> GaugeArc {
    let angle_deg = gauge_angle(severity);
    let angle_rad = (PI * angle_deg) / 180.0;

    GaugeArc {
        x: center_x + radius * (PI - angle_rad).cos(),
        y: center_y - radius * angle_rad.sin(),
        large_arc: angle_deg > 180.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn gauge_angle_maps_severity_linearly() {
        assert_eq!(gauge_angle(0.0), 0.0);
        assert_eq!(gauge_angle(5.0), 90.0);
        assert_eq!(gauge_angle(10.0), 180.0);
        assert_eq!(gauge_angle(2.5), 45.0);
    }

    #[test]
    fn gauge_angle_clamps_out_of_contract_input() {
        assert_eq!(gauge_angle(-3.0), 0.0);
        assert_eq!(gauge_angle(25.0), 180.0);
    }

    #[test]
    fn bands_split_at_three_and_six() {
        assert_eq!(severity_band(1.0), SeverityBand::Low);
        assert_eq!(severity_band(3.0), SeverityBand::Low);
        assert_eq!(severity_band(3.1), SeverityBand::Medium);
        assert_eq!(severity_band(6.0), SeverityBand::Medium);
        assert_eq!(severity_band(6.1), SeverityBand::High);
        assert_eq!(severity_band(9.0), SeverityBand::High);
    }

    #[test]
    fn arc_endpoint_sweeps_the_half_circle() {
        // Severity 0: arc ends where it starts, at the left edge of the dial.
        let start = gauge_arc(0.0, 50.0, 50.0, 40.0);
        assert!((start.x - 10.0).abs() < EPSILON);
        assert!((start.y - 50.0).abs() < EPSILON);

        // Severity 5: straight up.
        let mid = gauge_arc(5.0, 50.0, 50.0, 40.0);
        assert!((mid.x - 50.0).abs() < EPSILON);
        assert!((mid.y - 10.0).abs() < EPSILON);

        // Severity 10: right edge of the dial.
        let end = gauge_arc(10.0, 50.0, 50.0, 40.0);
        assert!((end.x - 90.0).abs() < EPSILON);
        assert!((end.y - 50.0).abs() < EPSILON);

        // The sweep never exceeds the half circle, so the flag stays unset.
        assert!(!end.large_arc);
    }
}
