use foundation::latlng::LatLng;
use serde::Serialize;

use crate::gradient::ProjectionTransform;

/// Spread between top and bottom horizontal scale above which the
/// description calls out the gradient.
pub const GRADIENT_NOTE_THRESHOLD: f64 = 0.2;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DistortionLevel {
    Minimal,
    Light,
    Moderate,
    Heavy,
}

impl DistortionLevel {
    /// Tier for an average horizontal scale ratio.
    pub fn from_average_scale(average: f64) -> Self {
        if average < 1.1 {
            DistortionLevel::Minimal
        } else if average < 1.3 {
            DistortionLevel::Light
        } else if average < 1.6 {
            DistortionLevel::Moderate
        } else {
            DistortionLevel::Heavy
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DistortionLevel::Minimal => "Minimal",
            DistortionLevel::Light => "Light",
            DistortionLevel::Moderate => "Moderate",
            DistortionLevel::Heavy => "Heavy",
        }
    }
}

impl std::fmt::Display for DistortionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Scale summary of a transform, for on-screen indicators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistortionInfo {
    pub top_horizontal_scale: f64,
    pub bottom_horizontal_scale: f64,
    pub top_vertical_scale: f64,
    pub bottom_vertical_scale: f64,
    pub average_horizontal_scale: f64,
    pub average_vertical_scale: f64,
    pub distortion_range: f64,
    pub level: DistortionLevel,
    pub description: String,
}

impl DistortionInfo {
    pub fn from_transform(t: &ProjectionTransform) -> Self {
        let average_horizontal_scale = (t.top_horizontal_scale + t.bottom_horizontal_scale) / 2.0;
        let average_vertical_scale = (t.top_vertical_scale + t.bottom_vertical_scale) / 2.0;
        let distortion_range = (t.top_horizontal_scale - t.bottom_horizontal_scale).abs();
        let level = DistortionLevel::from_average_scale(average_horizontal_scale);

        Self {
            top_horizontal_scale: t.top_horizontal_scale,
            bottom_horizontal_scale: t.bottom_horizontal_scale,
            top_vertical_scale: t.top_vertical_scale,
            bottom_vertical_scale: t.bottom_vertical_scale,
            average_horizontal_scale,
            average_vertical_scale,
            distortion_range,
            level,
            description: describe(level, distortion_range),
        }
    }

    pub fn is_gradient(&self) -> bool {
        self.distortion_range > GRADIENT_NOTE_THRESHOLD
    }
}

/// `"<Level> distortion"`, with `" (gradient)"` appended for wide spreads.
pub fn describe(level: DistortionLevel, distortion_range: f64) -> String {
    let mut out = format!("{level} distortion");
    if distortion_range > GRADIENT_NOTE_THRESHOLD {
        out.push_str(" (gradient)");
    }
    out
}

/// What a renderer needs to know about a session's current projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionInfo {
    pub is_transformed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<LatLng>,
    #[serde(flatten)]
    pub distortion: Option<DistortionInfo>,
}

impl ProjectionInfo {
    pub fn untransformed() -> Self {
        Self {
            is_transformed: false,
            target: None,
            distortion: None,
        }
    }

    pub fn from_transform(t: &ProjectionTransform) -> Self {
        Self {
            is_transformed: true,
            target: Some(t.center()),
            distortion: Some(DistortionInfo::from_transform(t)),
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.distortion.as_ref().map(|d| d.description.as_str())
    }

    pub fn average_horizontal_scale(&self) -> Option<f64> {
        self.distortion.as_ref().map(|d| d.average_horizontal_scale)
    }
}
