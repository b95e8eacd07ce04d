use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HatColor {
    Default,
    Blue,
    Green,
    Red,
    Pink,
    Yellow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HatShape {
    Default,
    Ex,
    Fox,
    Wing,
    Hole,
    Frame,
    Curve,
    Eye,
    Play,
    Bolt,
    Crosshairs,
}

/// A (color, shape) pair. At most one visible token wears a given style at
/// a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HatStyle {
    pub color: HatColor,
    pub shape: HatShape,
}

impl HatStyle {
    pub fn new(color: HatColor, shape: HatShape) -> Self {
        Self { color, shape }
    }
}

impl fmt::Display for HatStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}/{:?}", self.color, self.shape)
    }
}

/// An enabled hat style together with the cost of using it. Cheaper styles
/// are visually quieter; the allocator prefers them for tokens near the
/// cursor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HatStyleSetting {
    pub style: HatStyle,
    pub penalty: f64,
}

/// How aggressively re-allocation may move an existing hat to a cheaper
/// style. Higher stability means fewer hats jump around while the user
/// types; lower stability means hats are cheaper on average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum HatStability {
    /// Never keep the old hat if any strictly cheaper candidate exists.
    Greedy,
    /// Keep the old hat if it ties the best candidate after flooring both
    /// penalties.
    Floor,
    /// Like `Floor` but rounds to the nearest integer instead.
    Round,
    /// Keep the old hat unless it is more than two penalty points worse than
    /// the best candidate.
    #[default]
    Threshold,
    /// Always keep the old hat while it is still assignable; only a
    /// higher-ranked token taking the style first can displace it.
    Stable,
}

/// The default style set: every color with the default shape, then every
/// shape in every color. Non-default colors cost 1, non-default shapes 2.
pub fn default_hat_styles() -> Vec<HatStyleSetting> {
    let colors = [
        HatColor::Default,
        HatColor::Blue,
        HatColor::Green,
        HatColor::Red,
        HatColor::Pink,
        HatColor::Yellow,
    ];
    let shapes = [
        HatShape::Default,
        HatShape::Ex,
        HatShape::Fox,
        HatShape::Wing,
        HatShape::Hole,
        HatShape::Frame,
        HatShape::Curve,
        HatShape::Eye,
        HatShape::Play,
        HatShape::Bolt,
        HatShape::Crosshairs,
    ];

    let mut styles = Vec::with_capacity(colors.len() * shapes.len());
    for shape in shapes {
        for color in colors {
            let mut penalty = 0.0;
            if color != HatColor::Default {
                penalty += 1.0;
            }
            if shape != HatShape::Default {
                penalty += 2.0;
            }
            styles.push(HatStyleSetting {
                style: HatStyle::new(color, shape),
                penalty,
            });
        }
    }
    styles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_styles_start_with_free_default_hat() {
        let styles = default_hat_styles();
        assert_eq!(
            styles[0].style,
            HatStyle::new(HatColor::Default, HatShape::Default)
        );
        assert_eq!(styles[0].penalty, 0.0);
        assert_eq!(styles.len(), 66);
    }
}
