// Coarse "where and how big" labels for a painted region.
//
// The labels end up inside natural-language inpainting prompts, so the strings
// are part of the contract: `"top far left"`, `"center"`, `"tiny-sized"` and so on.

use std::fmt;

use crate::geometry::StrokeBounds;

/// Zone cut points shared by both axes, as fractions of the image extent.
const ZONE_CUTS: [f64; 4] = [0.2, 0.4, 0.6, 0.8];

/// Area-ratio cut points for the size buckets.
const SIZE_CUTS: [f64; 4] = [0.02, 0.1, 0.3, 0.6];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Horizontal {
    FarLeft,
    Left,
    Center,
    Right,
    FarRight,
}

impl Horizontal {
    pub const ALL: [Horizontal; 5] = [
        Horizontal::FarLeft,
        Horizontal::Left,
        Horizontal::Center,
        Horizontal::Right,
        Horizontal::FarRight,
    ];

    pub fn from_fraction(pct: f64) -> Self {
        Self::ALL[zone_index(pct)]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Horizontal::FarLeft => "far left",
            Horizontal::Left => "left",
            Horizontal::Center => "center",
            Horizontal::Right => "right",
            Horizontal::FarRight => "far right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vertical {
    Top,
    UpperMiddle,
    Middle,
    LowerMiddle,
    Bottom,
}

impl Vertical {
    pub const ALL: [Vertical; 5] = [
        Vertical::Top,
        Vertical::UpperMiddle,
        Vertical::Middle,
        Vertical::LowerMiddle,
        Vertical::Bottom,
    ];

    pub fn from_fraction(pct: f64) -> Self {
        Self::ALL[zone_index(pct)]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Vertical::Top => "top",
            Vertical::UpperMiddle => "upper-middle",
            Vertical::Middle => "middle",
            Vertical::LowerMiddle => "lower-middle",
            Vertical::Bottom => "bottom",
        }
    }
}

/// First cut the fraction falls under; anything at or past the last cut is the last zone.
fn zone_index(pct: f64) -> usize {
    ZONE_CUTS.iter().position(|&cut| pct < cut).unwrap_or(ZONE_CUTS.len())
}

/// One cell of the 5×5 grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PositionLabel {
    pub vertical: Vertical,
    pub horizontal: Horizontal,
}

impl PositionLabel {
    pub fn is_center(&self) -> bool {
        self.vertical == Vertical::Middle && self.horizontal == Horizontal::Center
    }

    /// All 25 cells, row by row from the top.
    pub fn all() -> impl Iterator<Item = PositionLabel> {
        Vertical::ALL.into_iter().flat_map(|vertical| {
            Horizontal::ALL
                .into_iter()
                .map(move |horizontal| PositionLabel { vertical, horizontal })
        })
    }
}

impl fmt::Display for PositionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // "middle center" is never produced; the middle cell is just "center".
        if self.is_center() {
            f.write_str("center")
        } else {
            write!(f, "{} {}", self.vertical.as_str(), self.horizontal.as_str())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SizeLabel {
    Tiny,
    Small,
    Medium,
    Large,
    ExtraLarge,
}

impl SizeLabel {
    pub const ALL: [SizeLabel; 5] = [
        SizeLabel::Tiny,
        SizeLabel::Small,
        SizeLabel::Medium,
        SizeLabel::Large,
        SizeLabel::ExtraLarge,
    ];

    pub fn from_area_ratio(ratio: f64) -> Self {
        let idx = SIZE_CUTS.iter().position(|&cut| ratio < cut).unwrap_or(SIZE_CUTS.len());
        Self::ALL[idx]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SizeLabel::Tiny => "tiny-sized",
            SizeLabel::Small => "small-sized",
            SizeLabel::Medium => "medium-sized",
            SizeLabel::Large => "large-sized",
            SizeLabel::ExtraLarge => "extra-large-sized",
        }
    }
}

impl fmt::Display for SizeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `{position, size}` for the current strokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionDescriptor {
    pub position: PositionLabel,
    pub size: SizeLabel,
}

impl RegionDescriptor {
    /// Phrase meant to be dropped into an inpainting prompt.
    pub fn prompt_hint(&self) -> String {
        format!("the {} area at the {} of the image", self.size, self.position)
    }
}

impl fmt::Display for RegionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.position, self.size)
    }
}

/// Position of the box's centroid on the 5×5 grid.
/// `bounds` should already be clamped to the image.
pub fn classify_position(bounds: &StrokeBounds, width: u32, height: u32) -> PositionLabel {
    let center = bounds.center();
    let x_pct = center.x / f64::from(width);
    let y_pct = center.y / f64::from(height);
    PositionLabel {
        vertical: Vertical::from_fraction(y_pct),
        horizontal: Horizontal::from_fraction(x_pct),
    }
}

/// Bucket of the bounding-box area over the image area.
/// Uses the box, not the painted pixel count, so sparse strokes read as large.
pub fn classify_size(bounds: &StrokeBounds, width: u32, height: u32) -> SizeLabel {
    let image_area = f64::from(width) * f64::from(height);
    SizeLabel::from_area_ratio(bounds.area() / image_area)
}

/// Clamp `bounds` to the image and label it.
pub fn classify(bounds: &StrokeBounds, width: u32, height: u32) -> RegionDescriptor {
    let clamped = bounds.clamped(width, height);
    RegionDescriptor {
        position: classify_position(&clamped, width, height),
        size: classify_size(&clamped, width, height),
    }
}
