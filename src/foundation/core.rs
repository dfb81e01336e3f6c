pub use kurbo::{Point, Rect, Size};

/// Layout axis a measurement is taken along.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Horizontal (columns).
    X,
    /// Vertical (rows).
    Y,
}

impl Axis {
    /// Stable lowercase label (`"x"` / `"y"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
        }
    }
}

/// Straight 8-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Build from unit-range channels, truncating `c * 255` toward zero.
    ///
    /// Out-of-range channels saturate at 0 and 255.
    pub fn from_unit(r: f64, g: f64, b: f64) -> Self {
        fn to_u8(c: f64) -> u8 {
            (c * 255.0) as u8
        }

        Self {
            r: to_u8(r),
            g: to_u8(g),
            b: to_u8(b),
        }
    }

    /// Euclidean distance in RGB space.
    pub fn distance(self, other: Self) -> f64 {
        let d = |a: u8, b: u8| f64::from(a) - f64::from(b);
        let (dr, dg, db) = (d(self.r, other.r), d(self.g, other.g), d(self.b, other.b));
        (dr * dr + dg * dg + db * db).sqrt()
    }

    /// `1 - distance / sqrt(3 * 255^2)`: 1.0 for equal colors, 0.0 for black against white.
    pub fn similarity(self, other: Self) -> f64 {
        let max = (3.0 * 255.0_f64 * 255.0).sqrt();
        1.0 - self.distance(other) / max
    }
}

/// Build a rect from an origin and a size, the geometry encoding used by design exports.
pub fn rect_from_xywh(x: f64, y: f64, width: f64, height: f64) -> Rect {
    Rect::new(x, y, x + width, y + height)
}

/// True when every coordinate is finite and both extents are non-negative.
pub fn is_well_formed(rect: Rect) -> bool {
    rect.is_finite() && rect.width() >= 0.0 && rect.height() >= 0.0
}

/// True when the rect is well formed and has strictly positive area.
pub fn has_positive_area(rect: Rect) -> bool {
    is_well_formed(rect) && rect.width() > 0.0 && rect.height() > 0.0
}

/// Smallest rect enclosing every input rect, or `None` for an empty input.
pub fn union_bbox<I>(rects: I) -> Option<Rect>
where
    I: IntoIterator<Item = Rect>,
{
    rects.into_iter().reduce(|acc, r| acc.union(r))
}

/// Area of the overlap between two rects; 0 when they are disjoint or only touch.
pub fn intersection_area(a: Rect, b: Rect) -> f64 {
    let w = (a.x1.min(b.x1) - a.x0.max(b.x0)).max(0.0);
    let h = (a.y1.min(b.y1) - a.y0.max(b.y0)).max(0.0);
    w * h
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
