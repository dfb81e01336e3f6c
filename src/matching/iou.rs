use crate::foundation::core::{Rect, has_positive_area, intersection_area};

/// Intersection-over-union of two axis-aligned rects.
///
/// 0 for disjoint rects and whenever either rect has non-positive (or non-finite) area.
pub fn iou(a: Rect, b: Rect) -> f64 {
    if !has_positive_area(a) || !has_positive_area(b) {
        return 0.0;
    }
    let inter = intersection_area(a, b);
    let union = a.area() + b.area() - inter;
    if union > 0.0 { inter / union } else { 0.0 }
}

#[derive(Clone, Debug, PartialEq)]
/// Dense row-major matrix of pairwise values between a GT set (rows) and a GEN set (columns).
pub struct PairMatrix {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl PairMatrix {
    /// Build a matrix by evaluating `f(row, col)` for every cell.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut values = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                values.push(f(i, j));
            }
        }
        Self { rows, cols, values }
    }

    /// Pairwise IoU between `gt` (rows) and `generated` (columns).
    pub fn overlaps(gt: &[Rect], generated: &[Rect]) -> Self {
        Self::from_fn(gt.len(), generated.len(), |i, j| iou(gt[i], generated[j]))
    }

    /// Assignment costs `1 - value` for an overlap matrix.
    pub fn to_costs(&self) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            values: self.values.iter().map(|v| 1.0 - v).collect(),
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Value at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.cols + col]
    }

    /// Add `f(row, col)` to every cell.
    pub fn add(&mut self, mut f: impl FnMut(usize, usize) -> f64) {
        for i in 0..self.rows {
            for j in 0..self.cols {
                self.values[i * self.cols + j] += f(i, j);
            }
        }
    }

    /// Whether the matrix has no cells.
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/matching/iou.rs"]
mod tests;
