use crate::noise::NoiseField;
use glam::DVec2;

/// Noise coordinate step per grid cell
pub const NOISE_STEP: f64 = 0.1;
/// Angle range multiplier applied to the noise value (in turns of TAU)
pub const ANGLE_TURNS: f64 = 4.0;
/// Magnitude of every field vector
pub const FIELD_MAGNITUDE: f64 = 0.5;

/// Unit vector at `angle` scaled to `mag` (normalize, then scale)
fn from_angle_with_mag(angle: f64, mag: f64) -> DVec2 {
    let v = DVec2::new(angle.cos(), angle.sin());
    let len = (v.x * v.x + v.y * v.y).sqrt();
    let v = if len != 0.0 { v * (1.0 / len) } else { v };
    v * mag
}

/// Grid of steering vectors, stored flat as `col + row * cols`.
///
/// Built once per session and read-only afterwards.
#[derive(Clone)]
pub struct FlowField {
    pub cols: usize,
    pub rows: usize,
    /// Edge length of one cell in canvas units
    pub scale: f64,
    vectors: Vec<DVec2>,
}

impl FlowField {
    pub fn build(cols: usize, rows: usize, scale: f64, noise: &NoiseField) -> Self {
        let mut vectors = Vec::with_capacity(cols * rows);

        // Offsets are accumulated per cell rather than multiplied out
        let mut yoff = 0.0;
        for _ in 0..rows {
            let mut xoff = 0.0;
            for _ in 0..cols {
                let angle = noise.sample2(xoff, yoff) * std::f64::consts::TAU * ANGLE_TURNS;
                vectors.push(from_angle_with_mag(angle, FIELD_MAGNITUDE));
                xoff += NOISE_STEP;
            }
            yoff += NOISE_STEP;
        }

        Self {
            cols,
            rows,
            scale,
            vectors,
        }
    }

    /// Linear index for a cell, or None when it falls outside the grid.
    ///
    /// Only the linear index is range-checked: a column one past the right
    /// edge addresses the first cell of the next row.
    pub fn cell_index(&self, col: i64, row: i64) -> Option<usize> {
        let index = col + row * self.cols as i64;
        if index >= 0 && (index as usize) < self.len() {
            Some(index as usize)
        } else {
            None
        }
    }

    pub fn get(&self, index: usize) -> Option<DVec2> {
        self.vectors.get(index).copied()
    }

    /// Vector under a canvas position, if any
    pub fn force_at(&self, pos: DVec2) -> Option<DVec2> {
        let col = (pos.x / self.scale).floor() as i64;
        let row = (pos.y / self.scale).floor() as i64;
        self.cell_index(col, row).and_then(|i| self.get(i))
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_field() -> FlowField {
        FlowField::build(40, 40, 20.0, &NoiseField::from_seed(31337.0))
    }

    #[test]
    fn test_field_dimensions() {
        let field = test_field();
        assert_eq!(field.len(), 1600);
        assert_eq!(field.cols, 40);
        assert_eq!(field.rows, 40);
    }

    #[test]
    fn test_vectors_have_fixed_magnitude() {
        let field = test_field();
        for v in &field.vectors {
            assert!((v.length() - FIELD_MAGNITUDE).abs() < 1e-12);
        }
    }

    #[test]
    fn test_first_cell_matches_noise_origin() {
        let noise = NoiseField::from_seed(31337.0);
        let field = FlowField::build(40, 40, 20.0, &noise);
        let angle = noise.sample2(0.0, 0.0) * std::f64::consts::TAU * 4.0;
        let v = field.get(0).unwrap();
        assert!((v.x - 0.5 * angle.cos()).abs() < 1e-12);
        assert!((v.y - 0.5 * angle.sin()).abs() < 1e-12);
    }

    #[test]
    fn test_same_noise_same_field() {
        let a = test_field();
        let b = test_field();
        assert_eq!(a.vectors, b.vectors);
    }

    #[test]
    fn test_out_of_range_lookups_are_none() {
        let field = test_field();
        assert!(field.cell_index(0, 40).is_none());
        assert!(field.cell_index(-1, 0).is_none());
        assert!(field.force_at(DVec2::new(10.0, 805.0)).is_none());
        assert!(field.force_at(DVec2::new(-25.0, 0.0)).is_none());
        assert!(field.get(1600).is_none());
    }

    #[test]
    fn test_in_range_lookup() {
        let field = test_field();
        assert_eq!(field.cell_index(3, 2), Some(83));
        assert_eq!(field.force_at(DVec2::new(65.0, 45.0)), field.get(83));
    }

    #[test]
    fn test_right_edge_aliases_next_row() {
        let field = test_field();
        // x == 800 gives column 40, which lands on (0, row + 1)
        assert_eq!(field.cell_index(40, 3), Some(160));
        assert_eq!(field.force_at(DVec2::new(800.0, 60.0)), field.get(160));
    }
}
