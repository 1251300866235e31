//! Cell-list spatial hashing for distance queries.

use nalgebra::Point3;
use std::collections::HashMap;

type CellIndex = (i64, i64, i64);

const MIN_CELL_SIZE: f64 = 1.0;

/// Uniform grid over a fixed set of points.
///
/// Points are bucketed into cubic cells of edge `cell_size`, so a query only needs to inspect
/// the cells overlapping its search sphere.
#[derive(Debug, Clone)]
pub struct NeighborGrid {
    cell_size: f64,
    points: Vec<Point3<f64>>,
    cells: HashMap<CellIndex, Vec<usize>>,
}

impl NeighborGrid {
    /// Builds a grid whose cells are at least `cell_size` wide.
    pub fn new(points: &[Point3<f64>], cell_size: f64) -> Self {
        let cell_size = if cell_size.is_finite() {
            cell_size.max(MIN_CELL_SIZE)
        } else {
            MIN_CELL_SIZE
        };
        let mut cells: HashMap<CellIndex, Vec<usize>> = HashMap::new();
        for (idx, point) in points.iter().enumerate() {
            cells
                .entry(Self::cell_of(point, cell_size))
                .or_default()
                .push(idx);
        }
        Self {
            cell_size,
            points: points.to_vec(),
            cells,
        }
    }

    fn cell_of(point: &Point3<f64>, cell_size: f64) -> CellIndex {
        (
            (point.x / cell_size).floor() as i64,
            (point.y / cell_size).floor() as i64,
            (point.z / cell_size).floor() as i64,
        )
    }

    /// Whether any point lies within `cutoff` (inclusive) of `query`.
    pub fn any_within(&self, query: &Point3<f64>, cutoff: f64) -> bool {
        if cutoff < 0.0 || self.points.is_empty() {
            return false;
        }
        let cutoff_sq = cutoff * cutoff;
        let reach = (cutoff / self.cell_size).ceil().max(1.0) as i64;
        let (cx, cy, cz) = Self::cell_of(query, self.cell_size);

        for dx in -reach..=reach {
            for dy in -reach..=reach {
                for dz in -reach..=reach {
                    let Some(bucket) = self.cells.get(&(cx + dx, cy + dy, cz + dz)) else {
                        continue;
                    };
                    if bucket
                        .iter()
                        .any(|&idx| (self.points[idx] - *query).norm_squared() <= cutoff_sq)
                    {
                        return true;
                    }
                }
            }
        }
        false
    }
}
