use rand::{Rng, SeedableRng, rngs::StdRng};

use super::{NodeId, RoadGraph};
use crate::geometry::Point;


/// Approximate metres per degree near the equator
pub const METRES_PER_DEGREE: f64 = 111_320.0;

/// Named places laid over the grid, as fractions of its (width, height)
const LANDMARKS: [(&str, f64, f64); 10] = [
    ("Bole International Airport", 0.90, 0.20),
    ("Meskel Square", 0.55, 0.45),
    ("Piassa", 0.35, 0.75),
    ("Mekanisa", 0.15, 0.15),
    ("Kazanchis", 0.65, 0.60),
    ("Arada", 0.40, 0.85),
    ("Lideta", 0.25, 0.50),
    ("Gulele", 0.20, 0.95),
    ("Nefas Silk Lafto", 0.35, 0.05),
    ("Bole Bulbula", 0.80, 0.00),
];


/// Synthetic street grid
/// Stands in for a downloaded road network: intersections are jittered around a
/// regular grid and some blocks get a diagonal shortcut
#[derive(Clone, Debug)]
pub struct GridCity {
    pub rows: usize,
    pub cols: usize,
    pub origin: Point, // south-west corner (lon, lat)
    pub spacing: f64, // degrees between neighbouring intersections
    pub jitter: f64, // max displacement as a fraction of spacing
    pub shortcut_ratio: f64, // probability of a diagonal per block
    pub seed: u64,
}

impl Default for GridCity {
    fn default() -> Self {
        Self {
            rows: 12,
            cols: 12,
            origin: Point::new(38.72, 8.96),
            spacing: 0.004,
            jitter: 0.2,
            shortcut_ratio: 0.15,
            seed: 7,
        }
    }
}

impl GridCity {

    pub fn new(rows: usize, cols: usize, seed: u64) -> Self {
        Self { rows, cols, seed, ..Self::default() }
    }

    /// Node id of the intersection at (row, col)
    pub fn node_id(&self, row: usize, col: usize) -> NodeId {
        (row * self.cols + col) as NodeId + 1
    }

    /// Build the road graph, deterministic for a given seed
    /// Street lengths are in metres and never shorter than the straight line,
    /// and the graph's distance scale converts degrees to metres to match
    pub fn build(&self) -> RoadGraph {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut graph = RoadGraph::new();
        graph.set_distance_scale(METRES_PER_DEGREE);
        let mut positions = Vec::with_capacity(self.rows * self.cols);

        for row in 0..self.rows {
            for col in 0..self.cols {
                let dx = rng.random_range(-self.jitter..=self.jitter) * self.spacing;
                let dy = rng.random_range(-self.jitter..=self.jitter) * self.spacing;
                let point = Point::new(
                    self.origin.x + col as f64 * self.spacing + dx,
                    self.origin.y + row as f64 * self.spacing + dy,
                );
                graph.add_intersection(self.node_id(row, col), point.x, point.y);
                positions.push(point);
            }
        }

        let street = |graph: &mut RoadGraph, rng: &mut StdRng, a: (usize, usize), b: (usize, usize)| {
            let pa = positions[a.0 * self.cols + a.1];
            let pb = positions[b.0 * self.cols + b.1];
            // roads bend, so they are a little longer than the crow flies
            let detour = rng.random_range(1.0..1.3);
            let length = pa.distance(&pb) * METRES_PER_DEGREE * detour;
            graph.add_road(self.node_id(a.0, a.1), self.node_id(b.0, b.1), length);
        };

        for row in 0..self.rows {
            for col in 0..self.cols {
                if col + 1 < self.cols {
                    street(&mut graph, &mut rng, (row, col), (row, col + 1));
                }
                if row + 1 < self.rows {
                    street(&mut graph, &mut rng, (row, col), (row + 1, col));
                }
                if row + 1 < self.rows && col + 1 < self.cols && rng.random_bool(self.shortcut_ratio.clamp(0.0, 1.0)) {
                    street(&mut graph, &mut rng, (row, col), (row + 1, col + 1));
                }
            }
        }

        graph
    }

    /// Well-known places spread over the grid extent
    pub fn landmarks(&self) -> Vec<(&'static str, Point)> {
        let width = self.cols.saturating_sub(1) as f64 * self.spacing;
        let height = self.rows.saturating_sub(1) as f64 * self.spacing;
        LANDMARKS.iter()
            .map(|&(name, fx, fy)| (name, Point::new(self.origin.x + fx * width, self.origin.y + fy * height)))
            .collect()
    }
}
