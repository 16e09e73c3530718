use num_traits::Float;
use serde::Serialize;


/// Euclidean distance
pub fn euclidean<T>(x1: T, y1: T, x2: T, y2: T) -> T
where
    T: Float,
    {
    ((x1 - x2).powi(2) + (y1 - y2).powi(2)).sqrt()
}


/// 2D Point
/// For road graphs x is longitude and y is latitude
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Straight-line distance to another point
    pub fn distance(&self, other: &Point) -> f64 {
        euclidean(self.x, self.y, other.x, other.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_euclidean() {
        assert_relative_eq!(euclidean(0.0, 0.0, 3.0, 4.0), 5.0);
        assert_relative_eq!(euclidean(1.0f32, 1.0, 1.0, 1.0), 0.0);
    }

    #[test]
    fn test_point_distance_is_symmetric() {
        let a = Point::new(38.76, 9.01);
        let b = Point::new(38.79, 8.98);
        assert_relative_eq!(a.distance(&b), b.distance(&a));
    }
}
