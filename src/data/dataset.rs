use serde::{Deserialize, Serialize};

/// A single (x, y) observation
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// First coordinate, held fixed by permutation
    pub x: f64,
    /// Second coordinate, shuffled by permutation
    pub y: f64,
}

impl DataPoint {
    /// Create a point from its coordinates
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates are finite
    pub const fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Ordered sequence of points making up one plot
///
/// Index correspondence between the x and y series is the only ordering
/// that carries meaning; permutation breaks it on purpose.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    points: Vec<DataPoint>,
}

impl Dataset {
    /// Wrap a vector of points
    pub const fn new(points: Vec<DataPoint>) -> Self {
        Self { points }
    }

    /// Rebuild a dataset by pairing x and y series index by index
    ///
    /// The result is as long as the shorter series.
    pub fn from_columns(xs: &[f64], ys: &[f64]) -> Self {
        xs.iter()
            .zip(ys)
            .map(|(&x, &y)| DataPoint::new(x, y))
            .collect()
    }

    /// All points in order
    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    /// Number of points
    pub const fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the dataset has no points
    pub const fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First coordinates in order
    pub fn xs(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.x).collect()
    }

    /// Second coordinates in order
    pub fn ys(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.y).collect()
    }

    /// Iterate over the points
    pub fn iter(&self) -> std::slice::Iter<'_, DataPoint> {
        self.points.iter()
    }
}

impl From<Vec<DataPoint>> for Dataset {
    fn from(points: Vec<DataPoint>) -> Self {
        Self::new(points)
    }
}

impl FromIterator<DataPoint> for Dataset {
    fn from_iter<I: IntoIterator<Item = DataPoint>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a DataPoint;
    type IntoIter = std::slice::Iter<'a, DataPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
