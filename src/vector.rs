//! This is the vector math module
//! Provide the fixed-dimension `Vector` and its distance metrics

use crate::error::{check_dimension, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A fixed-dimension tuple of `f64` components.
///
/// The dimension is chosen at construction and never changes afterwards;
/// components can only be rewritten in place through [`Vector::set`].
///
/// # Examples
///
/// ```
/// use vecstore::Vector;
///
/// let mut v = Vector::new(2);
/// v.set(0, 3.0).unwrap();
/// v.set(1, 4.0).unwrap();
///
/// let origin = Vector::new(2);
/// assert_eq!(v.euclidean_distance(&origin).unwrap(), 5.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<f64>", into = "Vec<f64>")]
pub struct Vector {
    components: Vec<f64>,
}

impl Vector {
    /// Creates a zero-filled vector of the given dimension.
    pub fn new(dimension: usize) -> Vector {
        Vector { components: vec![0.0; dimension] }
    }

    pub fn dimension(&self) -> usize {
        self.components.len()
    }

    pub fn components(&self) -> &[f64] {
        &self.components
    }

    /// Returns the component at `index`.
    ///
    /// Fails with [`Error::OutOfRange`] when `index >= dimension`.
    pub fn get(&self, index: usize) -> Result<f64> {
        self.components
            .get(index)
            .copied()
            .ok_or(Error::OutOfRange { index, len: self.dimension() })
    }

    /// Overwrites the component at `index`.
    ///
    /// Fails with [`Error::OutOfRange`] when `index >= dimension`.
    pub fn set(&mut self, index: usize, value: f64) -> Result<()> {
        let len = self.dimension();
        match self.components.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(Error::OutOfRange { index, len }),
        }
    }

    /// Euclidean distance
    /// dist = sqrt(sum((a[i] - b[i])^2))
    pub fn euclidean_distance(&self, other: &Vector) -> Result<f64> {
        check_dimension(self.dimension(), other.dimension())?;

        let sum = self.pairs(other)
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>();

        Ok(sum.sqrt())
    }

    /// Manhattan distance
    /// dist = sum(|a[i] - b[i]|)
    pub fn manhattan_distance(&self, other: &Vector) -> Result<f64> {
        check_dimension(self.dimension(), other.dimension())?;

        Ok(self.pairs(other).map(|(a, b)| (a - b).abs()).sum())
    }

    /// Dot product
    /// dot = sum(a[i] * b[i])
    pub fn dot(&self, other: &Vector) -> Result<f64> {
        check_dimension(self.dimension(), other.dimension())?;

        Ok(self.pairs(other).map(|(a, b)| a * b).sum())
    }

    /// L2 norm of the vector.
    pub fn magnitude(&self) -> f64 {
        self.components.iter().map(|x| x * x).sum::<f64>().sqrt()
    }

    /// Cosine similarity
    /// cos = dot(a, b) / (||a|| * ||b||)
    /// Returns 0.0 when either side has zero magnitude instead of failing
    pub fn cosine_similarity(&self, other: &Vector) -> Result<f64> {
        let dot = self.dot(other)?;

        let (norm_a, norm_b) = (self.magnitude(), other.magnitude());
        if norm_a == 0.0 || norm_b == 0.0 {
            return Ok(0.0);
        }

        Ok(dot / (norm_a * norm_b))
    }

    fn pairs<'a>(&'a self, other: &'a Vector) -> impl Iterator<Item = (f64, f64)> + 'a {
        self.components.iter().copied().zip(other.components.iter().copied())
    }
}

impl From<Vec<f64>> for Vector {
    fn from(components: Vec<f64>) -> Self {
        Vector { components }
    }
}

impl From<Vector> for Vec<f64> {
    fn from(vector: Vector) -> Self {
        vector.components
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, c) in self.components.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:.4}", c)?;
        }
        write!(f, ")")
    }
}

/// The metrics a pair of vectors can be compared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Euclidean,
    Cosine,
    Manhattan,
}

impl Metric {
    /// Applies this metric to `a` and `b`.
    pub fn score(self, a: &Vector, b: &Vector) -> Result<f64> {
        match self {
            Metric::Euclidean => a.euclidean_distance(b),
            Metric::Cosine => a.cosine_similarity(b),
            Metric::Manhattan => a.manhattan_distance(b),
        }
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "euclidean" | "l2" => Ok(Metric::Euclidean),
            "cosine" | "cos" => Ok(Metric::Cosine),
            "manhattan" | "l1" => Ok(Metric::Manhattan),
            _ => Err(format!("Unknown metric: {}. Available: euclidean, cosine, manhattan", s)),
        }
    }
}
