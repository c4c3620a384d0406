//! The keyspace module
//! Provide a named, fixed-dimension collection of vectors and its searches

use crate::error::{check_dimension, Error, Result};
use crate::vector::Vector;
use parking_lot::RwLock;
use serde::Serialize;
use tracing::debug;

/// A vector selected by a threshold search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor {
    /// Position of the vector inside its keyspace.
    pub index: usize,
    /// `1 / (1 + euclidean_distance)`, always in `(0, 1]`.
    pub similarity: f64,
}

/// The closest vector to a query, as seen under a single lock acquisition.
#[derive(Debug, Clone, PartialEq)]
pub struct NearestMatch {
    pub index: usize,
    pub distance: f64,
    pub vector: Vector,
}

/// A named collection of vectors sharing one dimension.
///
/// Every operation holds the keyspace lock for its whole duration: mutations
/// take it exclusively, reads share it. A caller therefore only ever observes
/// the state before or after a mutation, never a partially applied one.
///
/// Keyspaces are usually shared as `Arc<Keyspace>` between a
/// [`Store`](crate::Store) and the threads searching them.
///
/// # Examples
///
/// ```
/// use vecstore::{Keyspace, Vector};
///
/// let ks = Keyspace::new(2, "points");
/// ks.add_vector(Vector::from(vec![0.0, 0.0])).unwrap();
/// ks.add_vector(Vector::from(vec![1.0, 0.0])).unwrap();
///
/// let query = Vector::from(vec![0.9, 0.1]);
/// assert_eq!(ks.find_nearest_neighbor(&query).unwrap(), 1);
/// ```
#[derive(Debug)]
pub struct Keyspace {
    name: String,
    dimension: usize,
    vectors: RwLock<Vec<Vector>>,
}

impl Keyspace {
    /// Creates an empty keyspace whose vectors must all have `dimension` components.
    pub fn new(dimension: usize, name: impl Into<String>) -> Keyspace {
        let name = name.into();
        debug!(keyspace = %name, dimension, "keyspace created");

        Keyspace { name, dimension, vectors: RwLock::new(Vec::new()) }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns the number of vectors in the keyspace.
    pub fn size(&self) -> usize {
        self.vectors.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.read().is_empty()
    }

    /// Appends a vector and returns the index it was stored at.
    ///
    /// Fails with [`Error::DimensionMismatch`] if the vector's dimension differs
    /// from the keyspace's.
    pub fn add_vector(&self, vector: Vector) -> Result<usize> {
        check_dimension(self.dimension, vector.dimension())?;

        let mut vectors = self.vectors.write();
        let index = vectors.len();
        vectors.push(vector);
        debug!(keyspace = %self.name, index, "vector added");

        Ok(index)
    }

    /// Appends a batch of vectors as one unit.
    ///
    /// Every vector is validated before anything is inserted: on a dimension
    /// mismatch the call fails and the keyspace is left untouched. On success
    /// the whole batch becomes visible at once and keeps its order.
    pub fn batch_add_vectors<I>(&self, vectors: I) -> Result<()>
    where
        I: IntoIterator<Item = Vector>,
    {
        let batch: Vec<Vector> = vectors.into_iter().collect();
        for vector in &batch {
            check_dimension(self.dimension, vector.dimension())?;
        }

        let count = batch.len();
        let mut vectors = self.vectors.write();
        vectors.extend(batch);
        debug!(keyspace = %self.name, count, size = vectors.len(), "vector batch added");

        Ok(())
    }

    /// Removes and returns the vector at `index`, shifting later vectors down
    /// by one so relative order is preserved.
    ///
    /// Fails with [`Error::OutOfRange`] if `index >= size()`.
    pub fn remove_vector(&self, index: usize) -> Result<Vector> {
        let mut vectors = self.vectors.write();
        if index >= vectors.len() {
            return Err(Error::OutOfRange { index, len: vectors.len() });
        }

        let removed = vectors.remove(index);
        debug!(keyspace = %self.name, index, size = vectors.len(), "vector removed");

        Ok(removed)
    }

    /// Returns a copy of the vector at `index`.
    ///
    /// The stored vector cannot be modified through the returned value.
    pub fn get_vector(&self, index: usize) -> Result<Vector> {
        let vectors = self.vectors.read();
        vectors
            .get(index)
            .cloned()
            .ok_or(Error::OutOfRange { index, len: vectors.len() })
    }

    /// Returns a snapshot of every vector in insertion order.
    pub fn vectors(&self) -> Vec<Vector> {
        self.vectors.read().clone()
    }

    /// Returns the index of the vector closest to `query` by Euclidean distance.
    ///
    /// The scan runs in insertion order and only replaces the current best on a
    /// strictly smaller distance, so the lowest index wins a tie.
    ///
    /// Fails with [`Error::EmptyCollection`] on an empty keyspace and with
    /// [`Error::DimensionMismatch`] if `query` has the wrong dimension.
    pub fn find_nearest_neighbor(&self, query: &Vector) -> Result<usize> {
        let vectors = self.vectors.read();
        let (index, _) = self.scan_nearest(&vectors, query)?;

        Ok(index)
    }

    /// Like [`find_nearest_neighbor`](Keyspace::find_nearest_neighbor), but also
    /// returns the distance and a copy of the matched vector. All three come
    /// from the same lock acquisition, so they always describe one vector.
    pub fn find_nearest_match(&self, query: &Vector) -> Result<NearestMatch> {
        let vectors = self.vectors.read();
        let (index, distance) = self.scan_nearest(&vectors, query)?;

        Ok(NearestMatch { index, distance, vector: vectors[index].clone() })
    }

    /// Returns every vector whose similarity to `query` is at least `threshold`,
    /// most similar first.
    ///
    /// Similarity is `1 / (1 + d)` where `d` is the Euclidean distance, which maps
    /// `[0, inf)` onto `(0, 1]`. Equal similarities keep insertion order. A query
    /// that matches nothing yields an empty list, not an error.
    ///
    /// Fails with [`Error::EmptyCollection`] on an empty keyspace and with
    /// [`Error::DimensionMismatch`] if `query` has the wrong dimension.
    pub fn find_neighbors_above_threshold(&self, query: &Vector, threshold: f64) -> Result<Vec<Neighbor>> {
        let vectors = self.vectors.read();
        self.check_query(&vectors, query)?;

        let mut neighbors = Vec::new();
        for (index, vector) in vectors.iter().enumerate() {
            let similarity = 1.0 / (1.0 + query.euclidean_distance(vector)?);
            if similarity >= threshold {
                neighbors.push(Neighbor { index, similarity });
            }
        }

        // sort_by is stable
        neighbors.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));

        Ok(neighbors)
    }

    fn scan_nearest(&self, vectors: &[Vector], query: &Vector) -> Result<(usize, f64)> {
        self.check_query(vectors, query)?;

        let mut nearest = 0;
        let mut min_distance = f64::INFINITY;
        for (i, vector) in vectors.iter().enumerate() {
            let distance = query.euclidean_distance(vector)?;
            if distance < min_distance {
                min_distance = distance;
                nearest = i;
            }
        }

        Ok((nearest, min_distance))
    }

    fn check_query(&self, vectors: &[Vector], query: &Vector) -> Result<()> {
        if vectors.is_empty() {
            return Err(Error::EmptyCollection(self.name.clone()));
        }
        check_dimension(self.dimension, query.dimension())
    }
}

impl Drop for Keyspace {
    fn drop(&mut self) {
        debug!(keyspace = %self.name, size = self.vectors.get_mut().len(), "keyspace destroyed");
    }
}

#[cfg(test)]
mod keyspace_test {
    use super::*;

    fn sample() -> Keyspace {
        let ks = Keyspace::new(2, "sample");
        ks.batch_add_vectors([
            Vector::from(vec![0.0, 0.0]),
            Vector::from(vec![1.0, 0.0]),
            Vector::from(vec![0.0, 1.0]),
        ])
        .unwrap();
        ks
    }

    // ========== Mutation Tests ==========

    #[test]
    fn test_new_keyspace_is_empty() {
        let ks = Keyspace::new(3, "empty");
        assert_eq!(ks.name(), "empty");
        assert_eq!(ks.dimension(), 3);
        assert_eq!(ks.size(), 0);
        assert!(ks.is_empty());
    }

    #[test]
    fn test_add_vector() {
        let ks = Keyspace::new(2, "ks");
        assert_eq!(ks.add_vector(Vector::from(vec![1.0, 2.0])).unwrap(), 0);
        assert_eq!(ks.add_vector(Vector::from(vec![3.0, 4.0])).unwrap(), 1);

        assert_eq!(ks.size(), 2);
        assert_eq!(ks.get_vector(0).unwrap().components(), &[1.0, 2.0]);
    }

    #[test]
    fn test_add_vector_dimension_mismatch() {
        let ks = Keyspace::new(2, "ks");
        let result = ks.add_vector(Vector::new(3));

        assert_eq!(result, Err(Error::DimensionMismatch { expected: 2, actual: 3 }));
        assert_eq!(ks.size(), 0);
    }

    #[test]
    fn test_batch_add_preserves_order() {
        let ks = sample();
        assert_eq!(ks.size(), 3);
        assert_eq!(ks.get_vector(2).unwrap().components(), &[0.0, 1.0]);
    }

    #[test]
    fn test_batch_add_mismatch_inserts_nothing() {
        let ks = sample();
        let result = ks.batch_add_vectors(vec![
            Vector::from(vec![5.0, 5.0]),
            Vector::from(vec![1.0, 2.0, 3.0]),
            Vector::from(vec![6.0, 6.0]),
        ]);

        assert_eq!(result, Err(Error::DimensionMismatch { expected: 2, actual: 3 }));
        assert_eq!(ks.size(), 3);
    }

    #[test]
    fn test_remove_middle_preserves_order() {
        let ks = sample();
        let removed = ks.remove_vector(1).unwrap();

        assert_eq!(removed.components(), &[1.0, 0.0]);
        assert_eq!(ks.size(), 2);
        assert_eq!(ks.get_vector(0).unwrap().components(), &[0.0, 0.0]);
        assert_eq!(ks.get_vector(1).unwrap().components(), &[0.0, 1.0]);
    }

    #[test]
    fn test_remove_out_of_range() {
        let ks = sample();
        assert_eq!(ks.remove_vector(3), Err(Error::OutOfRange { index: 3, len: 3 }));
        assert_eq!(ks.size(), 3);
    }

    #[test]
    fn test_add_then_remove_round_trip() {
        let ks = sample();
        let before = ks.vectors();

        ks.add_vector(Vector::from(vec![9.0, 9.0])).unwrap();
        ks.remove_vector(3).unwrap();

        assert_eq!(ks.vectors(), before);
    }

    #[test]
    fn test_get_vector_out_of_range() {
        let ks = Keyspace::new(2, "ks");
        assert_eq!(ks.get_vector(0), Err(Error::OutOfRange { index: 0, len: 0 }));
    }

    #[test]
    fn test_get_vector_returns_copy() {
        let ks = sample();
        let mut copy = ks.get_vector(1).unwrap();
        copy.set(0, 42.0).unwrap();

        assert_eq!(ks.get_vector(1).unwrap().components(), &[1.0, 0.0]);
    }

    // ========== Nearest Neighbor Tests ==========

    #[test]
    fn test_nearest_neighbor_scenario() {
        let ks = sample();
        let query = Vector::from(vec![0.1, 0.1]);
        assert_eq!(ks.find_nearest_neighbor(&query).unwrap(), 0);
    }

    #[test]
    fn test_nearest_neighbor_tie_takes_lowest_index() {
        let ks = Keyspace::new(2, "ties");
        ks.batch_add_vectors([
            Vector::from(vec![5.0, 5.0]),
            Vector::from(vec![1.0, 0.0]),
            Vector::from(vec![-1.0, 0.0]),
            Vector::from(vec![1.0, 0.0]),
        ])
        .unwrap();

        assert_eq!(ks.find_nearest_neighbor(&Vector::new(2)).unwrap(), 1);
    }

    #[test]
    fn test_nearest_neighbor_is_minimal() {
        let ks = Keyspace::new(3, "grid");
        for i in 0..20 {
            let x = i as f64;
            ks.add_vector(Vector::from(vec![x, (x * 0.7).sin(), -x / 3.0])).unwrap();
        }
        let query = Vector::from(vec![7.3, 0.2, -2.0]);

        let best = ks.find_nearest_neighbor(&query).unwrap();
        let best_distance = query.euclidean_distance(&ks.get_vector(best).unwrap()).unwrap();
        for v in ks.vectors() {
            assert!(query.euclidean_distance(&v).unwrap() >= best_distance);
        }
    }

    #[test]
    fn test_nearest_neighbor_empty() {
        let ks = Keyspace::new(2, "empty");
        assert_eq!(
            ks.find_nearest_neighbor(&Vector::new(2)),
            Err(Error::EmptyCollection("empty".to_string()))
        );
    }

    #[test]
    fn test_nearest_neighbor_dimension_mismatch() {
        let ks = sample();
        assert_eq!(
            ks.find_nearest_neighbor(&Vector::new(5)),
            Err(Error::DimensionMismatch { expected: 2, actual: 5 })
        );
    }

    #[test]
    fn test_nearest_match_scenario() {
        let ks = sample();
        let m = ks.find_nearest_match(&Vector::from(vec![0.9, 0.2])).unwrap();

        assert_eq!(m.index, 1);
        assert_eq!(m.vector.components(), &[1.0, 0.0]);
        assert!((m.distance - (0.01f64 + 0.04).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_nearest_match_errors() {
        let ks = Keyspace::new(2, "empty");
        assert_eq!(
            ks.find_nearest_match(&Vector::new(2)),
            Err(Error::EmptyCollection("empty".to_string()))
        );
        ks.add_vector(Vector::new(2)).unwrap();
        assert!(matches!(ks.find_nearest_match(&Vector::new(3)), Err(Error::DimensionMismatch { .. })));
    }

    #[test]
    fn test_nearest_match_consistent_under_removal() {
        // far vectors, with the exact match sitting last
        let ks = Keyspace::new(1, "churn");
        ks.batch_add_vectors((0..50).map(|i| Vector::from(vec![100.0 + i as f64]))).unwrap();
        ks.add_vector(Vector::from(vec![0.0])).unwrap();
        let query = Vector::from(vec![0.0]);

        std::thread::scope(|s| {
            s.spawn(|| {
                for _ in 0..2000 {
                    let last = ks.size() - 1;
                    let removed = ks.remove_vector(last).unwrap();
                    ks.add_vector(removed).unwrap();
                }
            });
            s.spawn(|| {
                for _ in 0..5000 {
                    let m = ks.find_nearest_match(&query).unwrap();
                    let expected = query.euclidean_distance(&m.vector).unwrap();
                    assert_eq!(m.distance, expected);
                    assert!(m.index < 51);
                    if m.distance == 0.0 {
                        assert_eq!(m.index, 50);
                    }
                }
            });
        });
    }

    // ========== Threshold Tests ==========

    #[test]
    fn test_threshold_scenario() {
        let ks = sample();
        let query = Vector::from(vec![0.1, 0.1]);
        let results = ks.find_neighbors_above_threshold(&query, 0.5).unwrap();

        assert_eq!(results[0].index, 0);
        let expected = 1.0 / (1.0 + 0.02f64.sqrt());
        assert!((results[0].similarity - expected).abs() < 1e-12);
        assert!((results[0].similarity - 0.876).abs() < 1e-3);

        for w in results.windows(2) {
            assert!(w[0].similarity >= w[1].similarity, "Results not sorted by similarity");
        }
        for n in &results {
            assert!(n.similarity >= 0.5 && n.similarity <= 1.0);
        }
    }

    #[test]
    fn test_threshold_ties_keep_insertion_order() {
        let ks = sample();
        // (1,0) and (0,1) are equidistant from the origin
        let results = ks.find_neighbors_above_threshold(&Vector::new(2), 0.0).unwrap();

        let order: Vec<usize> = results.iter().map(|n| n.index).collect();
        assert_eq!(order, vec![0, 1, 2]);
        assert_eq!(results[0].similarity, 1.0);
    }

    #[test]
    fn test_threshold_no_match_is_empty_not_error() {
        let ks = sample();
        let far = Vector::from(vec![100.0, 100.0]);
        assert!(ks.find_neighbors_above_threshold(&far, 0.5).unwrap().is_empty());
    }

    #[test]
    fn test_threshold_empty_keyspace() {
        let ks = Keyspace::new(2, "empty");
        assert_eq!(
            ks.find_neighbors_above_threshold(&Vector::new(2), 0.1),
            Err(Error::EmptyCollection("empty".to_string()))
        );
    }

    #[test]
    fn test_threshold_dimension_mismatch() {
        let ks = sample();
        assert!(matches!(
            ks.find_neighbors_above_threshold(&Vector::new(1), 0.1),
            Err(Error::DimensionMismatch { .. })
        ));
    }
}
