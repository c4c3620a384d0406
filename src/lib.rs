//! # vecstore - An In-Memory Similarity Search Store
//!
//! vecstore keeps named keyspaces of fixed-dimension vectors in memory and
//! searches them with a linear scan. A [`Store`] is a registry of shared
//! [`Keyspace`]s; each keyspace answers nearest-neighbor and threshold queries
//! using Euclidean distance, with similarity defined as `1 / (1 + distance)`.
//!
//! Keyspaces and stores are `Send + Sync`: every operation locks for its whole
//! duration, so concurrent callers never see a half-applied mutation.
//!
//! ## Example
//!
//! ```
//! use vecstore::{Store, Vector};
//!
//! let store = Store::new("demo");
//! let ks = store.create_keyspace(2, "points");
//!
//! ks.batch_add_vectors(vec![
//!     Vector::from(vec![0.0, 0.0]),
//!     Vector::from(vec![1.0, 0.0]),
//!     Vector::from(vec![0.0, 1.0]),
//! ]).unwrap();
//!
//! let query = Vector::from(vec![0.1, 0.1]);
//! assert_eq!(ks.find_nearest_neighbor(&query).unwrap(), 0);
//!
//! let neighbors = ks.find_neighbors_above_threshold(&query, 0.5).unwrap();
//! assert_eq!(neighbors[0].index, 0); // most similar first
//! ```

pub mod config;
pub mod error;
pub mod keyspace;
pub mod server;
pub mod store;
pub mod vector;

pub use error::{Error, Result};
pub use keyspace::{Keyspace, NearestMatch, Neighbor};
pub use store::Store;
pub use vector::{Metric, Vector};
