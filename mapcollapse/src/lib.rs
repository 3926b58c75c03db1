//! # mapcollapse
//!
//! mapcollapse collapses a set of geolocated entities (point records and
//! box-shaped locations) into a bounded number of displayable map markers.
//!
//! A page showing thousands of observations cannot draw a marker per record.
//! [`ClusterBuilder`] buckets entities by their footprint rounded at the
//! finest rung of a precision ladder, then re-keys the buckets one rung
//! coarser at a time until at most `max_objects` clusters remain. Each
//! cluster is an [`Extent`]: the grouped entities plus the one bounding box
//! covering them.
//!
//! ## Features
//! - **Dateline-aware geometry**: boxes may straddle ±180° (`west > east`);
//!   merging always goes the shorter way around the globe.
//! - **Fallback placement**: a point record with missing or implausible
//!   coordinates is mapped by the location it was filed under.
//! - **Deterministic**: equal input always yields equal clusters, in a
//!   stable north-to-south order.
//!
//! ## Usage Example
//!
//! ```rust
//! use mapcollapse::{BoundingBox, BoxGeometry, ClusterBuilder, Entity};
//!
//! let entities = vec![
//! 	Entity::point(11, 34.1, -118.3),
//! 	Entity::point(12, 34.2, -118.4),
//! 	Entity::location(7, BoundingBox::new(36.0, 35.0, -117.0, -118.0)?),
//! ];
//!
//! let map = ClusterBuilder::new(&entities, 2)?;
//! assert!(map.clusters().len() <= 2);
//!
//! for cluster in map.clusters() {
//! 	println!("{:?} holding {} entities", cluster.center(), cluster.entities().len());
//! }
//! # Ok::<(), mapcollapse::Error>(())
//! ```

pub mod cluster;
pub mod error;
pub mod types;

pub use cluster::*;
pub use error::*;
pub use types::*;
