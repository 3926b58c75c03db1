use thiserror::Error;

/// Everything that can go wrong while validating input or building a
/// cluster map.
///
/// All variants are produced before any grouping work starts; a failed call
/// leaves nothing partially constructed.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
	#[error("cannot build a cluster map from an empty entity list")]
	EmptyInput,

	#[error("max_objects must be at least 1")]
	ZeroMaxObjects,

	/// A point entity with neither coordinates nor a fallback location.
	#[error("entity {id} has neither coordinates nor a location box")]
	UnmappableEntity { id: u64 },

	#[error("entity {id} has non-finite coordinates ({lat}, {lng})")]
	NonFiniteCoordinates { id: u64, lat: f64, lng: f64 },

	/// Returned by [`BoundingBox::new`](crate::BoundingBox::new), keeping
	/// all box geometry finite by construction.
	#[error("bounding box edges must be finite, got north={north} south={south} east={east} west={west}")]
	NonFiniteEdges {
		north: f64,
		south: f64,
		east: f64,
		west: f64,
	},
}

pub type Result<T> = std::result::Result<T, Error>;
