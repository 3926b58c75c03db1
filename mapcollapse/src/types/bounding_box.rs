use crate::{BoxGeometry, Error, Result};
use std::fmt::{Debug, Formatter};

/// Geographic bounding box defined by its four edges, in degrees.
///
/// `west > east` is a legal state: the box straddles the antimeridian and
/// covers `[west, 180] ∪ [-180, east]`. Construction only rejects
/// non-finite edges; range and orientation problems are reported separately
/// by [`BoundingBox::is_valid`].
///
/// # Examples
///
/// ```
/// use mapcollapse::{BoundingBox, BoxGeometry};
///
/// let fiji = BoundingBox::new(-12.5, -20.7, -178.0, 176.8)?;
/// assert!(fiji.is_valid());
/// assert!(fiji.straddles_dateline());
/// # Ok::<(), mapcollapse::Error>(())
/// ```
#[derive(Clone, Copy, PartialEq)]
pub struct BoundingBox {
	pub north: f64,
	pub south: f64,
	pub east: f64,
	pub west: f64,
	/// Forces construction through [`BoundingBox::new`].
	phantom: (),
}

impl BoundingBox {
	/// Creates a bounding box from its edges.
	///
	/// # Errors
	///
	/// Returns [`Error::NonFiniteEdges`] if any edge is NaN or infinite.
	/// Finite edges are accepted as-is, even out-of-range ones.
	pub fn new(north: f64, south: f64, east: f64, west: f64) -> Result<Self> {
		if !(north.is_finite() && south.is_finite() && east.is_finite() && west.is_finite()) {
			return Err(Error::NonFiniteEdges {
				north,
				south,
				east,
				west,
			});
		}
		Ok(Self {
			north,
			south,
			east,
			west,
			phantom: (),
		})
	}

	/// Builds a box from edges already known to be finite.
	pub(crate) fn from_edges(north: f64, south: f64, east: f64, west: f64) -> Self {
		debug_assert!(
			north.is_finite() && south.is_finite() && east.is_finite() && west.is_finite(),
			"edges must be finite"
		);
		Self {
			north,
			south,
			east,
			west,
			phantom: (),
		}
	}

	/// True if all edges lie in their legal ranges and the latitudes are
	/// not inverted.
	///
	/// Straddling (`west > east`) is legal; `south > north` is not.
	#[must_use]
	pub fn is_valid(&self) -> bool {
		(-90.0..=90.0).contains(&self.north)
			&& (-90.0..=90.0).contains(&self.south)
			&& (-180.0..=180.0).contains(&self.east)
			&& (-180.0..=180.0).contains(&self.west)
			&& self.south <= self.north
	}

	/// Returns a copy with every edge pushed outward by `delta` degrees.
	///
	/// Used as a tolerance margin before comparing edges. The result may
	/// leave the legal coordinate ranges; check [`BoundingBox::is_valid`]
	/// if that matters.
	///
	/// # Examples
	///
	/// ```
	/// use mapcollapse::BoundingBox;
	///
	/// let b = BoundingBox::new(40.0, 39.0, -120.0, -121.0)?.expand(0.5);
	/// assert_eq!(b, BoundingBox::new(40.5, 38.5, -119.5, -121.5)?);
	/// # Ok::<(), mapcollapse::Error>(())
	/// ```
	#[must_use]
	pub fn expand(&self, delta: f64) -> Self {
		Self::from_edges(
			self.north + delta,
			self.south - delta,
			self.east + delta,
			self.west - delta,
		)
	}
}

impl BoxGeometry for BoundingBox {
	fn north(&self) -> f64 {
		self.north
	}
	fn south(&self) -> f64 {
		self.south
	}
	fn east(&self) -> f64 {
		self.east
	}
	fn west(&self) -> f64 {
		self.west
	}
}

impl TryFrom<[f64; 4]> for BoundingBox {
	type Error = Error;

	/// Builds a box from `[north, south, east, west]`, the same order
	/// [`BoxGeometry::edges`] produces.
	fn try_from(edges: [f64; 4]) -> Result<Self> {
		BoundingBox::new(edges[0], edges[1], edges[2], edges[3])
	}
}

impl Debug for BoundingBox {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"BoundingBox(N{} S{} E{} W{})",
			self.north, self.south, self.east, self.west
		)
	}
}
