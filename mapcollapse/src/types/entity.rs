use crate::{BoundingBox, BoxGeometry, DEFAULT_TOLERANCE_FACTOR};

/// A place with a surveyed bounding box, e.g. "Burbank, California".
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedBox {
	/// Opaque caller-supplied identifier, carried through clustering.
	pub id: u64,
	pub bbox: BoundingBox,
}

impl LocatedBox {
	pub fn new(id: u64, bbox: BoundingBox) -> Self {
		Self { id, bbox }
	}
}

impl BoxGeometry for LocatedBox {
	fn north(&self) -> f64 {
		self.bbox.north
	}
	fn south(&self) -> f64 {
		self.bbox.south
	}
	fn east(&self) -> f64 {
		self.bbox.east
	}
	fn west(&self) -> f64 {
		self.bbox.west
	}
}

/// A point record, e.g. a single field observation: optional recorded
/// coordinates plus the location it was filed under, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedPoint {
	pub id: u64,
	/// Recorded coordinates as `(lat, lng)`, if any were captured.
	pub lat_lng: Option<(f64, f64)>,
	/// The location the record was filed under, used as a fallback when the
	/// coordinates are missing or dubious.
	pub location: Option<LocatedBox>,
}

impl LocatedPoint {
	pub fn new(id: u64, lat_lng: Option<(f64, f64)>, location: Option<LocatedBox>) -> Self {
		Self {
			id,
			lat_lng,
			location,
		}
	}

	/// True when the recorded coordinates lie implausibly far outside the
	/// location the record was filed under.
	///
	/// Without a reference location (or without coordinates) nothing can be
	/// contradicted and the point is not dubious.
	pub fn is_dubious(&self) -> bool {
		match (self.lat_lng, &self.location) {
			(Some((lat, lng)), Some(location)) => {
				!location.contains_point_fuzzy(lat, lng, DEFAULT_TOLERANCE_FACTOR)
			}
			_ => false,
		}
	}

	/// The coordinates to map this record at, unless they are missing or
	/// dubious.
	pub fn usable_point(&self) -> Option<(f64, f64)> {
		if self.is_dubious() { None } else { self.lat_lng }
	}
}

/// Anything that can be placed on a map.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
	Point(LocatedPoint),
	Location(LocatedBox),
}

/// The geometry an entity contributes when merged into an extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntityGeometry<'a> {
	Point(f64, f64),
	Box(&'a BoundingBox),
}

impl Entity {
	/// A point entity with recorded coordinates and no location.
	pub fn point(id: u64, lat: f64, lng: f64) -> Self {
		Self::Point(LocatedPoint::new(id, Some((lat, lng)), None))
	}

	/// A box entity.
	pub fn location(id: u64, bbox: BoundingBox) -> Self {
		Self::Location(LocatedBox::new(id, bbox))
	}

	pub fn id(&self) -> u64 {
		match self {
			Self::Point(point) => point.id,
			Self::Location(location) => location.id,
		}
	}

	pub fn is_point_like(&self) -> bool {
		matches!(self, Self::Point(_))
	}

	pub fn is_location_like(&self) -> bool {
		matches!(self, Self::Location(_))
	}

	/// The geometry this entity should be mapped with: its usable point,
	/// else its (fallback) location box, else nothing.
	pub fn geometry(&self) -> Option<EntityGeometry<'_>> {
		match self {
			Self::Location(location) => Some(EntityGeometry::Box(&location.bbox)),
			Self::Point(point) => match point.usable_point() {
				Some((lat, lng)) => Some(EntityGeometry::Point(lat, lng)),
				None => point
					.location
					.as_ref()
					.map(|location| EntityGeometry::Box(&location.bbox)),
			},
		}
	}
}
