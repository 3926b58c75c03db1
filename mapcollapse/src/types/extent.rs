use crate::{BoxGeometry, Entity, EntityGeometry, LocatedBox, LocatedPoint};
use itertools::Itertools;
use std::fmt::{Debug, Formatter};

/// Extents with a north-south span below this collapse to a single point.
pub const POINT_SPAN_EPSILON: f64 = 1e-4;

/// A cluster under construction: the entities grouped so far plus the one
/// bounding box covering all of them.
///
/// A fresh extent is *empty* (inverted edges, [`Extent::is_empty`]) until
/// the first point or box is merged in; the geometry accessors are only
/// meaningful once it is non-empty. Entities without geometry still ride
/// along in the owned list, so a cluster always accounts for every entity
/// given to it.
#[derive(Clone)]
pub struct Extent<'a> {
	entities: Vec<&'a Entity>,
	north: f64,
	south: f64,
	east: f64,
	west: f64,
}

impl<'a> Extent<'a> {
	/// Creates an empty extent covering nothing.
	pub fn new() -> Self {
		Self {
			entities: Vec::new(),
			north: -90.0,
			south: 90.0,
			east: -180.0,
			west: 180.0,
		}
	}

	/// Builds an extent by merging every entity, in order.
	pub fn from_entities<I>(entities: I) -> Self
	where
		I: IntoIterator<Item = &'a Entity>,
	{
		let mut extent = Self::new();
		for entity in entities {
			extent.merge_entity(entity);
		}
		extent
	}

	/// True while no point or box has been merged in.
	///
	/// Note this is about geometry, not about the owned entity list: an
	/// extent holding only geometry-less entities is still empty.
	pub fn is_empty(&self) -> bool {
		self.south > self.north
	}

	/// True if everything merged so far collapses to a single spot.
	pub fn is_point(&self) -> bool {
		!self.is_empty() && self.ns_span() < POINT_SPAN_EPSILON
	}

	/// True if the extent covers real area.
	pub fn is_box(&self) -> bool {
		!self.is_empty() && self.ns_span() >= POINT_SPAN_EPSILON
	}

	/// The entities grouped into this extent, in merge order.
	pub fn entities(&self) -> &[&'a Entity] {
		&self.entities
	}

	/// The point records grouped into this extent.
	pub fn points(&self) -> Vec<&'a LocatedPoint> {
		self.entities
			.iter()
			.copied()
			.filter_map(|entity| match entity {
				Entity::Point(point) => Some(point),
				Entity::Location(_) => None,
			})
			.collect()
	}

	/// The box locations grouped into this extent.
	pub fn locations(&self) -> Vec<&'a LocatedBox> {
		self.entities
			.iter()
			.copied()
			.filter_map(|entity| match entity {
				Entity::Location(location) => Some(location),
				Entity::Point(_) => None,
			})
			.collect()
	}

	/// Every location represented in this extent: box entities plus the
	/// reference locations of point entities, deduplicated by id.
	pub fn underlying_locations(&self) -> Vec<&'a LocatedBox> {
		self.entities
			.iter()
			.copied()
			.filter_map(|entity| match entity {
				Entity::Location(location) => Some(location),
				Entity::Point(point) => point.location.as_ref(),
			})
			.unique_by(|location| location.id)
			.collect()
	}

	// -----------------------------------------------------------------
	// merging

	/// Adds `entity` to the owned list and merges its geometry, if any.
	pub fn merge_entity(&mut self, entity: &'a Entity) {
		self.entities.push(entity);
		match entity.geometry() {
			Some(EntityGeometry::Point(lat, lng)) => self.merge_point(lat, lng),
			Some(EntityGeometry::Box(bbox)) => self.merge_box(bbox),
			None => {}
		}
	}

	/// Grows the extent just enough to cover `(lat, lng)`.
	///
	/// The first merge collapses the extent onto the point. Later merges
	/// extend whichever of the east/west edges is nearer going around the
	/// globe; an exact tie extends east.
	pub fn merge_point(&mut self, lat: f64, lng: f64) {
		if self.is_empty() {
			self.north = lat;
			self.south = lat;
			self.east = lng;
			self.west = lng;
			return;
		}
		self.north = self.north.max(lat);
		self.south = self.south.min(lat);
		if !self.lng_outside(lng) {
			return;
		}
		let east_gap = wrap_gap(lng - self.east);
		let west_gap = wrap_gap(self.west - lng);
		if east_gap <= west_gap {
			self.east = lng;
		} else {
			self.west = lng;
		}
	}

	/// Grows the extent just enough to cover everything `other` covers.
	///
	/// Wraparound-aware on both sides: a box already covered leaves the
	/// edges untouched, disjoint ranges are bridged the shorter way around
	/// the globe (ties bridging east), and a union that closes the full
	/// circle collapses to `[-180, 180]`.
	pub fn merge_box<B: BoxGeometry>(&mut self, other: &B) {
		if self.is_empty() {
			self.north = other.north();
			self.south = other.south();
			self.east = other.east();
			self.west = other.west();
			return;
		}
		self.north = self.north.max(other.north());
		self.south = self.south.min(other.south());

		let (e, w) = (other.east(), other.west());
		if self.lng_range_covered(e, w) {
			return;
		}
		match (self.straddles_dateline(), w > e) {
			(false, false) => self.extend_lng_plain(e, w),
			(false, true) => self.extend_lng_other_straddles(e, w),
			(true, false) => self.extend_lng_self_straddles(e, w),
			(true, true) => {
				self.west = self.west.min(w);
				self.east = self.east.max(e);
				if self.west <= self.east {
					// the two gaps no longer overlap, nothing is excluded
					self.west = -180.0;
					self.east = 180.0;
				}
			}
		}
	}

	/// Folds `other` into this extent: geometry first, then its entities.
	pub(crate) fn absorb(&mut self, other: Extent<'a>) {
		if !other.is_empty() {
			self.merge_box(&other);
		}
		self.entities.extend(other.entities);
	}

	/// True if `lng` falls outside the covered longitude range.
	fn lng_outside(&self, lng: f64) -> bool {
		if self.straddles_dateline() {
			lng > self.east && lng < self.west
		} else {
			lng > self.east || lng < self.west
		}
	}

	/// True if the range `[w, e]` is already inside this extent's range.
	fn lng_range_covered(&self, e: f64, w: f64) -> bool {
		match (self.straddles_dateline(), w > e) {
			(false, false) => self.west <= w && e <= self.east,
			// a plain range only covers a straddling one if it spans the globe
			(false, true) => self.west <= -180.0 && self.east >= 180.0,
			(true, false) => w >= self.west || e <= self.east,
			(true, true) => w >= self.west && e <= self.east,
		}
	}

	// Neither range straddles. Overlapping ranges take the plain union;
	// disjoint ones are bridged the shorter way around the globe.
	fn extend_lng_plain(&mut self, e: f64, w: f64) {
		if w <= self.east && e >= self.west {
			self.west = self.west.min(w);
			self.east = self.east.max(e);
		} else {
			let east_gap = wrap_gap(w - self.east);
			let west_gap = wrap_gap(self.west - e);
			if east_gap <= west_gap {
				self.east = e;
			} else {
				self.west = w;
			}
		}
	}

	// The incoming range straddles, this one does not. Its eastern arm ends
	// at `e`, its western arm starts at `w`.
	fn extend_lng_other_straddles(&mut self, e: f64, w: f64) {
		let touches_eastern_arm = self.west <= e;
		let touches_western_arm = self.east >= w;
		match (touches_eastern_arm, touches_western_arm) {
			(true, true) => {
				self.west = -180.0;
				self.east = 180.0;
			}
			(true, false) => {
				self.west = w;
				self.east = self.east.max(e);
			}
			(false, true) => {
				self.east = e;
				self.west = self.west.min(w);
			}
			(false, false) => {
				let east_gap = wrap_gap(w - self.east);
				let west_gap = wrap_gap(self.west - e);
				if east_gap <= west_gap {
					self.east = e;
				} else {
					self.west = w;
				}
			}
		}
	}

	// This range straddles, the incoming `[w, e]` does not.
	fn extend_lng_self_straddles(&mut self, e: f64, w: f64) {
		let touches_eastern_arm = w <= self.east;
		let touches_western_arm = e >= self.west;
		match (touches_eastern_arm, touches_western_arm) {
			(true, true) => {
				self.west = -180.0;
				self.east = 180.0;
			}
			(true, false) => self.east = self.east.max(e),
			(false, true) => self.west = self.west.min(w),
			(false, false) => {
				let east_gap = wrap_gap(w - self.east);
				let west_gap = wrap_gap(self.west - e);
				if east_gap <= west_gap {
					self.east = e;
				} else {
					self.west = w;
				}
			}
		}
	}
}

/// Normalizes a signed degree difference into `[0, 360)`.
fn wrap_gap(delta: f64) -> f64 {
	if delta < 0.0 { delta + 360.0 } else { delta }
}

impl BoxGeometry for Extent<'_> {
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

impl Default for Extent<'_> {
	fn default() -> Self {
		Self::new()
	}
}

impl Debug for Extent<'_> {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		if self.is_empty() {
			write!(f, "Extent(empty, {} entities)", self.entities.len())
		} else {
			write!(
				f,
				"Extent(N{} S{} E{} W{}, {} entities)",
				self.north,
				self.south,
				self.east,
				self.west,
				self.entities.len()
			)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{BoundingBox, Result};
	use approx::assert_abs_diff_eq;
	use rstest::rstest;

	fn assert_box_extent(extent: &Extent, north: f64, south: f64, east: f64, west: f64) {
		assert_abs_diff_eq!(extent.north(), north, epsilon = 1e-4);
		assert_abs_diff_eq!(extent.south(), south, epsilon = 1e-4);
		assert_abs_diff_eq!(extent.east(), east, epsilon = 1e-4);
		assert_abs_diff_eq!(extent.west(), west, epsilon = 1e-4);

		let (lat, lng) = extent.center();
		let expect_lng = if west > east {
			(east + west) / 2.0 + 180.0
		} else {
			(east + west) / 2.0
		};
		assert_abs_diff_eq!(lat, (north + south) / 2.0, epsilon = 1e-4);
		assert_abs_diff_eq!(lng, expect_lng, epsilon = 1e-4);

		let expect_ew = if west > east { east - west + 360.0 } else { east - west };
		assert_abs_diff_eq!(extent.ns_span(), north - south, epsilon = 1e-4);
		assert_abs_diff_eq!(extent.ew_span(), expect_ew, epsilon = 1e-4);
	}

	fn assert_point_extent(extent: &Extent, lat: f64, lng: f64) {
		assert!(extent.is_point());
		assert!(!extent.is_box());
		assert_box_extent(extent, lat, lat, lng, lng);
	}

	#[test]
	fn test_empty_extent() {
		let extent = Extent::default();
		assert!(extent.is_empty());
		assert!(!extent.is_point());
		assert!(!extent.is_box());
		assert!(extent.entities().is_empty());
		assert_eq!(format!("{extent:?}"), "Extent(empty, 0 entities)");
	}

	#[test]
	fn test_extending_with_points() {
		let mut extent = Extent::new();
		extent.merge_point(34.15, -118.33);
		assert_point_extent(&extent, 34.15, -118.33);

		// Merging the same point changes nothing.
		extent.merge_point(34.15, -118.33);
		assert_point_extent(&extent, 34.15, -118.33);

		// Push each edge outward in turn.
		extent.merge_point(34.35, -118.33);
		assert_box_extent(&extent, 34.35, 34.15, -118.33, -118.33);
		extent.merge_point(34.35, -118.13);
		assert_box_extent(&extent, 34.35, 34.15, -118.13, -118.33);
		extent.merge_point(33.95, -118.13);
		assert_box_extent(&extent, 34.35, 33.95, -118.13, -118.33);
		extent.merge_point(33.95, -118.53);
		assert_box_extent(&extent, 34.35, 33.95, -118.13, -118.53);

		// A point inside does nothing.
		extent.merge_point(34.15, -118.33);
		assert_box_extent(&extent, 34.35, 33.95, -118.13, -118.53);
	}

	#[test]
	fn test_extending_with_points_over_dateline() {
		let mut extent = Extent::new();
		extent.merge_point(45.0, -170.0);
		assert_point_extent(&extent, 45.0, -170.0);

		// Crossing the dateline westward is nearer than going all the way
		// around, so this picks up the western edge.
		extent.merge_point(50.0, 170.0);
		assert_box_extent(&extent, 50.0, 45.0, -170.0, 170.0);

		extent.merge_point(48.0, 10.0);
		assert_box_extent(&extent, 50.0, 45.0, -170.0, 10.0);

		extent.merge_point(48.0, -10.0);
		assert_box_extent(&extent, 50.0, 45.0, -170.0, -10.0);

		extent.merge_point(48.0, -160.0);
		assert_box_extent(&extent, 50.0, 45.0, -160.0, -10.0);
	}

	#[test]
	fn test_points_inside_a_straddling_extent_change_nothing() -> Result<()> {
		let mut extent = Extent::new();
		extent.merge_box(&BoundingBox::new(10.0, -10.0, -170.0, 170.0)?);

		// Interior points on both sides of the dateline, and the dateline
		// itself under both spellings.
		for (lat, lng) in [(0.0, -175.0), (5.0, 175.0), (0.0, 180.0), (0.0, -180.0)] {
			extent.merge_point(lat, lng);
			assert_box_extent(&extent, 10.0, -10.0, -170.0, 170.0);
		}
		Ok(())
	}

	#[test]
	fn test_extending_with_boxes() -> Result<()> {
		// Burbank and a sequence of overlapping variations of it. Each row
		// merges a box and states the expected edges afterwards.
		let steps: Vec<([f64; 4], [f64; 4])> = vec![
			// the surrounding box itself
			([34.22, 34.14, -118.28, -118.37], [34.22, 34.14, -118.28, -118.37]),
			// merging it again changes nothing
			([34.22, 34.14, -118.28, -118.37], [34.22, 34.14, -118.28, -118.37]),
			// a box contained entirely inside
			([34.21, 34.15, -118.29, -118.36], [34.22, 34.14, -118.28, -118.37]),
			// a box totally surrounding
			([34.32, 34.04, -118.18, -118.47], [34.32, 34.04, -118.18, -118.47]),
			// intersecting the northwest corner
			([34.42, 34.14, -118.28, -118.57], [34.42, 34.04, -118.18, -118.57]),
			// intersecting the southeast corner
			([34.14, 33.94, -118.08, -118.28], [34.42, 33.94, -118.08, -118.57]),
			// intersecting the northern edge only
			([34.52, 34.14, -118.28, -118.37], [34.52, 33.94, -118.08, -118.57]),
			// covering the western half
			([34.52, 33.94, -118.28, -118.67], [34.52, 33.94, -118.08, -118.67]),
		];

		let mut extent = Extent::new();
		extent.merge_point(34.18, -118.32);
		assert_point_extent(&extent, 34.18, -118.32);

		for (merge, expect) in steps {
			extent.merge_box(&BoundingBox::try_from(merge)?);
			assert_box_extent(&extent, expect[0], expect[1], expect[2], expect[3]);
		}
		Ok(())
	}

	#[rstest]
	// neither box straddling the dateline
	#[case(-170.0, -150.0, 150.0, 170.0, 150.0, -150.0)]
	#[case(-50.0, -10.0, 10.0, 50.0, -50.0, 50.0)]
	#[case(-30.0, 10.0, -10.0, 30.0, -30.0, 30.0)]
	#[case(-10.0, 10.0, -20.0, 20.0, -20.0, 20.0)]
	#[case(-20.0, 20.0, -10.0, 10.0, -20.0, 20.0)]
	#[case(-10.0, 30.0, -30.0, 10.0, -30.0, 30.0)]
	#[case(10.0, 50.0, -50.0, -10.0, -50.0, 50.0)]
	#[case(150.0, 170.0, -170.0, -150.0, 150.0, -150.0)]
	// new box straddling, old one not
	#[case(-170.0, -160.0, 150.0, -150.0, 150.0, -150.0)]
	#[case(-170.0, -120.0, 150.0, -150.0, 150.0, -120.0)]
	#[case(-140.0, -100.0, 150.0, -150.0, 150.0, -100.0)]
	#[case(100.0, 140.0, 150.0, -150.0, 100.0, -150.0)]
	#[case(120.0, 170.0, 150.0, -150.0, 120.0, -150.0)]
	#[case(160.0, 170.0, 150.0, -150.0, 150.0, -150.0)]
	// old box straddling, new one not
	#[case(170.0, -170.0, 80.0, 90.0, 80.0, -170.0)]
	#[case(165.0, -170.0, 160.0, 170.0, 160.0, -170.0)]
	#[case(150.0, -170.0, 160.0, 170.0, 150.0, -170.0)]
	#[case(170.0, -170.0, -80.0, -70.0, 170.0, -70.0)]
	#[case(170.0, -165.0, -170.0, -160.0, 170.0, -160.0)]
	#[case(170.0, -150.0, -170.0, -160.0, 170.0, -150.0)]
	// both boxes straddling
	#[case(150.0, -170.0, 170.0, -150.0, 150.0, -150.0)]
	#[case(170.0, -170.0, 150.0, -150.0, 150.0, -150.0)]
	#[case(150.0, -150.0, 170.0, -170.0, 150.0, -150.0)]
	#[case(170.0, -150.0, 150.0, -170.0, 150.0, -150.0)]
	fn test_extending_with_boxes_over_dateline(
		#[case] west1: f64,
		#[case] east1: f64,
		#[case] west2: f64,
		#[case] east2: f64,
		#[case] west3: f64,
		#[case] east3: f64,
	) -> Result<()> {
		let mut extent = Extent::new();
		extent.merge_box(&BoundingBox::new(50.0, 40.0, east1, west1)?);
		extent.merge_box(&BoundingBox::new(50.0, 40.0, east2, west2)?);
		assert_box_extent(&extent, 50.0, 40.0, east3, west3);
		Ok(())
	}

	#[test]
	fn test_point_equidistant_from_both_edges_extends_east() -> Result<()> {
		// 179° around either way; the tie goes east.
		let mut extent = Extent::new();
		extent.merge_box(&BoundingBox::new(1.0, -1.0, -179.0, 179.0)?);
		extent.merge_point(0.0, 0.0);
		assert_box_extent(&extent, 1.0, -1.0, 0.0, 179.0);
		Ok(())
	}

	#[test]
	fn test_union_closing_the_circle_collapses_to_world() -> Result<()> {
		// Two straddling boxes whose gaps do not overlap.
		let mut extent = Extent::new();
		extent.merge_box(&BoundingBox::new(50.0, 40.0, -100.0, 100.0)?);
		extent.merge_box(&BoundingBox::new(50.0, 40.0, 110.0, 130.0)?);
		assert_box_extent(&extent, 50.0, 40.0, 180.0, -180.0);
		Ok(())
	}

	#[test]
	fn test_merge_entity_dispatch() -> Result<()> {
		let point = Entity::point(1, 10.0, 20.0);
		let location = Entity::location(2, BoundingBox::new(35.0, 30.0, 25.0, 15.0)?);
		let dubious = Entity::Point(LocatedPoint::new(
			3,
			Some((-40.0, -120.0)),
			Some(LocatedBox::new(4, BoundingBox::new(35.0, 30.0, 25.0, 15.0)?)),
		));
		let bare = Entity::Point(LocatedPoint::new(5, None, None));

		let mut extent = Extent::new();
		extent.merge_entity(&point);
		assert_box_extent(&extent, 10.0, 10.0, 20.0, 20.0);

		extent.merge_entity(&location);
		assert_box_extent(&extent, 35.0, 10.0, 25.0, 15.0);

		// The dubious point contributes its reference location, not its
		// far-off coordinates.
		extent.merge_entity(&dubious);
		assert_box_extent(&extent, 35.0, 10.0, 25.0, 15.0);

		// A bare record rides along without touching the geometry.
		extent.merge_entity(&bare);
		assert_box_extent(&extent, 35.0, 10.0, 25.0, 15.0);
		assert_eq!(extent.entities().len(), 4);
		Ok(())
	}

	#[test]
	fn test_geometryless_entities_leave_the_extent_empty() {
		let bare = Entity::Point(LocatedPoint::new(1, None, None));
		let extent = Extent::from_entities([&bare]);
		assert!(extent.is_empty());
		assert_eq!(extent.entities().len(), 1);
	}

	#[test]
	fn test_is_point_uses_the_span_epsilon() {
		let mut tight = Extent::new();
		tight.merge_point(34.1, -118.3);
		tight.merge_point(34.10005, -118.3);
		assert!(tight.is_point());

		let mut loose = Extent::new();
		loose.merge_point(34.1, -118.3);
		loose.merge_point(34.3, -118.3);
		assert!(loose.is_box());
	}

	#[test]
	fn test_entity_views() -> Result<()> {
		let shared = LocatedBox::new(40, BoundingBox::new(35.0, 34.0, -118.0, -119.0)?);
		let a = Entity::Point(LocatedPoint::new(1, Some((34.5, -118.5)), Some(shared.clone())));
		let b = Entity::Point(LocatedPoint::new(2, Some((34.6, -118.4)), Some(shared.clone())));
		let c = Entity::point(3, 34.7, -118.3);
		let d = Entity::location(40, BoundingBox::new(35.0, 34.0, -118.0, -119.0)?);
		let e = Entity::location(50, BoundingBox::new(36.0, 35.0, -117.0, -118.0)?);

		let extent = Extent::from_entities([&a, &b, &c, &d, &e]);
		assert_eq!(extent.points().len(), 3);
		assert_eq!(extent.locations().len(), 2);

		// The shared reference location and the equal-id box entity count
		// once; the bare point contributes nothing.
		let underlying: Vec<u64> = extent.underlying_locations().iter().map(|l| l.id).collect();
		assert_eq!(underlying, vec![40, 50]);
		Ok(())
	}

	#[test]
	fn test_absorb_keeps_survivor_entities_first() {
		let a = Entity::point(1, 10.0, 10.0);
		let b = Entity::point(2, 12.0, 12.0);
		let c = Entity::point(3, -10.0, -10.0);

		let mut survivor = Extent::from_entities([&a, &b]);
		let absorbed = Extent::from_entities([&c]);
		survivor.absorb(absorbed);

		let ids: Vec<u64> = survivor.entities().iter().map(|entity| entity.id()).collect();
		assert_eq!(ids, vec![1, 2, 3]);
		assert_box_extent(&survivor, 12.0, -10.0, 12.0, -10.0);
	}

	#[test]
	fn test_absorbing_an_empty_extent_keeps_geometry() {
		let a = Entity::point(1, 10.0, 10.0);
		let bare = Entity::Point(LocatedPoint::new(2, None, None));

		let mut survivor = Extent::from_entities([&a]);
		survivor.absorb(Extent::from_entities([&bare]));

		assert_point_extent(&survivor, 10.0, 10.0);
		assert_eq!(survivor.entities().len(), 2);
	}
}
