/// Default padding factor for [`BoxGeometry::contains_point_fuzzy`].
///
/// Field-recorded coordinates are often sloppy; a point only counts as
/// implausible when it is nowhere near the box.
pub const DEFAULT_TOLERANCE_FACTOR: f64 = 2.0;

/// A box covering more than this many km² is too vague to pin down on a map.
pub const MAX_UNVAGUE_AREA_KM2: f64 = 24_000.0;

const EARTH_RADIUS_KM: f64 = 6372.0;

/// Derived spherical geometry for anything exposing the four edges of a
/// bounding box, in degrees.
///
/// Edges follow map conventions: `north`/`south` are latitudes,
/// `east`/`west` are longitudes. A box with `west > east` straddles the
/// antimeridian and covers `[west, 180] ∪ [-180, east]`; every provided
/// method accounts for that.
pub trait BoxGeometry {
	fn north(&self) -> f64;
	fn south(&self) -> f64;
	fn east(&self) -> f64;
	fn west(&self) -> f64;

	// -----------------------------------------------------------------
	// derived geometry

	/// True if the covered longitude range wraps across the ±180° line.
	fn straddles_dateline(&self) -> bool {
		self.west() > self.east()
	}

	/// The four edges as `[north, south, east, west]`.
	fn edges(&self) -> [f64; 4] {
		[self.north(), self.south(), self.east(), self.west()]
	}

	fn north_west(&self) -> (f64, f64) {
		(self.north(), self.west())
	}

	fn north_east(&self) -> (f64, f64) {
		(self.north(), self.east())
	}

	fn south_west(&self) -> (f64, f64) {
		(self.south(), self.west())
	}

	fn south_east(&self) -> (f64, f64) {
		(self.south(), self.east())
	}

	/// The corners as `[NW, NE, SW, SE]`, each a `(lat, lng)` pair.
	fn corners(&self) -> [(f64, f64); 4] {
		[
			self.north_west(),
			self.north_east(),
			self.south_west(),
			self.south_east(),
		]
	}

	/// The midpoint of the edges as `(lat, lng)`.
	///
	/// For straddling boxes 180° is added to the raw longitude midpoint to
	/// land inside the covered range. The result can exceed 180°; callers
	/// wanting a normalized longitude must wrap it themselves.
	fn center(&self) -> (f64, f64) {
		let lat = (self.north() + self.south()) / 2.0;
		let mut lng = (self.east() + self.west()) / 2.0;
		if self.straddles_dateline() {
			lng += 180.0;
		}
		(lat, lng)
	}

	/// North-south extent in degrees.
	fn ns_span(&self) -> f64 {
		self.north() - self.south()
	}

	/// East-west extent in degrees, wraparound-corrected for straddling
	/// boxes.
	fn ew_span(&self) -> f64 {
		let mut span = self.east() - self.west();
		if self.straddles_dateline() {
			span += 360.0;
		}
		span
	}

	/// Approximate covered area in km²: the spherical strip between the two
	/// latitudes, cut to the covered longitude range.
	fn area_km2(&self) -> f64 {
		let strip = (self.north().to_radians().sin() - self.south().to_radians().sin()).abs();
		EARTH_RADIUS_KM * EARTH_RADIUS_KM * self.ew_span().to_radians() * strip
	}

	/// True if the box is too large to usefully distinguish on a map.
	fn is_vague(&self) -> bool {
		self.area_km2() > MAX_UNVAGUE_AREA_KM2
	}

	/// Tests whether `(lat, lng)` lies in the box padded by
	/// `tolerance_factor` times its own span on each axis.
	///
	/// For straddling boxes the padding shrinks the excluded middle
	/// instead, so a point is rejected only when it sits clearly inside the
	/// gap on the far side of the globe.
	fn contains_point_fuzzy(&self, lat: f64, lng: f64, tolerance_factor: f64) -> bool {
		let delta_lat = self.ns_span() * tolerance_factor;
		let delta_lng = self.ew_span() * tolerance_factor;
		if lat > self.north() + delta_lat || lat < self.south() - delta_lat {
			return false;
		}
		if self.straddles_dateline() {
			!(lng > self.east() + delta_lng && lng < self.west() - delta_lng)
		} else {
			!(lng > self.east() + delta_lng || lng < self.west() - delta_lng)
		}
	}
}
