//! The rounding ladder and the grouping keys derived from it.
//!
//! Grouping at precision `p` buckets values by `round(x · p) / p`. Keys keep
//! the scaled integer `round(x · p)` instead of the quotient: the equivalence
//! classes are identical, and integer keys hash and compare exactly.

use crate::BoxGeometry;

/// Rounding precisions from finest to coarsest, as multipliers: rounding at
/// the first rung keeps four decimal places, rounding at `1/90` buckets in
/// 90° steps.
pub(crate) const PRECISION_LADDER: [f64; 19] = [
	10_000.0,
	5_000.0,
	2_000.0,
	1_000.0,
	500.0,
	200.0,
	100.0,
	50.0,
	20.0,
	10.0,
	5.0,
	2.0,
	1.0,
	1.0 / 2.0,
	1.0 / 5.0,
	1.0 / 10.0,
	1.0 / 20.0,
	1.0 / 50.0,
	1.0 / 90.0,
];

pub(crate) const MAX_PRECISION: f64 = PRECISION_LADDER[0];
pub(crate) const MIN_PRECISION: f64 = PRECISION_LADDER[PRECISION_LADDER.len() - 1];

/// `round(value · precision)`, the scaled-integer form of ladder rounding.
fn round_scaled(value: f64, precision: f64) -> i64 {
	(value * precision).round() as i64
}

/// Rounds a coordinate pair into its bucket at `precision`.
///
/// Every rung but the last rounds plainly. The last rung instead snaps
/// latitudes to the equator or the poles and longitudes near the dateline
/// onto it, leaving a handful of world-scale buckets for the final pass.
fn round_lat_lng(lat: f64, lng: f64, precision: f64) -> (i64, i64) {
	if precision > MIN_PRECISION {
		return (round_scaled(lat, precision), round_scaled(lng, precision));
	}
	let snapped_lat = if lat >= 45.0 {
		90.0
	} else if lat <= -45.0 {
		-90.0
	} else {
		0.0
	};
	let lng_key = if lng >= 150.0 || lng <= -150.0 {
		round_scaled(180.0, precision)
	} else {
		round_scaled(lng, precision)
	};
	(round_scaled(snapped_lat, precision), lng_key)
}

/// A grouping bucket: rounded center plus rounded spans.
///
/// Two footprints collide exactly when all four rounded components match, so
/// a zero-size point bucket never swallows a same-center box bucket.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub(crate) struct ClusterKey {
	lat: i64,
	lng: i64,
	width: i64,
	height: i64,
}

impl ClusterKey {
	/// The bucket of a bare point: a zero-size footprint at the rounded
	/// coordinates.
	pub fn for_point(lat: f64, lng: f64, precision: f64) -> Self {
		let (lat, lng) = round_lat_lng(lat, lng, precision);
		Self {
			lat,
			lng,
			width: 0,
			height: 0,
		}
	}

	/// The bucket of anything box-shaped: rounded center plus rounded spans.
	pub fn for_box<B: BoxGeometry>(geometry: &B, precision: f64) -> Self {
		let (center_lat, center_lng) = geometry.center();
		let (lat, lng) = round_lat_lng(center_lat, center_lng, precision);
		Self {
			lat,
			lng,
			width: round_scaled(geometry.ew_span(), precision),
			height: round_scaled(geometry.ns_span(), precision),
		}
	}
}
