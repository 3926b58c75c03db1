use super::precision::{ClusterKey, MAX_PRECISION, PRECISION_LADDER};
use crate::{BoxGeometry, Entity, EntityGeometry, Error, Extent, Result};
use std::collections::HashMap;

/// Collapses a set of entities into at most `max_objects` displayable
/// extents.
///
/// Entities are bucketed by their footprint rounded at the finest rung of a
/// precision ladder; while too many buckets remain, every bucket is re-keyed
/// one rung coarser and colliding buckets merge. The whole pipeline is
/// deterministic: buckets live in a vector ordered north to south, merges
/// walk that vector, and keys are scaled integers, so equal input always
/// produces equal clusters.
///
/// # Examples
///
/// ```
/// use mapcollapse::{ClusterBuilder, Entity};
///
/// let entities = vec![
/// 	Entity::point(1, 48.1, 11.5),
/// 	Entity::point(2, 48.2, 11.6),
/// 	Entity::point(3, -33.9, 151.2),
/// ];
/// let map = ClusterBuilder::new(&entities, 2)?;
/// assert!(map.clusters().len() <= 2);
/// # Ok::<(), mapcollapse::Error>(())
/// ```
pub struct ClusterBuilder<'a> {
	extents: Vec<Extent<'a>>,
	max_objects: usize,
}

impl<'a> ClusterBuilder<'a> {
	/// Groups `entities` into at most `max_objects` extents.
	///
	/// # Errors
	///
	/// Fails before any grouping work if `entities` is empty, `max_objects`
	/// is zero, a point entity carries non-finite coordinates, or an entity
	/// offers no geometry at all. A failed call leaves nothing behind;
	/// grouping itself cannot fail.
	pub fn new(entities: &'a [Entity], max_objects: usize) -> Result<Self> {
		if max_objects == 0 {
			return Err(Error::ZeroMaxObjects);
		}
		if entities.is_empty() {
			return Err(Error::EmptyInput);
		}
		validate(entities)?;

		let mut extents = seed(entities);
		extents.sort_by(|a, b| b.north().total_cmp(&a.north()));

		for &precision in &PRECISION_LADDER[1..] {
			if extents.len() <= max_objects {
				break;
			}
			extents = coarsen(extents, precision);
			log::debug!(
				"collapsed to {} extents at precision {}",
				extents.len(),
				precision
			);
		}

		Ok(Self {
			extents,
			max_objects,
		})
	}

	/// The collapsed clusters, in their north-to-south seeding order.
	///
	/// At most [`ClusterBuilder::max_objects`] long, except when even the
	/// coarsest rounding leaves more world-scale buckets than requested.
	pub fn clusters(&self) -> &[Extent<'a>] {
		&self.extents
	}

	/// The configured output cap.
	pub fn max_objects(&self) -> usize {
		self.max_objects
	}

	/// One extent covering every cluster.
	///
	/// The result carries geometry only; it owns no entities.
	pub fn overall_extent(&self) -> Extent<'a> {
		let mut overall = Extent::new();
		for extent in &self.extents {
			overall.merge_box(extent);
		}
		overall
	}

	/// Three points that frame the whole map: the north-west corner, the
	/// center and the south-east corner of the overall extent.
	pub fn representative_points(&self) -> [(f64, f64); 3] {
		let overall = self.overall_extent();
		[overall.north_west(), overall.center(), overall.south_east()]
	}
}

/// Rejects entities the grouping passes could not place.
fn validate(entities: &[Entity]) -> Result<()> {
	for entity in entities {
		if let Entity::Point(point) = entity {
			if let Some((lat, lng)) = point.lat_lng {
				if !lat.is_finite() || !lng.is_finite() {
					return Err(Error::NonFiniteCoordinates {
						id: point.id,
						lat,
						lng,
					});
				}
			}
			if point.lat_lng.is_none() && point.location.is_none() {
				return Err(Error::UnmappableEntity { id: point.id });
			}
		}
	}
	Ok(())
}

/// Buckets every entity at the finest rung. Entities whose footprints round
/// to the same key fold into a shared extent, in input order.
fn seed(entities: &[Entity]) -> Vec<Extent<'_>> {
	let mut buckets: HashMap<ClusterKey, usize> = HashMap::new();
	let mut extents: Vec<Extent<'_>> = Vec::new();
	for entity in entities {
		let key = match entity.geometry() {
			Some(EntityGeometry::Point(lat, lng)) => ClusterKey::for_point(lat, lng, MAX_PRECISION),
			Some(EntityGeometry::Box(bbox)) => ClusterKey::for_box(bbox, MAX_PRECISION),
			None => continue,
		};
		let index = *buckets.entry(key).or_insert_with(|| {
			extents.push(Extent::new());
			extents.len() - 1
		});
		extents[index].merge_entity(entity);
	}
	log::trace!(
		"seeded {} extents from {} entities",
		extents.len(),
		entities.len()
	);
	extents
}

/// Re-keys every extent as a box one rung coarser, merging collisions into
/// the first extent that claimed the bucket.
fn coarsen(extents: Vec<Extent<'_>>, precision: f64) -> Vec<Extent<'_>> {
	let mut buckets: HashMap<ClusterKey, usize> = HashMap::with_capacity(extents.len());
	let mut merged: Vec<Extent<'_>> = Vec::new();
	for extent in extents {
		let key = ClusterKey::for_box(&extent, precision);
		let index = *buckets.entry(key).or_insert_with(|| {
			merged.push(Extent::new());
			merged.len() - 1
		});
		merged[index].absorb(extent);
	}
	merged
}
