//! Reproducible crash-location sample for the map.

use collision_dash_analytics_models::{BoundingBox, LocationPoint, LocationSample};
use collision_dash_collision_models::CrashRecord;
use rand::{SeedableRng as _, rngs::StdRng};

/// Collects rows with both coordinates inside `bounds` and, when there are
/// more than `sample_size`, keeps a seeded random subset of exactly
/// `sample_size` rows.
///
/// Returns `None` when no row has valid in-bounds coordinates or
/// `sample_size` is zero. Sampled points keep dataset order, and the same
/// input, size and seed always produce the same sample.
pub fn location_sample<'r>(
    records: impl IntoIterator<Item = &'r CrashRecord>,
    bounds: &BoundingBox,
    sample_size: usize,
    seed: u64,
) -> Option<LocationSample> {
    let valid: Vec<LocationPoint> = records
        .into_iter()
        .filter_map(|record| {
            let (latitude, longitude) = (record.latitude?, record.longitude?);
            bounds.contains(latitude, longitude).then(|| LocationPoint {
                latitude,
                longitude,
                borough: record.borough,
                vehicle_type: record.vehicle_type.clone(),
            })
        })
        .collect();

    if valid.is_empty() || sample_size == 0 {
        log::debug!(
            "No locations to plot ({} in bounds, sample size {sample_size})",
            valid.len()
        );
        return None;
    }

    let valid_rows = valid.len() as u64;
    let points = if valid.len() > sample_size {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut picked = rand::seq::index::sample(&mut rng, valid.len(), sample_size).into_vec();
        picked.sort_unstable();
        log::debug!("Sampled {sample_size} of {valid_rows} locations (seed {seed})");
        picked.into_iter().map(|i| valid[i].clone()).collect()
    } else {
        valid
    };

    Some(LocationSample { valid_rows, points })
}
