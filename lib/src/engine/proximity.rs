// lib/src/engine/proximity.rs

use models::{GeoPoint, HospitalRecord, RankedHospital};

use super::geo::distance_km;

/// Hospitals within `radius_km` of `origin` (inclusive), nearest first.
///
/// The sort is stable, so hospitals at equal distance keep their input order.
/// A radius of `f64::INFINITY` ranks every candidate.
pub fn rank_by_proximity(candidates: &[HospitalRecord], origin: GeoPoint, radius_km: f64) -> Vec<RankedHospital> {
    let mut ranked: Vec<RankedHospital> = candidates
        .iter()
        .filter_map(|hospital| {
            let distance = distance_km(origin, hospital.location());
            (distance <= radius_km).then(|| RankedHospital { hospital: hospital.clone(), distance_km: distance })
        })
        .collect();

    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked
}
