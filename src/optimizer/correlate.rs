use tracing::warn;

use crate::error::AppError;
use crate::models::route::DeliveryJob;
use crate::optimizer::TripWaypoint;

/// Maps the provider's waypoint list back onto the submitted stops.
///
/// The provider reports one waypoint per submitted coordinate, in submission
/// order, with `waypoint_index` giving its position in the optimized visiting
/// sequence. The origin occupies submission slot 0, so stop `i` is waypoint
/// `i + 1` and its visiting position is `waypoint_index - 1`. The output is
/// built from the original `DeliveryJob` values so every enriched field
/// survives the round trip; the provider is only the source of ordering.
///
/// A waypoint count that does not match `stops.len() + 1` invalidates the
/// whole mapping. Individual out-of-range or colliding indices drop that
/// stop; if the placed stops are not a strict majority the mapping is not
/// trusted either.
pub fn correlate_stops(
    stops: &[DeliveryJob],
    waypoints: &[TripWaypoint],
) -> Result<Vec<DeliveryJob>, AppError> {
    if waypoints.len() != stops.len() + 1 {
        return Err(AppError::Correlation(format!(
            "provider returned {} waypoints for {} stops (expected {})",
            waypoints.len(),
            stops.len(),
            stops.len() + 1
        )));
    }

    let mut slots: Vec<Option<DeliveryJob>> = vec![None; stops.len()];

    for (input_index, waypoint) in waypoints.iter().enumerate().skip(1) {
        let stop = &stops[input_index - 1];
        let Some(target) = waypoint.waypoint_index.checked_sub(1) else {
            warn!(
                stop_id = %stop.stop_id,
                "provider placed a stop at the origin slot; dropping it"
            );
            continue;
        };

        if target >= slots.len() {
            warn!(
                stop_id = %stop.stop_id,
                target,
                "waypoint_index out of range; dropping stop"
            );
            continue;
        }
        if slots[target].is_some() {
            warn!(
                stop_id = %stop.stop_id,
                target,
                "duplicate waypoint_index from provider; dropping stop"
            );
            continue;
        }
        slots[target] = Some(stop.clone());
    }

    let ordered: Vec<DeliveryJob> = slots.into_iter().flatten().collect();

    if ordered.is_empty() && !stops.is_empty() {
        return Err(AppError::Correlation(
            "no stops could be mapped onto the optimized sequence".to_string(),
        ));
    }

    if ordered.len() * 2 <= stops.len() {
        return Err(AppError::Correlation(format!(
            "only {} of {} stops mapped onto the optimized sequence",
            ordered.len(),
            stops.len()
        )));
    }

    if ordered.len() < stops.len() {
        warn!(
            placed = ordered.len(),
            submitted = stops.len(),
            "partial waypoint mapping; returning majority-correct route"
        );
    }

    Ok(ordered)
}
