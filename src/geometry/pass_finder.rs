use chrono::{DateTime, Duration, Utc};

use super::error::GeometryError;
use super::types::{PassWindow, SatelliteState};

const COARSE_STEP_SECONDS: i64 = 60; // 1 minute for initial scan
const FINE_STEP_SECONDS: i64 = 1; // 1 second for refinement
const MAX_PASS_DURATION: Duration = Duration::days(1);

/// Find the first pass rising after `from` and no later than `until`.
///
/// A pass already in progress at `from` is skipped: the scan first waits for
/// the satellite to drop below `horizon_rad`. The set time of a pass that rises
/// before `until` may lie beyond it.
pub fn find_next_pass<F>(
    sample: F,
    from: DateTime<Utc>,
    until: DateTime<Utc>,
    horizon_rad: f64,
) -> Result<PassWindow, GeometryError>
where
    F: Fn(DateTime<Utc>) -> Result<SatelliteState, GeometryError>,
{
    let coarse_step = Duration::seconds(COARSE_STEP_SECONDS);
    let above = |s: &SatelliteState| s.altitude >= horizon_rad;
    let no_pass = || GeometryError::NoPassFound {
        from: from.to_rfc3339(),
        until: until.to_rfc3339(),
    };

    let mut cursor = from;
    let mut prev_visible = above(&sample(cursor)?);
    if prev_visible {
        log::debug!("pass in progress at {}, waiting for set", from);
    }

    let mut rise: Option<(DateTime<Utc>, f64)> = None;
    let mut max_alt = f64::NEG_INFINITY;
    let mut max_alt_time = cursor;

    loop {
        let limit = match rise {
            Some((t, _)) => t + MAX_PASS_DURATION,
            None => until,
        };
        if cursor > limit {
            return Err(no_pass());
        }

        cursor += coarse_step;
        let state = sample(cursor)?;
        let visible = above(&state);

        if visible && !prev_visible {
            let refined = refine_crossing(&sample, cursor - coarse_step, cursor, true, horizon_rad)?;
            if refined.0 > until {
                return Err(no_pass());
            }
            rise = Some(refined);
            max_alt = state.altitude;
            max_alt_time = cursor;
        } else if visible && rise.is_some() {
            if state.altitude > max_alt {
                max_alt = state.altitude;
                max_alt_time = cursor;
            }
        } else if !visible && prev_visible {
            if let Some((rise_time, rise_az)) = rise {
                let (set_time, set_az) =
                    refine_crossing(&sample, cursor - coarse_step, cursor, false, horizon_rad)?;
                let (transit, transit_alt) = refine_transit(
                    &sample,
                    (max_alt_time - coarse_step).max(rise_time),
                    (max_alt_time + coarse_step).min(set_time),
                )?;
                return Ok(PassWindow {
                    rise: rise_time,
                    transit,
                    set: set_time,
                    rise_azimuth_deg: round2(rise_az.to_degrees()),
                    transit_altitude_deg: round2(transit_alt.to_degrees()),
                    set_azimuth_deg: round2(set_az.to_degrees()),
                });
            }
            log::debug!("in-progress pass ended near {}", cursor);
        }

        prev_visible = visible;
    }
}

/// Binary search to find exact horizon crossing time
fn refine_crossing<F>(
    sample: &F,
    before: DateTime<Utc>,
    after: DateTime<Utc>,
    rising: bool,
    horizon_rad: f64,
) -> Result<(DateTime<Utc>, f64), GeometryError>
where
    F: Fn(DateTime<Utc>) -> Result<SatelliteState, GeometryError>,
{
    let mut low = before;
    let mut high = after;

    while (high - low).num_seconds() > FINE_STEP_SECONDS {
        let mid = low + (high - low) / 2;
        let above = sample(mid)?.altitude >= horizon_rad;
        if above == rising {
            high = mid;
        } else {
            low = mid;
        }
    }

    let final_state = sample(high)?;
    Ok((high, final_state.azimuth))
}

/// Ternary search for the altitude maximum inside `[low, high]`.
fn refine_transit<F>(
    sample: &F,
    mut low: DateTime<Utc>,
    mut high: DateTime<Utc>,
) -> Result<(DateTime<Utc>, f64), GeometryError>
where
    F: Fn(DateTime<Utc>) -> Result<SatelliteState, GeometryError>,
{
    while (high - low).num_seconds() > FINE_STEP_SECONDS {
        let third = (high - low) / 3;
        let m1 = low + third;
        let m2 = high - third;
        if sample(m1)?.altitude < sample(m2)?.altitude {
            low = m1;
        } else {
            high = m2;
        }
    }

    let mid = low + (high - low) / 2;
    Ok((mid, sample(mid)?.altitude))
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
