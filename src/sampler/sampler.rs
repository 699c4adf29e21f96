use chrono::{DateTime, Duration, Utc};

use super::error::SamplerError;
use super::record::SampleRecord;
use crate::geometry::{GeometrySource, PassWindow};
use crate::magnitude::MagnitudeModel;

/// Steps through one pass window, estimating brightness at every tick.
pub struct PassSampler<'a, S: GeometrySource + ?Sized> {
    window: PassWindow,
    source: &'a S,
    step: Duration,
    model: MagnitudeModel,
}

impl<'a, S: GeometrySource + ?Sized> PassSampler<'a, S> {
    pub fn new(window: PassWindow, source: &'a S, step: Duration, model: MagnitudeModel) -> Self {
        Self {
            window,
            source,
            step,
            model,
        }
    }

    pub fn window(&self) -> &PassWindow {
        &self.window
    }

    /// Records from rise (inclusive) to set (exclusive). Each call starts
    /// over from the rise time.
    pub fn sample(&self) -> Result<PassSamples<'a, S>, SamplerError> {
        if self.window.rise >= self.window.set {
            return Err(SamplerError::InvalidWindow {
                rise: self.window.rise.to_rfc3339(),
                set: self.window.set.to_rfc3339(),
            });
        }
        if self.step <= Duration::zero() {
            return Err(SamplerError::InvalidStep(self.step));
        }

        log::debug!(
            "sampling {} -> {} every {}s",
            self.window.rise,
            self.window.set,
            self.step.num_seconds()
        );

        Ok(PassSamples {
            source: self.source,
            model: self.model,
            cursor: self.window.rise,
            set: self.window.set,
            step: self.step,
            failed: false,
        })
    }
}

/// Lazy sequence of pass samples. Dropping it early is always fine.
pub struct PassSamples<'a, S: GeometrySource + ?Sized> {
    source: &'a S,
    model: MagnitudeModel,
    cursor: DateTime<Utc>,
    set: DateTime<Utc>,
    step: Duration,
    failed: bool,
}

impl<S: GeometrySource + ?Sized> Iterator for PassSamples<'_, S> {
    type Item = Result<SampleRecord, SamplerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.cursor >= self.set {
            return None;
        }

        let at = self.cursor;
        self.cursor += self.step;

        let snapshot = match self.source.snapshot(at) {
            Ok(s) => s,
            Err(e) => {
                log::error!("geometry failed at {}: {}", at, e);
                self.failed = true;
                return Some(Err(e.into()));
            }
        };

        let record = SampleRecord::from_snapshot(at, &snapshot, &self.model);
        log::trace!("{} alt {:.2} mag {}", at, record.altitude_deg, record.magnitude);

        if self.cursor >= self.set {
            log::debug!("reached set time {}", self.set);
        }

        Some(Ok(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::types::{SatelliteState, SunState};
    use crate::geometry::GeometryError;
    use crate::magnitude::MagnitudeResult;
    use crate::sampler::compass::CompassPoint;
    use chrono::TimeZone;
    use std::cell::Cell;

    /// Satellite climbs 0.01 rad per second from rise; eclipsed after
    /// `shadow_after` seconds; optionally fails after `fail_after` seconds.
    struct FakeSource {
        rise: DateTime<Utc>,
        shadow_after: i64,
        fail_after: Option<i64>,
        calls: Cell<usize>,
    }

    impl FakeSource {
        fn new(rise: DateTime<Utc>) -> Self {
            Self {
                rise,
                shadow_after: i64::MAX,
                fail_after: None,
                calls: Cell::new(0),
            }
        }
    }

    impl GeometrySource for FakeSource {
        fn satellite(&self, at: DateTime<Utc>) -> Result<SatelliteState, GeometryError> {
            self.calls.set(self.calls.get() + 1);
            let s = (at - self.rise).num_seconds();
            if self.fail_after.is_some_and(|f| s >= f) {
                return Err(GeometryError::Propagation("satellite decayed".into()));
            }
            Ok(SatelliteState {
                azimuth: 250.0f64.to_radians(),
                altitude: 0.01 * s as f64,
                range_m: 2_000_000.0,
                eclipsed: s >= self.shadow_after,
            })
        }

        fn sun(&self, _at: DateTime<Utc>) -> Result<SunState, GeometryError> {
            Ok(SunState {
                azimuth: 100.0f64.to_radians(),
                altitude: (-8.0f64).to_radians(),
                earth_distance_au: 1.0,
            })
        }

        fn next_pass(&self, _from: DateTime<Utc>) -> Result<PassWindow, GeometryError> {
            Ok(window(self.rise, 60))
        }
    }

    fn rise() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 8, 20, 22, 27, 33).unwrap()
    }

    fn window(rise: DateTime<Utc>, seconds: i64) -> PassWindow {
        PassWindow {
            rise,
            transit: rise + Duration::seconds(seconds / 2),
            set: rise + Duration::seconds(seconds),
            rise_azimuth_deg: 250.0,
            transit_altitude_deg: 45.0,
            set_azimuth_deg: 70.0,
        }
    }

    fn sampler(source: &FakeSource, seconds: i64, step: i64) -> PassSampler<'_, FakeSource> {
        PassSampler::new(
            window(source.rise, seconds),
            source,
            Duration::seconds(step),
            MagnitudeModel::default(),
        )
    }

    #[test]
    fn record_count_is_ceiling_of_duration_over_step() {
        let source = FakeSource::new(rise());
        for (duration, step, expected) in [(60, 10, 6), (61, 10, 7), (59, 10, 6), (5, 10, 1), (600, 1, 600)] {
            let records: Vec<_> = sampler(&source, duration, step)
                .sample()
                .unwrap()
                .collect::<Result<_, _>>()
                .unwrap();
            assert_eq!(records.len(), expected, "{}s / {}s", duration, step);
        }
    }

    #[test]
    fn timestamps_start_at_rise_and_advance_by_step() {
        let source = FakeSource::new(rise());
        let records: Vec<_> = sampler(&source, 95, 10)
            .sample()
            .unwrap()
            .map(Result::unwrap)
            .collect();
        assert_eq!(records[0].timestamp, rise());
        for pair in records.windows(2) {
            assert_eq!(pair[1].timestamp - pair[0].timestamp, Duration::seconds(10));
        }
        assert!(records.last().unwrap().timestamp < rise() + Duration::seconds(95));
    }

    #[test]
    fn records_carry_geometry_and_magnitude() {
        let source = FakeSource::new(rise());
        let first = sampler(&source, 60, 10).sample().unwrap().next().unwrap().unwrap();
        assert_eq!(first.direction, CompassPoint::Wsw);
        assert!((first.range_km - 2000.0).abs() < 1e-9);
        assert!((first.sun_altitude_deg + 8.0).abs() < 1e-9);
        assert!(first.magnitude.is_valid());
        assert!(!first.eclipsed);
    }

    #[test]
    fn eclipsed_ticks_are_indeterminate() {
        let mut source = FakeSource::new(rise());
        source.shadow_after = 30;
        for record in sampler(&source, 60, 10).sample().unwrap() {
            let record = record.unwrap();
            assert_eq!(record.eclipsed, record.magnitude == MagnitudeResult::Indeterminate);
        }
    }

    #[test]
    fn ill_ordered_window_is_rejected() {
        let source = FakeSource::new(rise());
        for duration in [0, -60] {
            let err = sampler(&source, duration, 10).sample().err().unwrap();
            assert!(matches!(err, SamplerError::InvalidWindow { .. }));
        }
        assert_eq!(source.calls.get(), 0);
    }

    #[test]
    fn non_positive_step_is_rejected() {
        let source = FakeSource::new(rise());
        let err = sampler(&source, 60, 0).sample().err().unwrap();
        assert!(matches!(err, SamplerError::InvalidStep(d) if d.is_zero()));

        let half_back = PassSampler::new(
            window(source.rise, 60),
            &source,
            Duration::milliseconds(-500),
            MagnitudeModel::default(),
        );
        match half_back.sample() {
            Err(SamplerError::InvalidStep(d)) => assert_eq!(d, Duration::milliseconds(-500)),
            other => panic!("expected InvalidStep, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn geometry_fault_ends_the_sequence() {
        let mut source = FakeSource::new(rise());
        source.fail_after = Some(20);
        let results: Vec<_> = sampler(&source, 60, 10).sample().unwrap().collect();
        assert_eq!(results.len(), 3);
        assert!(results[..2].iter().all(Result::is_ok));
        assert!(matches!(
            results[2],
            Err(SamplerError::Geometry(GeometryError::Propagation(_)))
        ));
    }

    #[test]
    fn sequence_restarts_and_can_be_abandoned() {
        let source = FakeSource::new(rise());
        let sampler = sampler(&source, 600, 10);
        let first: Vec<_> = sampler.sample().unwrap().take(3).collect();
        assert_eq!(first.len(), 3);
        assert_eq!(source.calls.get(), 3);
        let again = sampler.sample().unwrap().next().unwrap().unwrap();
        assert_eq!(again.timestamp, rise());
    }
}
