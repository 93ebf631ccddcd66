//! Per-frame driver for the particle layer.
//!
//! The host surface owns scheduling and calls [`FrameHandler::on_tick`]
//! once per displayed frame with the current elapsed time. The layer only
//! updates its rotation; the point buffer is never touched after creation.

use crate::particles::PointCloud;
use crate::rotation::{Rotation, RotationRates};
use std::time::{Duration, Instant};

/// Receives one call per displayed frame.
pub trait FrameHandler {
    /// `elapsed` is monotonic seconds since the surface started.
    fn on_tick(&mut self, elapsed: f64);
}

/// A point cloud together with its own rotation transform
#[derive(Debug, Clone)]
pub struct ParticleLayer {
    cloud: PointCloud,
    rates: RotationRates,
    rotation: Rotation,
}

impl ParticleLayer {
    pub fn new(cloud: PointCloud, rates: RotationRates) -> Self {
        ParticleLayer {
            cloud,
            rates,
            rotation: Rotation::default(),
        }
    }

    pub fn cloud(&self) -> &PointCloud {
        &self.cloud
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn rates(&self) -> RotationRates {
        self.rates
    }
}

impl FrameHandler for ParticleLayer {
    fn on_tick(&mut self, elapsed: f64) {
        self.rotation = self.rates.at(elapsed);
    }
}

/// Source of elapsed time for the render loop.
pub trait Clock {
    fn elapsed(&self) -> f64;
}

/// A clock stopped at a fixed instant, used for single-frame snapshots
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub f64);

impl Clock for FixedClock {
    fn elapsed(&self) -> f64 {
        self.0
    }
}

/// Monotonic clock that can be paused. Time spent paused is excluded
/// from the elapsed value, so the field resumes exactly where it froze.
#[derive(Debug, Clone)]
pub struct SurfaceClock {
    started: Instant,
    paused_at: Option<Instant>,
    paused_total: Duration,
}

impl SurfaceClock {
    pub fn start() -> Self {
        Self::started_at(Instant::now())
    }

    fn started_at(started: Instant) -> Self {
        SurfaceClock {
            started,
            paused_at: None,
            paused_total: Duration::ZERO,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Flips between paused and running. Returns the new paused flag.
    pub fn toggle_pause(&mut self) -> bool {
        self.toggle_pause_at(Instant::now())
    }

    fn toggle_pause_at(&mut self, now: Instant) -> bool {
        match self.paused_at.take() {
            Some(paused_at) => {
                self.paused_total += now.saturating_duration_since(paused_at);
                false
            }
            None => {
                self.paused_at = Some(now);
                true
            }
        }
    }

    fn elapsed_at(&self, now: Instant) -> f64 {
        let end = self.paused_at.unwrap_or(now);
        end.saturating_duration_since(self.started)
            .saturating_sub(self.paused_total)
            .as_secs_f64()
    }
}

impl Clock for SurfaceClock {
    fn elapsed(&self) -> f64 {
        self.elapsed_at(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn layer(count: usize) -> ParticleLayer {
        let cloud = PointCloud::generate(count, 5.0, &mut StdRng::seed_from_u64(1));
        ParticleLayer::new(cloud, RotationRates::default())
    }

    #[test]
    fn tick_sets_rotation_from_elapsed_time() {
        let mut layer = layer(16);
        layer.on_tick(10.0);
        assert!((layer.rotation().x - 0.5).abs() < 1e-12);
        assert!((layer.rotation().y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn tick_does_not_touch_points() {
        let mut layer = layer(32);
        let before = layer.cloud().clone();
        let ptr = layer.cloud().as_slice().as_ptr();
        for t in [0.0, 0.016, 1.0, 3600.0] {
            layer.on_tick(t);
        }
        assert_eq!(layer.cloud(), &before);
        assert_eq!(layer.cloud().as_slice().as_ptr(), ptr);
    }

    #[test]
    fn out_of_order_ticks_are_reproducible() {
        let mut a = layer(4);
        let mut b = layer(4);
        a.on_tick(42.0);
        b.on_tick(1000.0);
        b.on_tick(3.0);
        b.on_tick(42.0);
        assert_eq!(a.rotation(), b.rotation());
    }

    #[test]
    fn layers_rotate_independently() {
        let mut a = layer(4);
        let b = layer(4);
        a.on_tick(5.0);
        assert_ne!(a.rotation(), b.rotation());
        assert_eq!(b.rotation(), Rotation::default());
    }

    #[test]
    fn empty_layer_ticks() {
        let mut layer = layer(0);
        layer.on_tick(2.0);
        assert!(layer.cloud().is_empty());
        assert!((layer.rotation().y - 0.2).abs() < 1e-12);
    }

    #[test]
    fn clock_advances_while_running() {
        let t0 = Instant::now();
        let clock = SurfaceClock::started_at(t0);
        let elapsed = clock.elapsed_at(t0 + Duration::from_millis(1500));
        assert!((elapsed - 1.5).abs() < 1e-9);
    }

    #[test]
    fn paused_clock_is_frozen_and_resumes_in_place() {
        let t0 = Instant::now();
        let mut clock = SurfaceClock::started_at(t0);

        assert!(clock.toggle_pause_at(t0 + Duration::from_secs(2)));
        assert!(clock.is_paused());
        assert!((clock.elapsed_at(t0 + Duration::from_secs(10)) - 2.0).abs() < 1e-9);

        assert!(!clock.toggle_pause_at(t0 + Duration::from_secs(10)));
        assert!(!clock.is_paused());
        assert!((clock.elapsed_at(t0 + Duration::from_secs(11)) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn fixed_clock_reports_its_value() {
        assert_eq!(FixedClock(12.5).elapsed(), 12.5);
    }
}
