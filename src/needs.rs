//! Bodily needs: fecal urgency and hunger.
//!
//! Both are gauges that fill by a fixed amount every update and saturate at
//! their maximum. The HUD shows them as bars scaled by [`Gauge::fraction`].

use tracing::{debug, info};

/// Upper bound shared by every need.
pub const GAUGE_MAX: f32 = 100.0;

/// How full a gauge is. [`Needs::tick`] reports and logs every change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GaugeLevel {
    /// Below 50 %.
    Calm,
    /// 50-79 %.
    Rising,
    /// 80-99 %.
    Urgent,
    /// At the maximum.
    Maxed,
}

impl GaugeLevel {
    /// Classify a fill fraction in `[0, 1]`.
    #[must_use]
    pub fn from_fraction(fraction: f32) -> Self {
        match fraction {
            f if f >= 1.0 => Self::Maxed,
            f if f >= 0.8 => Self::Urgent,
            f if f >= 0.5 => Self::Rising,
            _ => Self::Calm,
        }
    }
}

/// A bounded meter in `[0, max]` that grows by `rate` per tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Gauge {
    name: &'static str,
    value: f32,
    max: f32,
    rate: f32,
}

impl Gauge {
    /// Creates an empty gauge. A rate that is negative or not finite is
    /// treated as zero so the gauge can only fill.
    #[must_use]
    pub fn new(name: &'static str, max: f32, rate: f32) -> Self {
        let rate = if rate.is_finite() { rate.max(0.0) } else { 0.0 };
        let max = if max.is_finite() { max.max(0.0) } else { 0.0 };
        Self { name, value: 0.0, max, rate }
    }

    #[must_use]
    pub fn rate(&self) -> f32 {
        self.rate
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn value(&self) -> f32 {
        self.value
    }

    #[must_use]
    pub fn max(&self) -> f32 {
        self.max
    }

    /// Fill fraction in `[0, 1]`; an empty range reports `0`.
    #[must_use]
    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        (self.value / self.max).clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn level(&self) -> GaugeLevel {
        GaugeLevel::from_fraction(self.fraction())
    }

    #[must_use]
    pub fn is_maxed(&self) -> bool {
        self.value >= self.max
    }

    /// Advance by one update. Returns the new value.
    pub fn tick(&mut self) -> f32 {
        self.value = (self.value + self.rate).clamp(0.0, self.max);
        self.value
    }

    /// Set the value directly, clamped to the gauge range. NaN empties it.
    pub fn set(&mut self, value: f32) {
        self.value = if value.is_nan() { 0.0 } else { value.clamp(0.0, self.max) };
    }
}

/// The two needs tracked by the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Needs {
    pub fecal_urgency: Gauge,
    pub hunger: Gauge,
}

impl Needs {
    #[must_use]
    pub fn new(fecal_urgency_rate: f32, hunger_rate: f32) -> Self {
        Self {
            fecal_urgency: Gauge::new("fecal urgency", GAUGE_MAX, fecal_urgency_rate),
            hunger: Gauge::new("hunger", GAUGE_MAX, hunger_rate),
        }
    }

    /// Advance both gauges by one update.
    ///
    /// Returns the gauges whose [`GaugeLevel`] changed, with the new level.
    /// Usually empty.
    pub fn tick(&mut self) -> Vec<(&'static str, GaugeLevel)> {
        let mut changed = Vec::new();
        for gauge in [&mut self.fecal_urgency, &mut self.hunger] {
            let before = gauge.level();
            gauge.tick();
            let after = gauge.level();
            if after != before {
                match after {
                    GaugeLevel::Maxed => info!(need = gauge.name(), "need maxed out"),
                    level => debug!(need = gauge.name(), ?level, "need level changed"),
                }
                changed.push((gauge.name(), after));
            }
        }
        changed
    }
}
