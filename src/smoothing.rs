use crate::config::EMA_FILTER_FACTOR;

/// Exponential moving average for one acceleration axis.
///
/// `smoothed' = smoothed * (1 - factor) + raw * factor`, a recursive
/// low-pass that suppresses high-frequency sensor noise. State persists for
/// the lifetime of a trip and resets to zero at trip start.
#[derive(Clone, Copy, Debug)]
pub struct EmaFilter {
    value: f64,
    factor: f64,
}

impl EmaFilter {
    pub fn new(factor: f64) -> Self {
        EmaFilter { value: 0.0, factor }
    }

    /// Feed one raw value, returning the updated smoothed value.
    pub fn apply(&mut self, raw: f64) -> f64 {
        self.value = self.value * (1.0 - self.factor) + raw * self.factor;
        self.value
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn reset(&mut self) {
        self.value = 0.0;
    }
}

/// One EMA per horizontal-plane axis.
#[derive(Clone, Copy, Debug)]
pub struct MotionSmoother {
    longitudinal: EmaFilter,
    lateral: EmaFilter,
}

impl MotionSmoother {
    pub fn new() -> Self {
        MotionSmoother {
            longitudinal: EmaFilter::new(EMA_FILTER_FACTOR),
            lateral: EmaFilter::new(EMA_FILTER_FACTOR),
        }
    }

    /// Feed one projected sample, returning (longitudinal, lateral).
    pub fn apply(&mut self, longitudinal_raw: f64, lateral_raw: f64) -> (f64, f64) {
        (
            self.longitudinal.apply(longitudinal_raw),
            self.lateral.apply(lateral_raw),
        )
    }

    pub fn reset(&mut self) {
        self.longitudinal.reset();
        self.lateral.reset();
    }
}

impl Default for MotionSmoother {
    fn default() -> Self {
        Self::new()
    }
}
