//! Bounded color-component oscillators.
//!
//! Hue, saturation and brightness all share one update rule: step by a fixed
//! delta and reflect at the bounds. A single [`ColorComponent`] type carries
//! its own bounds and direction and is tagged with the [`Channel`] that
//! decides how its value is normalised for color conversion.

/// Which HSB component an oscillator drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Hue,
    Saturation,
    Brightness,
}

impl Channel {
    /// Divisor that maps a raw value into the unit range expected by the
    /// converter: degrees for hue, percent for the others.
    pub fn scale(self) -> f32 {
        match self {
            Self::Hue => 360.0,
            Self::Saturation | Self::Brightness => 100.0,
        }
    }

    /// Accepted ranges for user edits of this channel.
    ///
    /// Hue may run up to two full turns so the table can cycle through the
    /// spectrum twice; the converter wraps it.
    pub fn limits(self) -> ChannelLimits {
        match self {
            Self::Hue => ChannelLimits {
                min: (0.0, 360.0),
                max: (0.0, 720.0),
                delta: (0.0, 360.0),
            },
            Self::Saturation | Self::Brightness => ChannelLimits {
                min: (0.0, 100.0),
                max: (0.0, 100.0),
                delta: (0.0, 100.0),
            },
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Hue => "Hue",
            Self::Saturation => "Saturation",
            Self::Brightness => "Brightness",
        }
    }
}

/// Inclusive `(low, high)` ranges for each editable parameter of a channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelLimits {
    pub min: (f32, f32),
    pub max: (f32, f32),
    pub delta: (f32, f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Rising,
    Falling,
}

impl Direction {
    #[inline]
    fn sign(self) -> f32 {
        match self {
            Self::Rising => 1.0,
            Self::Falling => -1.0,
        }
    }

    #[inline]
    fn reversed(self) -> Self {
        match self {
            Self::Rising => Self::Falling,
            Self::Falling => Self::Rising,
        }
    }
}

/// A value that walks between `min` and `max` in steps of `delta`,
/// reversing direction at either bound.
///
/// Invariant: `min <= value <= max` after every call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorComponent {
    channel: Channel,
    min: f32,
    max: f32,
    delta: f32,
    value: f32,
    direction: Direction,
}

impl ColorComponent {
    /// Oscillator starting at `min`.
    ///
    /// Inputs are clamped rather than rejected: a non-finite bound falls
    /// back to the lower bound, `max` is raised to `min`, and a negative
    /// or non-finite `delta` becomes `0`.
    pub fn new(channel: Channel, min: f32, max: f32, delta: f32) -> Self {
        Self::with_start(channel, min, min, max, delta)
    }

    /// Oscillator starting at `start`, clamped into `[min, max]`.
    pub fn with_start(channel: Channel, start: f32, min: f32, max: f32, delta: f32) -> Self {
        let min = finite_or(min, 0.0);
        let max = finite_or(max, min).max(min);
        let delta = finite_or(delta, 0.0).max(0.0);
        let value = finite_or(start, min).clamp(min, max);
        Self {
            channel,
            min,
            max,
            delta,
            value,
            direction: Direction::Rising,
        }
    }

    /// Clamp each raw edit into the channel's [`limits`](Channel::limits)
    /// first, then build the oscillator.
    pub fn within_channel_limits(
        channel: Channel,
        start: Option<f32>,
        min: f32,
        max: f32,
        delta: f32,
    ) -> Self {
        let limits = channel.limits();
        let min = clamp_to(min, limits.min);
        let max = clamp_to(max, limits.max);
        let delta = clamp_to(delta, limits.delta);
        match start {
            Some(start) => Self::with_start(channel, start, min, max, delta),
            None => Self::new(channel, min, max, delta),
        }
    }

    pub fn hue(min: f32, max: f32, delta: f32) -> Self {
        Self::new(Channel::Hue, min, max, delta)
    }

    pub fn saturation(min: f32, max: f32, delta: f32) -> Self {
        Self::new(Channel::Saturation, min, max, delta)
    }

    pub fn brightness(min: f32, max: f32, delta: f32) -> Self {
        Self::new(Channel::Brightness, min, max, delta)
    }

    /// Advance one step, reflecting at the bounds.
    ///
    /// If the step would leave `[min, max]` the direction flips and the
    /// step is retried from the current value. If that also leaves the
    /// range (delta wider than the range) the value holds for this step.
    pub fn next(&mut self) {
        if self.delta == 0.0 {
            return;
        }
        let mut next = self.value + self.delta * self.direction.sign();
        if next < self.min || next > self.max {
            self.direction = self.direction.reversed();
            next = self.value + self.delta * self.direction.sign();
        }
        if next >= self.min && next <= self.max {
            self.value = next;
        }
    }

    /// Current value divided into the converter's unit range.
    #[inline]
    pub fn normalized(&self) -> f32 {
        self.value / self.channel.scale()
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn delta(&self) -> f32 {
        self.delta
    }
}

#[inline]
fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

#[inline]
fn clamp_to(value: f32, (low, high): (f32, f32)) -> f32 {
    finite_or(value, low).clamp(low, high)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(osc: &mut ColorComponent, steps: usize) -> Vec<f32> {
        (0..steps)
            .map(|_| {
                let v = osc.value();
                osc.next();
                v
            })
            .collect()
    }

    #[test]
    fn reflects_at_bounds() {
        let mut osc = ColorComponent::hue(0.0, 3.0, 1.0);
        assert_eq!(
            walk(&mut osc, 9),
            vec![0.0, 1.0, 2.0, 3.0, 2.0, 1.0, 0.0, 1.0, 2.0]
        );
    }

    #[test]
    fn zero_delta_is_constant() {
        let mut osc = ColorComponent::with_start(Channel::Saturation, 70.0, 0.0, 100.0, 0.0);
        for _ in 0..1000 {
            osc.next();
            assert_eq!(osc.value(), 70.0);
        }
    }

    #[test]
    fn delta_wider_than_range_holds_value() {
        let mut osc = ColorComponent::brightness(10.0, 12.0, 5.0);
        for _ in 0..10 {
            osc.next();
            assert_eq!(osc.value(), 10.0);
        }
    }

    #[test]
    fn never_leaves_range() {
        for &(min, max, delta) in &[(0.0, 360.0, 7.3), (20.0, 21.0, 0.7), (5.0, 5.0, 1.0)] {
            let mut osc = ColorComponent::hue(min, max, delta);
            for _ in 0..5000 {
                osc.next();
                assert!(osc.value() >= min && osc.value() <= max);
            }
        }
    }

    #[test]
    fn degenerate_range_is_constant() {
        let mut osc = ColorComponent::hue(42.0, 42.0, 3.0);
        osc.next();
        osc.next();
        assert_eq!(osc.value(), 42.0);
    }

    #[test]
    fn normalizes_per_channel() {
        let hue = ColorComponent::with_start(Channel::Hue, 180.0, 0.0, 360.0, 1.0);
        assert!((hue.normalized() - 0.5).abs() < 1e-6);
        let sat = ColorComponent::with_start(Channel::Saturation, 25.0, 0.0, 100.0, 1.0);
        assert!((sat.normalized() - 0.25).abs() < 1e-6);
        let wide_hue = ColorComponent::with_start(Channel::Hue, 540.0, 0.0, 720.0, 1.0);
        assert!((wide_hue.normalized() - 1.5).abs() < 1e-6);
    }

    #[test]
    fn clamps_bad_inputs() {
        let osc = ColorComponent::with_start(Channel::Hue, 500.0, 50.0, 10.0, -4.0);
        assert_eq!(osc.min(), 50.0);
        assert_eq!(osc.max(), 50.0);
        assert_eq!(osc.delta(), 0.0);
        assert_eq!(osc.value(), 50.0);

        let osc = ColorComponent::new(Channel::Brightness, f32::NAN, f32::INFINITY, f32::NAN);
        assert_eq!(osc.min(), 0.0);
        assert_eq!(osc.max(), 0.0);
        assert_eq!(osc.delta(), 0.0);
    }

    #[test]
    fn channel_limits_applied_to_edits() {
        let osc = ColorComponent::within_channel_limits(Channel::Hue, None, -20.0, 900.0, 400.0);
        assert_eq!(osc.min(), 0.0);
        assert_eq!(osc.max(), 720.0);
        assert_eq!(osc.delta(), 360.0);

        let osc =
            ColorComponent::within_channel_limits(Channel::Saturation, Some(95.0), 70.0, 150.0, 2.0);
        assert_eq!(osc.max(), 100.0);
        assert_eq!(osc.value(), 95.0);
    }
}
