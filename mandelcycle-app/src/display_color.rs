//! Color-cycling settings: one serializable model for the three oscillator
//! channels, used by preferences and by recolor commands.

use serde::{Deserialize, Serialize};

use mandelcycle_render::{hsb_to_rgb, Channel, ColorComponent, ColorTable};

// ---------------------------------------------------------------------------
// Per-channel settings
// ---------------------------------------------------------------------------

/// Raw user edits for one channel. Values are clamped when applied, so any
/// numbers (even out-of-range ones from a hand-edited file) are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelSettings {
    /// Optional starting value; the oscillator starts at `min` when absent.
    #[serde(default)]
    pub start: Option<f32>,
    pub min: f32,
    pub max: f32,
    pub delta: f32,
}

impl ChannelSettings {
    pub fn new(min: f32, max: f32, delta: f32) -> Self {
        Self {
            start: None,
            min,
            max,
            delta,
        }
    }

    /// Build a fresh oscillator for `channel`, clamped to its limits.
    pub fn oscillator(&self, channel: Channel) -> ColorComponent {
        ColorComponent::within_channel_limits(channel, self.start, self.min, self.max, self.delta)
    }

    /// The same edit after clamping, as it will actually be applied.
    pub fn clamped(&self, channel: Channel) -> Self {
        let osc = self.oscillator(channel);
        Self {
            start: self.start.map(|_| osc.value()),
            min: osc.min(),
            max: osc.max(),
            delta: osc.delta(),
        }
    }
}

// ---------------------------------------------------------------------------
// ColorSettings
// ---------------------------------------------------------------------------

/// Hue/saturation/brightness oscillator parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorSettings {
    #[serde(default = "default_hue")]
    pub hue: ChannelSettings,
    #[serde(default = "default_saturation")]
    pub saturation: ChannelSettings,
    #[serde(default = "default_brightness")]
    pub brightness: ChannelSettings,
}

/// Two full turns of hue, one degree per table slot.
fn default_hue() -> ChannelSettings {
    ChannelSettings::new(0.0, 720.0, 1.0)
}
fn default_saturation() -> ChannelSettings {
    ChannelSettings::new(70.0, 100.0, 0.0)
}
fn default_brightness() -> ChannelSettings {
    ChannelSettings::new(70.0, 100.0, 0.0)
}

impl Default for ColorSettings {
    fn default() -> Self {
        Self {
            hue: default_hue(),
            saturation: default_saturation(),
            brightness: default_brightness(),
        }
    }
}

impl ColorSettings {
    pub fn channel(&self, channel: Channel) -> &ChannelSettings {
        match channel {
            Channel::Hue => &self.hue,
            Channel::Saturation => &self.saturation,
            Channel::Brightness => &self.brightness,
        }
    }

    pub fn channel_mut(&mut self, channel: Channel) -> &mut ChannelSettings {
        match channel {
            Channel::Hue => &mut self.hue,
            Channel::Saturation => &mut self.saturation,
            Channel::Brightness => &mut self.brightness,
        }
    }

    /// Every channel clamped to its limits.
    pub fn clamped(&self) -> Self {
        Self {
            hue: self.hue.clamped(Channel::Hue),
            saturation: self.saturation.clamped(Channel::Saturation),
            brightness: self.brightness.clamped(Channel::Brightness),
        }
    }

    /// Refill `table` from fresh oscillators using the HSB converter.
    pub fn apply(&self, table: &mut ColorTable) {
        table.rebuild(
            self.hue.oscillator(Channel::Hue),
            self.saturation.oscillator(Channel::Saturation),
            self.brightness.oscillator(Channel::Brightness),
            hsb_to_rgb,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cycle_hue_only() {
        let s = ColorSettings::default();
        assert_eq!(s.hue.max, 720.0);
        assert_eq!(s.saturation.delta, 0.0);
        assert_eq!(s.brightness.min, 70.0);
    }

    #[test]
    fn clamped_respects_channel_limits() {
        let mut s = ColorSettings::default();
        s.hue = ChannelSettings {
            start: Some(1000.0),
            min: -5.0,
            max: 800.0,
            delta: 2.0,
        };
        s.saturation.max = 250.0;
        let c = s.clamped();
        assert_eq!(c.hue.min, 0.0);
        assert_eq!(c.hue.max, 720.0);
        assert_eq!(c.hue.start, Some(720.0));
        assert_eq!(c.saturation.max, 100.0);
    }

    #[test]
    fn missing_channels_use_defaults() {
        let s: ColorSettings =
            serde_json::from_str(r#"{"hue":{"min":10,"max":20,"delta":1}}"#).unwrap();
        assert_eq!(s.hue, ChannelSettings::new(10.0, 20.0, 1.0));
        assert_eq!(s.saturation, ColorSettings::default().saturation);
    }

    #[test]
    fn apply_fills_table() {
        let mut table = ColorTable::new(16);
        ColorSettings::default().apply(&mut table);
        let first = table.entries()[0];
        assert_ne!(first, table.entries()[15]);
    }
}
