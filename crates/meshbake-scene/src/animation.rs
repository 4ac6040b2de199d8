use glam::DVec3;
use meshbake_transform::Transform;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Key {
    pub time: f64,
    pub value: DVec3,
}

impl Key {
    pub fn new(time: f64, value: DVec3) -> Self {
        Self { time, value }
    }
}

/// Keyframed local transform channels of a node. Keys must be sorted by time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationTrack {
    pub translation: Vec<Key>,
    pub rotation: Vec<Key>,
    pub scaling: Vec<Key>,
}

impl AnimationTrack {
    /// `transform` with every keyed channel replaced by its value at `time`.
    pub fn apply(&self, transform: &Transform, time: f64) -> Transform {
        let mut result = *transform;

        if let Some(translation) = sample(&self.translation, time) {
            result.set_translation(translation);
        }
        if let Some(rotation) = sample(&self.rotation, time) {
            result.set_rotation(rotation);
        }
        if let Some(scale) = sample(&self.scaling, time) {
            result.set_scale(scale);
        }

        result
    }
}

/// Linear interpolation between the keys around `time`, clamped to the first and last key.
/// A NaN `time` samples the first key.
pub fn sample(keys: &[Key], time: f64) -> Option<DVec3> {
    let first = keys.first()?;
    let last = keys.last()?;

    if time.is_nan() || time <= first.time {
        return Some(first.value);
    }
    if time >= last.time {
        return Some(last.value);
    }

    let next = keys.partition_point(|key| key.time <= time);
    let (a, b) = (keys[next - 1], keys[next]);
    let t = (time - a.time) / (b.time - a.time);

    Some(a.value.lerp(b.value, t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_channel_keeps_static_value() {
        let track = AnimationTrack::default();
        let transform = Transform::from_translation(DVec3::X);
        assert_eq!(track.apply(&transform, 3.0), transform);
    }

    #[test]
    fn sample_clamps_and_interpolates() {
        let keys = [
            Key::new(0.0, DVec3::ZERO),
            Key::new(1.0, DVec3::new(10.0, 0.0, 0.0)),
            Key::new(3.0, DVec3::new(10.0, 20.0, 0.0)),
        ];

        assert_eq!(sample(&keys, -1.0), Some(DVec3::ZERO));
        assert_eq!(sample(&keys, 0.5), Some(DVec3::new(5.0, 0.0, 0.0)));
        assert_eq!(sample(&keys, 1.0), Some(DVec3::new(10.0, 0.0, 0.0)));
        assert_eq!(sample(&keys, 2.0), Some(DVec3::new(10.0, 10.0, 0.0)));
        assert_eq!(sample(&keys, 9.0), Some(DVec3::new(10.0, 20.0, 0.0)));
        assert_eq!(sample(&[], 0.0), None);
    }

    #[test]
    fn nan_time_samples_first_key() {
        let keys = [Key::new(0.0, DVec3::X), Key::new(1.0, DVec3::Y)];
        assert_eq!(sample(&keys, f64::NAN), Some(DVec3::X));
    }

    #[test]
    fn apply_overrides_only_keyed_channels() {
        let track = AnimationTrack {
            rotation: vec![Key::new(0.0, DVec3::ZERO), Key::new(2.0, DVec3::new(0.0, 90.0, 0.0))],
            ..Default::default()
        };
        let transform = Transform::new(DVec3::ONE, DVec3::ZERO, DVec3::splat(2.0));

        let sampled = track.apply(&transform, 1.0);
        assert_eq!(sampled.get_translation(), DVec3::ONE);
        assert_eq!(sampled.get_rotation(), DVec3::new(0.0, 45.0, 0.0));
        assert_eq!(sampled.get_scale(), DVec3::splat(2.0));
    }
}
