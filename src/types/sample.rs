use super::Channel;

const ROTATION: &[Channel] = &Channel::ROTATION;
const ACCELERATION: &[Channel] = &Channel::ACCELERATION;
const TEMPERATURE: &[Channel] = &[Channel::Temperature];

/// A single parsed reading. One device line carries at most one of these.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    Rotation { x: f64, y: f64, z: f64 },
    Acceleration { x: f64, y: f64, z: f64 },
    Temperature { value: f64 },
}

impl Sample {
    pub fn rotation(x: f64, y: f64, z: f64) -> Self {
        Self::Rotation { x, y, z }
    }

    pub fn acceleration(x: f64, y: f64, z: f64) -> Self {
        Self::Acceleration { x, y, z }
    }

    pub fn temperature(value: f64) -> Self {
        Self::Temperature { value }
    }

    /// The channels this sample writes to, paired with their new values.
    pub fn channel_values(&self) -> impl Iterator<Item = (Channel, f64)> {
        let (channels, values) = match *self {
            Sample::Rotation { x, y, z } => (ROTATION, [x, y, z]),
            Sample::Acceleration { x, y, z } => (ACCELERATION, [x, y, z]),
            Sample::Temperature { value } => (TEMPERATURE, [value, 0.0, 0.0]),
        };
        channels.iter().copied().zip(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_touches_only_its_channel() {
        let values: Vec<_> = Sample::temperature(21.5).channel_values().collect();
        assert_eq!(values, vec![(Channel::Temperature, 21.5)]);
    }

    #[test]
    fn triplets_map_to_axes_in_order() {
        let values: Vec<_> = Sample::acceleration(0.1, 0.2, 9.8).channel_values().collect();
        assert_eq!(
            values,
            vec![
                (Channel::AccelerationX, 0.1),
                (Channel::AccelerationY, 0.2),
                (Channel::AccelerationZ, 9.8),
            ]
        );
    }
}
