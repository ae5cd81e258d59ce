use std::fmt;

/// One tracked physical quantity. Declaration order is the CSV column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    RotationX,
    RotationY,
    RotationZ,
    AccelerationX,
    AccelerationY,
    AccelerationZ,
    Temperature,
}

impl Channel {
    pub const COUNT: usize = 7;

    pub const ALL: [Channel; Channel::COUNT] = [
        Channel::RotationX,
        Channel::RotationY,
        Channel::RotationZ,
        Channel::AccelerationX,
        Channel::AccelerationY,
        Channel::AccelerationZ,
        Channel::Temperature,
    ];

    pub const ROTATION: [Channel; 3] = [Channel::RotationX, Channel::RotationY, Channel::RotationZ];

    pub const ACCELERATION: [Channel; 3] = [
        Channel::AccelerationX,
        Channel::AccelerationY,
        Channel::AccelerationZ,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Column header and plot legend label.
    pub fn label(self) -> &'static str {
        match self {
            Channel::RotationX => "Rotation X",
            Channel::RotationY => "Rotation Y",
            Channel::RotationZ => "Rotation Z",
            Channel::AccelerationX => "Acceleration X",
            Channel::AccelerationY => "Acceleration Y",
            Channel::AccelerationZ => "Acceleration Z",
            Channel::Temperature => "Temperature",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_column_order() {
        for (i, channel) in Channel::ALL.iter().enumerate() {
            assert_eq!(channel.index(), i);
        }
        assert_eq!(Channel::Temperature.index(), Channel::COUNT - 1);
    }
}
