use std::collections::VecDeque;

use crate::types::{Channel, Sample};

/// Fixed-capacity history of one channel. Oldest values are evicted first.
#[derive(Debug, Clone)]
pub struct ChannelHistory {
    values: VecDeque<f64>,
    capacity: usize,
}

impl ChannelHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, value: f64) {
        self.values.push_back(value);
        while self.values.len() > self.capacity {
            self.values.pop_front();
        }
    }

    pub fn latest(&self) -> Option<f64> {
        self.values.back().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }
}

/// Rolling window of the most recent values for every tracked channel.
///
/// Owned by the dispatch loop; the plot only ever sees copies.
#[derive(Debug, Clone)]
pub struct RollingStore {
    histories: [ChannelHistory; Channel::COUNT],
    capacity: usize,
}

impl RollingStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            histories: std::array::from_fn(|_| ChannelHistory::new(capacity)),
            capacity,
        }
    }

    /// Append the sample's values to the histories it names, and only those.
    pub fn apply(&mut self, sample: &Sample) {
        for (channel, value) in sample.channel_values() {
            self.histories[channel.index()].push(value);
        }
    }

    /// Oldest-first copy of one channel's history.
    pub fn snapshot(&self, channel: Channel) -> Vec<f64> {
        self.history(channel).iter().collect()
    }

    pub fn latest(&self, channel: Channel) -> Option<f64> {
        self.history(channel).latest()
    }

    /// Latest value of every channel in CSV column order; `None` when a
    /// channel has never received a value.
    pub fn latest_row(&self) -> [Option<f64>; Channel::COUNT] {
        std::array::from_fn(|i| self.histories[i].latest())
    }

    pub fn len(&self, channel: Channel) -> usize {
        self.history(channel).len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn history(&self, channel: Channel) -> &ChannelHistory {
        &self.histories[channel.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_the_last_values_in_insertion_order() {
        let mut store = RollingStore::new(50);
        for i in 0..120 {
            store.apply(&Sample::temperature(i as f64));
        }

        let snapshot = store.snapshot(Channel::Temperature);
        let expected: Vec<f64> = (70..120).map(|i| i as f64).collect();
        assert_eq!(snapshot.len(), 50);
        assert_eq!(snapshot, expected);
    }

    #[test]
    fn apply_touches_only_named_channels() {
        let mut store = RollingStore::new(50);
        store.apply(&Sample::rotation(1.0, -2.5, 0.25));

        assert_eq!(store.snapshot(Channel::RotationX), vec![1.0]);
        assert_eq!(store.snapshot(Channel::RotationY), vec![-2.5]);
        assert_eq!(store.snapshot(Channel::RotationZ), vec![0.25]);
        for channel in Channel::ACCELERATION {
            assert!(store.snapshot(channel).is_empty());
        }
        assert_eq!(store.latest(Channel::Temperature), None);
    }

    #[test]
    fn snapshot_is_a_copy() {
        let mut store = RollingStore::new(3);
        store.apply(&Sample::temperature(1.0));
        let before = store.snapshot(Channel::Temperature);
        store.apply(&Sample::temperature(2.0));

        assert_eq!(before, vec![1.0]);
        assert_eq!(store.snapshot(Channel::Temperature), vec![1.0, 2.0]);
    }

    #[test]
    fn latest_row_reports_missing_channels() {
        let mut store = RollingStore::new(50);
        store.apply(&Sample::acceleration(0.1, 0.2, 9.8));
        store.apply(&Sample::temperature(21.0));
        store.apply(&Sample::temperature(22.0));

        assert_eq!(
            store.latest_row(),
            [None, None, None, Some(0.1), Some(0.2), Some(9.8), Some(22.0)]
        );
    }

    #[test]
    fn small_capacity_evicts_fifo() {
        let mut history = ChannelHistory::new(2);
        history.push(1.0);
        history.push(2.0);
        history.push(3.0);
        assert_eq!(history.iter().collect::<Vec<_>>(), vec![2.0, 3.0]);
        assert_eq!(history.latest(), Some(3.0));
    }
}
