use std::collections::BTreeMap;

use serde::Serialize;

use crate::record::{ChannelRecord, CHANNEL_IDS};

/// Number of RTS slots a gateway exposes.
pub const CHANNEL_COUNT: usize = 16;

/// Channel records keyed by id.
///
/// Complete once all sixteen slots have been reported. The engine owns the
/// live registry; everyone else gets cloned snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Registry {
    channels: BTreeMap<u8, ChannelRecord>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, replacing any earlier record for the same id.
    pub fn insert(&mut self, record: ChannelRecord) -> Option<ChannelRecord> {
        self.channels.insert(record.id(), record)
    }

    pub fn get(&self, id: u8) -> Option<&ChannelRecord> {
        self.channels.get(&id)
    }

    /// Mutable access stays inside the crate so records only change through
    /// command encoding.
    pub(crate) fn get_mut(&mut self, id: u8) -> Option<&mut ChannelRecord> {
        self.channels.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// True when every slot 1..=16 has been reported.
    pub fn is_complete(&self) -> bool {
        self.channels.len() == CHANNEL_COUNT
            && CHANNEL_IDS
                .clone()
                .all(|id| self.channels.contains_key(&id))
    }

    /// True when `id` is known and paired.
    pub fn is_active(&self, id: u8) -> bool {
        self.get(id).is_some_and(ChannelRecord::is_active)
    }

    /// Ids not yet reported.
    pub fn missing(&self) -> Vec<u8> {
        CHANNEL_IDS
            .filter(|id| !self.channels.contains_key(id))
            .collect()
    }

    /// Records in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &ChannelRecord> {
        self.channels.values()
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a ChannelRecord;
    type IntoIter = std::collections::btree_map::Values<'a, u8, ChannelRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.channels.values()
    }
}
