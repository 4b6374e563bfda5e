//! Bucket index
//!
//! Holds the current bucket and record of every classified metric, keyed by
//! compound id. Placing a metric replaces whatever it held before, so a metric can
//! never sit in two buckets. Records keep the order in which they were (last)
//! placed, which is the order they are reported in.

use crate::types::{Bucket, BucketContents, LineRecord};
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct Slot {
    bucket: Bucket,
    seq: u64,
    record: LineRecord,
}

/// Compound id → (bucket, record)
#[derive(Debug, Clone, Default)]
pub struct BucketIndex {
    slots: HashMap<String, Slot>,
    next_seq: u64,
}

impl BucketIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `record` into `bucket`, removing any previous placement
    ///
    /// The record goes to the end of its bucket. Returns the previous bucket.
    pub fn place(&mut self, bucket: Bucket, record: LineRecord) -> Option<Bucket> {
        let seq = self.next_seq;
        self.next_seq += 1;
        let previous = self.slots.insert(
            record.compound_id.clone(),
            Slot {
                bucket,
                seq,
                record,
            },
        );
        previous.map(|slot| slot.bucket)
    }

    pub fn bucket_of(&self, compound_id: &str) -> Option<Bucket> {
        self.slots.get(compound_id).map(|slot| slot.bucket)
    }

    pub fn record(&self, compound_id: &str) -> Option<&LineRecord> {
        self.slots.get(compound_id).map(|slot| &slot.record)
    }

    /// Edit a record in place without changing its bucket or position
    pub fn record_mut(&mut self, compound_id: &str) -> Option<&mut LineRecord> {
        self.slots.get_mut(compound_id).map(|slot| &mut slot.record)
    }

    pub fn remove(&mut self, compound_id: &str) -> Option<(Bucket, LineRecord)> {
        self.slots
            .remove(compound_id)
            .map(|slot| (slot.bucket, slot.record))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of metrics currently in `bucket`
    pub fn count(&self, bucket: Bucket) -> usize {
        self.slots.values().filter(|slot| slot.bucket == bucket).count()
    }

    /// Compound ids currently in `bucket`, in report order
    pub fn ids_in(&self, bucket: Bucket) -> Vec<&str> {
        let mut slots: Vec<&Slot> = self
            .slots
            .values()
            .filter(|slot| slot.bucket == bucket)
            .collect();
        slots.sort_by_key(|slot| slot.seq);
        slots
            .into_iter()
            .map(|slot| slot.record.compound_id.as_str())
            .collect()
    }

    /// Split into ordered per-bucket record lists
    ///
    /// `unknown` and `warning` are left empty for the caller to fill.
    pub fn into_contents(self) -> BucketContents {
        let mut slots: Vec<Slot> = self.slots.into_values().collect();
        slots.sort_by_key(|slot| slot.seq);

        let mut contents = BucketContents::default();
        for slot in slots {
            let target = match slot.bucket {
                Bucket::Valid => &mut contents.valid,
                Bucket::Error => &mut contents.error,
                Bucket::Blank => &mut contents.blank,
                Bucket::Missing => &mut contents.missing,
                Bucket::RecommendedButMissing => &mut contents.recommended_but_missing,
            };
            target.push(slot.record);
        }
        contents
    }
}
