use crate::base::IndividualId;
use crate::genome::Individual;

/// Growable slot store for individual records with tombstoning on death.
///
/// The slot index IS the individual id: slots only ever grow, so ids are
/// monotonic and never reused for the life of the simulation. The arena is
/// therefore also the world's next-identifier counter; there is no hidden
/// process-wide id state anywhere.
///
/// Migration, reproduction and resampling reduce to index manipulation over
/// this arena plus the per-node membership lists held by the topology.
#[derive(Debug, Default)]
pub struct IndividualArena {
    slots: Vec<Option<Individual>>,
    live: usize,
}

impl IndividualArena {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            live: 0,
        }
    }

    /// The id the next insertion will receive.
    pub fn next_id(&self) -> IndividualId {
        IndividualId(self.slots.len() as u64)
    }

    /// Allocate a fresh id and insert the individual built for it.
    ///
    /// The builder receives the id so the record can carry its own identity.
    pub fn insert(&mut self, build: impl FnOnce(IndividualId) -> Individual) -> IndividualId {
        let id = self.next_id();
        self.slots.push(Some(build(id)));
        self.live += 1;
        id
    }

    /// Remove an individual, leaving a tombstone. Returns the record.
    pub fn remove(&mut self, id: IndividualId) -> Option<Individual> {
        let removed = self.slots.get_mut(id.index())?.take();
        if removed.is_some() {
            self.live -= 1;
        }
        removed
    }

    pub fn get(&self, id: IndividualId) -> Option<&Individual> {
        self.slots.get(id.index())?.as_ref()
    }

    pub fn get_mut(&mut self, id: IndividualId) -> Option<&mut Individual> {
        self.slots.get_mut(id.index())?.as_mut()
    }

    pub fn contains(&self, id: IndividualId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live individuals.
    pub fn live_count(&self) -> usize {
        self.live
    }

    /// Total slots ever allocated (equals the number of ids handed out).
    pub fn allocated(&self) -> usize {
        self.slots.len()
    }

    /// Iterate over live individuals.
    pub fn iter(&self) -> impl Iterator<Item = &Individual> {
        self.slots.iter().filter_map(|s| s.as_ref())
    }

    /// Iterate mutably over live individuals.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Individual> {
        self.slots.iter_mut().filter_map(|s| s.as_mut())
    }

    /// Raw slot access for the parallel stages of the engine.
    ///
    /// Tombstones are `None`; seed vectors are aligned with slot indices.
    pub fn slots_mut(&mut self) -> &mut [Option<Individual>] {
        &mut self.slots
    }

    /// Raw slot access (shared).
    pub fn slots(&self) -> &[Option<Individual>] {
        &self.slots
    }
}
