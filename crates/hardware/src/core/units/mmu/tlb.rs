//! Translation Lookaside Buffer (TLB).
//!
//! A fully associative, software-managed translation cache. Every lookup compares
//! the virtual page of every valid entry; there is no set indexing. Replacement is
//! least-recently-used over the whole table, driven by a monotonically increasing
//! access clock. Invalid slots are always chosen before valid ones, and among equal
//! candidates the lowest slot index wins, so replacement traces are reproducible.

use crate::common::Word;
use crate::common::constants::{PAGE_OFFSET_MASK, page_of};

/// Access right: data reads permitted.
pub const ACC_READ: u8 = 1 << 0;
/// Access right: data writes permitted.
pub const ACC_WRITE: u8 = 1 << 1;
/// Access right: instruction fetch permitted.
pub const ACC_EXECUTE: u8 = 1 << 2;
/// Access right: page accessible from user mode.
pub const ACC_USER: u8 = 1 << 3;

/// A single entry in the TLB.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TlbEntry {
    /// Entry validity flag.
    pub valid: bool,
    /// Access rights (`ACC_*` bits).
    pub access_id: u8,
    /// Protection id; 0 means the page is not tied to a PID.
    pub protect_id: u32,
    /// Virtual page address (tag).
    pub virtual_address: Word,
    /// Physical page address (data).
    pub physical_address: Word,
}

impl TlbEntry {
    /// Translates `vaddr`, which must lie in this entry's page.
    #[inline]
    pub const fn translate(&self, vaddr: u64) -> u64 {
        (self.physical_address as u64) | (vaddr & PAGE_OFFSET_MASK)
    }

    #[inline]
    const fn matches(&self, page: u64) -> bool {
        self.valid && self.virtual_address as u64 == page
    }
}

/// Translation Lookaside Buffer structure.
#[derive(Clone, Debug)]
pub struct Tlb {
    /// TLB entries.
    entries: Vec<TlbEntry>,
    /// Last-use stamp per slot, parallel to `entries`.
    stamps: Vec<u64>,
    /// Access clock; incremented on every hit and insert.
    clock: u64,
    /// Lookup hits since the counters were last cleared.
    hits: u64,
    /// Lookup misses since the counters were last cleared.
    misses: u64,
}

impl Tlb {
    /// Creates a new TLB with the specified capacity.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of entries. A capacity of 0 is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: vec![TlbEntry::default(); capacity],
            stamps: vec![0; capacity],
            clock: 0,
            hits: 0,
            misses: 0,
        }
    }

    /// Number of slots in the table.
    pub const fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Number of valid entries.
    pub fn valid_count(&self) -> usize {
        self.entries.iter().filter(|e| e.valid).count()
    }

    /// Returns the entry in slot `idx` without touching recency state.
    pub fn entry(&self, idx: usize) -> Option<&TlbEntry> {
        self.entries.get(idx)
    }

    /// All slots, valid or not, in slot order.
    pub fn entries(&self) -> &[TlbEntry] {
        &self.entries
    }

    /// Lookup hits recorded so far.
    pub const fn hits(&self) -> u64 {
        self.hits
    }

    /// Lookup misses recorded so far.
    pub const fn misses(&self) -> u64 {
        self.misses
    }

    /// Zeroes the hit and miss counters.
    pub const fn clear_counters(&mut self) {
        self.hits = 0;
        self.misses = 0;
    }

    const fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn position(&self, page: u64) -> Option<usize> {
        self.entries.iter().position(|e| e.matches(page))
    }

    /// Looks up the page containing `vaddr` and marks the entry as most recently used.
    ///
    /// # Returns
    ///
    /// A copy of the matching entry, or `None` on a miss.
    pub fn lookup(&mut self, vaddr: Word) -> Option<TlbEntry> {
        let Some(idx) = self.position(page_of(vaddr as u64)) else {
            self.misses += 1;
            return None;
        };
        self.hits += 1;
        self.stamps[idx] = self.tick();
        Some(self.entries[idx])
    }

    /// Looks up the page containing `vaddr` without updating recency or counters.
    pub fn peek(&self, vaddr: Word) -> Option<TlbEntry> {
        self.position(page_of(vaddr as u64)).map(|idx| self.entries[idx])
    }

    /// Selects the slot an insert would use for a page not yet in the table.
    fn victim(&self) -> usize {
        self.entries
            .iter()
            .zip(&self.stamps)
            .enumerate()
            .min_by_key(|(_, (entry, stamp))| (entry.valid, if entry.valid { **stamp } else { 0 }))
            .map_or(0, |(idx, _)| idx)
    }

    /// Inserts a mapping.
    ///
    /// An existing valid entry for the same virtual page is overwritten in place, so at
    /// most one valid entry per page exists. Otherwise the least recently used slot
    /// is replaced.
    ///
    /// # Arguments
    ///
    /// * `vaddr` - Any address in the virtual page.
    /// * `paddr` - Any address in the physical page.
    /// * `access_id` - Access rights (`ACC_*` bits).
    /// * `protect_id` - Protection id compared against `PID0..PID3`.
    ///
    /// # Returns
    ///
    /// The slot index that now holds the mapping.
    pub fn insert(&mut self, vaddr: Word, paddr: Word, access_id: u8, protect_id: u32) -> usize {
        let page = page_of(vaddr as u64);
        let idx = self.position(page).unwrap_or_else(|| self.victim());
        self.entries[idx] = TlbEntry {
            valid: true,
            access_id,
            protect_id,
            virtual_address: page as Word,
            physical_address: page_of(paddr as u64) as Word,
        };
        self.stamps[idx] = self.tick();
        idx
    }

    /// Invalidates the entry for the page containing `vaddr`.
    ///
    /// # Returns
    ///
    /// `true` if an entry was invalidated; a purge of an unmapped page is a no-op.
    pub fn purge(&mut self, vaddr: Word) -> bool {
        match self.position(page_of(vaddr as u64)) {
            Some(idx) => {
                self.entries[idx].valid = false;
                self.stamps[idx] = 0;
                true
            }
            None => false,
        }
    }

    /// Invalidates every entry.
    pub fn reset(&mut self) {
        self.entries.fill(TlbEntry::default());
        self.stamps.fill(0);
        self.clock = 0;
    }
}
