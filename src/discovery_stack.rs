use crate::consts::{DISCOVERY_STACK_SIZE, UID_ALL};
use crate::unique_identifier::UniqueIdentifier;

const BIT_47: u64 = 0x0000_8000_0000_0000;
const BIT_46: u64 = BIT_47 >> 1;

/// An inclusive range of unique ids in their host integer form.
///
/// The bounds are plain integers since a range may start or end on a value
/// that is not a device id (e.g. a manufacturer broadcast).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DiscoveryRange {
    pub lower: u64,
    pub upper: u64,
}

impl DiscoveryRange {
    pub fn new(lower: u64, upper: u64) -> Self {
        debug_assert!(lower <= upper, "range bounds are swapped");
        Self { lower, upper }
    }

    /// The range every discovery starts with.
    pub fn full() -> Self {
        Self::new(0, UID_ALL)
    }

    /// A range with a single candidate.
    pub fn is_single(&self) -> bool {
        self.lower == self.upper
    }

    /// The single candidate of the range, if it is a valid device id.
    /// Broadcast ids and [UID_ALL] are not.
    pub fn single_uid(&self) -> Option<UniqueIdentifier> {
        if !self.is_single() {
            return None;
        }

        UniqueIdentifier::try_from(self.lower)
            .ok()
            .filter(|uid| !uid.is_all())
    }

    /// Splits the range into `[lower, mid]` and `[mid + 1, upper]`.
    /// Must not be called on a single candidate range.
    pub fn split(&self) -> (DiscoveryRange, DiscoveryRange) {
        let mid = midpoint(self.lower, self.upper);

        (
            DiscoveryRange::new(self.lower, mid),
            DiscoveryRange::new(mid + 1, self.upper),
        )
    }

    /// Parameter data of the DISC_UNIQUE_BRANCH request for this range.
    pub fn to_bytes(&self) -> [u8; 12] {
        let mut buffer = [0u8; 12];

        buffer[..6].copy_from_slice(&self.lower.to_be_bytes()[2..]);
        buffer[6..].copy_from_slice(&self.upper.to_be_bytes()[2..]);

        buffer
    }
}

impl core::fmt::Display for DiscoveryRange {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{:04x}:{:08x}-{:04x}:{:08x}",
            self.lower >> u32::BITS,
            self.lower as u32,
            self.upper >> u32::BITS,
            self.upper as u32
        )
    }
}

/// Midpoint of two 48 bit unique ids, rounded down.
///
/// Bit 47 of both bounds is taken out before averaging, so the sum of the
/// remaining bits never needs more than 48 bits. Each bound that had bit 47
/// set contributes half of it afterwards.
pub fn midpoint(lower: u64, upper: u64) -> u64 {
    ((lower & (BIT_47 - 1)) + (upper & (BIT_47 - 1))) / 2
        + if upper & BIT_47 != 0 { BIT_46 } else { 0 }
        + if lower & BIT_47 != 0 { BIT_46 } else { 0 }
}

/// Ranges waiting to be examined. Replaces recursion with a bounded LIFO.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryStack {
    items: heapless::Vec<DiscoveryRange, DISCOVERY_STACK_SIZE>,
    max_depth: usize,
    push_count: usize,
}

impl DiscoveryStack {
    pub const fn new() -> Self {
        Self {
            items: heapless::Vec::new(),
            max_depth: 0,
            push_count: 0,
        }
    }

    /// Empties the stack and clears the statistics.
    pub fn clear(&mut self) {
        self.items.clear();
        self.max_depth = 0;
        self.push_count = 0;
    }

    /// Pushes a range.
    ///
    /// # Panics
    /// If the stack is full. A depth first bisection of the 48 bit space
    /// can't get there.
    pub fn push(&mut self, range: DiscoveryRange) {
        assert!(
            self.items.push(range).is_ok(),
            "discovery stack overflow, DISCOVERY_STACK_SIZE is too small"
        );

        self.push_count += 1;
        self.max_depth = self.max_depth.max(self.items.len());
    }

    /// Pops the next range. `None` means the search is exhausted.
    pub fn pop(&mut self) -> Option<DiscoveryRange> {
        self.items.pop()
    }

    /// Replaces `range` with its two halves, the lower half on top.
    pub fn push_split(&mut self, range: DiscoveryRange) {
        let (lower_half, upper_half) = range.split();

        self.push(upper_half);
        self.push(lower_half);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Pending ranges from the bottom of the stack to the top.
    pub fn iter(&self) -> core::slice::Iter<'_, DiscoveryRange> {
        self.items.iter()
    }

    /// Highest amount of ranges that were pending at the same time.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Amount of ranges pushed since the last [DiscoveryStack::clear].
    pub fn push_count(&self) -> usize {
        self.push_count
    }
}
