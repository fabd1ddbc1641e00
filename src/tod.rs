use crate::consts::{DEFAULT_TOD_SIZE, RDM_UID_SIZE};
use crate::unique_identifier::UniqueIdentifier;

/// Table of devices: the responders known on one DMX port.
///
/// Entries are pairwise distinct and never the [crate::consts::UID_ALL] id.
/// The table is bounded by `N`. Devices that don't fit are dropped, so a bus
/// with more responders than `N` is reported incompletely.
#[derive(Debug, Clone)]
pub struct TableOfDevices<const N: usize = DEFAULT_TOD_SIZE> {
    uids: heapless::Vec<UniqueIdentifier, N>,
}

impl<const N: usize> Default for TableOfDevices<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> TableOfDevices<N> {
    pub const fn new() -> Self {
        Self {
            uids: heapless::Vec::new(),
        }
    }

    /// Forgets all entries.
    pub fn reset(&mut self) {
        self.uids.clear();
    }

    /// Adds a device. Returns false if it is already known, if it is the
    /// [crate::consts::UID_ALL] id or if the table is full.
    pub fn add_uid(&mut self, uid: UniqueIdentifier) -> bool {
        if uid.is_all() || self.exists(uid) {
            return false;
        }

        match self.uids.push(uid) {
            Ok(()) => true,
            Err(uid) => {
                log::debug!("table of devices is full, dropping {}", uid);
                false
            },
        }
    }

    /// Removes a device. Following entries move up one slot.
    pub fn delete_uid(&mut self, uid: UniqueIdentifier) -> bool {
        match self.uids.iter().position(|&entry| entry == uid) {
            Some(index) => {
                self.uids.remove(index);
                true
            },
            None => false,
        }
    }

    pub fn exists(&self, uid: UniqueIdentifier) -> bool {
        self.uids.contains(&uid)
    }

    pub fn count(&self) -> u32 {
        self.uids.len() as u32
    }

    /// Same as [TableOfDevices::count], under the name gateways query it by.
    pub fn uid_count(&self) -> u32 {
        self.count()
    }

    pub fn is_empty(&self) -> bool {
        self.uids.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.uids.is_full()
    }

    pub fn capacity(&self) -> usize {
        N
    }

    /// Returns the entry at `index`.
    pub fn copy_uid_entry(&self, index: usize) -> Option<UniqueIdentifier> {
        self.uids.get(index).copied()
    }

    pub fn copy_tod_entry(&self, index: usize) -> Option<UniqueIdentifier> {
        self.copy_uid_entry(index)
    }

    /// Writes the entries as packed 6 byte uids into `dst`, e.g. to answer a
    /// TOD request. Only whole uids that fit are written.
    /// Returns the amount of bytes written.
    pub fn copy_into(&self, dst: &mut [u8]) -> usize {
        let mut written = 0;

        for (uid, chunk) in self
            .uids
            .iter()
            .zip(dst.chunks_exact_mut(RDM_UID_SIZE))
        {
            chunk.copy_from_slice(&uid.to_bytes());
            written += RDM_UID_SIZE;
        }

        written
    }

    /// Packed table for a TOD_DATA response, see [TableOfDevices::copy_into].
    pub fn copy_tod(&self, dst: &mut [u8]) -> usize {
        self.copy_into(dst)
    }

    pub fn as_slice(&self) -> &[UniqueIdentifier] {
        &self.uids
    }

    pub fn iter(&self) -> core::slice::Iter<'_, UniqueIdentifier> {
        self.uids.iter()
    }

    /// Logs every entry on debug level.
    pub fn dump(&self) {
        log::debug!("table of devices: {} entries", self.uids.len());
        for (index, uid) in self.uids.iter().enumerate() {
            log::debug!("  {:3} {}", index, uid);
        }
    }
}

impl<'a, const N: usize> IntoIterator for &'a TableOfDevices<N> {
    type Item = &'a UniqueIdentifier;
    type IntoIter = core::slice::Iter<'a, UniqueIdentifier>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
