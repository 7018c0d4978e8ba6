//! Id-keyed download table.

use std::collections::HashMap;

use super::{Download, DownloadId, DownloadRequest};

/// Owner of all download records for one session.
///
/// Ids are allocated monotonically starting at 1; 0 is never a valid id.
/// This is the only way the coordinator re-acquires a download after a
/// suspension point.
#[derive(Debug)]
pub struct DownloadManager {
    downloads: HashMap<DownloadId, Download>,
    next_id: DownloadId,
}

impl Default for DownloadManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DownloadManager {
    pub fn new() -> Self {
        Self {
            downloads: HashMap::new(),
            next_id: 1,
        }
    }

    /// Register a new download and return its id.
    pub fn start(&mut self, request: DownloadRequest) -> DownloadId {
        let id = self.next_id;
        self.next_id += 1;
        self.downloads.insert(id, Download::new(id, request));
        id
    }

    pub fn get(&self, id: DownloadId) -> Option<&Download> {
        self.downloads.get(&id)
    }

    pub fn get_mut(&mut self, id: DownloadId) -> Option<&mut Download> {
        self.downloads.get_mut(&id)
    }

    /// Remove a download (user cancelled, empty target path, or teardown).
    pub fn remove(&mut self, id: DownloadId) -> Option<Download> {
        self.downloads.remove(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic_and_unique() {
        let mut mgr = DownloadManager::new();
        let a = mgr.start(DownloadRequest::default());
        let b = mgr.start(DownloadRequest::default());
        assert_ne!(a, b);
        assert!(b > a);
        assert!(a >= 1, "0 is never a valid id");
    }

    #[test]
    fn removed_ids_are_not_reused() {
        let mut mgr = DownloadManager::new();
        let a = mgr.start(DownloadRequest::default());
        mgr.remove(a);
        let b = mgr.start(DownloadRequest::default());
        assert_ne!(a, b);
        assert!(mgr.get(a).is_none());
        assert!(mgr.get(b).is_some());
    }
}
