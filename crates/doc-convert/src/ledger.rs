//! Bounded history of completed single-file conversions.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;

use convert_core::format::DocFormat;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub id: String,
    pub input_file: String,
    pub input_filename: String,
    pub input_format: DocFormat,
    pub output_file: String,
    pub output_format: DocFormat,
    pub timestamp: DateTime<Utc>,
    pub download_url: String,
}

/// FIFO log holding at most `capacity` entries.
#[derive(Debug)]
pub struct Ledger {
    entries: Mutex<VecDeque<HistoryEntry>>,
    capacity: usize,
    read_limit: usize,
}

impl Ledger {
    pub fn new(capacity: usize, read_limit: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            read_limit,
        }
    }

    /// Append an entry, evicting the oldest ones beyond capacity.
    pub fn record(&self, entry: HistoryEntry) {
        let mut entries = self.lock();
        entries.push_back(entry);
        while entries.len() > self.capacity {
            entries.pop_front();
        }
    }

    /// Up to `min(n, read_limit)` most recent entries, oldest first.
    pub fn read_recent(&self, n: usize) -> Vec<HistoryEntry> {
        let entries = self.lock();
        let take = n.min(self.read_limit).min(entries.len());
        entries.iter().skip(entries.len() - take).cloned().collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<HistoryEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn entry(i: usize) -> HistoryEntry {
        HistoryEntry {
            id: format!("id-{}", i),
            input_file: format!("in_{}.txt", i),
            input_filename: format!("in_{}", i),
            input_format: DocFormat::Txt,
            output_file: format!("out_{}.pdf", i),
            output_format: DocFormat::Pdf,
            timestamp: Utc::now(),
            download_url: format!("/api/download/out_{}.pdf", i),
        }
    }

    #[test]
    fn test_eviction_is_fifo() {
        let ledger = Ledger::new(100, 100);
        for i in 1..=101 {
            ledger.record(entry(i));
        }
        assert_eq!(ledger.len(), 100);

        let ids: Vec<String> = ledger.read_recent(100).into_iter().map(|e| e.id).collect();
        assert!(!ids.contains(&"id-1".to_string()));
        assert_eq!(ids.first().unwrap(), "id-2");
        assert_eq!(ids.last().unwrap(), "id-101");
    }

    #[test]
    fn test_read_is_capped() {
        let ledger = Ledger::new(100, 50);
        for i in 0..80 {
            ledger.record(entry(i));
        }
        let recent = ledger.read_recent(usize::MAX);
        assert_eq!(recent.len(), 50);
        assert_eq!(recent[0].id, "id-30");
    }

    #[test]
    fn test_read_recent_is_chronological() {
        let ledger = Ledger::new(10, 5);
        for i in 0..8 {
            ledger.record(entry(i));
        }
        let ids: Vec<String> = ledger.read_recent(3).into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["id-5", "id-6", "id-7"]);
        assert_eq!(ledger.read_recent(50).len(), 5);
    }

    #[test]
    fn test_clear() {
        let ledger = Ledger::new(10, 5);
        ledger.record(entry(0));
        ledger.clear();
        assert!(ledger.is_empty());
        assert!(ledger.read_recent(5).is_empty());
    }

    #[test]
    fn test_concurrent_records_are_not_lost() {
        let ledger = Arc::new(Ledger::new(1000, 50));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let ledger = Arc::clone(&ledger);
                std::thread::spawn(move || {
                    for i in 0..50 {
                        ledger.record(entry(t * 100 + i));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(ledger.len(), 400);
    }

    #[test]
    fn test_serializes_lowercase_formats() {
        let json = serde_json::to_value(entry(3)).unwrap();
        assert_eq!(json["input_format"], "txt");
        assert_eq!(json["output_format"], "pdf");
        assert!(json["timestamp"].as_str().unwrap().contains('T'));
    }
}
