//! Per-session transcript accumulation.

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// One recorded utterance.
///
/// Entries are immutable once appended; their position in the store is the
/// only ordering signal (no timestamps are recorded).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Who spoke ("Unknown" when the transcription carried no speaker id).
    pub speaker: String,
    /// Trimmed utterance text, never empty.
    pub text: String,
}

impl TranscriptEntry {
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
        }
    }
}

/// Append-only ordered log of everything said in one call.
///
/// Written only by the owning session's event loop; read concurrently by the
/// HTTP API and by prompt construction. Growth is unbounded for the life of
/// the session.
#[derive(Debug, Default)]
pub struct TranscriptStore {
    entries: RwLock<Vec<TranscriptEntry>>,
}

impl TranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry. Entry order reflects event-delivery order.
    pub async fn append(&self, entry: TranscriptEntry) {
        let mut entries = self.entries.write().await;
        entries.push(entry);
    }

    /// A consistent copy of everything appended so far. An entry appended
    /// concurrently is either fully present or absent, never torn.
    pub async fn snapshot(&self) -> Vec<TranscriptEntry> {
        let entries = self.entries.read().await;
        entries.clone()
    }

    /// Number of entries appended so far.
    pub async fn len(&self) -> usize {
        let entries = self.entries.read().await;
        entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn preserves_append_order() {
        let store = TranscriptStore::new();
        store.append(TranscriptEntry::new("alice", "first")).await;
        store.append(TranscriptEntry::new("bob", "second")).await;
        store.append(TranscriptEntry::new("alice", "third")).await;

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[0], TranscriptEntry::new("alice", "first"));
        assert_eq!(snapshot[1], TranscriptEntry::new("bob", "second"));
        assert_eq!(snapshot[2], TranscriptEntry::new("alice", "third"));
    }

    #[tokio::test]
    async fn snapshot_is_isolated_from_later_appends() {
        let store = TranscriptStore::new();
        store.append(TranscriptEntry::new("alice", "before")).await;

        let snapshot = store.snapshot().await;
        store.append(TranscriptEntry::new("bob", "after")).await;

        assert_eq!(snapshot.len(), 1);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn starts_empty() {
        let store = TranscriptStore::new();
        assert!(store.is_empty().await);
        assert!(store.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn concurrent_appends_lose_nothing() {
        let store = Arc::new(TranscriptStore::new());

        let mut handles = Vec::new();
        for task in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                for line in 0..25 {
                    let entry = TranscriptEntry::new(
                        format!("speaker-{}", task),
                        format!("line {}", line),
                    );
                    store.append(entry).await;
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.len(), 16 * 25);
        // Per-writer order survives interleaving with other writers.
        let alice: Vec<_> = snapshot
            .iter()
            .filter(|e| e.speaker == "speaker-0")
            .map(|e| e.text.clone())
            .collect();
        let expected: Vec<_> = (0..25).map(|line| format!("line {}", line)).collect();
        assert_eq!(alice, expected);
    }
}
