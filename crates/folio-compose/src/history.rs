//! Linear undo/redo log of whole-document snapshots.
//!
//! ```text
//! entries:  [init] [add_block] [move_block] [rename]
//!                                  ^ cursor
//! ```
//!
//! Each entry holds the document as it was *before* its action. Undoing an
//! entry restores that snapshot and stashes the live document on the entry so
//! redo can bring it back. Recording while behind the tail discards every
//! entry after the cursor. Entry 0 is `init`; the cursor resting on it means
//! there is nothing left to undo.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::EnumString;

use folio_types::{Document, HistoryEntryId};

/// Default cap on recorded actions (not counting `init`).
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// What a history entry records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ActionKind {
    Init,
    AddBlock,
    RemoveBlock,
    UpdateBlock,
    ToggleVisibility,
    ToggleCollapsible,
    MoveBlock,
    SetGlobalStyle,
    SetLayout,
    CommitOverlay,
    Rename,
}

impl ActionKind {
    /// Parse from string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s).ok()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Init => "init",
            ActionKind::AddBlock => "add_block",
            ActionKind::RemoveBlock => "remove_block",
            ActionKind::UpdateBlock => "update_block",
            ActionKind::ToggleVisibility => "toggle_visibility",
            ActionKind::ToggleCollapsible => "toggle_collapsible",
            ActionKind::MoveBlock => "move_block",
            ActionKind::SetGlobalStyle => "set_global_style",
            ActionKind::SetLayout => "set_layout",
            ActionKind::CommitOverlay => "commit_overlay",
            ActionKind::Rename => "rename",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Clone, Debug)]
pub struct HistoryEntry {
    pub id: HistoryEntryId,
    pub action: ActionKind,
    /// Unix millis.
    pub timestamp: u64,
    /// Document before the action (for `init`, the initial document).
    pub snapshot: Document,
    /// Document after the action, filled in when the entry is undone.
    redo: Option<Document>,
}

impl HistoryEntry {
    fn new(action: ActionKind, snapshot: Document) -> Self {
        Self {
            id: HistoryEntryId::new(),
            action,
            timestamp: folio_types::now_millis(),
            snapshot,
            redo: None,
        }
    }
}

/// Undo/redo log for one session.
#[derive(Clone, Debug)]
pub struct History {
    entries: Vec<HistoryEntry>,
    cursor: usize,
    /// Max action entries kept; 0 means unbounded.
    limit: usize,
}

impl History {
    /// Start a log whose `init` entry holds a copy of `initial`.
    pub fn new(initial: &Document, limit: usize) -> Self {
        Self {
            entries: vec![HistoryEntry::new(ActionKind::Init, initial.clone())],
            cursor: 0,
            limit,
        }
    }

    /// Record an action given the document as it was before it.
    pub fn record(&mut self, action: ActionKind, pre: Document) {
        let discarded = self.entries.len() - (self.cursor + 1);
        if discarded > 0 {
            tracing::debug!(discarded, "new action discards redo entries");
        }
        self.entries.truncate(self.cursor + 1);
        self.entries.push(HistoryEntry::new(action, pre));
        self.cursor = self.entries.len() - 1;

        if self.limit > 0 && self.entries.len() > self.limit + 1 {
            // Oldest action after init goes; init stays as the floor.
            self.entries.remove(1);
            self.cursor -= 1;
        }
    }

    /// Step back. Returns the document to restore, or `None` at the floor.
    pub fn undo(&mut self, current: &Document) -> Option<Document> {
        if self.cursor == 0 {
            return None;
        }
        let entry = &mut self.entries[self.cursor];
        entry.redo = Some(current.clone());
        let restored = entry.snapshot.clone();
        self.cursor -= 1;
        Some(restored)
    }

    /// Step forward. Returns the document to restore, or `None` at the tail.
    pub fn redo(&mut self) -> Option<Document> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        let next = self.cursor + 1;
        match &self.entries[next].redo {
            Some(doc) => {
                self.cursor = next;
                Some(doc.clone())
            }
            None => {
                tracing::warn!(entry = %self.entries[next].id, "redo entry has no stored state");
                None
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}
