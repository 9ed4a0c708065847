//! Secure notes app: a newest-first notes collection persisted through the player façade.
//!
//! The whole collection is stored as one array under `notes/notes`, so every mutation rewrites
//! the record. Demo players land in local storage, signed-in players in the remote table; the
//! book does not care which.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use std::rc::Rc;

use platform_storage::{Clock, DatabaseManager, SystemClock, NOTES_DATA_TYPE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Data key holding the notes array.
pub const NOTES_DATA_KEY: &str = "notes";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Card accent for one note.
pub enum NoteColor {
    #[default]
    /// Default accent.
    Green,
    /// Blue accent.
    Blue,
    /// Red accent.
    Red,
    /// Yellow accent.
    Yellow,
    /// Purple accent.
    Purple,
}

impl NoteColor {
    /// Every accent in picker order.
    pub const ALL: [NoteColor; 5] = [
        NoteColor::Green,
        NoteColor::Blue,
        NoteColor::Red,
        NoteColor::Yellow,
        NoteColor::Purple,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// One stored note.
pub struct Note {
    /// Creation time in unix ms, rendered as a string.
    pub id: String,
    /// Heading shown on the card.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Parsed tags, in input order.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Card accent.
    #[serde(default)]
    pub color: NoteColor,
    /// Unix ms.
    pub created_at: u64,
    /// Unix ms.
    pub updated_at: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Editor form contents.
pub struct NoteDraft {
    /// Title field.
    pub title: String,
    /// Content field.
    pub content: String,
    /// Comma-separated tag list as typed.
    pub tags: String,
    /// Selected accent.
    pub color: NoteColor,
}

impl NoteDraft {
    /// Draft with the default accent and no tags.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    /// Sets the raw tag list.
    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = tags.into();
        self
    }

    /// Sets the accent.
    pub fn with_color(mut self, color: NoteColor) -> Self {
        self.color = color;
        self
    }

    fn validate(&self) -> Result<(), NoteError> {
        if self.title.trim().is_empty() {
            return Err(NoteError::EmptyTitle);
        }
        if self.content.trim().is_empty() {
            return Err(NoteError::EmptyContent);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Rejected notes edit.
pub enum NoteError {
    #[error("note title is empty")]
    /// Title missing or blank.
    EmptyTitle,
    #[error("note content is empty")]
    /// Content missing or blank.
    EmptyContent,
    #[error("no note with id `{0}`")]
    /// No note carries the id.
    NotFound(String),
}

/// Splits a comma-separated tag list, trimming entries and dropping empty ones.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// In-memory notes collection mirrored to the façade on every change.
pub struct NotesBook {
    manager: DatabaseManager,
    clock: Rc<dyn Clock>,
    notes: Vec<Note>,
}

impl NotesBook {
    /// Book over already-loaded (or seeded) notes.
    pub fn new(manager: DatabaseManager, notes: Vec<Note>) -> Self {
        Self {
            manager,
            clock: Rc::new(SystemClock),
            notes,
        }
    }

    /// Replaces the clock used for ids and timestamps.
    pub fn with_clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Loads the stored notes for the manager's player. Missing or unreadable data yields an
    /// empty book.
    pub async fn load(manager: DatabaseManager) -> Self {
        let notes = manager
            .load_typed::<Vec<Note>>(NOTES_DATA_TYPE, NOTES_DATA_KEY)
            .await
            .unwrap_or_default();
        log::debug!("loaded {} notes for {}", notes.len(), manager.user_id());
        Self::new(manager, notes)
    }

    /// Notes, newest first.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Note with the given id.
    pub fn note(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    /// Creates a note at the top of the book and persists the collection.
    pub async fn create(&mut self, draft: NoteDraft) -> Result<Note, NoteError> {
        draft.validate()?;
        let now = self.clock.now_ms();
        let note = Note {
            id: self.fresh_id(now),
            title: draft.title,
            content: draft.content,
            tags: parse_tags(&draft.tags),
            color: draft.color,
            created_at: now,
            updated_at: now,
        };
        self.notes.insert(0, note.clone());
        self.persist().await;
        Ok(note)
    }

    /// Rewrites a note in place, keeping its id, position and creation time.
    pub async fn update(&mut self, id: &str, draft: NoteDraft) -> Result<(), NoteError> {
        draft.validate()?;
        let now = self.clock.now_ms();
        let note = self
            .notes
            .iter_mut()
            .find(|note| note.id == id)
            .ok_or_else(|| NoteError::NotFound(id.to_string()))?;
        note.tags = parse_tags(&draft.tags);
        note.title = draft.title;
        note.content = draft.content;
        note.color = draft.color;
        note.updated_at = now;
        self.persist().await;
        Ok(())
    }

    /// Removes a note and returns it.
    pub async fn delete(&mut self, id: &str) -> Result<Note, NoteError> {
        let index = self
            .notes
            .iter()
            .position(|note| note.id == id)
            .ok_or_else(|| NoteError::NotFound(id.to_string()))?;
        let removed = self.notes.remove(index);
        self.persist().await;
        Ok(removed)
    }

    fn fresh_id(&self, now: u64) -> String {
        let mut candidate = now;
        while self.note(&candidate.to_string()).is_some() {
            candidate += 1;
        }
        candidate.to_string()
    }

    async fn persist(&self) {
        self.manager
            .save_typed(NOTES_DATA_TYPE, NOTES_DATA_KEY, &self.notes)
            .await;
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use platform_storage::{LocalPlayerStore, ManualClock, MemoryLocalStore, UserId};
    use pretty_assertions::assert_eq;

    use super::*;

    fn book(clock: &ManualClock) -> (DatabaseManager, NotesBook) {
        let manager = DatabaseManager::new(
            UserId::new("demo"),
            LocalPlayerStore::new(MemoryLocalStore::default()),
        );
        let book = NotesBook::new(manager.clone(), Vec::new()).with_clock(Rc::new(clock.clone()));
        (manager, book)
    }

    #[test]
    fn tags_are_trimmed_and_blank_entries_dropped() {
        assert_eq!(parse_tags(" recon, ,target-x ,,"), ["recon", "target-x"]);
        assert!(parse_tags("   ").is_empty());
    }

    #[test]
    fn new_notes_go_first_and_persist() {
        let clock = ManualClock::at(1_000);
        let (manager, mut book) = book(&clock);

        block_on(book.create(NoteDraft::new("first", "a"))).expect("create");
        clock.advance(5);
        let second = block_on(book.create(
            NoteDraft::new("second", "b")
                .with_tags("ssh, vpn")
                .with_color(NoteColor::Purple),
        ))
        .expect("create");

        assert_eq!(second.id, "1005");
        assert_eq!(second.tags, ["ssh", "vpn"]);
        let titles: Vec<_> = book.notes().iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, ["second", "first"]);

        let reloaded = block_on(NotesBook::load(manager));
        assert_eq!(reloaded.notes(), book.notes());
    }

    #[test]
    fn blank_title_or_content_is_rejected() {
        let clock = ManualClock::at(0);
        let (_, mut book) = book(&clock);
        assert_eq!(
            block_on(book.create(NoteDraft::new("  ", "body"))),
            Err(NoteError::EmptyTitle)
        );
        assert_eq!(
            block_on(book.create(NoteDraft::new("title", "\n"))),
            Err(NoteError::EmptyContent)
        );
        assert!(book.notes().is_empty());
    }

    #[test]
    fn same_millisecond_creates_get_distinct_ids() {
        let clock = ManualClock::at(42);
        let (_, mut book) = book(&clock);
        let a = block_on(book.create(NoteDraft::new("a", "a"))).expect("create");
        let b = block_on(book.create(NoteDraft::new("b", "b"))).expect("create");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn update_keeps_creation_time_and_bumps_updated_at() {
        let clock = ManualClock::at(100);
        let (_, mut book) = book(&clock);
        let note = block_on(book.create(NoteDraft::new("draft", "v1"))).expect("create");
        clock.advance(900);

        block_on(book.update(&note.id, NoteDraft::new("final", "v2").with_tags("done")))
            .expect("update");
        let stored = book.note(&note.id).expect("still present");
        assert_eq!(stored.title, "final");
        assert_eq!(stored.tags, ["done"]);
        assert_eq!(stored.created_at, 100);
        assert_eq!(stored.updated_at, 1_000);
    }

    #[test]
    fn edits_of_missing_notes_report_not_found() {
        let clock = ManualClock::at(0);
        let (_, mut book) = book(&clock);
        assert_eq!(
            block_on(book.update("nope", NoteDraft::new("t", "c"))),
            Err(NoteError::NotFound("nope".to_string()))
        );
        assert_eq!(
            block_on(book.delete("nope")),
            Err(NoteError::NotFound("nope".to_string()))
        );
    }

    #[test]
    fn delete_removes_and_persists() {
        let clock = ManualClock::at(7);
        let (manager, mut book) = book(&clock);
        let note = block_on(book.create(NoteDraft::new("burn", "after reading"))).expect("create");
        block_on(book.delete(&note.id)).expect("delete");

        assert!(book.notes().is_empty());
        assert!(block_on(NotesBook::load(manager)).notes().is_empty());
    }
}
