//! In-memory tag and question repository backed by a [`Storage`].

use crate::config::StoreConfig;
use crate::error::Result;
use crate::filter::{filter_questions, Selectors};
use crate::media::{jpeg_data_url, normalize_image};
use crate::model::{Question, QuestionPatch, Snapshot, Tag, TagPatch};
use crate::storage::Storage;

/// Records added by [`Repository::merge`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub tags: usize,
    pub questions: usize,
}

/// Tags and questions kept in memory, written through to storage after
/// every mutation.
///
/// A failed write is logged and otherwise ignored: the in-memory state stays
/// authoritative and the next successful write catches storage up.
#[derive(Debug)]
pub struct Repository<S: Storage> {
    storage: S,
    tags: Vec<Tag>,
    questions: Vec<Question>,
    max_image_size: u32,
    jpeg_quality: u8,
}

impl<S: Storage> Repository<S> {
    /// Open with whatever the storage holds. A load failure is logged and
    /// the repository starts empty.
    pub fn open(mut storage: S) -> Self {
        let snapshot = storage.load().unwrap_or_else(|err| {
            log::warn!("failed to load store, starting empty: {err}");
            Snapshot::default()
        });
        Self::with_snapshot(storage, snapshot)
    }

    /// Open, propagating load failures.
    pub fn try_open(mut storage: S) -> Result<Self> {
        let snapshot = storage.load()?;
        Ok(Self::with_snapshot(storage, snapshot))
    }

    fn with_snapshot(storage: S, snapshot: Snapshot) -> Self {
        let defaults = StoreConfig::default();
        Self {
            storage,
            tags: snapshot.tags,
            questions: snapshot.questions,
            max_image_size: defaults.max_image_size,
            jpeg_quality: defaults.jpeg_quality,
        }
    }

    /// Apply image settings from `config`.
    pub fn configure(&mut self, config: &StoreConfig) {
        self.max_image_size = config.max_image_size;
        self.jpeg_quality = config.jpeg_quality;
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn tag(&self, id: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.id == id)
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    // =========================================================================
    // Tags
    // =========================================================================

    pub fn add_tag(&mut self, tag: Tag) {
        self.tags.push(tag);
        self.persist();
    }

    /// Returns `false` if no tag has this id.
    pub fn update_tag(&mut self, id: &str, patch: TagPatch) -> bool {
        let Some(tag) = self.tags.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        patch.apply(tag);
        self.persist();
        true
    }

    /// Question values for the tag are kept.
    pub fn remove_tag(&mut self, id: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t.id != id);
        let removed = self.tags.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    // =========================================================================
    // Questions
    // =========================================================================

    pub fn add_question(&mut self, question: Question) {
        self.questions.push(question);
        self.persist();
    }

    pub fn update_question(&mut self, id: &str, patch: QuestionPatch) -> bool {
        let Some(question) = self.questions.iter_mut().find(|q| q.id == id) else {
            return false;
        };
        patch.apply(question);
        self.persist();
        true
    }

    pub fn remove_question(&mut self, id: &str) -> bool {
        let before = self.questions.len();
        self.questions.retain(|q| q.id != id);
        let removed = self.questions.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    /// Normalize an image and append it to the question as a data URL.
    /// Returns `Ok(false)` if the question does not exist.
    pub fn attach_image(&mut self, question_id: &str, bytes: &[u8]) -> Result<bool> {
        if self.question(question_id).is_none() {
            return Ok(false);
        }
        let jpeg = normalize_image(bytes, self.max_image_size, self.jpeg_quality)?;
        let url = jpeg_data_url(&jpeg);
        if let Some(question) = self.questions.iter_mut().find(|q| q.id == question_id) {
            question.images.push(url);
        }
        self.persist();
        Ok(true)
    }

    // =========================================================================
    // Bulk operations
    // =========================================================================

    /// Copy of the current contents.
    pub fn export(&self) -> Snapshot {
        Snapshot {
            tags: self.tags.clone(),
            questions: self.questions.clone(),
        }
    }

    pub fn replace_all(&mut self, snapshot: Snapshot) {
        self.tags = snapshot.tags;
        self.questions = snapshot.questions;
        self.persist();
    }

    /// Add records whose id is not already present. Existing records win.
    pub fn merge(&mut self, snapshot: Snapshot) -> MergeReport {
        let mut report = MergeReport::default();
        for tag in snapshot.tags {
            if self.tag(&tag.id).is_none() {
                self.tags.push(tag);
                report.tags += 1;
            }
        }
        for question in snapshot.questions {
            if self.question(&question.id).is_none() {
                self.questions.push(question);
                report.questions += 1;
            }
        }
        self.persist();
        report
    }

    pub fn filter(&self, selectors: &Selectors) -> Vec<&Question> {
        filter_questions(&self.tags, &self.questions, selectors)
    }

    /// Write the current contents to storage. Returns `false` (after logging)
    /// if the write failed.
    pub fn persist(&mut self) -> bool {
        let snapshot = self.export();
        match self.storage.save(&snapshot) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("failed to persist store: {err}");
                false
            }
        }
    }
}
