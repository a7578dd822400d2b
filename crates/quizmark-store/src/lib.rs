//! Quizmark question store
//!
//! Tags, questions and their persistence:
//!
//! ```text
//! Repository<S: Storage> ── filter(selectors) → matching questions
//!        │
//!        ├── DirStorage     <root>/{version, tags.json, questions.json}
//!        └── MemoryStorage  (tests)
//! ```
//!
//! Images attached to questions are normalized to JPEG and stored inline as
//! data URLs.

pub mod config;
pub mod error;
pub mod filter;
pub mod ids;
pub mod media;
pub mod model;
pub mod repository;
pub mod storage;

pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use filter::{Selector, Selectors};
pub use ids::generate_id;
pub use media::{jpeg_data_url, normalize_image, save_as};
pub use model::{Question, QuestionPatch, Snapshot, Tag, TagEntry, TagPatch, TagType, TagValue};
pub use repository::{MergeReport, Repository};
pub use storage::{DirStorage, MemoryStorage, Storage, STORE_VERSION};
