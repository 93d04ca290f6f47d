//! # Command Layer
//!
//! The business logic of cardboard. Every function here is generic over a
//! [`DataStore`](crate::store::DataStore) and never touches stdout, stderr or the
//! terminal; presentation layers decide how outcomes are shown.
//!
//! ## Write Model
//!
//! Each store call is atomic for a single document and nothing more. Operations
//! that touch many documents (reordering, migration, cascade deletes, imports)
//! issue independent writes and report what went through:
//!
//! - Batches ([`BatchReport`](crate::store::BatchReport)) never stop at the first
//!   failure and never roll back. Callers mirror only the ids that succeeded.
//! - Cascade deletes run children first, parent last, and can be re-run after a
//!   failure to finish the job.
//!
//! ## Derived State
//!
//! A topic's `successAverage` is recomputed after every create, edit, delete,
//! status change and import ([`status::recompute_success_average`]). Pure
//! reorders leave it alone.
//!
//! ## Command Modules
//!
//! - [`spaces`]: Space CRUD, groups, cascade delete
//! - [`topics`]: Topic CRUD, cascade delete
//! - [`flashcards`]: Card create/edit/delete and topic loading with migration
//! - [`ordering`]: `idOrder` maintenance, drag reorders under a status filter
//! - [`status`]: Status changes and success-average aggregation
//! - [`canvas`]: Topic positions and drag release
//! - [`import`]: Bulk JSON import

use serde::Serialize;

pub mod canvas;
pub mod flashcards;
pub mod import;
pub mod ordering;
pub mod spaces;
pub mod status;
pub mod topics;

/// Counts of documents removed by a cascade delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CascadeReport {
    pub spaces: usize,
    pub topics: usize,
    pub flashcards: usize,
}

impl CascadeReport {
    pub fn absorb(&mut self, other: CascadeReport) {
        self.spaces += other.spaces;
        self.topics += other.topics;
        self.flashcards += other.flashcards;
    }
}
