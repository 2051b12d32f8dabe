//! Per-collection repositories.
//!
//! One repository per collection, each a thin, `Clone`-able wrapper over the
//! shared [`CmsClient`](crate::client::CmsClient). Default list queries
//! exclude soft-deleted rows; `include_deleted` widens them.

pub mod expo;
pub mod kalender;
pub mod kontak;
pub mod konten;
pub mod lomba;
pub mod pendaftaran_expo;
pub mod pendaftaran_lomba;
pub mod prestasi;

pub use expo::{ExpoListParams, ExpoRepository};
pub use kalender::KalenderRepository;
pub use kontak::{KontakListParams, KontakRepository};
pub use konten::KontenRepository;
pub use lomba::{LombaListParams, LombaRepository};
pub use pendaftaran_expo::PendaftaranExpoRepository;
pub use pendaftaran_lomba::PendaftaranLombaRepository;
pub use prestasi::{PrestasiListParams, PrestasiRepository};

use crate::query::Filter;

/// Default page size for list queries.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Filter matching rows that are not soft-deleted. `_neq true` also matches
/// rows where the flag was never set.
pub(crate) fn not_deleted() -> Filter {
    Filter::neq("is_deleted", true)
}

/// Translate 1-based page/limit into a row offset.
pub(crate) const fn page_offset(page: u32, limit: u32) -> u32 {
    page.saturating_sub(1).saturating_mul(limit)
}
