//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod hook_kind;
mod natural_order;
mod revision_id;
mod target_ref;
mod vcs_kind;

pub use hook_kind::HookKind;
pub use natural_order::{natural_cmp, natural_sort};
pub use revision_id::RevisionId;
pub use target_ref::{ResolvedRef, TagPattern, TargetRef};
pub use vcs_kind::VcsKind;
