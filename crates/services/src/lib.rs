//! # services
//!
//! The forum content core: an owned entity store plus the pure components it
//! consults on every mutation.
//!
//! ```text
//! intent ─▶ guard (permissions, referential rules)
//!        ─▶ store (apply atomically)
//!        ─▶ aggregate (recompute affected category)
//!        ─▶ outbox (fire-and-forget persistence)
//! ```

pub mod aggregate;
pub mod clock;
pub mod guard;
pub mod ids;
pub mod moderation;
pub mod persistence;
pub mod search;
pub mod store;
pub mod validation;

pub use clock::{ManualClock, SystemClock};
pub use moderation::{prepare_reply, LikeOutcome, ThreadFlag};
pub use persistence::{spawn_persistence, Outbox};
pub use search::{EmptyQuery, SearchRequest, SearchScope, StatusFilter};
pub use store::{ForumStore, PostRemoval, StoreOptions};
