//! # Identifiers
//!
//! All ids are opaque strings. Each entity gets its own newtype so a
//! `ThreadId` can never be handed to a category lookup by mistake.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self(raw.to_string())
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self(raw)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Identifies a [`crate::Server`].
    ServerId
);
string_id!(
    /// Identifies a [`crate::Category`].
    CategoryId
);
string_id!(
    /// Identifies a [`crate::Thread`].
    ThreadId
);
string_id!(
    /// Identifies a [`crate::Post`].
    PostId
);
string_id!(
    /// Identifies a [`crate::User`].
    UserId
);

/// The entity families held by the forum store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Server,
    Category,
    Thread,
    Post,
    User,
}

impl EntityKind {
    /// Prefix used when generating ids for this kind (`thread-<ts>-<rand>`).
    pub fn id_prefix(self) -> &'static str {
        match self {
            EntityKind::Server => "server",
            EntityKind::Category => "category",
            EntityKind::Thread => "thread",
            EntityKind::Post => "post",
            EntityKind::User => "user",
        }
    }

    fn plural(self) -> &'static str {
        match self {
            EntityKind::Server => "servers",
            EntityKind::Category => "categories",
            EntityKind::Thread => "threads",
            EntityKind::Post => "posts",
            EntityKind::User => "users",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id_prefix())
    }
}

/// A count of dependent children, rendered as "1 category" / "3 threads".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildCount {
    pub kind: EntityKind,
    pub count: usize,
}

impl fmt::Display for ChildCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 1 {
            write!(f, "1 {}", self.kind)
        } else {
            write!(f, "{} {}", self.count, self.kind.plural())
        }
    }
}
