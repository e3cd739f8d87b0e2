// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Foreman Contributors

//! Typed entity identifiers.
//!
//! Every persisted entity is keyed by a UUID v4 in string form. The
//! [`define_id!`] macro generates a transparent newtype per entity so a
//! `TaskId` cannot be passed where a `StepId` is expected.

/// Returns a string slice truncated to at most `n` characters.
pub fn short(s: &str, n: usize) -> &str {
    if s.len() <= n {
        s
    } else {
        &s[..n]
    }
}

/// Define a newtype ID wrapper around a UUID v4 string.
///
/// Generates `new()` for random generation, `from_string()`, `as_str()`,
/// `short()`, `Display`, `From<String>`, `From<&str>`, `PartialEq<&str>`,
/// and `Borrow<str>` implementations.
#[macro_export]
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        pub struct $name:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Generate a new random v4 ID.
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            pub fn from_string(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// First `n` characters, for branch names and log lines.
            pub fn short(&self, n: usize) -> &str {
                $crate::id::short(&self.0, n)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id! {
    /// Project identifier.
    pub struct ProjectId;
}

define_id! {
    /// Workflow step identifier.
    pub struct StepId;
}

define_id! {
    /// Task identifier.
    pub struct TaskId;
}

define_id! {
    /// Comment identifier.
    pub struct CommentId;
}

define_id! {
    /// Agent run identifier.
    pub struct RunId;
}

define_id! {
    /// Task dependency edge identifier.
    pub struct DependencyId;
}

define_id! {
    /// Event row identifier.
    pub struct EventId;
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
