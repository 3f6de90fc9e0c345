//! Shared types used across the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mutating operations that must pass the ownership guard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    Create,
    Update,
    Delete,
    /// Owner-only read views (orders, overview)
    View,
}

/// Store-scoped resource kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Store,
    Billboard,
    Category,
    Size,
    Color,
    Product,
    Order,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::View => "view",
        };
        f.write_str(name)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Store => "store",
            EntityKind::Billboard => "billboard",
            EntityKind::Category => "category",
            EntityKind::Size => "size",
            EntityKind::Color => "color",
            EntityKind::Product => "product",
            EntityKind::Order => "order",
        };
        f.write_str(name)
    }
}
