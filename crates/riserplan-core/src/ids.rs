//! Task id scheme
//!
//! Ids are stable across invocations so a UI can address individual tasks
//! in a [`DurationOverrides`](crate::DurationOverrides) map. Every id the
//! builder emits comes from here.

use crate::{RiserId, TaskId, TaskKind};

/// Site preparation and tenant notices
pub const PREP: &str = "common-prep";

/// Shared basement works
pub const BASEMENT: &str = "common-basement";

/// Shared heat node works
pub const HEAT_NODE: &str = "common-node";

/// Global contingency buffer
pub const BUFFER: &str = "buffer-global";

/// Riser id for entrance `entrance` (1-based) and riser `riser` (1-based)
pub fn riser(entrance: u32, riser: u32) -> RiserId {
    format!("K{}-P{}", entrance, riser)
}

/// Id of a per-riser task, e.g. `install-K1-P2`
pub fn riser_task(kind: TaskKind, riser_id: &str) -> TaskId {
    format!("{}-{}", kind.as_str(), riser_id)
}
