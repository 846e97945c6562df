//! Per-shape quad stores.
//!
//! Each store indexes every quad it is informed of under the projection of
//! its one shape. The map logic lives in [`StoreState`]; [`ShapeStore`]
//! wraps it in a dedicated worker thread behind a bounded mailbox so the
//! map is only ever touched by its owner.

mod actor;
mod state;

pub use actor::{ShapeStore, StoreConfig, StoreHandle};
pub use state::{MissPolicy, Retrieval, StoreState};
