//! **turnpath-core** — map-side types for the *turnpath* engine.
//!
//! This crate provides the collaborators the path-finding engine consumes:
//! geometry primitives, 8-way directions, per-player tile knowledge, the
//! [`TileMap`] service trait and [`Board`], a dense reference map.

pub mod board;
pub mod geom;
pub mod map;

pub use board::{Board, TileInfo};
pub use geom::{Direction, Point, Range, RangeIter};
pub use map::{Known, PlayerId, TileMap};
