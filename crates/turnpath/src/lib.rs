//! **turnpath** — lazy, turn-aware path-finding for grid strategy games.
//!
//! A [`PathFinder`] runs a resumable Dijkstra search from one start tile.
//! Costs are counted in move fragments and folded into turns: an agent
//! regains `move_rate` fragments every turn, and a step never costs more
//! than what is left of the current turn. Queries expand the frontier only
//! as far as needed to answer them.
//!
//! The engine variant is chosen from the callbacks installed on
//! [`SearchParameters`]:
//!
//! | Callback | Mode | Extra rule |
//! |---|---|---|
//! | none of the below | [`SearchMode::Normal`] | |
//! | `is_dangerous` | [`SearchMode::Danger`] | no turn may end on a dangerous tile |
//! | `fuel_distance` | [`SearchMode::Fuel`] | fuel must last to a refuel point |
//! | `combined_cost` | [`SearchMode::Jumbo`] | the callback prices every edge |
//!
//! [`ReverseMap`] wraps one search per agent kind to answer cost-to-target
//! queries.

mod danger;
mod error;
mod fuel;
mod jumbo;
mod node;
mod normal;
mod params;
mod pathfinder;
mod position;
mod queue;
mod reverse;

pub use error::{ParameterError, PathError};
pub use node::NodeStatus;
pub use params::{
    AgentFlags, CombinedCostFn, DangerFn, Edge, ExtraCostFn, FuelDistanceFn, IMPOSSIBLE_MC,
    InvasionFn, MoveCostFn, MovementProfile, SearchMode, SearchParameters, TURN_FACTOR,
    TileBehavior, TileBehaviorFn, ZocFn,
};
pub use pathfinder::{PathFinder, Tiles};
pub use position::{Path, Position};
pub use reverse::{AgentKind, ReverseMap};
