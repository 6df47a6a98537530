//! Search parameters: the agent's movement profile plus the rule callbacks.

use std::fmt;

use turnpath_core::{Direction, Known, PlayerId, Point};

/// Cost sentinel meaning "this move (or tile) is impossible".
///
/// Callbacks return it to reject a move; queries return it for tiles the
/// search cannot reach.
pub const IMPOSSIBLE_MC: i32 = -1;

/// Weight of one movement fragment against one unit of extra cost when both
/// are folded into a single queue priority.
pub const TURN_FACTOR: i64 = 100;

/// How the engine treats a tile, as decided by the tile-behavior callback.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TileBehavior {
    #[default]
    Normal,
    /// Never enter the tile.
    Ignore,
    /// The tile may be entered but the search never continues from it.
    DontLeave,
}

/// Unit capabilities relevant to fuel-limited attacks.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentFlags {
    /// The agent is destroyed by its own attack, so it never needs fuel to
    /// come back.
    pub missile: bool,
    /// The agent's attack ends its move; it may attack unless it is in the
    /// last turn of its fuel.
    pub one_attack: bool,
}

/// The numeric part of a search configuration.
///
/// All movement quantities are in move fragments: a unit with
/// `move_rate = 9` and `single_move = 3` has three whole moves per turn.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "ProfileRecord"))]
pub struct MovementProfile {
    /// Move fragments regained at the start of every turn.
    pub move_rate: i32,
    /// Move fragments available right now. May exceed `move_rate`.
    pub moves_left_initially: i32,
    /// Fuel capacity in turns (only used in fuel mode).
    pub fuel: i32,
    pub fuel_left_initially: i32,
    /// Fragments in one whole move.
    pub single_move: i32,
    /// Cost charged for entering a tile the owner has never seen.
    pub unknown_move_cost: i32,
    /// Ignore the owner's map knowledge and treat every tile as seen.
    pub omniscience: bool,
    pub flags: AgentFlags,
}

impl MovementProfile {
    /// A profile with full moves, one turn of fuel and unit-sized moves.
    pub const fn new(move_rate: i32) -> Self {
        Self {
            move_rate,
            moves_left_initially: move_rate,
            fuel: 1,
            fuel_left_initially: 1,
            single_move: 1,
            unknown_move_cost: move_rate,
            omniscience: false,
            flags: AgentFlags {
                missile: false,
                one_attack: false,
            },
        }
    }
}

impl Default for MovementProfile {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Serialized form of [`MovementProfile`]. Only `move_rate` is required;
/// missing fields get the values [`MovementProfile::new`] gives them.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct ProfileRecord {
    move_rate: i32,
    moves_left_initially: Option<i32>,
    fuel: Option<i32>,
    fuel_left_initially: Option<i32>,
    single_move: Option<i32>,
    unknown_move_cost: Option<i32>,
    #[serde(default)]
    omniscience: bool,
    #[serde(default)]
    flags: AgentFlags,
}

#[cfg(feature = "serde")]
impl From<ProfileRecord> for MovementProfile {
    fn from(r: ProfileRecord) -> Self {
        let base = Self::new(r.move_rate);
        Self {
            move_rate: r.move_rate,
            moves_left_initially: r.moves_left_initially.unwrap_or(base.moves_left_initially),
            fuel: r.fuel.unwrap_or(base.fuel),
            fuel_left_initially: r.fuel_left_initially.unwrap_or(base.fuel_left_initially),
            single_move: r.single_move.unwrap_or(base.single_move),
            unknown_move_cost: r.unknown_move_cost.unwrap_or(base.unknown_move_cost),
            omniscience: r.omniscience,
            flags: r.flags,
        }
    }
}

/// One candidate edge handed to a combined-cost callback.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    pub from: Point,
    pub dir: Direction,
    pub to: Point,
    /// Accumulated cost at `from`, in the engine's internal convention.
    pub from_cost: i32,
    pub from_extra: u32,
}

/// Cost of the step `from --dir--> to`, or [`IMPOSSIBLE_MC`].
pub type MoveCostFn<'a> = Box<dyn Fn(Point, Direction, Point, &SearchParameters<'a>) -> i32 + 'a>;

/// Prices an [`Edge`] and updates the destination's cost and extra cost in
/// place when it found a better route. Returns the queue priority of the
/// destination, or a negative value to reject the edge. The destination
/// cost is [`IMPOSSIBLE_MC`] until the tile is first reached.
pub type CombinedCostFn<'a> =
    Box<dyn Fn(&Edge, &mut i32, &mut u32, &SearchParameters<'a>) -> i32 + 'a>;

pub type TileBehaviorFn<'a> = Box<dyn Fn(Point, Known, &SearchParameters<'a>) -> TileBehavior + 'a>;

/// Whether the player holds zone of control over the tile.
pub type ZocFn<'a> = Box<dyn Fn(PlayerId, Point) -> bool + 'a>;

pub type ExtraCostFn<'a> = Box<dyn Fn(Point, Known, &SearchParameters<'a>) -> u32 + 'a>;

/// Whether an agent must not end its turn on the tile.
pub type DangerFn<'a> = Box<dyn Fn(Point, Known, &SearchParameters<'a>) -> bool + 'a>;

/// Minimum move fragments needed from the tile to the nearest refuel
/// point: 0 on a refuel point, [`IMPOSSIBLE_MC`] when none is in range.
pub type FuelDistanceFn<'a> = Box<dyn Fn(Point, Known, &SearchParameters<'a>) -> i32 + 'a>;

/// Whether the player may enter the tile at all (borders, treaties).
pub type InvasionFn<'a> = Box<dyn Fn(PlayerId, Point) -> bool + 'a>;

/// Which engine variant a set of parameters selects.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SearchMode {
    Normal,
    Danger,
    Fuel,
    Jumbo,
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchMode::Normal => "normal",
            SearchMode::Danger => "danger",
            SearchMode::Fuel => "fuel",
            SearchMode::Jumbo => "jumbo",
        };
        f.write_str(name)
    }
}

/// Immutable configuration of one search.
///
/// Build it with [`SearchParameters::new`] and the `with_*` setters; the
/// callbacks may borrow caller data for `'a`.
pub struct SearchParameters<'a> {
    pub start_tile: Point,
    pub owner: PlayerId,
    pub move_rate: i32,
    pub moves_left_initially: i32,
    pub fuel: i32,
    pub fuel_left_initially: i32,
    pub single_move: i32,
    pub unknown_move_cost: i32,
    pub omniscience: bool,
    pub flags: AgentFlags,

    pub move_cost: Option<MoveCostFn<'a>>,
    pub combined_cost: Option<CombinedCostFn<'a>>,
    pub tile_behavior: Option<TileBehaviorFn<'a>>,
    pub zoc: Option<ZocFn<'a>>,
    pub extra_cost: Option<ExtraCostFn<'a>>,
    pub is_dangerous: Option<DangerFn<'a>>,
    pub fuel_distance: Option<FuelDistanceFn<'a>>,
    pub can_invade: Option<InvasionFn<'a>>,
}

impl<'a> SearchParameters<'a> {
    /// Parameters for an agent of `owner` at `start_tile` with no callbacks.
    pub fn new(start_tile: Point, owner: PlayerId, profile: &MovementProfile) -> Self {
        Self {
            start_tile,
            owner,
            move_rate: profile.move_rate,
            moves_left_initially: profile.moves_left_initially,
            fuel: profile.fuel,
            fuel_left_initially: profile.fuel_left_initially,
            single_move: profile.single_move,
            unknown_move_cost: profile.unknown_move_cost,
            omniscience: profile.omniscience,
            flags: profile.flags,
            move_cost: None,
            combined_cost: None,
            tile_behavior: None,
            zoc: None,
            extra_cost: None,
            is_dangerous: None,
            fuel_distance: None,
            can_invade: None,
        }
    }

    /// The numeric part of these parameters.
    pub fn profile(&self) -> MovementProfile {
        MovementProfile {
            move_rate: self.move_rate,
            moves_left_initially: self.moves_left_initially,
            fuel: self.fuel,
            fuel_left_initially: self.fuel_left_initially,
            single_move: self.single_move,
            unknown_move_cost: self.unknown_move_cost,
            omniscience: self.omniscience,
            flags: self.flags,
        }
    }

    pub fn with_move_cost(
        mut self,
        f: impl Fn(Point, Direction, Point, &SearchParameters<'a>) -> i32 + 'a,
    ) -> Self {
        self.move_cost = Some(Box::new(f));
        self
    }

    pub fn with_combined_cost(
        mut self,
        f: impl Fn(&Edge, &mut i32, &mut u32, &SearchParameters<'a>) -> i32 + 'a,
    ) -> Self {
        self.combined_cost = Some(Box::new(f));
        self
    }

    pub fn with_tile_behavior(
        mut self,
        f: impl Fn(Point, Known, &SearchParameters<'a>) -> TileBehavior + 'a,
    ) -> Self {
        self.tile_behavior = Some(Box::new(f));
        self
    }

    pub fn with_zoc(mut self, f: impl Fn(PlayerId, Point) -> bool + 'a) -> Self {
        self.zoc = Some(Box::new(f));
        self
    }

    pub fn with_extra_cost(
        mut self,
        f: impl Fn(Point, Known, &SearchParameters<'a>) -> u32 + 'a,
    ) -> Self {
        self.extra_cost = Some(Box::new(f));
        self
    }

    pub fn with_danger(
        mut self,
        f: impl Fn(Point, Known, &SearchParameters<'a>) -> bool + 'a,
    ) -> Self {
        self.is_dangerous = Some(Box::new(f));
        self
    }

    pub fn with_fuel_distance(
        mut self,
        f: impl Fn(Point, Known, &SearchParameters<'a>) -> i32 + 'a,
    ) -> Self {
        self.fuel_distance = Some(Box::new(f));
        self
    }

    pub fn with_invasion(mut self, f: impl Fn(PlayerId, Point) -> bool + 'a) -> Self {
        self.can_invade = Some(Box::new(f));
        self
    }

    /// The engine variant these parameters select.
    ///
    /// A combined-cost callback overrides everything else. Danger and fuel
    /// cannot be combined; when both are present danger wins.
    pub fn mode(&self) -> SearchMode {
        if self.combined_cost.is_some() {
            SearchMode::Jumbo
        } else if self.is_dangerous.is_some() {
            SearchMode::Danger
        } else if self.fuel_distance.is_some() {
            SearchMode::Fuel
        } else {
            SearchMode::Normal
        }
    }

    // -----------------------------------------------------------------------
    // Cost arithmetic
    // -----------------------------------------------------------------------

    /// Internal cost of the start tile. Zero when the agent has full moves;
    /// negative when it starts with banked moves above its move rate.
    #[inline]
    pub fn start_cost(&self) -> i32 {
        self.move_rate - self.moves_left_initially
    }

    /// Turn in which an internal cost is reached (0 is the current turn).
    #[inline]
    pub fn turns(&self, cost: i32) -> i32 {
        if cost < 0 { 0 } else { cost / self.move_rate }
    }

    /// Move fragments left in the turn after reaching an internal cost.
    #[inline]
    pub fn moves_left(&self, cost: i32) -> i32 {
        if cost < 0 {
            self.move_rate - cost
        } else {
            self.move_rate - cost % self.move_rate
        }
    }

    /// Queue priority of a route: turn-weighted cost plus extra cost.
    #[inline]
    pub fn total_cc(&self, cost: i32, extra: u32) -> i64 {
        TURN_FACTOR * i64::from(cost) + i64::from(extra) * i64::from(self.move_rate)
    }

    /// Convert an internal cost to the move cost reported to callers.
    #[inline]
    pub fn external_cost(&self, cost: i32) -> i32 {
        cost - self.move_rate + self.moves_left_initially
    }

    /// Fuel-scaled move fragments of a fully fuelled agent.
    #[inline]
    pub fn full_fuel_moves(&self) -> i32 {
        self.fuel * self.move_rate
    }

    /// Fuel-scaled move fragments at the start of the search.
    #[inline]
    pub fn initial_fuel_moves(&self) -> i32 {
        self.moves_left_initially + (self.fuel_left_initially - 1) * self.move_rate
    }

    /// Whole turns of fuel represented by fuel-scaled moves.
    #[inline]
    pub fn fuel_turns(&self, fuel_moves: i32) -> i32 {
        if fuel_moves <= 0 {
            0
        } else {
            (fuel_moves + self.move_rate - 1) / self.move_rate
        }
    }
}

impl fmt::Debug for SearchParameters<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchParameters")
            .field("start_tile", &self.start_tile)
            .field("owner", &self.owner)
            .field("profile", &self.profile())
            .field("mode", &self.mode())
            .field("move_cost", &self.move_cost.is_some())
            .field("tile_behavior", &self.tile_behavior.is_some())
            .field("zoc", &self.zoc.is_some())
            .field("extra_cost", &self.extra_cost.is_some())
            .field("can_invade", &self.can_invade.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(move_rate: i32, moves_left: i32) -> SearchParameters<'static> {
        let mut profile = MovementProfile::new(move_rate);
        profile.moves_left_initially = moves_left;
        SearchParameters::new(Point::ZERO, PlayerId(1), &profile)
    }

    #[test]
    fn turn_arithmetic_with_full_moves() {
        let p = params(3, 3);
        assert_eq!(p.start_cost(), 0);
        assert_eq!(p.turns(0), 0);
        assert_eq!(p.moves_left(0), 3);
        assert_eq!(p.turns(2), 0);
        assert_eq!(p.moves_left(2), 1);
        assert_eq!(p.turns(3), 1);
        assert_eq!(p.moves_left(3), 3);
        assert_eq!(p.external_cost(4), 4);
    }

    #[test]
    fn banked_moves_give_negative_start_cost() {
        let p = params(3, 5);
        assert_eq!(p.start_cost(), -2);
        assert_eq!(p.turns(-2), 0);
        assert_eq!(p.moves_left(-2), 5);
        assert_eq!(p.external_cost(-2), 0);
    }

    #[test]
    fn partial_moves_shift_reported_cost() {
        let p = params(3, 1);
        assert_eq!(p.start_cost(), 2);
        assert_eq!(p.moves_left(p.start_cost()), 1);
        assert_eq!(p.external_cost(p.start_cost()), 0);
        assert_eq!(p.external_cost(3), 1);
    }

    #[test]
    fn total_cc_weights_cost_over_extra() {
        let p = params(3, 3);
        assert_eq!(p.total_cc(2, 0), 200);
        assert_eq!(p.total_cc(2, 5), 215);
        assert!(p.total_cc(1, 30) < p.total_cc(2, 0));
    }

    #[test]
    fn fuel_moves() {
        let mut p = params(3, 2);
        p.fuel = 3;
        p.fuel_left_initially = 2;
        assert_eq!(p.full_fuel_moves(), 9);
        assert_eq!(p.initial_fuel_moves(), 5);
        assert_eq!(p.fuel_turns(5), 2);
        assert_eq!(p.fuel_turns(3), 1);
        assert_eq!(p.fuel_turns(0), 0);
    }

    #[test]
    fn mode_precedence() {
        let p = params(1, 1);
        assert_eq!(p.mode(), SearchMode::Normal);
        let p = p.with_fuel_distance(|_, _, _| 0);
        assert_eq!(p.mode(), SearchMode::Fuel);
        let p = p.with_danger(|_, _, _| false);
        assert_eq!(p.mode(), SearchMode::Danger);
        let p = p.with_combined_cost(|_, _, _, _| -1);
        assert_eq!(p.mode(), SearchMode::Jumbo);
    }
}
