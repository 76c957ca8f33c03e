//! # Concentrated-Liquidity Pool Engine
//!
//! ## Purpose
//!
//! Pure, deterministic pricing and accounting core for concentrated-
//! liquidity pools: how many pool shares to mint for a deposit, how much
//! of each asset a swap yields, and how trading fees split between
//! liquidity providers and the protocol. All arithmetic is fixed-point
//! `u128` at SCALE = 1e9 with zero floating point.
//!
//! ## Integration Points
//!
//! - **Input Sources**: validated deposit/withdrawal amounts and actual
//!   asset holdings from the external ledger collaborator; fee caps and
//!   verification class from `clamm-config`
//! - **Output Destinations**: successor [`PoolState`] values and payout
//!   amounts for the ledger collaborator to persist and execute
//! - **Precision**: every operation rounds divisions toward zero, so
//!   payouts never exceed the exact curve value
//!
//! ## Architecture Role
//!
//! Every operation is a total function `(state, inputs) ->
//! Result<(state', outputs)>`: it either returns a fully-formed
//! successor state or an error with no partial mutation. Transaction
//! construction, on-ledger storage and transfer execution live in the
//! ledger collaborator, not here. One logical operation mutates a given
//! pool at a time; independent pools share no state (see [`PoolArena`]).

pub mod arena;
pub mod error;
pub mod guard;
pub mod liquidity;
pub mod pricing;
pub mod state;
pub mod swap;

pub use arena::{PoolArena, PoolHandle};
pub use error::PoolError;
pub use guard::{check_balances, ActualHoldings};
pub use liquidity::{
    add_liquidity, distribute_excess_assets, remove_liquidity, remove_liquidity_admin,
    DISTRIBUTE_ALL,
};
pub use state::{AssetSide, PoolState, PoolStatus};
pub use swap::swap;

pub use clamm_math::SCALE;
