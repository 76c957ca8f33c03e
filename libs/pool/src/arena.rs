//! Pool arena: explicit handles instead of global pool state
//!
//! Each pool is an independent value addressed by a [`PoolHandle`].
//! The arena owns the states; engine operations stay pure and the
//! caller commits a successor state back under the same handle.

use clamm_config::PoolConfig;
use serde::{Deserialize, Serialize};

use crate::error::PoolError;
use crate::state::PoolState;

/// Opaque index of a pool within a [`PoolArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolHandle(usize);

/// Owns the states of many independent pools.
#[derive(Debug, Default)]
pub struct PoolArena {
    pools: Vec<PoolState>,
}

impl PoolArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bootstrap a new pool from configuration and return its handle.
    pub fn create(&mut self, config: &PoolConfig) -> Result<PoolHandle, PoolError> {
        let state = PoolState::bootstrap(config)?;
        self.pools.push(state);
        Ok(PoolHandle(self.pools.len() - 1))
    }

    pub fn get(&self, handle: PoolHandle) -> Option<&PoolState> {
        self.pools.get(handle.0)
    }

    /// Commit a successor state produced by an engine operation.
    pub fn commit(&mut self, handle: PoolHandle, state: PoolState) -> Result<(), PoolError> {
        state.check_invariants()?;
        match self.pools.get_mut(handle.0) {
            Some(slot) => {
                *slot = state;
                Ok(())
            }
            None => Err(PoolError::InvariantViolated("unknown pool handle")),
        }
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}
