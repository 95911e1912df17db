//! Open leads pool: who may grab what, and the grab/release workflow over a lead store.

mod gate;
mod pool;

pub use gate::{
    check_cooldown, days_remaining, partition, CooldownConfig, HeldLeadPolicy, PoolPartition,
};
pub use leadpool_types::PoolError;
pub use pool::ReassignmentPool;
