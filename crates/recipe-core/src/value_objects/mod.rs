//! Value objects - immutable types that represent domain concepts

mod reaction;
mod relative_time;
mod role;
mod snowflake;

pub use reaction::{CounterDelta, ReactionKind, ReactionState, ReactionTransition, StoreMutation};
pub use relative_time::relative_time;
pub use role::UserRole;
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
