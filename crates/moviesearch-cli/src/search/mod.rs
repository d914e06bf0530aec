//! Search coordination: turns user input into keyed, de-duplicated fetches
//! and maps fetch outcomes onto render state.

mod coordinator;
mod effect;

pub use coordinator::{MAX_PAGE, RenderState, SearchCoordinator};
pub use effect::{Effect, Notification, NotificationLevel, QueryKey};
