mod election_state;
mod leader_state;
mod state_change_listener;
pub(crate) mod timers;

pub(crate) use election_state::ElectionConfig;
pub(crate) use election_state::ElectionState;
pub(crate) use leader_state::LeaderStateTracker;
pub use state_change_listener::Role;
pub use state_change_listener::RoleSnapshot;
pub use state_change_listener::RoleStateListener;
