//! Chooses the freshest usable notification state.
//!
//! Precedence is strict: live watcher state, then the persisted snapshot
//! (including the zero state when no snapshot exists), then [`Resolution::Offline`].
//! The tiers are never merged.

use tracing::{debug, warn};

use crate::source::StateSource;
use crate::state::NotificationState;
use crate::store::StateStore;

/// Outcome of state resolution for a single invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// State reported by the running watcher.
    Live(NotificationState),
    /// State read from the persisted snapshot.
    Persisted(NotificationState),
    /// Neither the watcher nor the snapshot produced usable state.
    Offline,
}

impl Resolution {
    /// The resolved state, unless offline.
    #[must_use]
    pub const fn state(&self) -> Option<&NotificationState> {
        match self {
            Self::Live(state) | Self::Persisted(state) => Some(state),
            Self::Offline => None,
        }
    }

    /// Short label naming the tier that produced this resolution.
    #[must_use]
    pub const fn tier(&self) -> &'static str {
        match self {
            Self::Live(_) => "live",
            Self::Persisted(_) => "persisted",
            Self::Offline => "offline",
        }
    }
}

/// Resolves state from `source`, falling back to `store`.
///
/// Each tier is attempted once; there are no retries.
pub fn resolve<S>(source: &S, store: &StateStore) -> Resolution
where
    S: StateSource + ?Sized,
{
    let resolution = match source.fetch() {
        Ok(state) => Resolution::Live(state),
        Err(reason) => {
            debug!(target: "teams_bar::resolver", %reason, "live state unavailable");
            match store.load() {
                Ok(state) => Resolution::Persisted(state),
                Err(error) => {
                    warn!(target: "teams_bar::resolver", %error, "persisted state unusable");
                    Resolution::Offline
                }
            }
        }
    };
    debug!(target: "teams_bar::resolver", tier = resolution.tier(), "state resolved");
    resolution
}
