use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::protocol::ListQuery;

/// Completion-status view filter. String forms (`all`, `active`,
/// `completed`) match what the filter dropdown and the CLI accept.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    /// Tri-state mapping used for the `completed` query parameter:
    /// `All` imposes no constraint at all.
    pub fn as_completed(self) -> Option<bool> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Active => Some(false),
            StatusFilter::Completed => Some(true),
        }
    }
}

/// The pair of view filters that fully determines the next fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub search: String,
    pub status: StatusFilter,
}

impl FilterState {
    /// True when either filter constrains the list, which is what decides
    /// between the "no tasks yet" and "no matching tasks" empty views.
    pub fn is_active(&self) -> bool {
        !self.search.is_empty() || self.status != StatusFilter::All
    }

    pub fn to_query(&self) -> ListQuery {
        compose(&self.search, self.status)
    }
}

/// Map `(search, status)` to remote list parameters. Inactive filters are
/// omitted entirely rather than sent empty: the service reads parameter
/// absence as "no constraint".
pub fn compose(search: &str, status: StatusFilter) -> ListQuery {
    ListQuery {
        search: (!search.is_empty()).then(|| search.to_string()),
        completed: status.as_completed(),
    }
}
