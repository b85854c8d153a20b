mod helpers;
mod state;
mod types;
mod view;


use serde::{de::DeserializeOwned, Serialize};

use crate::session::UserId;

pub use types::{ReadOutcome, ViewEvent, ViewPhase, ViewSnapshot};
pub use view::CollectionView;

pub type RecordId = i64;

/// Endpoint layout and field schema of one server-held collection.
pub trait Collection {
    type Record: DeserializeOwned + Serialize + Clone + Send + Sync + 'static;
    type Draft: Serialize + Sync;

    const NAME: &'static str;
    const LIST_PATH: &'static str;
    const SEARCH_PATH: Option<&'static str>;
    const CREATE_PATH: &'static str;
    /// Field of the create response carrying the assigned id.
    const CREATED_ID_FIELD: &'static str;
    const DELETE_PATH: &'static str;
    const DELETE_ID_PARAM: &'static str;
    const DELETE_SENDS_USER: bool;

    const LIST_FAILED: &'static str;
    const SEARCH_FAILED: &'static str = "Search failed";
    const CREATE_FAILED: &'static str;
    const DELETE_FAILED: &'static str;

    fn record_id(record: &Self::Record) -> RecordId;

    /// Owner carried on the record itself, if the server includes one.
    fn record_owner(_record: &Self::Record) -> Option<UserId> {
        None
    }
}
