pub mod expiry;
pub mod types;

use crate::collection::{Collection, RecordId};
use crate::session::UserId;

pub use expiry::ExpiryStatus;
pub use types::{ItemForm, NewPantryItem, PantryItem};

pub struct PantryItems;

impl Collection for PantryItems {
    type Record = PantryItem;
    type Draft = NewPantryItem;

    const NAME: &'static str = "pantry_items";
    const LIST_PATH: &'static str = "/backend/get_pantry_items_by_user";
    const SEARCH_PATH: Option<&'static str> = Some("/backend/search_pantry_item_by_name");
    const CREATE_PATH: &'static str = "/backend/add_pantry_item";
    const CREATED_ID_FIELD: &'static str = "item_id";
    const DELETE_PATH: &'static str = "/backend/delete_pantry_item";
    const DELETE_ID_PARAM: &'static str = "item_id";
    const DELETE_SENDS_USER: bool = true;

    const LIST_FAILED: &'static str = "Failed to fetch items";
    const SEARCH_FAILED: &'static str = "Failed to search items";
    const CREATE_FAILED: &'static str = "Error adding item";
    const DELETE_FAILED: &'static str = "Failed to delete the item";

    fn record_id(record: &PantryItem) -> RecordId {
        record.id
    }

    fn record_owner(record: &PantryItem) -> Option<UserId> {
        record.user_id
    }
}
