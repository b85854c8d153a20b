use serde::{Deserialize, Serialize};
use time::Date;

use crate::collection::RecordId;
use crate::error::SyncError;
use crate::session::UserId;

use super::expiry::{classify, normalize_expiry, ExpiryStatus};

const DEFAULT_QUANTITY: i64 = 1;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PantryItem {
    pub id: RecordId,
    pub name: String,
    /// Search responses omit the quantity.
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub expiry_date: Option<String>,
    /// Only search responses carry the owner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
}

impl PantryItem {
    pub fn expiry_status(&self, today: Date, soon_days: i64) -> ExpiryStatus {
        classify(self.expiry_date.as_deref(), today, soon_days)
    }
}

/// Raw text fields as typed into the add-item form.
#[derive(Debug, Clone, Default)]
pub struct ItemForm {
    pub name: String,
    pub expiry_date: String,
    pub quantity: String,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct NewPantryItem {
    pub name: String,
    pub expiry_date: Option<String>,
    pub quantity: i64,
}

impl NewPantryItem {
    pub fn from_form(form: &ItemForm) -> Result<Self, SyncError> {
        let name = form.name.trim();
        if name.is_empty() {
            return Err(SyncError::invalid_input("Enter an item name to continue."));
        }

        let raw_quantity = form.quantity.trim();
        let quantity = if raw_quantity.is_empty() {
            DEFAULT_QUANTITY
        } else {
            raw_quantity
                .parse::<i64>()
                .ok()
                .filter(|q| *q >= 1)
                .ok_or_else(|| {
                    SyncError::invalid_input(format!(
                        "Quantity must be a whole number of at least 1, got '{raw_quantity}'."
                    ))
                })?
        };

        Ok(Self {
            name: name.to_string(),
            expiry_date: normalize_expiry(&form.expiry_date),
            quantity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyncErrorCode;
    use serde_json::json;

    fn form(name: &str, expiry: &str, quantity: &str) -> ItemForm {
        ItemForm {
            name: name.to_string(),
            expiry_date: expiry.to_string(),
            quantity: quantity.to_string(),
        }
    }

    #[test]
    fn builds_item_from_form_input() {
        let item = NewPantryItem::from_form(&form("  Milk ", "2024/05/01", "2")).unwrap();
        assert_eq!(item.name, "Milk");
        assert_eq!(item.expiry_date.as_deref(), Some("2024-05-01"));
        assert_eq!(item.quantity, 2);
    }

    #[test]
    fn blank_quantity_defaults_to_one() {
        let item = NewPantryItem::from_form(&form("Rice", "", " ")).unwrap();
        assert_eq!(item.quantity, 1);
        assert_eq!(item.expiry_date, None);
    }

    #[test]
    fn rejects_missing_name_and_bad_quantity() {
        let err = NewPantryItem::from_form(&form(" ", "", "1")).unwrap_err();
        assert_eq!(err.code, SyncErrorCode::InvalidInput);
        let err = NewPantryItem::from_form(&form("Eggs", "", "a dozen")).unwrap_err();
        assert_eq!(err.code, SyncErrorCode::InvalidInput);
        assert!(NewPantryItem::from_form(&form("Eggs", "", "0")).is_err());
    }

    #[test]
    fn draft_always_carries_expiry_key() {
        let item = NewPantryItem::from_form(&form("Salt", "", "")).unwrap();
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(
            value,
            json!({"name": "Salt", "expiry_date": null, "quantity": 1})
        );
    }

    #[test]
    fn decodes_list_and_search_shapes() {
        let listed: PantryItem = serde_json::from_value(json!({
            "id": 3, "name": "Flour", "expiry_date": "2025-01-31", "quantity": 4
        }))
        .unwrap();
        assert_eq!(listed.quantity, Some(4));
        assert_eq!(listed.user_id, None);

        let searched: PantryItem = serde_json::from_value(json!({
            "id": 3, "name": "Flour", "expiry_date": "2025-01-31", "user_id": 9
        }))
        .unwrap();
        assert_eq!(searched.quantity, None);
        assert_eq!(searched.user_id, Some(UserId(9)));
    }
}
