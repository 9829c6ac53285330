//! Customer orders.
//!
//! Orders have no fixed schema beyond the bookkeeping fields this layer
//! adds: callers supply arbitrary JSON fields (customer name, phone, cart
//! lines, ...) which are carried through verbatim via a flattened map.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::id;

/// Status a freshly created order always starts in.
pub const PENDING: &str = "pending";

/// Keys owned by the persistence layer; caller-supplied fields may not
/// shadow them.
const RESERVED_KEYS: [&str; 3] = ["id", "createdAt", "updatedAt"];

/// A customer order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Opaque identifier, immutable once assigned.
    pub id: String,
    /// Free-form status string; `"pending"` on creation.
    pub status: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Caller-supplied fields, passed through untouched.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Partial order update: a shallow merge of arbitrary JSON fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct OrderPatch(pub Map<String, Value>);

impl Order {
    /// Create a new pending order from caller-supplied fields.
    ///
    /// Reserved bookkeeping keys and any caller-supplied `status` are
    /// stripped from the field map; status always starts as `"pending"`.
    #[must_use]
    pub fn new(mut fields: Map<String, Value>) -> Self {
        for key in RESERVED_KEYS {
            fields.remove(key);
        }
        fields.remove("status");

        Self {
            id: id::generate(),
            status: PENDING.to_string(),
            created_at: Utc::now(),
            updated_at: None,
            fields,
        }
    }

    /// Shallow-merge a patch over this order and stamp `updated_at`.
    ///
    /// A `status` key in the patch replaces the order status (free-form
    /// string); the identifier and creation time are immutable.
    pub fn apply(&mut self, patch: OrderPatch) {
        for (key, value) in patch.into_fields() {
            if key == "status" {
                if let Value::String(status) = value {
                    self.status = status;
                }
            } else {
                self.fields.insert(key, value);
            }
        }
        self.updated_at = Some(Utc::now());
    }
}

impl OrderPatch {
    /// The field assignments this patch makes.
    ///
    /// Bookkeeping keys are stripped and a non-string `status` value is
    /// dropped rather than applied. Both storage backends merge exactly
    /// this set of fields.
    #[must_use]
    pub fn into_fields(self) -> Map<String, Value> {
        let Self(mut fields) = self;
        for key in RESERVED_KEYS {
            fields.remove(key);
        }
        if let Some(status) = fields.get("status") {
            if !status.is_string() {
                fields.remove("status");
            }
        }
        fields
    }
}
