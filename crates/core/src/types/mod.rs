//! Domain types for catalog and order data.
//!
//! All types serialize to the camelCase JSON wire format the admin panel
//! expects, and the same shape is what both storage backends persist.

pub mod category;
pub mod order;
pub mod product;
pub mod settings;
pub mod status;

pub use category::Category;
pub use order::{Order, OrderPatch};
pub use product::{Product, ProductDraft, ProductPatch};
pub use settings::{DeliveryZone, SettingsPatch, StoreSettings};
pub use status::Status;
