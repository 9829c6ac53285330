//! Product records and their create/update semantics.
//!
//! The partial-update rules are deliberately centralized here: both storage
//! backends call [`Product::apply`] so a product merges identically no
//! matter which backend is active.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::id;
use crate::types::Status;

/// A catalog product.
///
/// `category` is a loose string reference to a [`super::Category`] id; no
/// referential integrity is enforced. `sizes` is omitted from the wire
/// format entirely when empty - absence and empty list are the same state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Opaque identifier, immutable once assigned.
    pub id: String,
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub description: String,
    /// Primary image reference; empty when the product has no images.
    #[serde(default)]
    pub image: String,
    /// Ordered image references, primary first unless set explicitly.
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizes: Option<Vec<String>>,
    #[serde(default)]
    pub status: Status,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Input for creating a product.
///
/// Fields are already parsed and validated by the HTTP layer; `images` is
/// the merged list produced by the asset lifecycle step.
#[derive(Debug, Clone, Default)]
pub struct ProductDraft {
    pub name: String,
    pub title: String,
    pub category: String,
    pub price: Decimal,
    pub stock: u32,
    pub description: String,
    /// Explicit primary image, if the caller supplied one.
    pub image: Option<String>,
    pub images: Vec<String>,
    pub sizes: Vec<String>,
    pub status: Option<Status>,
}

/// Partial update for a product.
///
/// `None` fields preserve the stored value. `sizes` is only replaced when
/// non-empty; an empty list is a no-op on prior sizes. `images` replaces
/// the whole list when present.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub title: Option<String>,
    pub category: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<u32>,
    pub description: Option<String>,
    pub status: Option<Status>,
    pub sizes: Vec<String>,
    /// Replacement image list (existing references first, new uploads after).
    pub images: Option<Vec<String>>,
    /// Explicit primary image; when absent the primary is recomputed from
    /// the replacement list.
    pub image: Option<String>,
}

impl Product {
    /// Build a new product from a draft, assigning an id and creation time.
    ///
    /// Name and title default to each other when one is missing. If the
    /// image list is non-empty and no explicit primary was supplied, the
    /// primary image is the first list element.
    #[must_use]
    pub fn from_draft(draft: ProductDraft) -> Self {
        let name = if draft.name.is_empty() {
            draft.title.clone()
        } else {
            draft.name
        };
        let title = if draft.title.is_empty() {
            name.clone()
        } else {
            draft.title
        };

        let image = resolve_primary(draft.image, &draft.images);
        let sizes = (!draft.sizes.is_empty()).then_some(draft.sizes);

        Self {
            id: id::generate(),
            name,
            title,
            category: draft.category,
            price: draft.price,
            stock: draft.stock,
            description: draft.description,
            image,
            images: draft.images,
            sizes,
            status: draft.status.unwrap_or_default(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Shallow-merge a patch over this product and stamp `updated_at`.
    pub fn apply(&mut self, patch: ProductPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(title) = patch.title {
            self.title = title;
        } else if self.title.is_empty() {
            self.title = self.name.clone();
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        // Empty sizes are a no-op so a form that leaves the size picker
        // untouched cannot wipe stored sizes.
        if !patch.sizes.is_empty() {
            self.sizes = Some(patch.sizes);
        }
        if let Some(images) = patch.images {
            self.image = resolve_primary(patch.image, &images);
            self.images = images;
        } else if let Some(image) = patch.image {
            self.image = image;
        }
        self.updated_at = Some(Utc::now());
    }
}

/// Resolve the primary image: explicit choice wins, otherwise the first
/// element of the list, otherwise empty.
fn resolve_primary(explicit: Option<String>, images: &[String]) -> String {
    explicit
        .filter(|image| !image.is_empty())
        .or_else(|| images.first().cloned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, title: &str) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            title: title.to_string(),
            ..ProductDraft::default()
        }
    }

    #[test]
    fn title_defaults_to_name() {
        let product = Product::from_draft(draft("Ring A", ""));
        assert_eq!(product.name, "Ring A");
        assert_eq!(product.title, "Ring A");
    }

    #[test]
    fn name_defaults_to_title() {
        let product = Product::from_draft(draft("", "Gold Bracelet"));
        assert_eq!(product.name, "Gold Bracelet");
        assert_eq!(product.title, "Gold Bracelet");
    }

    #[test]
    fn primary_image_is_first_of_list() {
        let product = Product::from_draft(ProductDraft {
            name: "Ring".to_string(),
            images: vec!["/uploads/a.png".to_string(), "/uploads/b.png".to_string()],
            ..ProductDraft::default()
        });
        assert_eq!(product.image, "/uploads/a.png");
    }

    #[test]
    fn explicit_primary_wins() {
        let product = Product::from_draft(ProductDraft {
            name: "Ring".to_string(),
            image: Some("/uploads/b.png".to_string()),
            images: vec!["/uploads/a.png".to_string(), "/uploads/b.png".to_string()],
            ..ProductDraft::default()
        });
        assert_eq!(product.image, "/uploads/b.png");
    }

    #[test]
    fn no_images_means_empty_primary() {
        let product = Product::from_draft(draft("Ring", ""));
        assert_eq!(product.image, "");
        assert!(product.images.is_empty());
    }

    #[test]
    fn empty_sizes_are_omitted() {
        let product = Product::from_draft(draft("Ring", ""));
        assert!(product.sizes.is_none());
        let json = serde_json::to_value(&product).unwrap_or_default();
        assert!(json.get("sizes").is_none());
    }

    #[test]
    fn patch_preserves_unset_fields() {
        let mut product = Product::from_draft(ProductDraft {
            name: "Ring".to_string(),
            description: "18k gold".to_string(),
            stock: 5,
            ..ProductDraft::default()
        });
        product.apply(ProductPatch {
            name: Some("Ring B".to_string()),
            ..ProductPatch::default()
        });
        assert_eq!(product.name, "Ring B");
        assert_eq!(product.description, "18k gold");
        assert_eq!(product.stock, 5);
        assert!(product.updated_at.is_some());
    }

    #[test]
    fn empty_sizes_patch_is_noop() {
        let mut product = Product::from_draft(ProductDraft {
            name: "Ring".to_string(),
            sizes: vec!["S".to_string(), "M".to_string()],
            ..ProductDraft::default()
        });
        product.apply(ProductPatch::default());
        assert_eq!(
            product.sizes,
            Some(vec!["S".to_string(), "M".to_string()])
        );
    }

    #[test]
    fn nonempty_sizes_patch_replaces() {
        let mut product = Product::from_draft(ProductDraft {
            name: "Ring".to_string(),
            sizes: vec!["S".to_string()],
            ..ProductDraft::default()
        });
        product.apply(ProductPatch {
            sizes: vec!["L".to_string()],
            ..ProductPatch::default()
        });
        assert_eq!(product.sizes, Some(vec!["L".to_string()]));
    }

    #[test]
    fn image_patch_recomputes_primary() {
        let mut product = Product::from_draft(draft("Ring", ""));
        product.apply(ProductPatch {
            images: Some(vec![
                "/uploads/a.png".to_string(),
                "/uploads/b.png".to_string(),
            ]),
            ..ProductPatch::default()
        });
        assert_eq!(product.image, "/uploads/a.png");
        assert_eq!(product.images.len(), 2);
    }

    #[test]
    fn camel_case_wire_format() {
        let product = Product::from_draft(draft("Ring", ""));
        let json = serde_json::to_value(&product).unwrap_or_default();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("created_at").is_none());
    }
}
