//! Product route handlers.
//!
//! Create and update accept multipart form data: plain text fields, up to
//! five image files, and two embedded-JSON text fields (`sizes`,
//! `existingImages`). Malformed embedded JSON is absorbed as an empty list
//! and logged - it never fails the request.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use bijoux_core::{lenient, Product, ProductDraft, ProductPatch, Status};

use crate::assets::{self, MAX_FILES_PER_REQUEST, MAX_FILE_BYTES};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Exact status equality filter.
    pub status: Option<String>,
}

/// List products, optionally filtered by status.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Product>>> {
    let products = state.store().list_products(query.status.as_deref()).await?;
    Ok(Json(products))
}

/// Fetch a single product.
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Product>> {
    Ok(Json(state.store().get_product(&id).await?))
}

/// Create a product from a multipart form.
pub async fn create(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Product>)> {
    let form = ProductForm::read(&state, multipart).await?;

    let (images, primary) = assets::merge_images(
        form.json_list("existingImages"),
        form.uploaded.clone(),
        form.text("image"),
    );

    let draft = ProductDraft {
        name: form.text("name").unwrap_or_default(),
        title: form.text("title").unwrap_or_default(),
        category: form.text("category").unwrap_or_default(),
        price: lenient::price_or_zero(form.raw("price")),
        stock: lenient::stock_or_zero(form.raw("stock")),
        description: form.text("description").unwrap_or_default(),
        image: (!primary.is_empty()).then_some(primary),
        images,
        sizes: form.json_list("sizes"),
        status: form.status(),
    };

    let product = state.store().create_product(draft).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product from a multipart form.
///
/// Absent or empty text fields preserve stored values. The image list is
/// only replaced when the form supplies existing references or new uploads.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Product>> {
    let form = ProductForm::read(&state, multipart).await?;

    let mut patch = ProductPatch {
        name: form.text("name"),
        title: form.text("title"),
        category: form.text("category"),
        price: form.text("price").as_deref().map(lenient::price_or_zero),
        stock: form.text("stock").as_deref().map(lenient::stock_or_zero),
        description: form.text("description"),
        status: form.status(),
        sizes: form.json_list("sizes"),
        ..ProductPatch::default()
    };

    if form.has("existingImages") || !form.uploaded.is_empty() {
        let (images, _) = assets::merge_images(
            form.json_list("existingImages"),
            form.uploaded.clone(),
            None,
        );
        patch.images = Some(images);
        patch.image = form.text("image");
    } else if let Some(image) = form.text("image") {
        // Legacy single-image update without touching the list.
        patch.image = Some(image);
    }

    let product = state.store().update_product(&id, patch).await?;
    Ok(Json(product))
}

/// Delete a product and clean up its image files.
///
/// Record removal comes first; file cleanup afterwards is best-effort and
/// cannot fail the delete.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let removed = state.store().delete_product(&id).await?;
    state.assets().remove_product_images(&removed).await;
    Ok(Json(json!({"success": true})))
}

/// Decoded multipart form: text fields plus the web paths of files already
/// stored in the uploads directory.
struct ProductForm {
    fields: std::collections::HashMap<String, String>,
    uploaded: Vec<String>,
}

impl ProductForm {
    /// Drain the multipart stream, storing file parts as they arrive.
    async fn read(state: &AppState, mut multipart: Multipart) -> Result<Self> {
        let mut fields = std::collections::HashMap::new();
        let mut uploaded = Vec::new();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|err| AppError::BadRequest(format!("invalid multipart body: {err}")))?
        {
            let name = field.name().unwrap_or_default().to_string();

            if let Some(file_name) = field.file_name() {
                let file_name = file_name.to_string();
                if uploaded.len() >= MAX_FILES_PER_REQUEST {
                    return Err(AppError::BadRequest(format!(
                        "at most {MAX_FILES_PER_REQUEST} images per request"
                    )));
                }
                let bytes = field.bytes().await.map_err(|err| {
                    AppError::BadRequest(format!("failed to read upload: {err}"))
                })?;
                if bytes.len() > MAX_FILE_BYTES {
                    return Err(AppError::BadRequest(
                        "image exceeds the 10 MiB limit".to_string(),
                    ));
                }
                uploaded.push(state.assets().save(&file_name, &bytes).await?);
            } else {
                let value = field.text().await.map_err(|err| {
                    AppError::BadRequest(format!("invalid field {name}: {err}"))
                })?;
                fields.insert(name, value);
            }
        }

        Ok(Self { fields, uploaded })
    }

    fn has(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// A text field, with empty strings treated as absent.
    fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .filter(|value| !value.is_empty())
            .cloned()
    }

    /// A text field's raw value, empty when absent.
    fn raw(&self, name: &str) -> &str {
        self.fields.get(name).map_or("", String::as_str)
    }

    /// An embedded-JSON list field. Malformed JSON is absorbed as empty.
    fn json_list(&self, name: &str) -> Vec<String> {
        let Some(raw) = self.text(name) else {
            return Vec::new();
        };
        serde_json::from_str(&raw).unwrap_or_else(|err| {
            tracing::warn!(field = name, error = %err, "ignoring malformed embedded JSON");
            Vec::new()
        })
    }

    /// The status field; unknown values fall back to the default.
    fn status(&self) -> Option<Status> {
        self.text("status").and_then(|raw| raw.parse().ok())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::Request;

    use crate::assets::Assets;
    use crate::state::AppState;
    use crate::store::Store;
    use crate::store::file::FileStore;

    use super::*;

    fn form_with(fields: &[(&str, &str)]) -> ProductForm {
        ProductForm {
            fields: fields
                .iter()
                .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
                .collect(),
            uploaded: Vec::new(),
        }
    }

    #[test]
    fn malformed_embedded_json_is_absorbed_as_empty() {
        let form = form_with(&[
            ("sizes", "{ not json"),
            ("existingImages", "[\"/uploads/a.png\","),
        ]);
        // Garbage in either embedded-JSON field yields an empty list, never
        // an error back to the caller.
        assert!(form.json_list("sizes").is_empty());
        assert!(form.json_list("existingImages").is_empty());
    }

    #[test]
    fn well_formed_embedded_json_is_parsed() {
        let form = form_with(&[("sizes", r#"["S","M"]"#)]);
        assert_eq!(form.json_list("sizes"), vec!["S", "M"]);
        // A wrong element type is malformed too.
        let form = form_with(&[("sizes", r#"["S", 2]"#)]);
        assert!(form.json_list("sizes").is_empty());
    }

    #[test]
    fn empty_text_fields_are_absent() {
        let form = form_with(&[("name", ""), ("title", "Ring")]);
        assert!(form.text("name").is_none());
        assert_eq!(form.text("title").as_deref(), Some("Ring"));
        assert_eq!(form.raw("name"), "");
    }

    async fn test_state(uploads: &std::path::Path, data: &std::path::Path) -> AppState {
        let store = Store::File(FileStore::open(data).await.unwrap());
        let assets = Assets::new(uploads).unwrap();
        AppState::new(store, assets)
    }

    fn file_part(name: &str, bytes: &str) -> String {
        format!(
            "--XBOUNDARY\r\nContent-Disposition: form-data; name=\"images\"; filename=\"{name}\"\r\nContent-Type: image/png\r\n\r\n{bytes}\r\n"
        )
    }

    async fn read_form(state: &AppState, body: String) -> Result<ProductForm> {
        let request = Request::builder()
            .header(
                "content-type",
                "multipart/form-data; boundary=XBOUNDARY",
            )
            .body(Body::from(body))
            .unwrap();
        let multipart = Multipart::from_request(request, &()).await.unwrap();
        ProductForm::read(state, multipart).await
    }

    #[tokio::test]
    async fn rejects_more_than_five_uploaded_files() {
        let uploads = tempfile::tempdir().unwrap();
        let data = tempfile::tempdir().unwrap();
        let state = test_state(uploads.path(), data.path()).await;

        let mut body = String::new();
        for i in 0..=MAX_FILES_PER_REQUEST {
            body.push_str(&file_part(&format!("{i}.png"), "px"));
        }
        body.push_str("--XBOUNDARY--\r\n");

        assert!(matches!(
            read_form(&state, body).await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn rejects_oversized_uploaded_file() {
        let uploads = tempfile::tempdir().unwrap();
        let data = tempfile::tempdir().unwrap();
        let state = test_state(uploads.path(), data.path()).await;

        let body = format!(
            "{}--XBOUNDARY--\r\n",
            file_part("big.png", &"x".repeat(MAX_FILE_BYTES + 1))
        );

        assert!(matches!(
            read_form(&state, body).await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn stores_files_within_the_limits() {
        let uploads = tempfile::tempdir().unwrap();
        let data = tempfile::tempdir().unwrap();
        let state = test_state(uploads.path(), data.path()).await;

        let body = format!(
            "{}{}--XBOUNDARY--\r\n",
            file_part("a.png", "pixels"),
            "--XBOUNDARY\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\nRing\r\n"
        );

        let form = read_form(&state, body).await.unwrap();
        assert_eq!(form.uploaded.len(), 1);
        assert!(form.uploaded.first().unwrap().starts_with("/uploads/"));
        assert_eq!(form.text("name").as_deref(), Some("Ring"));
    }
}
