//! Validating extractors for API request bodies.

use axum::{
    async_trait,
    extract::{
        multipart::{Field, MultipartError},
        rejection::JsonRejection,
        FromRequest, Multipart, Request,
    },
    http::{header::CONTENT_TYPE, StatusCode},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use super::request::{ProductRequest, MAX_NAME_LENGTH};
use crate::upload::ImageUpload;
use crate::web::error::ApiError;

/// A JSON extractor that validates the request body.
///
/// This extractor deserializes the request body as JSON and then validates it
/// using the `validator` crate. If validation fails, it returns a detailed
/// error response with field-level error information.
///
/// # Example
///
/// ```ignore
/// use catalog::web::dto::ValidatedJson;
///
/// async fn create_variant(
///     ValidatedJson(payload): ValidatedJson<VariantRequest>,
/// ) -> Result<Json<VariantBody>, ApiError> {
///     // payload is already validated
///     // ...
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid JSON: {}", e.body_text())))?;

        value.validate().map_err(ApiError::from_validation_errors)?;

        Ok(ValidatedJson(value))
    }
}

/// Product create/update body, sent either as `multipart/form-data`
/// (`name`, optional `image_url`, optional `file`) or as JSON
/// (`name`, `image_url`).
#[derive(Debug, Default)]
pub struct ProductForm {
    /// Product name as sent.
    pub name: Option<String>,
    /// Externally hosted image URL.
    pub image_url: Option<String>,
    /// Uploaded image file.
    pub image: Option<ImageUpload>,
}

impl ProductForm {
    /// The trimmed product name, required and at most `MAX_NAME_LENGTH` characters.
    pub fn validated_name(&self) -> Result<String, ApiError> {
        let name = self.name.as_deref().map(str::trim).unwrap_or_default();

        let mut problems = Vec::new();
        if let Err(e) = not_empty_trimmed(name) {
            problems.push(e);
        } else if name.chars().count() > MAX_NAME_LENGTH {
            problems.push(
                validator::ValidationError::new("length")
                    .with_message("Name must be between 1 and 100 characters".into()),
            );
        }
        if let Err(e) = no_control_chars(name) {
            problems.push(e);
        }

        if problems.is_empty() {
            return Ok(name.to_string());
        }

        let mut errors = validator::ValidationErrors::new();
        for problem in problems {
            errors.add("name", problem);
        }
        Err(ApiError::from_validation_errors(errors))
    }

    /// The image URL if one was given and is not blank.
    pub fn non_empty_image_url(&self) -> Option<String> {
        self.image_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
    }

    async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = ProductForm::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or("").to_string();

            match name.as_str() {
                "name" => form.name = Some(read_text(field).await?),
                "image_url" => form.image_url = Some(read_text(field).await?),
                "file" => {
                    let file_name = field.file_name().unwrap_or("").to_string();
                    let content_type = field
                        .content_type()
                        .unwrap_or("application/octet-stream")
                        .to_string();
                    let bytes = field.bytes().await.map_err(multipart_error)?;

                    // Browsers send an empty part when no file was chosen
                    if !(file_name.is_empty() && bytes.is_empty()) {
                        form.image =
                            Some(ImageUpload::new(file_name, content_type, bytes.to_vec()));
                    }
                }
                _ => {}
            }
        }

        Ok(form)
    }
}

#[async_trait]
impl<S> FromRequest<S> for ProductForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::from_request(req, state).await.map_err(|e| {
                ApiError::bad_request(format!("Invalid multipart data: {}", e.body_text()))
            })?;
            return Self::from_multipart(multipart).await;
        }

        let Json(body) = Json::<ProductRequest>::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid JSON: {}", e.body_text())))?;

        Ok(ProductForm {
            name: body.name,
            image_url: body.image_url,
            image: None,
        })
    }
}

async fn read_text(field: Field<'_>) -> Result<String, ApiError> {
    field.text().await.map_err(multipart_error)
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::payload_too_large("Request body is too large");
    }
    tracing::debug!("Failed to read multipart field: {}", e);
    ApiError::bad_request("Invalid multipart data")
}

// ============================================================================
// Custom Validators
// ============================================================================

/// Validate that a string does not contain control characters or NULL bytes.
pub fn no_control_chars(value: &str) -> Result<(), validator::ValidationError> {
    if value
        .chars()
        .any(|c| c.is_control() && c != '\n' && c != '\r' && c != '\t')
    {
        return Err(validator::ValidationError::new("no_control_chars")
            .with_message("Must not contain control characters".into()));
    }
    Ok(())
}

/// Validate that a string is not empty after trimming whitespace.
pub fn not_empty_trimmed(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("not_empty_trimmed")
            .with_message("Must not be empty".into()));
    }
    Ok(())
}
