use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::{normalize_optional, ValidationError};

/// Carousel slide
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    /// Image shown in the carousel (required)
    pub image_url: String,
    /// Where the slide links to
    #[serde(default)]
    pub link_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSlide {
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    link_url: Option<String>,
}

/// Parse a replacement slide sequence from an arbitrary JSON payload.
///
/// Only a JSON array is accepted; objects and scalars are rejected rather than coerced.
pub fn parse_slides(payload: Value) -> Result<Vec<Slide>, ValidationError> {
    let Value::Array(items) = payload else {
        return Err(ValidationError::new(
            "Os destaques devem ser enviados como uma lista de slides.",
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let raw: RawSlide = serde_json::from_value(item).map_err(|e| {
                ValidationError::new(format!("Slide {} inválido: {}", index + 1, e))
            })?;
            let image_url = normalize_optional(raw.image_url).ok_or_else(|| {
                ValidationError::new(format!(
                    "Slide {}: o campo \"imageUrl\" é obrigatório.",
                    index + 1
                ))
            })?;
            Ok(Slide {
                image_url,
                link_url: normalize_optional(raw.link_url),
            })
        })
        .collect()
}
