use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;
use utoipa::ToSchema;

use super::{normalize_optional, Clearable};

/// Order in which songs are used during Mass.
/// The random repertoire is built over exactly these moments.
pub const CANONICAL_MOMENTS: [&str; 10] = [
    "Entrada",
    "Ato Penitencial",
    "Glória",
    "Salmo",
    "Aclamação",
    "Ofertório",
    "Santo",
    "Cordeiro",
    "Comunhão",
    "Final",
];

/// Position of a moment in the canonical order, compared case-insensitively.
pub fn canonical_position(moment: &str) -> Option<usize> {
    let key = super::match_key(moment);
    CANONICAL_MOMENTS
        .iter()
        .position(|m| super::match_key(m) == key)
}

/// Boundary validation failure, surfaced to clients as 400
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Song record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: i64,
    /// Title
    #[serde(rename = "titulo")]
    pub title: String,
    /// Artist or composer
    #[serde(rename = "artista")]
    pub artist: Option<String>,
    /// Liturgical season or occasion (e.g. Advento, Quaresma, Casamento)
    #[serde(rename = "tempo")]
    pub category: String,
    /// Moment within the celebration (e.g. Entrada, Comunhão)
    #[serde(rename = "momento")]
    pub moment: Option<String>,
    /// Musical key
    #[serde(rename = "tom")]
    pub key: Option<String>,
    pub download_url: Option<String>,
    /// Lyrics link
    #[serde(rename = "letraUrl")]
    pub lyrics_url: Option<String>,
    /// Chord chart link
    #[serde(rename = "cifraUrl")]
    pub chords_url: Option<String>,
    pub image_url: Option<String>,
    pub preview_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating a song
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSong {
    /// Title (required)
    #[serde(rename = "titulo", default)]
    pub title: Option<String>,
    #[serde(rename = "artista", default)]
    pub artist: Option<String>,
    /// Liturgical category (required)
    #[serde(rename = "tempo", default)]
    pub category: Option<String>,
    #[serde(rename = "momento", default)]
    pub moment: Option<String>,
    #[serde(rename = "tom", default)]
    pub key: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(rename = "letraUrl", default)]
    pub lyrics_url: Option<String>,
    #[serde(rename = "cifraUrl", default)]
    pub chords_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub preview_url: Option<String>,
}

/// A validated song ready for insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSong {
    pub title: String,
    pub artist: Option<String>,
    pub category: String,
    pub moment: Option<String>,
    pub key: Option<String>,
    pub download_url: Option<String>,
    pub lyrics_url: Option<String>,
    pub chords_url: Option<String>,
    pub image_url: Option<String>,
    pub preview_url: Option<String>,
}

impl CreateSong {
    pub fn validate(self) -> Result<NewSong, ValidationError> {
        let title = normalize_optional(self.title)
            .ok_or_else(|| ValidationError::new("O campo \"titulo\" é obrigatório."))?;
        let category = normalize_optional(self.category)
            .ok_or_else(|| ValidationError::new("O campo \"tempo\" é obrigatório."))?;

        Ok(NewSong {
            title,
            artist: normalize_optional(self.artist),
            category,
            moment: normalize_optional(self.moment),
            key: normalize_optional(self.key),
            download_url: normalize_optional(self.download_url),
            lyrics_url: normalize_optional(self.lyrics_url),
            chords_url: normalize_optional(self.chords_url),
            image_url: normalize_optional(self.image_url),
            preview_url: normalize_optional(self.preview_url),
        })
    }
}

/// Request body for a partial song update.
/// Absent fields are left unchanged; `null` clears optional fields.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSong {
    /// New title (cannot be cleared)
    #[serde(rename = "titulo", default)]
    #[schema(value_type = Option<String>)]
    pub title: Clearable<String>,
    #[serde(rename = "artista", default)]
    #[schema(value_type = Option<String>)]
    pub artist: Clearable<String>,
    /// New category (cannot be cleared)
    #[serde(rename = "tempo", default)]
    #[schema(value_type = Option<String>)]
    pub category: Clearable<String>,
    #[serde(rename = "momento", default)]
    #[schema(value_type = Option<String>)]
    pub moment: Clearable<String>,
    #[serde(rename = "tom", default)]
    #[schema(value_type = Option<String>)]
    pub key: Clearable<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub download_url: Clearable<String>,
    #[serde(rename = "letraUrl", default)]
    #[schema(value_type = Option<String>)]
    pub lyrics_url: Clearable<String>,
    #[serde(rename = "cifraUrl", default)]
    #[schema(value_type = Option<String>)]
    pub chords_url: Clearable<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub image_url: Clearable<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub preview_url: Clearable<String>,
}

/// A validated partial update.
/// Required fields are `None` when unchanged; optional fields keep `Clearable` semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongPatch {
    pub title: Option<String>,
    pub artist: Clearable<String>,
    pub category: Option<String>,
    pub moment: Clearable<String>,
    pub key: Clearable<String>,
    pub download_url: Clearable<String>,
    pub lyrics_url: Clearable<String>,
    pub chords_url: Clearable<String>,
    pub image_url: Clearable<String>,
    pub preview_url: Clearable<String>,
}

impl UpdateSong {
    pub fn validate(self) -> Result<SongPatch, ValidationError> {
        let title = required_patch(self.title, "titulo")?;
        let category = required_patch(self.category, "tempo")?;

        Ok(SongPatch {
            title,
            artist: self.artist.normalized(),
            category,
            moment: self.moment.normalized(),
            key: self.key.normalized(),
            download_url: self.download_url.normalized(),
            lyrics_url: self.lyrics_url.normalized(),
            chords_url: self.chords_url.normalized(),
            image_url: self.image_url.normalized(),
            preview_url: self.preview_url.normalized(),
        })
    }
}

fn required_patch(
    value: Clearable<String>,
    field: &str,
) -> Result<Option<String>, ValidationError> {
    match value.normalized() {
        Clearable::Unchanged => Ok(None),
        Clearable::Set(v) => Ok(Some(v)),
        Clearable::Clear => Err(ValidationError::new(format!(
            "O campo \"{}\" não pode ficar vazio.",
            field
        ))),
    }
}

/// One page of a filtered song listing
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SongPage {
    pub items: Vec<Song>,
    pub total_items: i64,
    pub total_pages: i64,
    pub current_page: i64,
}

/// Filtered listing: a plain array, or a page when pagination was requested
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(untagged)]
pub enum SongListing {
    All(Vec<Song>),
    Page(SongPage),
}

/// One randomly chosen song per canonical moment.
///
/// Serializes as a JSON object keyed by moment name, in canonical order,
/// with `null` for moments that have no songs.
#[derive(Debug, Clone, PartialEq)]
pub struct Repertoire {
    slots: Vec<(&'static str, Option<Song>)>,
}

impl Repertoire {
    pub fn new(slots: Vec<(&'static str, Option<Song>)>) -> Self {
        Self { slots }
    }

    #[cfg(test)]
    pub fn get(&self, moment: &str) -> Option<&Song> {
        self.slots
            .iter()
            .find(|(m, _)| *m == moment)
            .and_then(|(_, song)| song.as_ref())
    }

    pub fn slots(&self) -> &[(&'static str, Option<Song>)] {
        &self.slots
    }
}

impl Serialize for Repertoire {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.slots.len()))?;
        for (moment, song) in &self.slots {
            map.serialize_entry(moment, song)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_song() -> Song {
        Song {
            id: 1,
            title: "Vem, Senhor Jesus".to_string(),
            artist: Some("Frei Luiz Turra".to_string()),
            category: "Advento".to_string(),
            moment: Some("Entrada".to_string()),
            key: Some("D".to_string()),
            download_url: None,
            lyrics_url: Some("https://example.com/letra".to_string()),
            chords_url: None,
            image_url: None,
            preview_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_create_requires_title_and_category() {
        let missing_title = CreateSong {
            category: Some("Advento".to_string()),
            ..Default::default()
        };
        assert!(missing_title.validate().is_err());

        let blank_category = CreateSong {
            title: Some("Maranatha".to_string()),
            category: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(blank_category.validate().is_err());
    }

    #[test]
    fn test_create_trims_fields() {
        let song = CreateSong {
            title: Some("  Maranatha ".to_string()),
            category: Some("Advento".to_string()),
            key: Some("".to_string()),
            artist: Some(" Comunidade ".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap();

        assert_eq!(song.title, "Maranatha");
        assert_eq!(song.artist.as_deref(), Some("Comunidade"));
        assert_eq!(song.key, None);
    }

    #[test]
    fn test_create_accepts_portuguese_field_names() {
        let payload = r#"{"titulo": "Santo", "tempo": "Natal", "momento": "Santo", "cifraUrl": "https://c"}"#;
        let song: CreateSong = serde_json::from_str(payload).unwrap();
        let song = song.validate().unwrap();
        assert_eq!(song.title, "Santo");
        assert_eq!(song.chords_url.as_deref(), Some("https://c"));
    }

    #[test]
    fn test_update_cannot_clear_required_fields() {
        let patch: UpdateSong = serde_json::from_str(r#"{"titulo": null}"#).unwrap();
        assert!(patch.validate().is_err());

        let patch: UpdateSong = serde_json::from_str(r#"{"tempo": "  "}"#).unwrap();
        assert!(patch.validate().is_err());
    }

    #[test]
    fn test_patch_leaves_untouched_fields() {
        let patch: UpdateSong = serde_json::from_str(r#"{"tom": "E", "artista": null}"#).unwrap();
        let patch = patch.validate().unwrap();

        assert_eq!(patch.key, Clearable::Set("E".to_string()));
        assert_eq!(patch.artist, Clearable::Clear);
        assert_eq!(patch.title, None);
        assert_eq!(patch.category, None);
        assert_eq!(patch.moment, Clearable::Unchanged);
        assert_eq!(patch.lyrics_url, Clearable::Unchanged);
    }

    #[test]
    fn test_song_serializes_with_portuguese_names() {
        let json = serde_json::to_value(sample_song()).unwrap();
        assert_eq!(json["titulo"], "Vem, Senhor Jesus");
        assert_eq!(json["tempo"], "Advento");
        assert_eq!(json["momento"], "Entrada");
        assert_eq!(json["letraUrl"], "https://example.com/letra");
        assert!(json["downloadUrl"].is_null());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_repertoire_keeps_canonical_order() {
        let slots = CANONICAL_MOMENTS
            .iter()
            .map(|m| (*m, None))
            .collect::<Vec<_>>();
        let json = serde_json::to_string(&Repertoire::new(slots)).unwrap();
        assert!(json.starts_with(r#"{"Entrada":null,"Ato Penitencial":null"#));
        assert!(json.ends_with(r#""Final":null}"#));
    }

    #[test]
    fn test_canonical_position() {
        assert_eq!(canonical_position("entrada"), Some(0));
        assert_eq!(canonical_position("COMUNHÃO"), Some(8));
        assert_eq!(canonical_position("Louvor"), None);
    }
}
