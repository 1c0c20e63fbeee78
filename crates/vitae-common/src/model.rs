//! Typed content model
//!
//! These are the shapes the schema validator guarantees. Anything that
//! passes [`crate::schema::validate_bundle`] deserializes into
//! [`ContentBundle`] field by field.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub title: String,
    pub lyrics: String,
    pub story: String,
    pub audio_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: String,
    pub title: String,
    pub year: String,
    pub concept: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub cover_url: String,
    pub tracks: Vec<Track>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_upcoming: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fragment {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visual {
    pub id: String,
    pub url: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FictionDeclaration {
    pub main: String,
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiDeclaration {
    pub main: String,
    pub body: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HumanIdentity {
    pub footer_quote: String,
    pub origin_label: String,
    pub veritas_name: String,
    pub veritas_link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalSection {
    pub id: String,
    pub title: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalContent {
    pub heading: String,
    pub sections: Vec<LegalSection>,
    pub footer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItem {
    pub id: String,
    pub title: String,
    pub manifesto: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeContent {
    pub gallery_message: String,
    pub gallery_items: Vec<GalleryItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UmamiConfig {
    pub enabled: bool,
    pub website_id: String,
    pub src_url: String,
    /// Comma separated host list passed to the tracker as `data-domains`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domains: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleAnalyticsConfig {
    pub enabled: bool,
    pub measurement_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsConfig {
    pub umami: UmamiConfig,
    pub google_analytics: GoogleAnalyticsConfig,
}

/// The single aggregate of all editable site content.
///
/// Collections keep insertion order; the display layer sequences by it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBundle {
    pub albums: Vec<Album>,
    pub fragments: Vec<Fragment>,
    pub visuals: Vec<Visual>,
    pub fiction_dec: FictionDeclaration,
    pub ai_dec: AiDeclaration,
    pub human_identity: HumanIdentity,
    pub human_manifesto: String,
    pub legal_content: LegalContent,
    pub home_content: HomeContent,
    pub analytics_content: AnalyticsConfig,
}

impl ContentBundle {
    /// Serialize into the wire/disk representation.
    pub fn to_value(&self) -> serde_json::Value {
        // Every field is a plain struct, string or vector: serialization is infallible.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_optional_fields_are_omitted() {
        let fragment = Fragment {
            id: "f1".to_string(),
            text: "Meaning still matters.".to_string(),
            source: None,
        };
        let value = serde_json::to_value(&fragment).unwrap();
        assert_eq!(value, json!({ "id": "f1", "text": "Meaning still matters." }));
    }

    #[test]
    fn test_null_optional_deserializes_as_none() {
        let album: Album = serde_json::from_value(json!({
            "id": "a1",
            "title": "T",
            "year": "2024",
            "concept": "c",
            "context": null,
            "coverUrl": "",
            "tracks": [],
            "isUpcoming": null
        }))
        .unwrap();
        assert_eq!(album.context, None);
        assert_eq!(album.is_upcoming, None);
    }

    #[test]
    fn test_camel_case_keys() {
        let track = Track {
            title: "t".into(),
            lyrics: "l".into(),
            story: "s".into(),
            audio_url: "/media/audio/t.mp3".into(),
        };
        let value = serde_json::to_value(&track).unwrap();
        assert_eq!(value["audioUrl"], "/media/audio/t.mp3");
    }
}
