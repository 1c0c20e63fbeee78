//! Structural validation of untyped content
//!
//! Every entity contract is a static [`Schema`] table built from a handful of
//! [`Rule`] primitives. Validation never panics: anything that is not the
//! expected shape is simply rejected. Unknown keys are ignored.
//!
//! The same tables gate what the store accepts from disk, what the save
//! endpoint accepts from the network and what the client accepts from its
//! local cache.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::debug;

/// A single field constraint.
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// Present and a string (empty allowed).
    Str,
    /// Absent, null, or a string.
    OptStr,
    /// Present and a boolean.
    Bool,
    /// Absent, null, or a boolean.
    OptBool,
    /// Present and an array of strings.
    StrList,
    /// Absent, null, or an array of strings.
    OptStrList,
    /// Present and an object matching the schema.
    Nested(&'static Schema),
    /// Present and an array whose elements all match the schema. When the
    /// schema declares an identity key, ids must be non-empty and unique.
    Collection(&'static Schema),
}

impl Rule {
    pub fn is_required(&self) -> bool {
        !matches!(self, Rule::OptStr | Rule::OptBool | Rule::OptStrList)
    }

    /// Check a (possibly missing) field value against this rule.
    pub fn accepts(&self, value: Option<&Value>) -> bool {
        match (self, value) {
            (Rule::OptStr | Rule::OptBool | Rule::OptStrList, None | Some(Value::Null)) => true,
            (_, None) => false,
            (Rule::Str | Rule::OptStr, Some(v)) => v.is_string(),
            (Rule::Bool | Rule::OptBool, Some(v)) => v.is_boolean(),
            (Rule::StrList | Rule::OptStrList, Some(v)) => is_string_list(v),
            (Rule::Nested(schema), Some(v)) => schema.matches(v),
            (Rule::Collection(schema), Some(v)) => schema.matches_collection(v),
        }
    }
}

fn is_string_list(value: &Value) -> bool {
    value
        .as_array()
        .is_some_and(|items| items.iter().all(Value::is_string))
}

/// Declarative shape of one entity.
#[derive(Debug)]
pub struct Schema {
    pub name: &'static str,
    /// Key that identifies an element within its collection.
    pub id_key: Option<&'static str>,
    pub fields: &'static [(&'static str, Rule)],
}

impl Schema {
    /// True when `value` is an object satisfying every field rule.
    pub fn matches(&self, value: &Value) -> bool {
        value.as_object().is_some_and(|obj| self.matches_object(obj))
    }

    fn matches_object(&self, obj: &Map<String, Value>) -> bool {
        self.fields.iter().all(|(key, rule)| {
            let ok = rule.accepts(obj.get(*key));
            if !ok {
                debug!("[Schema] {}.{} rejected", self.name, key);
            }
            ok
        })
    }

    /// Keys this schema requires to be present.
    pub fn required_keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields
            .iter()
            .filter(|(_, rule)| rule.is_required())
            .map(|(key, _)| *key)
    }

    /// True when `value` is an array of matching elements with unique ids.
    pub fn matches_collection(&self, value: &Value) -> bool {
        let Some(items) = value.as_array() else {
            return false;
        };
        if !items.iter().all(|item| self.matches(item)) {
            return false;
        }
        match self.id_key {
            Some(key) => has_unique_ids(items, key),
            None => true,
        }
    }
}

fn has_unique_ids(items: &[Value], key: &str) -> bool {
    let mut seen = HashSet::with_capacity(items.len());
    items.iter().all(|item| match item.get(key).and_then(Value::as_str) {
        Some(id) if !id.is_empty() => seen.insert(id),
        _ => false,
    })
}

pub static TRACK: Schema = Schema {
    name: "track",
    id_key: None,
    fields: &[
        ("title", Rule::Str),
        ("lyrics", Rule::Str),
        ("story", Rule::Str),
        ("audioUrl", Rule::Str),
    ],
};

pub static ALBUM: Schema = Schema {
    name: "album",
    id_key: Some("id"),
    fields: &[
        ("id", Rule::Str),
        ("title", Rule::Str),
        ("year", Rule::Str),
        ("concept", Rule::Str),
        ("context", Rule::OptStr),
        ("coverUrl", Rule::Str),
        ("tracks", Rule::Collection(&TRACK)),
        ("isUpcoming", Rule::OptBool),
    ],
};

pub static FRAGMENT: Schema = Schema {
    name: "fragment",
    id_key: Some("id"),
    fields: &[
        ("id", Rule::Str),
        ("text", Rule::Str),
        ("source", Rule::OptStr),
    ],
};

pub static VISUAL: Schema = Schema {
    name: "visual",
    id_key: Some("id"),
    fields: &[
        ("id", Rule::Str),
        ("url", Rule::Str),
        ("title", Rule::Str),
        ("description", Rule::Str),
    ],
};

pub static FICTION_DECLARATION: Schema = Schema {
    name: "fictionDeclaration",
    id_key: None,
    fields: &[
        ("main", Rule::Str),
        ("details", Rule::Str),
        ("tagline", Rule::OptStr),
    ],
};

pub static AI_DECLARATION: Schema = Schema {
    name: "aiDeclaration",
    id_key: None,
    fields: &[
        ("main", Rule::Str),
        ("body", Rule::StrList),
        ("tagline", Rule::OptStr),
    ],
};

pub static HUMAN_IDENTITY: Schema = Schema {
    name: "humanIdentity",
    id_key: None,
    fields: &[
        ("footerQuote", Rule::Str),
        ("originLabel", Rule::Str),
        ("veritasName", Rule::Str),
        ("veritasLink", Rule::Str),
    ],
};

pub static LEGAL_SECTION: Schema = Schema {
    name: "legalSection",
    id_key: Some("id"),
    fields: &[
        ("id", Rule::Str),
        ("title", Rule::Str),
        ("body", Rule::Str),
        ("list", Rule::OptStrList),
    ],
};

pub static LEGAL_CONTENT: Schema = Schema {
    name: "legalContent",
    id_key: None,
    fields: &[
        ("heading", Rule::Str),
        ("footer", Rule::Str),
        ("sections", Rule::Collection(&LEGAL_SECTION)),
    ],
};

pub static GALLERY_ITEM: Schema = Schema {
    name: "galleryItem",
    id_key: Some("id"),
    fields: &[
        ("id", Rule::Str),
        ("title", Rule::Str),
        ("manifesto", Rule::Str),
    ],
};

pub static HOME_CONTENT: Schema = Schema {
    name: "homeContent",
    id_key: None,
    fields: &[
        ("galleryMessage", Rule::Str),
        ("galleryItems", Rule::Collection(&GALLERY_ITEM)),
    ],
};

pub static UMAMI: Schema = Schema {
    name: "umami",
    id_key: None,
    fields: &[
        ("enabled", Rule::Bool),
        ("websiteId", Rule::Str),
        ("srcUrl", Rule::Str),
        ("domains", Rule::OptStr),
    ],
};

pub static GOOGLE_ANALYTICS: Schema = Schema {
    name: "googleAnalytics",
    id_key: None,
    fields: &[("enabled", Rule::Bool), ("measurementId", Rule::Str)],
};

pub static ANALYTICS_CONTENT: Schema = Schema {
    name: "analyticsContent",
    id_key: None,
    fields: &[
        ("umami", Rule::Nested(&UMAMI)),
        ("googleAnalytics", Rule::Nested(&GOOGLE_ANALYTICS)),
    ],
};

pub fn is_track(value: &Value) -> bool {
    TRACK.matches(value)
}

pub fn is_album(value: &Value) -> bool {
    ALBUM.matches(value)
}

pub fn is_fragment(value: &Value) -> bool {
    FRAGMENT.matches(value)
}

pub fn is_visual(value: &Value) -> bool {
    VISUAL.matches(value)
}

pub fn is_fiction_declaration(value: &Value) -> bool {
    FICTION_DECLARATION.matches(value)
}

pub fn is_ai_declaration(value: &Value) -> bool {
    AI_DECLARATION.matches(value)
}

pub fn is_human_identity(value: &Value) -> bool {
    HUMAN_IDENTITY.matches(value)
}

pub fn is_legal_section(value: &Value) -> bool {
    LEGAL_SECTION.matches(value)
}

pub fn is_legal_content(value: &Value) -> bool {
    LEGAL_CONTENT.matches(value)
}

pub fn is_home_content(value: &Value) -> bool {
    HOME_CONTENT.matches(value)
}

pub fn is_analytics_content(value: &Value) -> bool {
    ANALYTICS_CONTENT.matches(value)
}

pub fn is_manifesto(value: &Value) -> bool {
    value.is_string()
}

/// Top-level keys of a content bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BundleField {
    Albums,
    Fragments,
    Visuals,
    FictionDec,
    AiDec,
    HumanIdentity,
    HumanManifesto,
    LegalContent,
    HomeContent,
    AnalyticsContent,
}

impl BundleField {
    pub const ALL: [BundleField; 10] = [
        BundleField::Albums,
        BundleField::Fragments,
        BundleField::Visuals,
        BundleField::HumanManifesto,
        BundleField::HumanIdentity,
        BundleField::FictionDec,
        BundleField::AiDec,
        BundleField::LegalContent,
        BundleField::HomeContent,
        BundleField::AnalyticsContent,
    ];

    /// JSON key on disk and on the wire.
    pub fn key(self) -> &'static str {
        match self {
            BundleField::Albums => "albums",
            BundleField::Fragments => "fragments",
            BundleField::Visuals => "visuals",
            BundleField::FictionDec => "fictionDec",
            BundleField::AiDec => "aiDec",
            BundleField::HumanIdentity => "humanIdentity",
            BundleField::HumanManifesto => "humanManifesto",
            BundleField::LegalContent => "legalContent",
            BundleField::HomeContent => "homeContent",
            BundleField::AnalyticsContent => "analyticsContent",
        }
    }

    /// Key used for the client-side cache entry.
    pub fn cache_key(self) -> &'static str {
        match self {
            BundleField::Albums => "av_albums",
            BundleField::Fragments => "av_fragments",
            BundleField::Visuals => "av_visuals",
            BundleField::FictionDec => "av_fiction",
            BundleField::AiDec => "av_ai",
            BundleField::HumanIdentity => "av_identity",
            BundleField::HumanManifesto => "av_manifesto",
            BundleField::LegalContent => "av_legal",
            BundleField::HomeContent => "av_home",
            BundleField::AnalyticsContent => "av_analytics",
        }
    }

    /// Collections must always be present in a stored bundle; the rest may
    /// be omitted and are filled from defaults on the client.
    pub fn is_required(self) -> bool {
        matches!(
            self,
            BundleField::Albums | BundleField::Fragments | BundleField::Visuals
        )
    }

    /// Validate a present value for this field.
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            BundleField::Albums => ALBUM.matches_collection(value),
            BundleField::Fragments => FRAGMENT.matches_collection(value),
            BundleField::Visuals => VISUAL.matches_collection(value),
            BundleField::FictionDec => is_fiction_declaration(value),
            BundleField::AiDec => is_ai_declaration(value),
            BundleField::HumanIdentity => is_human_identity(value),
            BundleField::HumanManifesto => is_manifesto(value),
            BundleField::LegalContent => is_legal_content(value),
            BundleField::HomeContent => is_home_content(value),
            BundleField::AnalyticsContent => is_analytics_content(value),
        }
    }

    fn check_in(self, obj: &Map<String, Value>) -> bool {
        match obj.get(self.key()) {
            Some(value) => self.accepts(value),
            None => !self.is_required(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Payload must be an object")]
    NotAnObject,
    #[error("Invalid {0} payload")]
    InvalidField(&'static str),
}

/// Every sub-schema a bundle failed, in field order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", join_messages(.0))]
pub struct BundleViolations(pub Vec<ValidationError>);

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl BundleViolations {
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }

    pub fn contains_field(&self, key: &str) -> bool {
        self.0
            .iter()
            .any(|e| matches!(e, ValidationError::InvalidField(k) if *k == key))
    }
}

/// Validate a whole bundle, collecting every failing sub-schema.
pub fn validate_bundle(value: &Value) -> Result<(), BundleViolations> {
    let Some(obj) = value.as_object() else {
        return Err(BundleViolations(vec![ValidationError::NotAnObject]));
    };

    let errors: Vec<_> = BundleField::ALL
        .iter()
        .filter(|field| !field.check_in(obj))
        .map(|field| ValidationError::InvalidField(field.key()))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(BundleViolations(errors))
    }
}

/// A bundle that has passed [`validate_bundle`].
///
/// The wrapped JSON is kept verbatim, including keys the schema does not
/// know about, so a stored bundle reads back exactly as it was saved.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidBundle(Value);

impl ValidBundle {
    pub fn parse(value: Value) -> Result<Self, BundleViolations> {
        validate_bundle(&value)?;
        Ok(Self(value))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Value of one top-level field, if present.
    pub fn field(&self, field: BundleField) -> Option<&Value> {
        self.0.get(field.key())
    }
}

impl Serialize for ValidBundle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}
