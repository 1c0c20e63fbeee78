//! Compiled-in content used on first boot and whenever neither the server
//! nor the local cache can supply a valid field.

use crate::model::{
    AiDeclaration, Album, AnalyticsConfig, ContentBundle, FictionDeclaration, Fragment,
    GalleryItem, GoogleAnalyticsConfig, HomeContent, HumanIdentity, LegalContent, LegalSection,
    Track, UmamiConfig, Visual,
};

fn s(text: &str) -> String {
    text.to_string()
}

fn track(title: &str, lyrics: &str, story: &str, audio_url: &str) -> Track {
    Track {
        title: s(title),
        lyrics: s(lyrics),
        story: s(story),
        audio_url: s(audio_url),
    }
}

fn fragment(id: &str, text: &str, source: Option<&str>) -> Fragment {
    Fragment {
        id: s(id),
        text: s(text),
        source: source.map(s),
    }
}

fn visual(id: &str, url: &str, title: &str, description: &str) -> Visual {
    Visual {
        id: s(id),
        url: s(url),
        title: s(title),
        description: s(description),
    }
}

pub fn albums() -> Vec<Album> {
    vec![Album {
        id: s("rivers-of-resistance"),
        title: s("RIVERS OF RESISTANCE"),
        year: s("2024"),
        concept: s("WE DO NOT ASK FOR ROOM TO BREATHE. WE RECLAIM THE AIR.\n\n\
            RIVERS OF RESISTANCE IS A REFUSAL TO DISAPPEAR."),
        context: Some(s("THE BONE REMEMBERS WHAT THE MAPS TRY TO FORGET.\n\n\
            THIS IS NOT A PRODUCT. THIS IS NOT CONTENT. THIS IS A POSITION.")),
        cover_url: s("./album-art.png"),
        tracks: vec![
            track(
                "Rivers of Resistance",
                "In 1947, a line condemned,\nhouses fell and lives would end.",
                "The opening testimony. A river that refuses its banks.",
                "/media/audio/rivers-of-resistance.mp3",
            ),
            track(
                "Unbound",
                "",
                "The closure of the initial manifest. A bridge to whatever fractures come next.",
                "/media/audio/unbound.mp3",
            ),
        ],
        is_upcoming: None,
    }]
}

pub fn fragments() -> Vec<Fragment> {
    vec![
        fragment(
            "f1",
            "Everything serves one purpose: to confront what it means to be human.",
            None,
        ),
        fragment(
            "f2",
            "Arcanum Vitae chooses depth, friction, and silence when silence carries weight.",
            None,
        ),
        fragment(
            "f3",
            "Growth does not come from affirmation. It comes from confrontation.",
            Some("The Blueprint"),
        ),
        fragment("f4", "Beauty does not hide pain. It reveals it.", None),
        fragment(
            "f5",
            "Art is not decoration. It is position.",
            Some("Official Manifesto"),
        ),
    ]
}

pub fn visuals() -> Vec<Visual> {
    vec![
        visual("v1", "/media/images/the-void.jpg", "The Void", "Visual rhythm of the heartbeat."),
        visual("v2", "/media/images/restraint.jpg", "Restraint", "The weight of unsaid words."),
        visual("v3", "/media/images/presence.jpg", "Presence", "An act of being here."),
    ]
}

pub fn fiction_declaration() -> FictionDeclaration {
    FictionDeclaration {
        main: s("Arcanum Vitae is a digital fiction. A collective hallucination manifested \
            through artificial intelligence and human intent."),
        details: s("The names, voices, and presences within this space are artifacts of \
            creation. They do not exist outside this frame."),
        tagline: Some(s("Manifested construct. Human truth.")),
    }
}

pub fn ai_declaration() -> AiDeclaration {
    AiDeclaration {
        main: s("Arcanum Vitae is AI-generated music, guided and shaped by human intent."),
        body: vec![
            s("This project is born from a dialogue."),
            s("Artificial intelligence generates sound, structure, and variation."),
            s("Humans decide meaning, direction, and responsibility."),
            s("The machine has no conscience. No fear. No ethics."),
            s("That weight remains human. Always."),
        ],
        tagline: Some(s("AI-generated sound. Human meaning.")),
    }
}

pub fn human_identity() -> HumanIdentity {
    HumanIdentity {
        footer_quote: s("Meaning still matters."),
        origin_label: s("Human origin"),
        veritas_name: s("Veritas"),
        veritas_link: s("https://arcanumvitae.com"),
    }
}

pub fn human_manifesto() -> String {
    s("In the depth of the void, the light we hold is the only truth we own.")
}

pub fn legal_content() -> LegalContent {
    LegalContent {
        heading: s("Legal & Privacy"),
        sections: vec![
            LegalSection {
                id: s("entity"),
                title: s("Legal entity declaration"),
                body: s("This digital artifact is operated from Portugal (EU). \
                    Contact: contact@arcanumvitae.com"),
                list: None,
            },
            LegalSection {
                id: s("privacy"),
                title: s("Data policy"),
                body: s("This system operates on a no-track philosophy."),
                list: Some(vec![
                    s("No analytics cookies or tracking pixels."),
                    s("No personal data unless explicitly provided via contact channels."),
                    s("Server logs may retain IP addresses for security diagnostics only."),
                ]),
            },
            LegalSection {
                id: s("rights"),
                title: s("Data subject rights"),
                body: s("You may request access, rectification, erasure, restriction, \
                    or portability of your data."),
                list: None,
            },
        ],
        footer: s("All sound, words and images remain the property of their creators."),
    }
}

pub fn home_content() -> HomeContent {
    HomeContent {
        gallery_message: s("This is not entertainment. This is testimony."),
        gallery_items: vec![GalleryItem {
            id: s("g1"),
            title: s("Meaning still matters."),
            manifesto: s("Beauty without truth is noise."),
        }],
    }
}

pub fn analytics_content() -> AnalyticsConfig {
    AnalyticsConfig {
        umami: UmamiConfig {
            enabled: false,
            website_id: String::new(),
            src_url: String::new(),
            domains: None,
        },
        google_analytics: GoogleAnalyticsConfig {
            enabled: false,
            measurement_id: String::new(),
        },
    }
}

/// The bundle the site starts from before anything has been saved.
pub fn content_bundle() -> ContentBundle {
    ContentBundle {
        albums: albums(),
        fragments: fragments(),
        visuals: visuals(),
        fiction_dec: fiction_declaration(),
        ai_dec: ai_declaration(),
        human_identity: human_identity(),
        human_manifesto: human_manifesto(),
        legal_content: legal_content(),
        home_content: home_content(),
        analytics_content: analytics_content(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::validate_bundle;

    #[test]
    fn test_defaults_pass_validation() {
        let value = content_bundle().to_value();
        assert!(validate_bundle(&value).is_ok());
    }

    #[test]
    fn test_default_ids_are_unique() {
        let fragments = fragments();
        let mut ids: Vec<_> = fragments.iter().map(|f| f.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), fragments.len());
    }
}
