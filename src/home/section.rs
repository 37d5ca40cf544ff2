//! Home page section model
//!
//! A section is a self-contained block of the home page. Every section carries
//! an id, an enabled flag and an order index; the `type` discriminator selects
//! the variant and with it the fixed shape of `content` and of any child list
//! (`items`, `steps`, `features`).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::path::{self, PathError};

/// Keys a path write may never touch
const IMMUTABLE_KEYS: [&str; 2] = ["id", "type"];

/// Discriminator of a section variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionType {
    Hero,
    Treatments,
    Hospitals,
    HowItWorks,
    Testimonials,
    Cta,
    WhyPondicherry,
}

impl SectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionType::Hero => "hero",
            SectionType::Treatments => "treatments",
            SectionType::Hospitals => "hospitals",
            SectionType::HowItWorks => "howItWorks",
            SectionType::Testimonials => "testimonials",
            SectionType::Cta => "cta",
            SectionType::WhyPondicherry => "whyPondicherry",
        }
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One renderable page section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionConfig {
    pub id: String,
    pub enabled: bool,
    pub order: u32,
    #[serde(flatten)]
    pub body: SectionBody,
}

/// Per-type payload, tagged by `type` on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SectionBody {
    Hero {
        content: HeroContent,
    },
    Treatments {
        content: SectionHeading,
        #[serde(default)]
        items: Vec<TreatmentCard>,
    },
    Hospitals {
        content: HospitalsContent,
        #[serde(default)]
        items: Vec<HospitalCard>,
    },
    HowItWorks {
        content: SectionHeading,
        #[serde(default)]
        steps: Vec<HowItWorksStep>,
    },
    Testimonials {
        content: SectionHeading,
        #[serde(default)]
        items: Vec<TestimonialItem>,
    },
    Cta {
        content: CtaContent,
    },
    WhyPondicherry {
        content: WhyPondicherryContent,
        #[serde(default)]
        features: Vec<FeatureItem>,
    },
}

impl SectionBody {
    pub fn section_type(&self) -> SectionType {
        match self {
            SectionBody::Hero { .. } => SectionType::Hero,
            SectionBody::Treatments { .. } => SectionType::Treatments,
            SectionBody::Hospitals { .. } => SectionType::Hospitals,
            SectionBody::HowItWorks { .. } => SectionType::HowItWorks,
            SectionBody::Testimonials { .. } => SectionType::Testimonials,
            SectionBody::Cta { .. } => SectionType::Cta,
            SectionBody::WhyPondicherry { .. } => SectionType::WhyPondicherry,
        }
    }
}

/// Link button
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallToAction {
    pub text: String,
    pub link: String,
}

/// Two-line headline; `highlight` is the accented fragment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Headline {
    pub line1: String,
    pub line2: String,
    #[serde(default)]
    pub highlight: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroStat {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroContent {
    pub badge: String,
    pub title: Headline,
    pub subtitle: String,
    pub primary_cta: CallToAction,
    #[serde(default)]
    pub secondary_cta: Option<CallToAction>,
    pub background_image: String,
    #[serde(default)]
    pub stats: Vec<HeroStat>,
}

/// Shared heading block for list sections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionHeading {
    #[serde(default)]
    pub badge: Option<String>,
    pub title: String,
    pub subtitle: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HospitalsContent {
    #[serde(default)]
    pub badge: Option<String>,
    pub title: String,
    pub subtitle: String,
    #[serde(default)]
    pub view_all_cta: Option<CallToAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CtaContent {
    pub title: String,
    pub subtitle: String,
    pub primary_cta: CallToAction,
    #[serde(default)]
    pub secondary_cta: Option<CallToAction>,
    #[serde(default)]
    pub background_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhyPondicherryContent {
    #[serde(default)]
    pub badge: Option<String>,
    pub title: String,
    pub subtitle: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentCard {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    #[serde(default)]
    pub image: Option<String>,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HospitalCard {
    pub id: String,
    pub name: String,
    pub location: String,
    pub image: String,
    pub rating: f64,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default)]
    pub accreditation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HowItWorksStep {
    pub id: String,
    pub step: u32,
    pub title: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestimonialItem {
    pub id: String,
    pub name: String,
    pub country: String,
    pub treatment: String,
    pub quote: String,
    pub rating: u8,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
}

impl SectionConfig {
    pub fn section_type(&self) -> SectionType {
        self.body.section_type()
    }

    /// Shallow-merge top-level fields into a copy of this section.
    /// `id` and `type` are rejected; the merged document must still be a
    /// well-formed section of the same type.
    pub fn merged(&self, fields: &serde_json::Map<String, Value>) -> Result<SectionConfig, PathError> {
        for key in fields.keys() {
            if IMMUTABLE_KEYS.contains(&key.as_str()) {
                return Err(PathError::Immutable(key.clone()));
            }
        }

        let mut tree = self.to_tree()?;
        if let Value::Object(map) = &mut tree {
            for (key, value) in fields {
                map.insert(key.clone(), value.clone());
            }
        }
        self.from_tree(tree)
    }

    /// Set the value at `dot_path` on a copy of this section.
    /// Missing mapping levels are created along the way.
    pub fn patched(&self, dot_path: &str, value: Value) -> Result<SectionConfig, PathError> {
        let first = dot_path.split('.').next().unwrap_or_default();
        if IMMUTABLE_KEYS.contains(&first) {
            return Err(PathError::Immutable(first.to_string()));
        }

        let mut tree = self.to_tree()?;
        path::set_by_path(&mut tree, dot_path, value)?;
        self.from_tree(tree)
    }

    fn to_tree(&self) -> Result<Value, PathError> {
        serde_json::to_value(self).map_err(|e| PathError::Schema(e.to_string()))
    }

    /// Rebuild a typed section from an edited tree. The tree must decode to
    /// the same variant and re-encode to itself, so keys outside the schema
    /// are refused instead of silently dropped.
    fn from_tree(&self, tree: Value) -> Result<SectionConfig, PathError> {
        let updated: SectionConfig =
            serde_json::from_value(tree.clone()).map_err(|e| PathError::Schema(e.to_string()))?;

        if updated.section_type() != self.section_type() {
            return Err(PathError::Immutable("type".to_string()));
        }

        let reencoded = updated.to_tree()?;
        if !path::tree_matches(&reencoded, &tree) {
            return Err(PathError::Schema(format!(
                "edit does not fit the {} section schema",
                self.section_type()
            )));
        }

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hero() -> SectionConfig {
        SectionConfig {
            id: "hero".to_string(),
            enabled: true,
            order: 1,
            body: SectionBody::Hero {
                content: HeroContent {
                    badge: "Trusted care".to_string(),
                    title: Headline {
                        line1: "World-class".to_string(),
                        line2: "treatment".to_string(),
                        highlight: None,
                    },
                    subtitle: "Affordable".to_string(),
                    primary_cta: CallToAction {
                        text: "Get a quote".to_string(),
                        link: "/inquiry".to_string(),
                    },
                    secondary_cta: None,
                    background_image: "/images/hero.jpg".to_string(),
                    stats: Vec::new(),
                },
            },
        }
    }

    #[test]
    fn test_type_tag_on_the_wire() {
        let value = serde_json::to_value(hero()).unwrap();
        assert_eq!(value["type"], "hero");
        assert_eq!(value["content"]["primaryCta"]["text"], "Get a quote");
        assert_eq!(value["order"], 1);
    }

    #[test]
    fn test_how_it_works_tag_is_camel_case() {
        let section: SectionConfig = serde_json::from_value(json!({
            "id": "steps",
            "type": "howItWorks",
            "enabled": false,
            "order": 4,
            "content": { "title": "How it works", "subtitle": "Four steps" },
            "steps": [
                { "id": "s1", "step": 1, "title": "Ask", "description": "Send an inquiry", "icon": "mail" }
            ]
        }))
        .unwrap();

        assert_eq!(section.section_type(), SectionType::HowItWorks);
        match section.body {
            SectionBody::HowItWorks { steps, .. } => assert_eq!(steps.len(), 1),
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_type_rejected() {
        let result = serde_json::from_value::<SectionConfig>(json!({
            "id": "x", "type": "gallery", "enabled": true, "order": 1, "content": {}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_patched_deep_path() {
        let section = hero();
        let updated = section.patched("content.title.line1", json!("Modern")).unwrap();

        match &updated.body {
            SectionBody::Hero { content } => {
                assert_eq!(content.title.line1, "Modern");
                assert_eq!(content.title.line2, "treatment");
            }
            other => panic!("unexpected body: {other:?}"),
        }
        assert_eq!(updated.id, section.id);
        assert_eq!(updated.order, section.order);
    }

    #[test]
    fn test_patched_creates_optional_mapping() {
        let updated = hero()
            .patched("content.secondaryCta", json!({ "text": "Call us", "link": "/contact" }))
            .unwrap();

        match updated.body {
            SectionBody::Hero { content } => {
                assert_eq!(content.secondary_cta.unwrap().link, "/contact");
            }
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[test]
    fn test_patched_rejects_type_and_id() {
        assert_eq!(
            hero().patched("type", json!("cta")),
            Err(PathError::Immutable("type".to_string()))
        );
        assert_eq!(
            hero().patched("id", json!("other")),
            Err(PathError::Immutable("id".to_string()))
        );
    }

    #[test]
    fn test_patched_rejects_unknown_key() {
        let result = hero().patched("content.titel.line1", json!("typo"));
        assert!(matches!(result, Err(PathError::Schema(_))));
    }

    #[test]
    fn test_patched_rejects_null_on_unknown_key() {
        let result = hero().patched("content.bogus", Value::Null);
        assert!(matches!(result, Err(PathError::Schema(_))));

        let fields = json!({ "bogus": null });
        let result = hero().merged(fields.as_object().unwrap());
        assert!(matches!(result, Err(PathError::Schema(_))));
    }

    #[test]
    fn test_patched_clears_optional_field() {
        let with_cta = hero()
            .patched("content.secondaryCta", json!({ "text": "Call us", "link": "/contact" }))
            .unwrap();
        let updated = with_cta.patched("content.secondaryCta", Value::Null).unwrap();
        match updated.body {
            SectionBody::Hero { content } => assert!(content.secondary_cta.is_none()),
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[test]
    fn test_patched_rejects_wrong_leaf_type() {
        let result = hero().patched("enabled", json!("yes"));
        assert!(matches!(result, Err(PathError::Schema(_))));
    }

    #[test]
    fn test_patched_accepts_object_without_optional_keys() {
        let updated = hero()
            .patched("content.title", json!({ "line1": "Care", "line2": "abroad" }))
            .unwrap();

        match updated.body {
            SectionBody::Hero { content } => {
                assert_eq!(content.title.line2, "abroad");
                assert_eq!(content.title.highlight, None);
            }
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[test]
    fn test_merged_top_level_fields() {
        let mut fields = serde_json::Map::new();
        fields.insert("enabled".to_string(), json!(false));
        fields.insert("order".to_string(), json!(7));

        let updated = hero().merged(&fields).unwrap();
        assert!(!updated.enabled);
        assert_eq!(updated.order, 7);
        assert_eq!(updated.body, hero().body);
    }
}
