//! Legacy `hospital_profiles.profile_data` documents
//!
//! The old admin stored one JSON blob per hospital with doctors, treatments
//! and packages embedded. Fields were free-form, so everything is optional and
//! numbers may arrive as strings ("₹ 1,50,000", "12 years").

use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyProfile {
    pub name: String,
    pub description: Option<String>,
    pub contact: Option<LegacyContact>,
    pub location: Option<LegacyLocation>,
    pub accreditations: Vec<String>,
    pub specialties: Vec<String>,
    pub doctors: Vec<LegacyDoctor>,
    pub treatments: Vec<LegacyTreatment>,
    pub packages: Vec<LegacyPackage>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyContact {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyLocation {
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyDoctor {
    pub name: String,
    #[serde(alias = "specialty")]
    pub specialization: Option<String>,
    pub qualification: Option<String>,
    #[serde(alias = "experience", deserialize_with = "deserialize_loose_number")]
    pub experience_years: Option<f64>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyTreatment {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(deserialize_with = "deserialize_loose_number")]
    pub price_min: Option<f64>,
    #[serde(deserialize_with = "deserialize_loose_number")]
    pub price_max: Option<f64>,
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyPackage {
    pub name: String,
    pub description: Option<String>,
    #[serde(deserialize_with = "deserialize_loose_number")]
    pub price: Option<f64>,
    pub duration: Option<String>,
    pub inclusions: Vec<String>,
}

impl LegacyProfile {
    /// Trimmed, lower-cased contact email if one is present
    pub fn contact_email(&self) -> Option<String> {
        self.contact
            .as_ref()
            .and_then(|c| c.email.as_deref())
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
    }
}

/// Accepts a number, a string holding a number somewhere ("12 years",
/// "1,50,000") or null
fn deserialize_loose_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<NumberOrText>::deserialize(deserializer)? {
        Some(NumberOrText::Number(n)) => Some(n),
        Some(NumberOrText::Text(text)) => parse_leading_number(&text),
        None => None,
    })
}

fn parse_leading_number(text: &str) -> Option<f64> {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .filter(|c| *c != ',')
        .collect();
    digits.parse().ok()
}
