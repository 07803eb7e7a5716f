//! Form input and the structured funnel document the model produces.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ────────────────────────────────────────────────────────────────────────────
// Form input
// ────────────────────────────────────────────────────────────────────────────

pub const INDUSTRY_OPTIONS: &[&str] = &[
    "Coaching",
    "Ecommerce",
    "Beauty",
    "Wellness",
    "Courses",
    "Agency",
    "SaaS",
];

pub const TONE_OPTIONS: &[&str] = &[
    "Playful",
    "Bold",
    "Luxury",
    "Minimalist",
    "Professional",
    "Friendly",
];

pub const DEFAULT_INDUSTRY: &str = "Ecommerce";
pub const DEFAULT_TONE: &str = "Playful";

/// Copy length requested from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FunnelMode {
    Quick,
    Detailed,
}

impl FunnelMode {
    pub const ALL: [FunnelMode; 2] = [FunnelMode::Quick, FunnelMode::Detailed];

    pub fn as_str(&self) -> &'static str {
        match self {
            FunnelMode::Quick => "Quick",
            FunnelMode::Detailed => "Detailed",
        }
    }
}

impl fmt::Display for FunnelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the browser form submits to `/api/generate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelFormState {
    pub brand_idea: String,
    pub industry: String,
    pub tone: String,
    pub mode: FunnelMode,
}

impl FunnelFormState {
    /// The form never submits a blank idea; requests that bypass it are refused.
    pub fn validate(&self) -> Result<(), String> {
        if self.brand_idea.trim().is_empty() {
            return Err("brandIdea cannot be empty".to_string());
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Funnel document
// ────────────────────────────────────────────────────────────────────────────

/// The complete marketing funnel returned by the model.
///
/// `meta` must be an object and `layout` a list of strings. Everything
/// below them is lenient: missing, `null` or wrongly typed values fall back
/// to empty, so rendering and exporting never fail on a partial document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunnelDocument {
    pub meta: Meta,
    pub layout: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub hero: Hero,
    #[serde(default, deserialize_with = "lenient")]
    pub social_proof: SocialProof,
    #[serde(default, deserialize_with = "lenient")]
    pub benefits: Benefits,
    #[serde(default, deserialize_with = "lenient")]
    pub how_it_works: HowItWorks,
    #[serde(default, deserialize_with = "lenient")]
    pub offer: Offer,
    #[serde(default, deserialize_with = "lenient")]
    pub bonus: Bonus,
    #[serde(default, deserialize_with = "lenient_list")]
    pub faq: Vec<FaqEntry>,
    #[serde(default, deserialize_with = "lenient")]
    pub guarantee: Guarantee,
    #[serde(default, deserialize_with = "lenient")]
    pub cta_block: CtaBlock,
    #[serde(default, deserialize_with = "lenient")]
    pub branding: Branding,
    #[serde(default, deserialize_with = "lenient")]
    pub extras: Extras,
    #[serde(default, deserialize_with = "lenient")]
    pub systeme_sections: SystemeSections,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Meta {
    #[serde(deserialize_with = "lenient_string")]
    pub brand_idea: String,
    #[serde(deserialize_with = "lenient_string")]
    pub industry: String,
    #[serde(deserialize_with = "lenient_string")]
    pub tone: String,
    #[serde(deserialize_with = "lenient_string")]
    pub mode: String,
    #[serde(deserialize_with = "lenient_string")]
    pub big_idea: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hero {
    #[serde(deserialize_with = "lenient_string")]
    pub headline: String,
    #[serde(deserialize_with = "lenient_string")]
    pub subheadline: String,
    #[serde(deserialize_with = "lenient_string")]
    pub primary_cta: String,
    #[serde(deserialize_with = "lenient_string")]
    pub secondary_cta: String,
    #[serde(deserialize_with = "lenient_strings")]
    pub hero_points: Vec<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub viral_hook: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiniTestimonial {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub snippet: String,
    #[serde(deserialize_with = "lenient_string")]
    pub result: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialProof {
    #[serde(deserialize_with = "lenient_string")]
    pub proof_line: String,
    #[serde(deserialize_with = "lenient_strings")]
    pub badges: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub mini_testimonials: Vec<MiniTestimonial>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Benefits {
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_strings")]
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HowItWorksStep {
    #[serde(deserialize_with = "lenient_string")]
    pub step: String,
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub desc: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HowItWorks {
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_list")]
    pub steps: Vec<HowItWorksStep>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OfferItem {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub desc: String,
    #[serde(deserialize_with = "lenient_string")]
    pub value_tag: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Offer {
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_list")]
    pub items: Vec<OfferItem>,
    #[serde(deserialize_with = "lenient_string")]
    pub price_anchor: String,
    #[serde(deserialize_with = "lenient_string")]
    pub primary_cta: String,
    #[serde(deserialize_with = "lenient_string")]
    pub risk_reversal: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BonusItem {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub desc: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bonus {
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_list")]
    pub items: Vec<BonusItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaqEntry {
    #[serde(deserialize_with = "lenient_string")]
    pub q: String,
    #[serde(deserialize_with = "lenient_string")]
    pub a: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Guarantee {
    #[serde(deserialize_with = "lenient_string")]
    pub headline: String,
    #[serde(deserialize_with = "lenient_string")]
    pub copy: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CtaBlock {
    #[serde(deserialize_with = "lenient_string")]
    pub headline: String,
    #[serde(deserialize_with = "lenient_string")]
    pub button_text: String,
    #[serde(deserialize_with = "lenient_string")]
    pub reassurance: String,
}

/// Brand colours as sent by the model. Each value is resolved on its own
/// against a default by the exporters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorPalette {
    #[serde(deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Typography {
    #[serde(deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Branding {
    #[serde(deserialize_with = "lenient")]
    pub color_palette: ColorPalette,
    #[serde(deserialize_with = "lenient")]
    pub typography: Typography,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Extras {
    #[serde(deserialize_with = "lenient_strings")]
    pub ugc_hooks: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub ad_angles: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub email_subjects: Vec<String>,
}

/// Ready-made HTML for the five exportable sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemeSections {
    #[serde(deserialize_with = "lenient_string")]
    pub hero_html: String,
    #[serde(deserialize_with = "lenient_string")]
    pub benefits_html: String,
    #[serde(deserialize_with = "lenient_string")]
    pub offer_html: String,
    #[serde(deserialize_with = "lenient_string")]
    pub faq_html: String,
    #[serde(deserialize_with = "lenient_string")]
    pub cta_html: String,
}

/// The section names a `layout` entry can refer to, paired with the
/// download filename the UI offers for each fragment.
pub const FRAGMENT_SECTIONS: [(&str, &str); 5] = [
    ("Hero", "hero.html"),
    ("Benefits", "benefits.html"),
    ("Offer", "offer.html"),
    ("FAQ", "faq.html"),
    ("CTA", "cta.html"),
];

impl SystemeSections {
    /// Looks up the fragment for a layout token. Unknown tokens and empty
    /// fragments both yield `None`.
    pub fn fragment(&self, token: &str) -> Option<&str> {
        let html = match token {
            "Hero" => &self.hero_html,
            "Benefits" => &self.benefits_html,
            "Offer" => &self.offer_html,
            "FAQ" => &self.faq_html,
            "CTA" => &self.cta_html,
            _ => return None,
        };
        Some(html.as_str()).filter(|h| !h.is_empty())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Lenient deserializers
// ────────────────────────────────────────────────────────────────────────────

/// Scalar leaf as text. Numbers and booleans are stringified; null, arrays
/// and objects become `None`.
fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Any value that does not fit `T` becomes `T::default()`.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?))
}

/// List of text leaves; entries that are not scalars are dropped.
fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().filter_map(scalar_text).collect(),
        _ => Vec::new(),
    })
}

/// List of records; entries that are not objects are dropped.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| T::deserialize(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}
