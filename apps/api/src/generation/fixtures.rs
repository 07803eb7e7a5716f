//! Shared test data: a fully populated funnel as the model would return it.

use super::models::FunnelDocument;

pub const SAMPLE_FUNNEL_JSON: &str = r##"{
  "meta": {
    "brand_idea": "Handmade scented candles for self-care",
    "industry": "Ecommerce",
    "tone": "Playful",
    "mode": "Quick",
    "big_idea": "Turn any evening into a 10-minute spa ritual"
  },
  "layout": ["Hero", "Benefits", "Offer", "Bonus", "FAQ", "CTA"],
  "hero": {
    "headline": "Light up your calm",
    "subheadline": "Small-batch soy candles poured by hand.",
    "primary_cta": "Shop the ritual set",
    "secondary_cta": "Find your scent",
    "hero_points": ["40-hour burn", "Clean soy wax", "Plastic-free shipping"],
    "viral_hook": "Your bath deserves a soundtrack for the nose."
  },
  "social_proof": {
    "proof_line": "Loved by 2,000+ unwinders",
    "badges": ["Vegan", "Cruelty-free"],
    "mini_testimonials": [
      {"name": "Maya", "snippet": "My evenings feel different.", "result": "Sleeps an hour earlier"}
    ]
  },
  "benefits": {
    "title": "Why it works",
    "bullets": ["Scents designed to slow you down", "No soot, no headaches"]
  },
  "how_it_works": {
    "title": "Three steps to calm",
    "steps": [
      {"step": "1", "title": "Pick", "desc": "Choose a scent profile."},
      {"step": "2", "title": "Light", "desc": "Give it ten minutes."}
    ]
  },
  "offer": {
    "title": "The Ritual Set",
    "items": [{"name": "Lavender Dusk", "desc": "8oz candle", "value_tag": "$28 value"}],
    "price_anchor": "Normally $84, today $59",
    "primary_cta": "Claim the set",
    "risk_reversal": "30-day smell-good guarantee"
  },
  "bonus": {
    "title": "Free with every set",
    "items": [{"name": "Wick trimmer", "desc": "Brass, built to last"}]
  },
  "faq": [
    {"q": "How long do they burn?", "a": "About 40 hours each."},
    {"q": "Do you ship abroad?", "a": "Yes, to the EU and UK."}
  ],
  "guarantee": {
    "headline": "Love it or it's free",
    "copy": "Return any candle within 30 days."
  },
  "cta_block": {
    "headline": "Your calm is one click away",
    "button_text": "Get my Ritual Set",
    "reassurance": "Ships in 48 hours"
  },
  "branding": {
    "color_palette": {
      "primary": "#C084FC",
      "secondary": "#F5D0FE",
      "accent": "#FDE68A",
      "background": "#1E1B2E",
      "text": "#F8F7FF"
    },
    "typography": {
      "heading": "Playfair Display, serif",
      "body": "Nunito, sans-serif"
    }
  },
  "extras": {
    "ugc_hooks": ["POV: your bathroom becomes a spa"],
    "ad_angles": ["The 10-minute evening reset"],
    "email_subjects": ["Your calm just shipped"]
  },
  "systeme_sections": {
    "hero_html": "<section class=\"ll-hero\"><h1>Light up your calm</h1></section>",
    "benefits_html": "<section class=\"ll-benefits\"><h2>Why it works</h2></section>",
    "offer_html": "<section class=\"ll-offer\"><h2>The Ritual Set</h2></section>",
    "faq_html": "<section class=\"ll-faq\"><h2>FAQ</h2></section>",
    "cta_html": "<section class=\"ll-cta\"><a class=\"ll-btn\" href=\"#\">Get my Ritual Set</a></section>"
  }
}"##;

pub fn sample_document() -> FunnelDocument {
    serde_json::from_str(SAMPLE_FUNNEL_JSON).expect("sample funnel JSON is valid")
}
