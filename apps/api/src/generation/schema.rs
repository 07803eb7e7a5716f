//! Response schema sent with blocking generation requests.
//!
//! Written in the backend's schema dialect (`OBJECT` / `ARRAY` / `STRING`).
//! Every declared property is required; the shape mirrors `FunnelDocument`.

use serde_json::{json, Map, Value};

fn string() -> Value {
    json!({ "type": "STRING" })
}

fn described(description: &str) -> Value {
    json!({ "type": "STRING", "description": description })
}

fn array_of(items: Value) -> Value {
    json!({ "type": "ARRAY", "items": items })
}

fn strings() -> Value {
    array_of(string())
}

/// Object node whose properties are all required.
fn object<const N: usize>(fields: [(&str, Value); N]) -> Value {
    let required: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();
    let properties: Map<String, Value> = fields
        .into_iter()
        .map(|(name, schema)| (name.to_string(), schema))
        .collect();
    json!({ "type": "OBJECT", "properties": properties, "required": required })
}

pub fn funnel_response_schema() -> Value {
    object([
        (
            "meta",
            object([
                ("brand_idea", string()),
                ("industry", string()),
                ("tone", string()),
                ("mode", string()),
                (
                    "big_idea",
                    described("Single sentence that sums up the promise."),
                ),
            ]),
        ),
        ("layout", strings()),
        (
            "hero",
            object([
                ("headline", string()),
                ("subheadline", string()),
                ("primary_cta", string()),
                ("secondary_cta", string()),
                ("hero_points", strings()),
                (
                    "viral_hook",
                    described("One short pattern-interrupt line for the very top."),
                ),
            ]),
        ),
        (
            "social_proof",
            object([
                (
                    "proof_line",
                    described("Short proof statement or credibility bar."),
                ),
                ("badges", strings()),
                (
                    "mini_testimonials",
                    array_of(object([
                        ("name", string()),
                        ("snippet", string()),
                        ("result", string()),
                    ])),
                ),
            ]),
        ),
        (
            "benefits",
            object([("title", string()), ("bullets", strings())]),
        ),
        (
            "how_it_works",
            object([
                ("title", string()),
                (
                    "steps",
                    array_of(object([
                        ("step", string()),
                        ("title", string()),
                        ("desc", string()),
                    ])),
                ),
            ]),
        ),
        (
            "offer",
            object([
                ("title", string()),
                (
                    "items",
                    array_of(object([
                        ("name", string()),
                        ("desc", string()),
                        ("value_tag", string()),
                    ])),
                ),
                ("price_anchor", string()),
                ("primary_cta", string()),
                ("risk_reversal", string()),
            ]),
        ),
        (
            "bonus",
            object([
                ("title", string()),
                (
                    "items",
                    array_of(object([("name", string()), ("desc", string())])),
                ),
            ]),
        ),
        (
            "faq",
            array_of(object([("q", string()), ("a", string())])),
        ),
        (
            "guarantee",
            object([("headline", string()), ("copy", string())]),
        ),
        (
            "cta_block",
            object([
                ("headline", string()),
                ("button_text", string()),
                ("reassurance", string()),
            ]),
        ),
        (
            "branding",
            object([
                (
                    "color_palette",
                    object([
                        ("primary", string()),
                        ("secondary", string()),
                        ("accent", string()),
                        ("background", string()),
                        ("text", string()),
                    ]),
                ),
                (
                    "typography",
                    object([("heading", string()), ("body", string())]),
                ),
            ]),
        ),
        (
            "extras",
            object([
                ("ugc_hooks", strings()),
                ("ad_angles", strings()),
                ("email_subjects", strings()),
            ]),
        ),
        (
            "systeme_sections",
            object([
                ("hero_html", string()),
                ("benefits_html", string()),
                ("offer_html", string()),
                ("faq_html", string()),
                ("cta_html", string()),
            ]),
        ),
    ])
}
