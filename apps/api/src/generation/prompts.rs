// Prompt text for funnel generation.
// Cross-cutting JSON-only instructions live in llm_client::prompts.

use super::models::FunnelFormState;
use super::schema::funnel_response_schema;

/// Builds the instruction for a schema-constrained (blocking) request.
///
/// Form values are interpolated verbatim, with no escaping.
pub fn build_funnel_prompt(form: &FunnelFormState) -> String {
    format!(
        r#"You are FunnelBot, an expert direct-response marketer. Generate a complete, conversion-ready marketing funnel for the inputs below.

YOUR TASK:
Write all the copy, structure, branding and marketing assets for one landing page.
Return a single valid JSON object that strictly follows the response schema. No text, markdown or comments outside the JSON object.

INPUTS:
- Brand/Product Idea: "{brand_idea}"
- Industry: "{industry}"
- Tone of Voice: "{tone}"
- Generation Mode: "{mode}" (Quick = concise copy, Detailed = more fleshed-out copy)

KEY DIRECTIVES:
1. TONE: every line of copy must consistently reflect the "{tone}" tone.
2. CLARITY: scannable copy, short sentences, bullet points.
3. RELEVANCE: the offer and all content must fit the "{industry}" industry and the core idea "{brand_idea}".
4. CREDIBILITY: realistic promises only. No hype.
5. LAYOUT: `layout` lists the page sections in display order using Hero, Benefits, Offer, Bonus, FAQ, CTA.
6. HTML: each `systeme_sections` field is a self-contained HTML fragment for that section, styled with the classes ll-btn, ll-card, ll-grid and the CSS variables --ll-primary, --ll-secondary, --ll-accent, --ll-bg, --ll-text."#,
        brand_idea = form.brand_idea,
        industry = form.industry,
        tone = form.tone,
        mode = form.mode,
    )
}

/// Builds the instruction for a streaming request.
///
/// Streaming calls carry no backend-side schema, so the schema travels in
/// the prompt text instead.
pub fn build_streaming_prompt(form: &FunnelFormState) -> String {
    let schema = serde_json::to_string_pretty(&funnel_response_schema())
        .unwrap_or_else(|_| funnel_response_schema().to_string());

    format!(
        "{base}\n\nRESPONSE SCHEMA (every property is required):\n{schema}\n\n\
         Respond with the raw JSON object only. Do NOT wrap it in markdown code fences.",
        base = build_funnel_prompt(form),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::models::FunnelMode;

    fn form(brand_idea: &str) -> FunnelFormState {
        FunnelFormState {
            brand_idea: brand_idea.to_string(),
            industry: "Wellness".to_string(),
            tone: "Luxury".to_string(),
            mode: FunnelMode::Detailed,
        }
    }

    #[test]
    fn test_prompt_embeds_all_form_values_verbatim() {
        let f = form("Breathwork classes for \"busy\" founders {tone} & <friends>");
        let prompt = build_funnel_prompt(&f);

        assert!(prompt.contains(&f.brand_idea));
        assert!(prompt.contains("\"Wellness\""));
        assert!(prompt.contains("\"Luxury\""));
        assert!(prompt.contains("\"Detailed\""));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let f = form("Handmade candles");
        assert_eq!(build_funnel_prompt(&f), build_funnel_prompt(&f.clone()));
        assert_eq!(build_streaming_prompt(&f), build_streaming_prompt(&f));
    }

    #[test]
    fn test_streaming_prompt_carries_schema() {
        let prompt = build_streaming_prompt(&form("Handmade candles"));
        assert!(prompt.starts_with(&build_funnel_prompt(&form("Handmade candles"))));
        assert!(prompt.contains("\"systeme_sections\""));
        assert!(prompt.contains("\"OBJECT\""));
    }
}
