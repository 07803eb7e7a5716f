//! HTML exports of a generated funnel.
//!
//! Both builders are pure and total: any `FunnelDocument` produces a string,
//! and the same document always produces the same bytes. Section fragments
//! come from the model as HTML and are inserted as-is; only the page title
//! is escaped.

pub mod handlers;
pub mod page;
pub mod snippet;
pub mod theme;

use crate::generation::models::FunnelDocument;

pub use page::build_full_page_html;
pub use snippet::build_full_page_snippet;

const TITLE_PREFIX: &str = "LaunchLab — ";
const TITLE_FALLBACK_IDEA: &str = "Your brand made simple";

/// Joins the fragments named by `layout`, in layout order.
///
/// Tokens without a fragment (e.g. `Bonus`) and empty fragments are skipped.
pub fn ordered_sections(doc: &FunnelDocument) -> String {
    doc.layout
        .iter()
        .filter_map(|token| doc.systeme_sections.fragment(token))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// `meta.big_idea`, else a title built from the brand idea.
pub fn page_title(doc: &FunnelDocument) -> String {
    if !doc.meta.big_idea.is_empty() {
        return doc.meta.big_idea.clone();
    }
    let idea = if doc.meta.brand_idea.is_empty() {
        TITLE_FALLBACK_IDEA
    } else {
        doc.meta.brand_idea.as_str()
    };
    format!("{TITLE_PREFIX}{idea}")
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::fixtures::sample_document;

    #[test]
    fn test_sections_follow_layout_order() {
        let mut doc = sample_document();
        doc.layout = vec!["FAQ".into(), "Hero".into(), "CTA".into()];

        let body = ordered_sections(&doc);
        let s = &doc.systeme_sections;
        assert_eq!(
            body,
            format!("{}\n\n{}\n\n{}", s.faq_html, s.hero_html, s.cta_html)
        );
    }

    #[test]
    fn test_tokens_without_fragment_are_skipped() {
        let mut doc = sample_document();
        doc.layout = vec!["Bonus".into(), "Offer".into(), "Testimonials".into()];
        assert_eq!(ordered_sections(&doc), doc.systeme_sections.offer_html);
    }

    #[test]
    fn test_repeated_tokens_repeat_fragment() {
        let mut doc = sample_document();
        doc.layout = vec!["CTA".into(), "CTA".into()];
        let cta = &doc.systeme_sections.cta_html;
        assert_eq!(ordered_sections(&doc), format!("{cta}\n\n{cta}"));
    }

    #[test]
    fn test_title_prefers_big_idea_then_brand_idea_then_fallback() {
        let mut doc = sample_document();
        assert_eq!(page_title(&doc), "Turn any evening into a 10-minute spa ritual");

        doc.meta.big_idea.clear();
        assert_eq!(
            page_title(&doc),
            "LaunchLab — Handmade scented candles for self-care"
        );

        doc.meta.brand_idea.clear();
        assert_eq!(page_title(&doc), "LaunchLab — Your brand made simple");
    }

    #[test]
    fn test_escape_html_covers_markup_characters() {
        assert_eq!(
            escape_html(r#"Tom & "Jerry" <3 > 2"#),
            "Tom &amp; &quot;Jerry&quot; &lt;3 &gt; 2"
        );
        assert_eq!(escape_html("it's fine"), "it's fine");
    }
}
