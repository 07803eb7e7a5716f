//! Funnel Renderer. Maps a validated document onto the fixed list of
//! display sections the preview shows.
//!
//! The view is plain data: every section is a title, a list of display
//! lines, and the optional copy text, HTML fragment and download filename
//! its actions offer. Rendering never fails and never mutates the document.

pub mod handlers;
mod sections;

use serde::Serialize;

use crate::generation::models::FunnelDocument;

/// One line of display content inside a section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DisplayLine {
    Heading(String),
    Paragraph(String),
    Bullet(String),
    Tag(String),
    Field { label: String, value: String },
    Swatch { name: String, color: String },
    Stage { name: String, content: String },
    Code(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplaySection {
    pub id: &'static str,
    pub title: &'static str,
    pub lines: Vec<DisplayLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_name: Option<&'static str>,
}

impl DisplaySection {
    fn new(id: &'static str, title: &'static str, lines: Vec<DisplayLine>) -> Self {
        Self {
            id,
            title,
            lines,
            copy: None,
            html: None,
            download_name: None,
        }
    }

    fn with_copy(mut self, copy: impl Into<String>) -> Self {
        self.copy = Some(copy.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunnelView {
    pub sections: Vec<DisplaySection>,
}

/// Renders every section, in display order.
pub fn render_funnel(doc: &FunnelDocument) -> FunnelView {
    FunnelView {
        sections: vec![
            sections::big_idea(doc),
            sections::funnel_at_a_glance(doc),
            sections::hero(doc),
            sections::social_proof(doc),
            sections::benefits(doc),
            sections::how_it_works(doc),
            sections::offer(doc),
            sections::bonus(doc),
            sections::faq(doc),
            sections::guarantee(doc),
            sections::final_cta(doc),
            sections::branding(doc),
            sections::extras(doc),
            sections::raw_json(doc),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::fixtures::sample_document;

    impl FunnelView {
        fn section(&self, id: &str) -> Option<&DisplaySection> {
            self.sections.iter().find(|s| s.id == id)
        }
    }

    fn stage<'a>(view: &'a FunnelView, name: &str) -> &'a str {
        view.section("funnel-at-a-glance")
            .unwrap()
            .lines
            .iter()
            .find_map(|line| match line {
                DisplayLine::Stage { name: n, content } if n == name => Some(content.as_str()),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn test_sections_render_in_fixed_order() {
        let view = render_funnel(&sample_document());
        let titles: Vec<&str> = view.sections.iter().map(|s| s.title).collect();
        assert_eq!(
            titles,
            vec![
                "Big Idea",
                "Funnel at a Glance",
                "Hero",
                "Social Proof",
                "Benefits",
                "How It Works",
                "Offer",
                "Bonus",
                "FAQ",
                "Guarantee",
                "Final CTA",
                "Branding",
                "Extras",
                "Raw JSON",
            ]
        );
    }

    #[test]
    fn test_awareness_uses_first_ad_angle() {
        let doc = sample_document();
        let view = render_funnel(&doc);
        assert_eq!(stage(&view, "Awareness"), doc.extras.ad_angles[0]);
        assert_eq!(stage(&view, "Interest"), doc.hero.headline);
        assert_eq!(stage(&view, "Consideration"), doc.offer.title);
        assert_eq!(stage(&view, "Conversion"), doc.cta_block.headline);
    }

    #[test]
    fn test_awareness_falls_back_to_viral_hook() {
        let mut doc = sample_document();
        doc.extras.ad_angles.clear();
        let view = render_funnel(&doc);
        assert_eq!(stage(&view, "Awareness"), doc.hero.viral_hook);

        doc.extras.ad_angles = vec![String::new()];
        let view = render_funnel(&doc);
        assert_eq!(stage(&view, "Awareness"), doc.hero.viral_hook);
    }

    #[test]
    fn test_fragment_sections_carry_html_and_filename() {
        let doc = sample_document();
        let view = render_funnel(&doc);

        let hero = view.section("hero").unwrap();
        assert_eq!(hero.html.as_deref(), Some(doc.systeme_sections.hero_html.as_str()));
        assert_eq!(hero.download_name, Some("hero.html"));
        assert_eq!(hero.copy.as_deref(), Some(doc.hero.headline.as_str()));

        let cta = view.section("final-cta").unwrap();
        assert_eq!(cta.download_name, Some("cta.html"));

        let bonus = view.section("bonus").unwrap();
        assert!(bonus.html.is_none());
        assert!(bonus.download_name.is_none());
    }

    #[test]
    fn test_empty_document_renders_without_content() {
        let view = render_funnel(&FunnelDocument::default());
        assert_eq!(view.sections.len(), 14);

        let benefits = view.section("benefits").unwrap();
        assert!(benefits.lines.is_empty());
        assert!(benefits.html.is_none());
        assert_eq!(benefits.copy.as_deref(), Some(""));
    }

    #[test]
    fn test_raw_json_round_trips_the_document() {
        let doc = sample_document();
        let view = render_funnel(&doc);
        let raw = view.section("raw-json").unwrap().copy.clone().unwrap();
        let back: FunnelDocument = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_display_lines_serialize_with_kind_tag() {
        let line = DisplayLine::Swatch {
            name: "Primary".to_string(),
            color: "#000000".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&line).unwrap(),
            serde_json::json!({"kind": "swatch", "value": {"name": "Primary", "color": "#000000"}})
        );
        assert_eq!(
            serde_json::to_value(DisplayLine::Bullet("x".into())).unwrap(),
            serde_json::json!({"kind": "bullet", "value": "x"})
        );
    }
}
