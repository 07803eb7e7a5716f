use serde::Serialize;

use super::{DisplayLine, DisplaySection};
use crate::export::theme::Theme;
use crate::generation::models::{FunnelDocument, FRAGMENT_SECTIONS};

fn heading(s: &str) -> DisplayLine {
    DisplayLine::Heading(s.to_string())
}

fn paragraph(s: &str) -> DisplayLine {
    DisplayLine::Paragraph(s.to_string())
}

fn field(label: &str, value: &str) -> DisplayLine {
    DisplayLine::Field {
        label: label.to_string(),
        value: value.to_string(),
    }
}

fn bullets<'a>(items: impl IntoIterator<Item = &'a String> + 'a) -> impl Iterator<Item = DisplayLine> + 'a {
    items.into_iter().map(|s| DisplayLine::Bullet(s.clone()))
}

fn pretty<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

/// Attaches the layout fragment for `token`, when the document has one.
fn with_fragment(mut section: DisplaySection, doc: &FunnelDocument, token: &str) -> DisplaySection {
    if let Some(html) = doc.systeme_sections.fragment(token) {
        section.html = Some(html.to_string());
        section.download_name = FRAGMENT_SECTIONS
            .iter()
            .find(|(name, _)| *name == token)
            .map(|(_, file)| *file);
    }
    section
}

pub(super) fn big_idea(doc: &FunnelDocument) -> DisplaySection {
    let meta = &doc.meta;
    DisplaySection::new(
        "big-idea",
        "Big Idea",
        vec![
            heading(&meta.big_idea),
            field("Idea", &meta.brand_idea),
            field("Industry", &meta.industry),
            field("Tone", &meta.tone),
            field("Mode", &meta.mode),
        ],
    )
    .with_copy(meta.big_idea.as_str())
}

pub(super) fn funnel_at_a_glance(doc: &FunnelDocument) -> DisplaySection {
    let awareness = doc
        .extras
        .ad_angles
        .first()
        .filter(|angle| !angle.is_empty())
        .unwrap_or(&doc.hero.viral_hook);

    let stages = [
        ("Awareness", awareness),
        ("Interest", &doc.hero.headline),
        ("Consideration", &doc.offer.title),
        ("Conversion", &doc.cta_block.headline),
    ];

    DisplaySection::new(
        "funnel-at-a-glance",
        "Funnel at a Glance",
        stages
            .into_iter()
            .map(|(name, content)| DisplayLine::Stage {
                name: name.to_string(),
                content: content.clone(),
            })
            .collect(),
    )
}

pub(super) fn hero(doc: &FunnelDocument) -> DisplaySection {
    let hero = &doc.hero;
    let mut lines = vec![heading(&hero.headline), paragraph(&hero.subheadline)];
    lines.extend(bullets(&hero.hero_points));
    lines.push(DisplayLine::Tag(hero.primary_cta.clone()));
    lines.push(DisplayLine::Tag(hero.secondary_cta.clone()));
    lines.push(field("Viral hook", &hero.viral_hook));

    let section = DisplaySection::new("hero", "Hero", lines).with_copy(hero.headline.as_str());
    with_fragment(section, doc, "Hero")
}

pub(super) fn social_proof(doc: &FunnelDocument) -> DisplaySection {
    let proof = &doc.social_proof;
    let mut lines = vec![paragraph(&proof.proof_line)];
    lines.extend(proof.badges.iter().map(|b| DisplayLine::Tag(b.clone())));
    lines.extend(proof.mini_testimonials.iter().map(|t| {
        let mut text = format!("{} — {}", t.name, t.snippet);
        if !t.result.is_empty() {
            text.push_str(&format!(" ({})", t.result));
        }
        DisplayLine::Bullet(text)
    }));

    DisplaySection::new("social-proof", "Social Proof", lines).with_copy(proof.proof_line.as_str())
}

pub(super) fn benefits(doc: &FunnelDocument) -> DisplaySection {
    let section = DisplaySection::new("benefits", "Benefits", bullets(&doc.benefits.bullets).collect())
        .with_copy(doc.benefits.bullets.join("\n"));
    with_fragment(section, doc, "Benefits")
}

pub(super) fn how_it_works(doc: &FunnelDocument) -> DisplaySection {
    let steps = &doc.how_it_works.steps;
    DisplaySection::new(
        "how-it-works",
        "How It Works",
        steps
            .iter()
            .map(|s| DisplayLine::Bullet(format!("{}: {}", s.title, s.desc)))
            .collect(),
    )
    .with_copy(pretty(steps))
}

pub(super) fn offer(doc: &FunnelDocument) -> DisplaySection {
    let offer = &doc.offer;
    let mut lines = vec![heading(&offer.title)];
    lines.extend(offer.items.iter().map(|item| {
        DisplayLine::Bullet(format!("{} — {} {}", item.name, item.desc, item.value_tag))
    }));
    lines.push(paragraph(&offer.price_anchor));
    lines.push(field("Risk reversal", &offer.risk_reversal));
    lines.push(DisplayLine::Tag(offer.primary_cta.clone()));

    with_fragment(DisplaySection::new("offer", "Offer", lines), doc, "Offer")
}

pub(super) fn bonus(doc: &FunnelDocument) -> DisplaySection {
    let items = &doc.bonus.items;
    DisplaySection::new(
        "bonus",
        "Bonus",
        items
            .iter()
            .map(|b| DisplayLine::Bullet(format!("{}: {}", b.name, b.desc)))
            .collect(),
    )
    .with_copy(pretty(items))
}

pub(super) fn faq(doc: &FunnelDocument) -> DisplaySection {
    let lines = doc
        .faq
        .iter()
        .flat_map(|entry| [heading(&entry.q), paragraph(&entry.a)])
        .collect();
    with_fragment(DisplaySection::new("faq", "FAQ", lines), doc, "FAQ")
}

pub(super) fn guarantee(doc: &FunnelDocument) -> DisplaySection {
    let g = &doc.guarantee;
    DisplaySection::new(
        "guarantee",
        "Guarantee",
        vec![heading(&g.headline), paragraph(&g.copy)],
    )
    .with_copy(format!("{}\n\n{}", g.headline, g.copy))
}

pub(super) fn final_cta(doc: &FunnelDocument) -> DisplaySection {
    let cta = &doc.cta_block;
    let lines = vec![
        heading(&cta.headline),
        DisplayLine::Tag(cta.button_text.clone()),
        paragraph(&cta.reassurance),
    ];
    with_fragment(DisplaySection::new("final-cta", "Final CTA", lines), doc, "CTA")
}

/// Swatches show the colours an export would actually use.
pub(super) fn branding(doc: &FunnelDocument) -> DisplaySection {
    let theme = Theme::resolve(&doc.branding);
    let swatch = |name: &str, color: &str| DisplayLine::Swatch {
        name: name.to_string(),
        color: color.to_string(),
    };

    DisplaySection::new(
        "branding",
        "Branding",
        vec![
            swatch("Primary", theme.primary),
            swatch("Secondary", theme.secondary),
            swatch("Accent", theme.accent),
            swatch("Background", theme.background),
            swatch("Text", theme.text),
            field("Heading", theme.heading_font),
            field("Body", theme.body_font),
        ],
    )
}

pub(super) fn extras(doc: &FunnelDocument) -> DisplaySection {
    let extras = &doc.extras;
    let mut lines = Vec::new();
    for (title, items) in [
        ("UGC Hooks", &extras.ugc_hooks),
        ("Ad Angles", &extras.ad_angles),
        ("Email Subjects", &extras.email_subjects),
    ] {
        lines.push(heading(title));
        lines.extend(bullets(items));
    }

    DisplaySection::new("extras", "Extras", lines).with_copy(pretty(extras))
}

pub(super) fn raw_json(doc: &FunnelDocument) -> DisplaySection {
    let json = pretty(doc);
    DisplaySection::new("raw-json", "Raw JSON", vec![DisplayLine::Code(json.clone())]).with_copy(json)
}
