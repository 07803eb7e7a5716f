//! Embeddable snippet export for page builders.
//!
//! Everything, styles included, lives under one root element so the snippet
//! can be pasted into a third-party page without restyling it.

use super::ordered_sections;
use super::theme::Theme;
use crate::generation::models::FunnelDocument;

/// Id of the wrapping element every snippet rule is scoped to.
pub const SNIPPET_ROOT_ID: &str = "ll-root";

fn scoped_css(theme: &Theme<'_>) -> String {
    let root = format!("#{SNIPPET_ROOT_ID}");
    format!(
        "/* ===== LaunchLab Funnel Styles (scoped) ===== */
{root}{{--ll-primary:{primary};--ll-secondary:{secondary};
--ll-accent:{accent};--ll-bg:{background};--ll-text:{text};
font-family:{body};color:var(--ll-text)}}
{root} *{{box-sizing:border-box}}
{root} .ll-container{{max-width:1100px;margin:0 auto;padding:32px 20px;background:var(--ll-bg)}}
{root} h1,{root} h2,{root} h3{{font-family:{heading};margin:0 0 10px;line-height:1.15}}
{root} p,{root} li,{root} span{{opacity:.95}}
{root} .ll-btn{{display:inline-block;padding:12px 18px;border-radius:12px;text-decoration:none;color:#fff;background:var(--ll-primary)}}
{root} .ll-btn.secondary{{background:transparent;color:var(--ll-text);border:1px solid #ffffff22}}
{root} .ll-card{{background:#ffffff08;border:1px solid #ffffff14;border-radius:16px;padding:20px}}
{root} hr{{border:0;border-top:1px solid #ffffff14;margin:28px 0}}
@media (min-width:840px){{{root} .ll-grid{{display:grid;grid-template-columns:1fr 1fr;gap:20px}}}}
/* ===== End Styles ===== */",
        primary = theme.primary,
        secondary = theme.secondary,
        accent = theme.accent,
        background = theme.background,
        text = theme.text,
        heading = theme.heading_font,
        body = theme.body_font,
    )
}

/// Builds the `<style>` + `<section id="ll-root">` fragment.
pub fn build_full_page_snippet(doc: &FunnelDocument) -> String {
    let theme = Theme::resolve(&doc.branding);

    format!(
        r#"<style>{css}</style>
<section id="{SNIPPET_ROOT_ID}">
  <div class="ll-container">
    {sections}
  </div>
</section>"#,
        css = scoped_css(&theme),
        sections = ordered_sections(doc),
    )
}
