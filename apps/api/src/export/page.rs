//! Standalone HTML document export.

use super::theme::Theme;
use super::{escape_html, ordered_sections, page_title};
use crate::generation::models::FunnelDocument;

fn page_css(theme: &Theme<'_>) -> String {
    format!(
        r#"
:root{{
  --ll-primary:{primary};
  --ll-secondary:{secondary};
  --ll-accent:{accent};
  --ll-bg:{background};
  --ll-text:{text};
}}
*{{box-sizing:border-box}}
html,body{{margin:0;padding:0;background:var(--ll-bg);color:var(--ll-text);}}
.ll-container{{max-width:1100px;margin:0 auto;padding:32px 20px;}}
h1,h2,h3{{font-family:{heading};margin:0 0 10px;line-height:1.15}}
p,li,span,div{{font-family:{body};}}
.ll-btn{{display:inline-block;padding:12px 18px;border-radius:12px;text-decoration:none;color:#fff;background:var(--ll-primary);}}
.ll-btn.secondary{{background:transparent;color:var(--ll-text);border:1px solid #ffffff22}}
.ll-card{{background:#ffffff08;border:1px solid #ffffff14;border-radius:16px;padding:20px}}
hr{{border:0;border-top:1px solid #ffffff14;margin:28px 0}}
@media (min-width:840px){{ .ll-grid{{display:grid;grid-template-columns:1fr 1fr;gap:20px}} }}
"#,
        primary = theme.primary,
        secondary = theme.secondary,
        accent = theme.accent,
        background = theme.background,
        text = theme.text,
        heading = theme.heading_font,
        body = theme.body_font,
    )
}

/// Builds a complete HTML document for download.
pub fn build_full_page_html(doc: &FunnelDocument) -> String {
    let theme = Theme::resolve(&doc.branding);

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8"/>
  <meta name="viewport" content="width=device-width,initial-scale=1"/>
  <title>{title}</title>
  <style>{css}</style>
</head>
<body>
  <main class="ll-container">
    {sections}
  </main>
</body>
</html>"#,
        title = escape_html(&page_title(doc)),
        css = page_css(&theme),
        sections = ordered_sections(doc),
    )
}
