//! Project cards as an HTML fragment.

use std::fmt::Write;

use crate::project::ProjectEntry;

/// Escapes text for use in element content and double- or single-quoted attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// A tag as a CSS class token: ASCII alphanumerics kept, everything else `-`.
fn class_token(tag: &str) -> String {
    tag.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

fn render_card(p: &ProjectEntry) -> String {
    let mut tags_html = String::new();
    for tag in &p.tags {
        let _ = write!(
            tags_html,
            r#"<span class="linguagem-tag {}">{}</span>"#,
            class_token(tag),
            escape_html(tag)
        );
    }
    format!(
        concat!(
            "<div class=\"projeto-card\">\n",
            "    <h3>{title}</h3>\n",
            "    <p>{description}</p>\n",
            "    <div class=\"projeto-linguagens\">{tags}</div>\n",
            "    <a href=\"{link}\" class=\"projeto-link\" target=\"_blank\" rel=\"noopener noreferrer\">Ver detalhes</a>\n",
            "</div>"
        ),
        title = escape_html(&p.title),
        description = escape_html(&p.description),
        tags = tags_html,
        link = escape_html(&p.link),
    )
}

/// One card per project, in input order, joined by newlines. Pure and deterministic.
pub fn render_cards(projects: &[ProjectEntry]) -> String {
    projects
        .iter()
        .map(render_card)
        .collect::<Vec<_>>()
        .join("\n")
}
