//! Rendering of generated articles into a self-contained, inline-styled HTML
//! document for the Blogger post body.
//!
//! Blogger themes frequently override colours, so every element carries its
//! own `!important` styles. The article body is trusted HTML from the model;
//! the remaining fields are plain text and get escaped.

use super::content_models::Article;
use super::images::FALLBACK_IMAGE;
use rand::seq::SliceRandom;

/// Colour set for one rendered post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub primary: &'static str,
    pub secondary: &'static str,
    pub accent: &'static str,
}

pub const THEMES: [Theme; 5] = [
    Theme { primary: "#2563eb", secondary: "#1e40af", accent: "#dc2626" },
    Theme { primary: "#059669", secondary: "#047857", accent: "#ea580c" },
    Theme { primary: "#7c3aed", secondary: "#6d28d9", accent: "#dc2626" },
    Theme { primary: "#dc2626", secondary: "#b91c1c", accent: "#2563eb" },
    Theme { primary: "#ea580c", secondary: "#dc2626", accent: "#059669" },
];

pub trait ArticleRenderer: Send + Sync {
    fn render(&self, article: &Article) -> String;
}

impl ArticleRenderer for Box<dyn ArticleRenderer> {
    fn render(&self, article: &Article) -> String {
        (**self).render(article)
    }
}

/// Renders with a theme picked at random for every post.
#[derive(Debug, Default, Clone, Copy)]
pub struct StyledHtmlRenderer;

impl ArticleRenderer for StyledHtmlRenderer {
    fn render(&self, article: &Article) -> String {
        let theme = THEMES
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(THEMES[0]);
        render_with_theme(article, &theme)
    }
}

pub fn render_with_theme(article: &Article, theme: &Theme) -> String {
    let image_url = escape_html(article.image_url.as_deref().unwrap_or(FALLBACK_IMAGE));
    let title = escape_html(&article.title);

    let tags: String = article
        .tags
        .iter()
        .map(|tag| {
            format!(
                r#"<span style="background: {accent}20; color: {accent} !important; padding: 8px 16px; border-radius: 20px; font-size: 14px; font-weight: 500;">#{tag}</span>"#,
                accent = theme.accent,
                tag = escape_html(tag)
            )
        })
        .collect();

    format!(
        r#"<div style="max-width: 860px; margin: 0 auto; font-family: 'Pretendard', -apple-system, BlinkMacSystemFont, sans-serif; line-height: 1.8; color: #111827 !important; background-color: #ffffff !important;">
  <header style="background: linear-gradient(135deg, {primary} 0%, {secondary} 100%); padding: 60px 40px; border-radius: 20px; color: #ffffff !important; margin-bottom: 40px;">
    <h1 style="font-size: 40px; font-weight: 800; margin: 0 0 16px 0; color: #ffffff !important;">{title}</h1>
    <p style="font-size: 20px; font-weight: 300; margin: 0; color: #ffffff !important;">{subtitle}</p>
  </header>
  <figure style="margin: 0 0 40px 0; text-align: center;">
    <img src="{image_url}" alt="{title}" style="width: 100%; border-radius: 16px;" onerror="this.src='{fallback}'" />
  </figure>
  <div style="background-color: #ffffff !important; padding: 30px; border-radius: 12px;">
    <div class="content-wrapper" style="font-size: 18px; line-height: 1.9; color: #111827 !important;">
{content}
    </div>
  </div>
  <div style="display: flex; flex-wrap: wrap; gap: 10px; margin: 40px 0;">{tags}</div>
  <aside style="background: #f9fafb; padding: 24px; border-radius: 12px; border-left: 4px solid {primary}; color: #1f2937 !important;">
    <p style="margin: 0; color: #4b5563 !important; font-size: 16px;"><strong>Summary:</strong> {summary}</p>
  </aside>
</div>"#,
        primary = theme.primary,
        secondary = theme.secondary,
        title = title,
        subtitle = escape_html(&article.subtitle),
        image_url = image_url,
        fallback = FALLBACK_IMAGE,
        content = article.content,
        tags = tags,
        summary = escape_html(&article.summary),
    )
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
