//! Recommendation Report Formatting
//!
//! Renders a [`Recommendation`] as the fixed markdown report shown in the UI,
//! and converts markdown to HTML for the web page.

use std::fmt::Display;

use pulldown_cmark::{html, Event, Parser};

use crate::features::FEATURES;
use crate::recommend::Recommendation;

/// Markdown formatter for recommendations
pub struct ReportFormatter;

impl ReportFormatter {
    /// Fixed-format report: resolved crop name plus the seven raw inputs
    pub fn format(recommendation: &Recommendation) -> String {
        let mut md = String::with_capacity(512);

        md.push_str("# 🎯 Recommendation\n\n");
        md.push_str(&format!(
            "## Ideal crop: {}\n\n",
            recommendation.crop_name()
        ));

        md.push_str("### 📊 Your parameters:\n");
        for spec in &FEATURES {
            md.push_str(&format!(
                "- **{}**: {}{}\n",
                spec.report_label,
                recommendation.inputs.get(spec.key),
                spec.unit
            ));
        }

        md.push_str("\n### ✅ This crop is well suited to your soil!\n");
        md
    }

    /// Report shown in place of a recommendation when prediction fails
    pub fn format_error(error: &dyn Display) -> String {
        format!("❌ Prediction failed: {}", error)
    }
}

/// Render markdown to an HTML fragment.
///
/// Raw HTML in the source is emitted as escaped text: error reports echo
/// user-submitted form values.
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new(markdown).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });
    let mut out = String::with_capacity(markdown.len() * 2);
    html::push_html(&mut out, parser);
    out
}
