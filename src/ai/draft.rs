//! Models sometimes ignore the instruction to leave out the analysis
//! and wrap the draft in headings. These rules cut the response down
//! to just the draft email.

/// Keep only the text after `marker`, if present.
#[derive(Debug)]
pub struct DraftRule {
    pub name: &'static str,
    pub marker: &'static str,
}

impl DraftRule {
    pub fn apply<'a>(&self, text: &'a str) -> &'a str {
        match text.split_once(self.marker) {
            Some((_, rest)) => {
                tracing::debug!("Stripped {} from response", self.name);
                rest.trim()
            }
            None => text,
        }
    }
}

/// Applied in order. The analysis section goes first so a draft
/// heading inside it is still found afterwards.
pub const DRAFT_RULES: [DraftRule; 3] = [
    DraftRule {
        name: "analysis section",
        marker: "### Analysis:",
    },
    DraftRule {
        name: "draft heading",
        marker: "### Draft Email:",
    },
    DraftRule {
        name: "draft marker",
        marker: "DRAFT EMAIL:",
    },
];

/// Reduce a raw model response to the draft email.
pub fn extract_draft(raw: &str) -> String {
    DRAFT_RULES
        .iter()
        .fold(raw.trim(), |text, rule| rule.apply(text))
        .to_string()
}
