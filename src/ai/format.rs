//! Turns the markdown-flavored draft into HTML for an email body.
//!
//! This is a handful of substitutions, not a markdown parser. The
//! model is told to use `**bold**` and `[text](url)` only, so that's
//! all that gets converted.
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

pub const SUBJECT_PREFIX: &str = "Conference - ";

const FONT_FAMILY: &str = "Arial, sans-serif";
const FONT_SIZE: &str = "10pt";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FormattedReply {
    pub subject: Option<String>,
    pub html_body: String,
}

fn subject_regex() -> &'static Regex {
    static SUBJECT_RE: OnceLock<Regex> = OnceLock::new();
    SUBJECT_RE.get_or_init(|| {
        Regex::new(r"\*\*(?i:subject):[ \t]*(.*?)\*\*[ \t]*(?:\r?\n)?")
            .expect("subject regex must compile")
    })
}

fn bold_regex() -> &'static Regex {
    static BOLD_RE: OnceLock<Regex> = OnceLock::new();
    BOLD_RE.get_or_init(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold regex must compile"))
}

// Existing anchors and markdown links come before bare URLs in the
// alternation so a URL inside either is never linked on its own.
fn link_regex() -> &'static Regex {
    static LINK_RE: OnceLock<Regex> = OnceLock::new();
    LINK_RE.get_or_init(|| {
        Regex::new(
            r#"(?P<anchor><a\b[^>]*>.*?</a>)|\[(?P<label>[^\]]+)\]\((?P<href>[^)]+)\)|https?://[^\s)\]<>"]+"#,
        )
        .expect("link regex must compile")
    })
}

/// Pull a `**Subject: ...**` line out of the draft. Returns the
/// subject and the draft with that line removed.
pub fn split_subject(text: &str) -> (Option<String>, String) {
    if let Some(caps) = subject_regex().captures(text) {
        let subject = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
        if !subject.is_empty()
            && let Some(line) = caps.get(0)
        {
            let body = format!("{}{}", &text[..line.start()], &text[line.end()..]);
            return (Some(subject.to_string()), body);
        }
    }
    (None, text.to_string())
}

fn convert_links(text: &str) -> String {
    link_regex()
        .replace_all(text, |caps: &Captures| {
            if let Some(anchor) = caps.name("anchor") {
                return anchor.as_str().to_string();
            }
            if let (Some(label), Some(url)) = (caps.name("label"), caps.name("href")) {
                return format!(r#"<a href="{}">{}</a>"#, url.as_str().trim(), label.as_str());
            }
            let Some(url) = caps.get(0) else {
                return String::new();
            };
            // Directly inside brackets or parentheses, leave it be
            let preceding = text[..url.start()].chars().last();
            if matches!(preceding, Some('[' | '(')) {
                return url.as_str().to_string();
            }
            format!(r#"<a href="{0}">{0}</a>"#, url.as_str())
        })
        .to_string()
}

/// Bold, links and line breaks. Running this on its own output
/// changes nothing.
pub fn convert_markup(text: &str) -> String {
    let html = bold_regex().replace_all(text, "<strong>$1</strong>");
    let html = convert_links(&html);
    html.replace("\r\n", "<br>").replace('\n', "<br>")
}

/// Format a draft for the reply-all body.
pub fn format_reply(text: &str) -> FormattedReply {
    let (subject, body) = split_subject(text);
    let html = convert_markup(&body);

    // Keep the subject at the top of the body for easy copying since
    // the host may rewrite the subject line
    let subject_header = subject
        .as_ref()
        .map(|s| format!("{}<br><br>", s))
        .unwrap_or_default();

    FormattedReply {
        html_body: format!(
            r#"<div style="font-family: {}; font-size: {};">{}{}</div>"#,
            FONT_FAMILY, FONT_SIZE, subject_header, html
        ),
        subject,
    }
}

/// The subject to reply with: the one from the draft if there was one,
/// otherwise the original subject with the conference prefix.
pub fn reply_subject(extracted: Option<&str>, original: Option<&str>) -> String {
    if let Some(subject) = extracted.filter(|s| !s.is_empty()) {
        return subject.to_string();
    }
    let original = original.unwrap_or_default();
    if original.starts_with(SUBJECT_PREFIX) {
        original.to_string()
    } else {
        format!("{}{}", SUBJECT_PREFIX, original)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_extracts_the_subject_line() {
        let (subject, body) = split_subject("**Subject: Conference - Test (Ref 1)**\nHi Sam");
        assert_eq!(subject.as_deref(), Some("Conference - Test (Ref 1)"));
        assert!(body.starts_with("Hi Sam"));
        assert_eq!(body, "Hi Sam");
    }

    #[test]
    fn subject_label_is_case_insensitive() {
        let (subject, body) = split_subject("Hello\n**SUBJECT:   Conference - X  **\n\nHi");
        assert_eq!(subject.as_deref(), Some("Conference - X"));
        // Only one trailing newline is removed
        assert_eq!(body, "Hello\n\nHi");
    }

    #[test]
    fn no_subject_line_leaves_text_alone() {
        let (subject, body) = split_subject("**Private and Confidential**\nHi");
        assert_eq!(subject, None);
        assert_eq!(body, "**Private and Confidential**\nHi");

        let (subject, _) = split_subject("**Subject: **\nHi");
        assert_eq!(subject, None);
    }

    #[test]
    fn it_converts_bold() {
        let html = convert_markup("**Conference**");
        assert_eq!(html, "<strong>Conference</strong>");
        assert!(!html.contains("**"));

        let html = convert_markup("a **b** c **d**");
        assert_eq!(html, "a <strong>b</strong> c <strong>d</strong>");
    }

    #[test]
    fn bold_does_not_span_lines() {
        let html = convert_markup("**a\nb**");
        assert_eq!(html, "**a<br>b**");
    }

    #[test]
    fn it_links_bare_urls_and_markdown_links() {
        let html = convert_markup("See https://example.com/a and the [site](https://example.com/b).");
        assert_eq!(
            html,
            r#"See <a href="https://example.com/a">https://example.com/a</a> and the <a href="https://example.com/b">site</a>."#
        );
        assert_eq!(html.matches("<a ").count(), 2);
        assert!(!html.contains("<a href=\"<a"));
    }

    #[test]
    fn url_as_link_text_is_not_double_linked() {
        let html = convert_markup("[https://example.com/b](https://example.com/b)");
        assert_eq!(
            html,
            r#"<a href="https://example.com/b">https://example.com/b</a>"#
        );
    }

    #[test]
    fn parenthesized_urls_are_left_alone() {
        let html = convert_markup("(https://example.com/a)");
        assert_eq!(html, "(https://example.com/a)");
    }

    #[test]
    fn url_before_a_closing_paren_is_linked() {
        let html = convert_markup("(see https://example.com/a)");
        assert_eq!(
            html,
            r#"(see <a href="https://example.com/a">https://example.com/a</a>)"#
        );
    }

    #[test]
    fn bold_urls_are_linked() {
        let html = convert_markup("**https://example.com/a**");
        assert_eq!(
            html,
            r#"<strong><a href="https://example.com/a">https://example.com/a</a></strong>"#
        );
    }

    #[test]
    fn quoted_urls_are_linked() {
        let html = convert_markup("Form: \"https://example.com/q\"");
        assert_eq!(
            html,
            r#"Form: "<a href="https://example.com/q">https://example.com/q</a>""#
        );
    }

    #[test]
    fn existing_anchors_pass_through() {
        let html = r#"<a href="https://example.com/a">https://example.com/a</a> and <a href="https://example.com/b">site</a>"#;
        assert_eq!(convert_markup(html), html);
    }

    #[test]
    fn it_converts_newlines() {
        assert_eq!(convert_markup("a\nb\r\nc"), "a<br>b<br>c");
    }

    #[test]
    fn conversion_is_idempotent() {
        let inputs = [
            "**Private and Confidential**\n\nHi Sam\n",
            "Visit https://example.com/a or [our form](https://example.com/b).\n- **Thursday**; or",
            "Please select `Reply All`.",
            "**https://example.com/a** or \"https://example.com/q\"",
        ];
        for input in inputs {
            let once = convert_markup(input);
            let twice = convert_markup(&once);
            assert_eq!(once, twice);
            assert!(!once.contains("**"));
            assert!(!once.contains("]("));
        }
    }

    #[test]
    fn it_wraps_the_reply() {
        let reply = format_reply("**Subject: Conference - Test (Ref 1)**\nHi Sam\n**Conference**");
        assert_eq!(reply.subject.as_deref(), Some("Conference - Test (Ref 1)"));
        assert_eq!(
            reply.html_body,
            r#"<div style="font-family: Arial, sans-serif; font-size: 10pt;">Conference - Test (Ref 1)<br><br>Hi Sam<br><strong>Conference</strong></div>"#
        );
    }

    #[test]
    fn crlf_after_the_subject_line_is_removed() {
        let (subject, body) = split_subject("**Subject: Conference - Test (Ref 1)**\r\nHi Sam");
        assert_eq!(subject.as_deref(), Some("Conference - Test (Ref 1)"));
        assert_eq!(body, "Hi Sam");

        let reply = format_reply("**Subject: Conference - Test (Ref 1)**\r\nHi Sam");
        assert!(reply.html_body.contains("(Ref 1)<br><br>Hi Sam"));
        assert!(!reply.html_body.contains("<br><br><br>"));
    }

    #[test]
    fn it_wraps_a_reply_without_subject() {
        let reply = format_reply("Hi Sam");
        assert_eq!(reply.subject, None);
        assert_eq!(
            reply.html_body,
            r#"<div style="font-family: Arial, sans-serif; font-size: 10pt;">Hi Sam</div>"#
        );
    }

    #[test]
    fn it_picks_the_reply_subject() {
        assert_eq!(
            reply_subject(Some("Conference - From Draft"), Some("Original")),
            "Conference - From Draft"
        );
        assert_eq!(reply_subject(None, Some("Original")), "Conference - Original");
        assert_eq!(
            reply_subject(None, Some("Conference - Original")),
            "Conference - Original"
        );
        assert_eq!(reply_subject(Some(""), None), "Conference - ");
    }
}
