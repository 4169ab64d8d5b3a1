//! Prompts for drafting conference follow-up emails, using Handlebars
//! for templating. Escaping is turned off since the output is sent to
//! the model as plain text, not rendered as HTML.

use std::fmt;
use std::sync::OnceLock;

use handlebars::{Handlebars, no_escape};
use regex::Regex;
use serde_json::json;

use crate::core::SamplingParams;
use crate::email::EmailRecord;
use crate::openai::CompletionRequest;

#[derive(Debug)]
pub enum Prompt {
    DraftReply,
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl From<Prompt> for String {
    fn from(item: Prompt) -> String {
        format!("{:?}", item)
    }
}

/// Terms that route a matter to the estate planning template.
pub const ESTATE_PLANNING_KEYWORDS: [&str; 7] = [
    "estate planning",
    "asset protection",
    "will",
    "enduring power of attorney",
    "estate plan",
    "SMSF Trust Deeds",
    "Family Trust Deeds",
];

pub const SYSTEM_PROMPT: &str = "You are an AI assistant specialized in analyzing legal correspondence and generating appropriate follow-up emails. Your task is to analyze an email from Bhavesh Mistry (BM) to a client and generate a draft response following specific templates and guidelines. Format your response using markdown for bold text (**bold**) and hyperlinks in the format [link text](URL).";

pub const TEMPLATE_A: &str = r"**Private and Confidential**

Hi [client name]

Further to Bhavesh Mistry's email correspondence today, we look forward to assisting you.

**Conference**

Please note, Bhavesh Mistry will be available at the following dates and times below for a **[meeting format]** with you for further discussion:

- [date/time option 1]; or
- [date/time option 2]; or
- [date/time option 3].

We look forward to hearing from you shortly.

Please email us ensuring that you select `Reply All` to our email so our team can assist you.";

pub const TEMPLATE_B: &str = r"**Private and Confidential**

Hi [client name]

Further to Bhavesh Mistry's email correspondence today, we look forward to assisting you with your estate planning.

**Conference**

To allow us to understand your intentions, Bhavesh Mistry will be available at the following dates and times below for a **[meeting format]** with you for an initial discussion of your estate planning:

- [date/time option 1]; or
- [date/time option 2]; or
- [date/time option 3].

Please kindly let us know if any of the above times are suitable and your best contact number. Alternatively, please let us know if there are any other dates and times more suitable for you.

**Questionnaire**

In preparation for our conference and to assist us in obtaining your initial information and allowing you to start considering your estate plan, please take a few minutes to complete our estate planning questionnaire at the following [link](https://mistryfallahi.com.au/client-asset-protection-enquiry/).

We look forward to hearing from you shortly.

Please email us ensuring that you select `Reply All` to our email so our team can assist you.";

const DRAFT_REPLY_PROMPT: &str = r#"AI Prompt for Email Analysis and Response Generation

Input Format
You will receive:
1. Initial Email: The original email sent by BM to the client including the subject line
2. Available Meeting Times: A list of dates and times when BM is available for meetings
3. Templates: Reference email templates to follow

Here is the email to analyze:
Subject: {{subject}}
From: {{sender}}{{#if date}}
Date: {{date}}{{/if}}
Body:
{{body}}

Available Meeting Times:
{{meeting_times}}

Analysis Requirements
Please analyze the initial email to identify:
1. Client Information:
   - Extract all client names mentioned in the email greeting (e.g., "Hi Barry" -> "Barry")
   - Note if multiple clients are addressed (e.g., couples, business partners)
2. Service Type:
   - Determine if the email is about estate planning or non-estate planning
   - Estate planning indicators include: {{estate_keywords}}
   - Non-estate planning might relate to: divorce, business matters, disputes, etc.
3. Meeting Format:
   - Identify if the meeting is proposed as:
     * MS Teams meeting (if call then also MS Teams meeting unless noted specifically that call will be on mobile)
     * In-person meeting at the office
     * In-person meeting at another location (specify if mentioned)
   - Default to "MS Teams meeting OR in-person meeting at our office" if unclear

Response Generation Guidelines
Based on your analysis:
1. Template Selection:
   - Use Template B if the matter involves estate planning
   - Use Template A for all other matters
2. Email Structure:
   - Begin with "Private and Confidential"
   - Address the client by name
   - Include "Conference" section with available meeting times
   - For estate planning, include "Questionnaire" section with link
   - End with standard closing and "Reply All" instruction
3. Formatting Requirements:
   - Maintain the exact formatting from the templates
   - Present meeting times as bullet points
   - Preserve all bold formatting for headings

Template Reference
Template A (Non-Estate Planning)
{{template_a}}

Template B (Estate Planning)
{{template_b}}

Output Format
Your response should include ONLY the Draft Email which is completely formatted following the appropriate template. Do not include headings like "Analysis" or "Draft Email".

Example output structure:
DRAFT EMAIL:
**Subject: Conference - [Include the complete subject here]**
[Complete formatted email]

Important Notes
- Do not include section headings like "Analysis:" or "Draft Email:" in your response.
- Do not include placeholders in the final draft email. All fields should be properly populated.
- Maintain exact formatting from templates including bold text, bullet points, and paragraph spacing.
- If anything is unclear, default to the most conservative option.
- The email subject line MUST have "Conference -" added at the beginning, followed by the complete original subject.
- For example: "Conference - Estate Planning - Paulina and Alex Pavlova (Our Ref: 10-0204)"
- Date and time to be in this format: Thursday, 27 March 2025 at 10:30am, 1:30pm or 2:30pm.
- Use **bold** markdown formatting for headings and important text.
- Format the link in the questionnaire section as a proper markdown link [link](URL).
"#;

pub fn templates<'a>() -> Handlebars<'a> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    registry.register_escape_fn(no_escape);
    registry
        .register_template_string(&Prompt::DraftReply.to_string(), DRAFT_REPLY_PROMPT)
        .expect("Failed to register template");
    registry
}

/// The two reference emails given to the model as examples.
#[derive(Clone, Debug)]
pub struct Templates {
    /// Everything that isn't estate planning
    pub a: String,
    /// Estate planning
    pub b: String,
}

impl Default for Templates {
    fn default() -> Self {
        Self {
            a: TEMPLATE_A.to_string(),
            b: TEMPLATE_B.to_string(),
        }
    }
}

/// Which template the keyword rule points at. The model makes the
/// actual call, this is only used for logging.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ServiceType {
    EstatePlanning,
    Other,
}

fn estate_planning_regex() -> &'static Regex {
    static ESTATE_RE: OnceLock<Regex> = OnceLock::new();
    ESTATE_RE.get_or_init(|| {
        // "will" on its own is mostly the verb, only count it as a document
        let mut alternatives: Vec<String> = ESTATE_PLANNING_KEYWORDS
            .iter()
            .filter(|k| **k != "will")
            .map(|k| regex::escape(k))
            .collect();
        alternatives.push(String::from(
            r"(?:your|a|new|the|existing|update|updated)\s+wills?|wills?\s+and",
        ));
        Regex::new(&format!(r"(?i)\b(?:{})\b", alternatives.join("|")))
            .expect("estate planning regex must compile")
    })
}

impl ServiceType {
    pub fn classify(email: &EmailRecord) -> Self {
        let subject = email.subject.as_deref().unwrap_or_default();
        if estate_planning_regex().is_match(subject) || estate_planning_regex().is_match(&email.body)
        {
            ServiceType::EstatePlanning
        } else {
            ServiceType::Other
        }
    }

    pub fn template_name(&self) -> &'static str {
        match self {
            ServiceType::EstatePlanning => "Template B",
            ServiceType::Other => "Template A",
        }
    }
}

/// Build the completion request for drafting a reply to `email`.
/// Works for any record, missing fields render empty.
pub fn build_request(
    email: &EmailRecord,
    meeting_options: &[String],
    templates: &Templates,
    sampling: &SamplingParams,
) -> CompletionRequest {
    let meeting_times: Vec<String> = meeting_options.iter().map(|o| format!("- {}", o)).collect();
    let estate_keywords: Vec<String> = ESTATE_PLANNING_KEYWORDS
        .iter()
        .map(|k| format!("\"{}\"", k))
        .collect();
    let date = email.received_time_iso();

    let user_prompt = templates_render(&json!({
        "subject": email.subject.as_deref().unwrap_or_default(),
        "sender": email.sender,
        "date": date,
        "body": email.body,
        "meeting_times": meeting_times.join("\n"),
        "estate_keywords": estate_keywords.join(", "),
        "template_a": templates.a,
        "template_b": templates.b,
    }));

    CompletionRequest::new(SYSTEM_PROMPT, &user_prompt, sampling)
}

fn templates_render(data: &serde_json::Value) -> String {
    // Every key the template uses is always present and nothing is
    // escaped, so rendering can't fail
    templates()
        .render(&Prompt::DraftReply.to_string(), data)
        .expect("Failed to render draft reply prompt")
}
