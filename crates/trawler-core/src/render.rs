//! Embeds, controls and status lines shown for reports and lookups.

use chrono::{DateTime, Utc};

use trawler_types::events::{ReviewAction, Reviewer};
use trawler_types::message::{Control, ControlStyle, Embed, EmbedField};
use trawler_types::models::{Classification, ClassificationRecord, KnownDomainInfo, Report};

pub const FIELD_REPORTER: &str = "Reporter:";
pub const FIELD_REPORT_ID: &str = "Report ID:";
pub const FIELD_REPORT_COUNT: &str = "Report Count:";
pub const FIELD_FIRST_REPORTED: &str = "First Reported:";
pub const FIELD_LAST_REPORTED: &str = "Last Reported:";
pub const FIELD_TARGET: &str = "Targeted Brand:";
pub const FIELD_URL: &str = "URL:";
pub const FIELD_COMMENT: &str = "Comment:";

const COLOUR_REVIEW: u32 = 5_814_783;
const COLOUR_UNKNOWN: u32 = 11_184_810;
const COLOUR_SAFE: u32 = 5_023_065;
const COLOUR_SUSPICIOUS: u32 = 16_496_712;
const COLOUR_MALICIOUS: u32 = 15_157_819;

const SUCCESS: &str = "✅";
const FAIL: &str = "❌";
const ALERT: &str = "⚠️";

/// Discord timestamp markup, rendered in each viewer's timezone.
pub fn discord_time(at: DateTime<Utc>) -> String {
    format!("<t:{}>", at.timestamp())
}

fn code_block(text: &str) -> String {
    format!("```{}```", text)
}

// -- Moderator message --

/// Embed of the moderator message.
pub fn review_embed(report: &Report) -> Embed {
    let mut fields = vec![
        EmbedField::new(
            FIELD_REPORTER,
            report
                .reported_by
                .as_deref()
                .map(|id| format!("<@{}>", id))
                .unwrap_or_else(|| "Unknown".into()),
            true,
        ),
        EmbedField::new(FIELD_REPORT_ID, report.id.to_string(), true),
        EmbedField::new(FIELD_REPORT_COUNT, report.reports.unwrap_or(1).to_string(), true),
        EmbedField::new(
            FIELD_FIRST_REPORTED,
            report.reported.map(discord_time).unwrap_or_else(|| "Unknown".into()),
            true,
        ),
        EmbedField::new(
            FIELD_LAST_REPORTED,
            report
                .reported_last
                .or(report.reported)
                .map(discord_time)
                .unwrap_or_else(|| "Unknown".into()),
            true,
        ),
        EmbedField::new(FIELD_TARGET, target_label(report), true),
        EmbedField::new(FIELD_URL, code_block(&report.url), false),
    ];

    if let Some(comment) = report.comment.as_deref().filter(|c| !c.is_empty()) {
        fields.push(EmbedField::new(FIELD_COMMENT, code_block(comment), false));
    }

    Embed {
        title: Some("🎣 New Phish Reported".into()),
        description: Some(report.domain.clone()),
        colour: Some(COLOUR_REVIEW),
        fields,
        timestamp: Some(Utc::now()),
        image: report.screenshot_url.clone(),
        thumbnail: None,
    }
}

pub fn target_label(report: &Report) -> String {
    report.target.clone().unwrap_or_else(|| "Unknown".into())
}

/// The three review actions plus the Talos and URLScan reference links.
pub fn review_controls(report: &Report) -> Vec<Control> {
    let urlscan = match report.urlscan_id.as_deref() {
        Some(id) => Control::Link {
            label: "URLScan Result".into(),
            url: format!("https://urlscan.io/result/{}/loading", id),
        },
        None => Control::Link {
            label: "URLScan Search".into(),
            url: format!("https://urlscan.io/search/#domain%253A{}", report.domain),
        },
    };

    vec![
        action_control(ReviewAction::ApproveSuspicious, "Suspicious", ControlStyle::Success),
        action_control(ReviewAction::ApproveMalicious, "Malicious", ControlStyle::Success),
        action_control(ReviewAction::Reject, "Reject", ControlStyle::Danger),
        Control::Link {
            label: "Talos".into(),
            url: format!(
                "https://talosintelligence.com/reputation_center/lookup?search={}#whois",
                report.domain
            ),
        },
        urlscan,
    ]
}

fn action_control(action: ReviewAction, label: &str, style: ControlStyle) -> Control {
    Control::Action {
        id: action.custom_id().into(),
        label: label.into(),
        style,
    }
}

// -- Outcome lines --

fn outcome_label(action: ReviewAction) -> &'static str {
    match action {
        ReviewAction::ApproveSuspicious => "approved (suspicious)",
        ReviewAction::ApproveMalicious => "approved (malicious)",
        ReviewAction::Reject => "rejected",
    }
}

/// Terminal line left on the moderator message.
pub fn reviewer_summary(action: ReviewAction, domain: &str, reviewer: &Reviewer) -> String {
    let icon = if action == ReviewAction::Reject { FAIL } else { SUCCESS };
    format!(
        "{} Phish report `{}` {} by `{}`",
        icon,
        domain,
        outcome_label(action),
        reviewer.tag
    )
}

/// Terminal line shown on the submitters' acknowledgement messages.
pub fn public_outcome(action: ReviewAction, domain: &str) -> String {
    match action {
        ReviewAction::Reject => format!("{} Phish report `{}` rejected", FAIL, domain),
        _ => format!("{} Phish report `{}` approved", SUCCESS, domain),
    }
}

/// Moderator line when the backend no longer knows the report.
pub fn not_found_summary(domain: &str, reviewer: &Reviewer) -> String {
    format!(
        "{} Phish report `{}` no longer found (reviewed by `{}`)",
        ALERT, domain, reviewer.tag
    )
}

pub fn submitted(domain: &str) -> String {
    format!("🐟 Phish `{}` successfully reported", domain)
}

pub fn shortener_rejected() -> String {
    format!("{} URL Shorteners are currently not accepted", FAIL)
}

pub fn protected_domain(domain: &str) -> String {
    format!("🛡️ `{}` is a protected domain and cannot be reported", domain)
}

// -- Domain display --

fn verified_label(verified: Option<bool>) -> &'static str {
    match verified {
        Some(true) => "Yes",
        Some(false) => "No",
        None => "Unknown",
    }
}

fn verdict_label(verified: Option<bool>) -> &'static str {
    match verified {
        Some(true) => "🔴 Malicious",
        Some(false) => "🟠 Suspicious",
        None => "⚪ Unknown",
    }
}

fn verdict_colour(verified: Option<bool>) -> u32 {
    match verified {
        Some(true) => COLOUR_MALICIOUS,
        Some(false) => COLOUR_SUSPICIOUS,
        None => COLOUR_UNKNOWN,
    }
}

fn time_or(at: Option<DateTime<Utc>>, fallback: &str) -> String {
    at.map(discord_time).unwrap_or_else(|| fallback.into())
}

/// Read-only view of a lookup result.
pub fn classification_embed(record: &ClassificationRecord) -> Embed {
    let base = Embed {
        title: Some(record.domain.clone()),
        timestamp: Some(Utc::now()),
        ..Default::default()
    };

    match record.classification {
        Classification::Unknown => Embed {
            colour: Some(COLOUR_UNKNOWN),
            description: Some(format!("`{}` not known to Phisherman", record.domain)),
            ..base
        },
        Classification::Safe => Embed {
            colour: Some(COLOUR_SAFE),
            fields: vec![EmbedField::new("Classification:", "🟢 Safe", true)],
            ..base
        },
        Classification::Suspicious | Classification::Malicious => Embed {
            colour: Some(verdict_colour(record.verified)),
            fields: vec![
                EmbedField::new("Detections:", record.detections.to_string(), true),
                EmbedField::new("Verified:", verified_label(record.verified), true),
                EmbedField::new("Classification:", verdict_label(record.verified), true),
                EmbedField::new("Date Added:", time_or(record.created, "Unknown"), true),
                EmbedField::new("First Seen:", time_or(record.first_seen, "Never"), true),
                EmbedField::new("Last Seen:", time_or(record.last_seen, "Never"), true),
                EmbedField::new(
                    FIELD_TARGET,
                    record.targeted_brand.clone().unwrap_or_else(|| "-".into()),
                    true,
                ),
            ],
            thumbnail: record.screenshot.clone(),
            ..base
        },
    }
}

/// Adjudicated-domain view returned by a submission.
pub fn known_domain_embed(info: &KnownDomainInfo) -> Embed {
    let detections = info.detections.clone().unwrap_or_default();
    let country = info
        .country
        .as_ref()
        .and_then(|c| {
            c.code.as_ref().map(|code| {
                format!(
                    ":flag_{}: {}",
                    code.to_lowercase(),
                    c.name.clone().unwrap_or_else(|| code.clone())
                )
            })
        })
        .unwrap_or_else(|| "-".into());

    Embed {
        title: Some(info.domain.clone()),
        colour: Some(verdict_colour(info.verified)),
        fields: vec![
            EmbedField::new("Detections:", detections.total.to_string(), true),
            EmbedField::new("Verified:", verified_label(info.verified), true),
            EmbedField::new("Classification:", verdict_label(info.verified), true),
            EmbedField::new("Date Added:", time_or(info.created, "Unknown"), true),
            EmbedField::new("First Seen:", time_or(detections.first, "Never"), true),
            EmbedField::new("Last Seen:", time_or(detections.last, "Never"), true),
            EmbedField::new(
                FIELD_TARGET,
                info.targeted_brand.clone().unwrap_or_else(|| "-".into()),
                true,
            ),
            EmbedField::new("Country:", country, true),
        ],
        timestamp: Some(Utc::now()),
        thumbnail: info.screenshot.clone(),
        ..Default::default()
    }
}
