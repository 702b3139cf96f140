//! Human-readable announcement lines.

use announcer_config_and_utils::PAGE_PLACEHOLDER;
use change_feed_client::{ChangeKind, ChangeRecord};

/// Render `record` as `User {actor} {verb} {page url}[ - {annotation}]`.
pub fn format_change(record: &ChangeRecord, page_url_template: &str) -> String {
    let verb = match record.kind {
        ChangeKind::Edit => "modified",
        ChangeKind::Created => "created",
    };

    let mut line = format!(
        "User {} {} {}",
        record.actor,
        verb,
        page_reference(&record.subject, page_url_template)
    );

    if let Some(annotation) = record.annotation.as_deref().filter(|a| !a.is_empty()) {
        line.push_str(" - ");
        line.push_str(annotation);
    }

    line
}

/// Fill the page template with `subject`, spaces turned into underscores.
pub fn page_reference(subject: &str, page_url_template: &str) -> String {
    page_url_template.replace(PAGE_PLACEHOLDER, &subject.replace(' ', "_"))
}
