//! Notification audit records and message composition helpers.
//!
//! Templates are plain text with bracketed placeholders (`[Recipient Name]`)
//! substituted verbatim. There is deliberately no conditional or nested
//! syntax; anything fancier belongs to a real templating engine, which this
//! system does not carry.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::recipient::Recipient;

/// A not-yet-persisted audit row for one send attempt.
///
/// Rows are written after every send attempt regardless of delivery outcome
/// and are never updated or deleted by the pipeline; the newest `sent_at`
/// per threshold is the only thing ever read back.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotificationRecord {
    /// Owner of the threshold that fired.
    pub user_id: Uuid,
    /// Recipient the message went to; `None` for owner summaries.
    pub recipient_id: Option<Uuid>,
    /// Threshold that fired.
    pub threshold_id: Uuid,
    /// When the send was attempted.
    pub sent_at: DateTime<Utc>,
    /// Rendered owner-summary body, when recording one.
    pub user_message: String,
    /// Rendered recipient body, when recording a recipient send.
    pub recipient_message: String,
}

/// Substitute bracketed placeholders into a template body.
///
/// Each `(name, value)` pair replaces every occurrence of `[name]`.
/// Placeholders with no matching pair are left in place, which keeps a
/// half-filled template visibly broken instead of silently empty.
///
/// # Examples
/// ```
/// use backend::domain::render_template;
///
/// let body = render_template(
///     "Dear [Recipient Name], [Threshold Name] moved [Change Percentage]%.",
///     &[
///         ("Recipient Name", "Jordan Reyes".to_owned()),
///         ("Threshold Name", "Eggs, grade A, large".to_owned()),
///         ("Change Percentage", "20.00".to_owned()),
///     ],
/// );
/// assert_eq!(body, "Dear Jordan Reyes, Eggs, grade A, large moved 20.00%.");
/// ```
pub fn render_template(template: &str, substitutions: &[(&str, String)]) -> String {
    let mut body = template.to_owned();
    for (name, value) in substitutions {
        body = body.replace(&format!("[{name}]"), value);
    }
    body
}

/// Format the recipient roster for an owner summary, one `First Last
/// <email>` entry per line.
pub fn format_roster(recipients: &[Recipient]) -> String {
    recipients
        .iter()
        .map(|recipient| format!("{} <{}>", recipient.full_name(), recipient.email))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    //! Regression coverage for message composition.

    use super::*;

    fn recipient(first: &str, last: &str, email: &str) -> Recipient {
        Recipient {
            id: Uuid::new_v4(),
            email: email.to_owned(),
            first_name: first.to_owned(),
            last_name: last.to_owned(),
            designation: "Representative".to_owned(),
        }
    }

    #[test]
    fn substitutes_every_occurrence() {
        let body = render_template(
            "[Name] and [Name] again",
            &[("Name", "Ada".to_owned())],
        );
        assert_eq!(body, "Ada and Ada again");
    }

    #[test]
    fn unknown_placeholders_stay_visible() {
        let body = render_template("Hello [Missing]", &[("Name", "Ada".to_owned())]);
        assert_eq!(body, "Hello [Missing]");
    }

    #[test]
    fn roster_lists_one_recipient_per_line() {
        let roster = format_roster(&[
            recipient("Jordan", "Reyes", "reyes@example.gov"),
            recipient("Sam", "Okafor", "okafor@example.gov"),
        ]);
        assert_eq!(
            roster,
            "Jordan Reyes <reyes@example.gov>\nSam Okafor <okafor@example.gov>"
        );
    }

    #[test]
    fn roster_of_nobody_is_empty() {
        assert_eq!(format_roster(&[]), "");
    }
}
