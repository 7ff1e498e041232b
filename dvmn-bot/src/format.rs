//! Chat text for review results.

use dvmn_client::ReviewAttempt;

/// Verdict line for a review that asks for changes.
pub const NEEDS_REVISION: &str = "Всё круто, но надо кое-чего поправить =)";
/// Verdict line for an accepted lesson.
pub const ACCEPTED: &str = "Работа принята, можно переходить к следующему уроку!";

/// Renders each attempt as title line, verdict line and URL line; attempts are separated by
/// one blank line and keep their input order.
pub fn format_attempts(attempts: &[ReviewAttempt]) -> String {
    attempts
        .iter()
        .map(format_attempt)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn format_attempt(attempt: &ReviewAttempt) -> String {
    let verdict = if attempt.is_negative {
        NEEDS_REVISION
    } else {
        ACCEPTED
    };
    format!(
        "Проверили работу «{}».\n{}\n{}",
        attempt.lesson_title, verdict, attempt.lesson_url
    )
}
