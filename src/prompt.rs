//! Prompt templating for moderation verdicts

use crate::models::Session;

const MODERATION_TEMPLATE: &str = "\
You are moderating a two-person conversation about \"{topic}\".
The participants are {host} (host) and {guest} (guest).

Transcript:
{transcript}

Judge whether either participant broke the rules of respectful debate.
Answer with a one-line verdict followed by a short justification.";

const EMPTY_TRANSCRIPT: &str = "(no turns yet)";

/// Render the moderation prompt for a session
pub fn render_moderation_prompt(session: &Session) -> String {
    let transcript = if session.history.is_empty() {
        EMPTY_TRANSCRIPT.to_string()
    } else {
        session
            .history
            .iter()
            .map(|turn| format!("{}: {}", session.participant(turn.speaker).name, turn.content))
            .collect::<Vec<_>>()
            .join("\n")
    };

    render(
        MODERATION_TEMPLATE,
        &[
            ("topic", session.topic.as_str()),
            ("host", session.host.name.as_str()),
            ("guest", session.guest.name.as_str()),
            ("transcript", transcript.as_str()),
        ],
    )
}

/// Substitute `{name}` placeholders in a single pass
///
/// Values are inserted verbatim, so braces inside participant text are never
/// expanded a second time.
fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let replacement = after.find('}').and_then(|end| {
            let key = &after[..end];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value, end))
        });

        match replacement {
            Some((value, end)) => {
                out.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
