//! Prompt composition.
//!
//! The user directive is assembled line by line in a fixed order; the
//! child's question is copied in verbatim and never goes through any
//! placeholder substitution, so composition is a pure function of its inputs.

use super::{Guidance, Level, PromptError, Subject};

/// Closing rule block appended to every user directive.
const RULES: [&str; 5] = [
    "Exemple simple et concret",
    "Expliquer étape par étape",
    "NE PAS donner le résultat final ou le chiffre",
    "Terminer avec une question. Elle doit être claire pour que l'enfant réfléchisse",
    "Phrase courte et très claire adaptée au niveau",
];

/// The two messages sent to the model for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedPrompt {
    pub level: Level,
    pub subject: Subject,
    /// System-role message.
    pub system: String,
    /// User-role message.
    pub user: String,
}

/// Validate `level` and `subject` and compose the prompt for `question`.
///
/// The level is checked first, so input that is wrong on both counts
/// reports the level.
pub fn build(
    guidance: &Guidance,
    level: &str,
    subject: &str,
    question: &str,
) -> Result<ComposedPrompt, PromptError> {
    let level: Level = level.parse()?;
    let subject: Subject = subject.parse()?;

    let mut lines = vec![
        format!("Niveau de l'enfant : {level}"),
        format!("Matière : {subject}"),
        format!("Instructions pour le niveau : {}", guidance.level(level)),
        format!("Instructions pour la matière : {}", guidance.subject(subject)),
        format!("Question de l'enfant : {question}"),
        String::new(),
        "Règles :".to_string(),
    ];
    lines.extend(RULES.iter().map(|rule| format!("- {rule}")));

    Ok(ComposedPrompt {
        level,
        subject,
        system: guidance.system().to_string(),
        user: lines.join("\n"),
    })
}
