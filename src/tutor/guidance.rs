//! Directive tables shared by every request.
//!
//! Built once at startup and handed to the relay behind an `Arc`; nothing
//! here is mutated afterwards.

use std::fs;

use crate::config::TutorConfig;
use crate::error::AppError;

use super::{Level, Subject};

/// Built-in system directive: the six non-negotiable tutoring rules.
pub const SYSTEM_DIRECTIVE: &str = "\
Tu es un assistant pédagogique pour enfants de l'école primaire (CP à CM2).
RÈGLES STRICTES :
- Langage simple et clair selon le niveau de l'enfant
- Utiliser uniquement des exemples très simples et concrets (pommes, billes, crayons)
- Expliquer étape par étape comment réfléchir et trouver la réponse
- Ne jamais donner le résultat final ou le nombre directement
- Poser toujours une question finale pour que l'enfant réfléchisse
- Encourager la curiosité et la recherche personnelle";

// Indexed by `Level::index()`.
const LEVEL_GUIDANCE: [&str; 5] = [
    "Utilise des phrases très simples, un exemple concret, un concept par question.",
    "Phrase simple, exemples concrets, introduis un peu de vocabulaire nouveau.",
    "Phrase claire, exemple en 2 étapes, vocabulaire adapté.",
    "Phrases plus longues, exemples un peu plus abstraits.",
    "Phrases complètes, exemples détaillés, faire réfléchir avec plusieurs étapes.",
];

// Indexed by `Subject::index()`.
const SUBJECT_GUIDANCE: [&str; 3] = [
    "Tu es un professeur de mathématiques pour enfants. Explique les concepts étape par étape avec des exemples simples.",
    "Tu es un professeur d'histoire pour enfants. Explique les événements, personnages, dates de façon simple et imagée.",
    "Tu es un professeur de culture générale pour enfants. Explique les concepts simplement et pose des questions pour faire réfléchir.",
];

#[derive(Debug, Clone)]
pub struct Guidance {
    system: String,
}

impl Guidance {
    /// Guidance with the built-in system directive.
    pub fn builtin() -> Self {
        Self {
            system: SYSTEM_DIRECTIVE.to_string(),
        }
    }

    /// Resolve guidance from config. A configured `system_prompt_file` replaces
    /// the built-in system directive; it must exist and be non-empty.
    pub fn from_config(config: &TutorConfig) -> Result<Self, AppError> {
        let Some(path) = &config.system_prompt_file else {
            return Ok(Self::builtin());
        };

        let text = fs::read_to_string(path).map_err(|e| AppError::SystemPrompt {
            path: path.clone(),
            reason: format!("cannot read: {e}"),
        })?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(AppError::SystemPrompt {
                path: path.clone(),
                reason: "is empty".into(),
            });
        }

        tracing::debug!(path = %path.display(), "system directive loaded from file");
        Ok(Self {
            system: trimmed.to_string(),
        })
    }

    pub fn system(&self) -> &str {
        &self.system
    }

    pub fn level(&self, level: Level) -> &'static str {
        LEVEL_GUIDANCE[level.index()]
    }

    pub fn subject(&self, subject: Subject) -> &'static str {
        SUBJECT_GUIDANCE[subject.index()]
    }
}

impl Default for Guidance {
    fn default() -> Self {
        Self::builtin()
    }
}
