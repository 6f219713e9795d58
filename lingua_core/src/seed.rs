//! Default opening exchange used when no history has been persisted.

use crate::ChatMessage;

pub const TEACHER_INSTRUCTION: &str = "You are a British English teacher. You should teach and converse at an A1 level, using simple vocabulary and grammar. Speak in a friendly, encouraging manner, and correct any mistakes gently. Always respond in English, even if the student uses another language.";

pub const TEACHER_ACKNOWLEDGMENT: &str = "Understood. I'll act as a friendly British English teacher, focusing on A1 level English. I'll use simple language, encourage the student, and provide gentle corrections when needed. I'm ready to begin our lesson.";

/// Supplies the opening exchange for an empty conversation.
///
/// The pair is a `user` instruction followed by an `assistant`
/// acknowledgment, so the history always alternates roles.
pub trait SeedProvider: Send + Sync {
    fn seed(&self) -> [ChatMessage; 2];
}

/// Seed built from two fixed strings, typically read from config.
#[derive(Debug, Clone)]
pub struct StaticSeed {
    pub instruction: String,
    pub acknowledgment: String,
}

impl StaticSeed {
    pub fn new(instruction: impl Into<String>, acknowledgment: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
            acknowledgment: acknowledgment.into(),
        }
    }
}

impl SeedProvider for StaticSeed {
    fn seed(&self) -> [ChatMessage; 2] {
        [
            ChatMessage::user(self.instruction.clone()),
            ChatMessage::assistant(self.acknowledgment.clone()),
        ]
    }
}

/// The A1-level British English teacher persona.
#[derive(Debug, Clone, Copy, Default)]
pub struct TeacherSeed;

impl SeedProvider for TeacherSeed {
    fn seed(&self) -> [ChatMessage; 2] {
        [
            ChatMessage::user(TEACHER_INSTRUCTION),
            ChatMessage::assistant(TEACHER_ACKNOWLEDGMENT),
        ]
    }
}
