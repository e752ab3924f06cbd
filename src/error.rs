//! Domain errors.

/// Problems with the lesson catalog, either while loading it or when
/// interaction state refers to a lesson that does not exist.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to parse lesson catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Duplicate lesson id {0}")]
    DuplicateId(u32),
    #[error("Lesson {id} has rating {rating}, expected a value between 0 and 5")]
    RatingOutOfRange { id: u32, rating: f32 },
    #[error("Lesson {id} has completion rate {rate}%, expected at most 100%")]
    CompletionOutOfRange { id: u32, rate: u8 },
    #[error("Lesson {id} lists tag '{tag}' more than once")]
    DuplicateTag { id: u32, tag: String },
    #[error("No lesson with id {0}")]
    UnknownLesson(u32),
}

/// Form validation failures from the login and signup screens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Please enter your name")]
    MissingName,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Please enter your password")]
    MissingPassword,
}

/// Problems in the tutor: bad input from the form or a broken question bank.
#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    #[error("Please enter a valid question!")]
    EmptyQuestion,
    #[error("Please ask a question first before generating MCQs.")]
    NoQuestionForQuiz,
    #[error("Unknown topic '{0}'")]
    UnknownTopic(String),
    #[error("Failed to parse question bank: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Topic '{topic}' has {available} questions, expected at least {required}")]
    TooFewQuestions {
        topic: String,
        available: usize,
        required: usize,
    },
    #[error("Question '{question}' in '{topic}': {reason}")]
    InvalidQuestion {
        topic: String,
        question: String,
        reason: &'static str,
    },
}
