//! Topic tutor: canned answers and multiple-choice quizzes drawn from a
//! bundled question bank.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use tracing::info;

use crate::clock::{Clock, Delayed};
use crate::error::QuizError;

pub const TOPICS: [&str; 8] = [
    "Mathematics",
    "Science",
    "History",
    "Programming",
    "English Grammar",
    "Physics",
    "Chemistry",
    "Biology",
];

pub const MIN_QUESTIONS: usize = 1;
pub const MAX_QUESTIONS: usize = 10;
pub const DEFAULT_QUESTIONS: usize = 5;

pub const ANSWER_LATENCY: Duration = Duration::from_millis(1000);
pub const GENERATE_LATENCY: Duration = Duration::from_millis(1500);

const OPTION_COUNT: usize = 4;
const BUNDLED_BANK: &str = include_str!("../assets/quiz_bank.json");

/// One multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Mcq {
    pub question: String,
    pub options: Vec<String>,
    pub correct_option: String,
}

impl Mcq {
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_option == answer
    }
}

/// Questions per topic. Every entry in [`TOPICS`] has at least
/// [`MAX_QUESTIONS`] questions with four distinct options each.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    topics: BTreeMap<String, Vec<Mcq>>,
}

impl QuestionBank {
    pub fn parse(json: &str) -> Result<Self, QuizError> {
        let topics: BTreeMap<String, Vec<Mcq>> = serde_json::from_str(json)?;
        validate_bank(&topics)?;
        Ok(Self { topics })
    }

    pub fn bundled() -> Result<Self, QuizError> {
        Self::parse(BUNDLED_BANK)
    }

    pub fn questions(&self, topic: &str) -> Result<&[Mcq], QuizError> {
        self.topics
            .get(topic)
            .map(Vec::as_slice)
            .ok_or_else(|| QuizError::UnknownTopic(topic.to_string()))
    }
}

fn validate_bank(topics: &BTreeMap<String, Vec<Mcq>>) -> Result<(), QuizError> {
    for topic in TOPICS {
        let questions = topics.get(topic).map_or(&[][..], Vec::as_slice);
        if questions.len() < MAX_QUESTIONS {
            return Err(QuizError::TooFewQuestions {
                topic: topic.to_string(),
                available: questions.len(),
                required: MAX_QUESTIONS,
            });
        }

        for mcq in questions {
            let invalid = |reason| QuizError::InvalidQuestion {
                topic: topic.to_string(),
                question: mcq.question.clone(),
                reason,
            };

            if mcq.options.len() != OPTION_COUNT {
                return Err(invalid("expected four options"));
            }
            let distinct: HashSet<&str> = mcq.options.iter().map(String::as_str).collect();
            if distinct.len() != mcq.options.len() {
                return Err(invalid("repeats an option"));
            }
            if !distinct.contains(mcq.correct_option.as_str()) {
                return Err(invalid("correct option is not one of the options"));
            }
        }
    }
    Ok(())
}

/// Pick `count` distinct questions from `topic` in random order and shuffle
/// each question's options. `count` is clamped to
/// [`MIN_QUESTIONS`]..=[`MAX_QUESTIONS`].
pub fn draw_questions<R: Rng + ?Sized>(
    bank: &QuestionBank,
    topic: &str,
    count: usize,
    rng: &mut R,
) -> Result<Vec<Mcq>, QuizError> {
    let pool = bank.questions(topic)?;
    let count = count.clamp(MIN_QUESTIONS, MAX_QUESTIONS).min(pool.len());

    let mut picked: Vec<Mcq> = pool.choose_multiple(rng, count).cloned().collect();
    for mcq in &mut picked {
        mcq.options.shuffle(rng);
    }
    Ok(picked)
}

/// The tutor's canned answer to a free-form question.
pub fn tutor_reply(topic: &str, question: &str) -> String {
    format!(
        "Good question about {}! Start from the key definitions behind \"{}\", then work through a small example. \
         Generate a quiz to check your understanding.",
        topic,
        question.trim()
    )
}

// ══════════════════════════════════════════════════════════════════════════
// Answers and Scoring
// ══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "You got {}/{} correct!", self.correct, self.total)
    }
}

/// Per-question result after submitting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback<'a> {
    pub question: &'a Mcq,
    pub answer: Option<&'a str>,
    pub correct: bool,
}

/// A generated quiz and the options the learner picked.
#[derive(Debug, Clone)]
pub struct Quiz {
    questions: Vec<Mcq>,
    answers: Vec<Option<usize>>,
    submitted: bool,
}

impl Quiz {
    pub fn new(questions: Vec<Mcq>) -> Self {
        let answers = vec![None; questions.len()];
        Self {
            questions,
            answers,
            submitted: false,
        }
    }

    pub fn questions(&self) -> &[Mcq] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Pick option `option` of question `index`. Ignored once submitted or
    /// when either index is out of range.
    pub fn select(&mut self, index: usize, option: usize) -> bool {
        if self.submitted {
            return false;
        }
        let in_range = self
            .questions
            .get(index)
            .is_some_and(|mcq| option < mcq.options.len());
        if in_range {
            self.answers[index] = Some(option);
        }
        in_range
    }

    pub fn selected(&self, index: usize) -> Option<usize> {
        self.answers.get(index).copied().flatten()
    }

    pub fn answer(&self, index: usize) -> Option<&str> {
        let option = self.selected(index)?;
        self.questions[index].options.get(option).map(String::as_str)
    }

    pub fn answered(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    /// Lock in the answers. Unanswered questions count as incorrect.
    pub fn submit(&mut self) {
        self.submitted = true;
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn feedback(&self) -> Vec<Feedback<'_>> {
        self.questions
            .iter()
            .enumerate()
            .map(|(i, mcq)| {
                let answer = self.answer(i);
                Feedback {
                    question: mcq,
                    answer,
                    correct: answer.is_some_and(|a| mcq.is_correct(a)),
                }
            })
            .collect()
    }

    pub fn score(&self) -> Score {
        Score {
            correct: self.feedback().iter().filter(|f| f.correct).count(),
            total: self.questions.len(),
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Tutor Session
// ══════════════════════════════════════════════════════════════════════════

/// Topic choice, question answering and quiz generation, each answer
/// arriving after a short simulated delay.
pub struct TutorSession {
    clock: Rc<dyn Clock>,
    bank: QuestionBank,
    rng: ChaCha8Rng,
    topic: usize,
    count: usize,
    pub reply: Option<String>,
    pending_reply: Option<Delayed<String>>,
    pending_quiz: Option<Delayed<Vec<Mcq>>>,
    pub quiz: Option<Quiz>,
}

impl TutorSession {
    pub fn new(clock: Rc<dyn Clock>, bank: QuestionBank, seed: u64) -> Self {
        Self {
            clock,
            bank,
            rng: ChaCha8Rng::seed_from_u64(seed),
            topic: 0,
            count: DEFAULT_QUESTIONS,
            reply: None,
            pending_reply: None,
            pending_quiz: None,
            quiz: None,
        }
    }

    /// Back to a fresh session on the first topic.
    pub fn reset(&mut self) {
        self.topic = 0;
        self.count = DEFAULT_QUESTIONS;
        self.reply = None;
        self.pending_reply = None;
        self.pending_quiz = None;
        self.quiz = None;
    }

    pub fn topic(&self) -> &'static str {
        TOPICS[self.topic]
    }

    pub fn next_topic(&mut self) {
        self.topic = (self.topic + 1) % TOPICS.len();
    }

    pub fn prev_topic(&mut self) {
        self.topic = (self.topic + TOPICS.len() - 1) % TOPICS.len();
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn more_questions(&mut self) {
        self.count = (self.count + 1).min(MAX_QUESTIONS);
    }

    pub fn fewer_questions(&mut self) {
        self.count = self.count.saturating_sub(1).max(MIN_QUESTIONS);
    }

    pub fn is_thinking(&self) -> bool {
        self.pending_reply.is_some()
    }

    pub fn is_generating(&self) -> bool {
        self.pending_quiz.is_some()
    }

    pub fn ask(&mut self, question: &str) -> Result<(), QuizError> {
        if question.trim().is_empty() {
            return Err(QuizError::EmptyQuestion);
        }

        info!(topic = self.topic(), "Tutor question asked");
        let reply = tutor_reply(self.topic(), question);
        self.pending_reply = Some(Delayed::new(reply, self.clock.now(), ANSWER_LATENCY));
        Ok(())
    }

    /// Start building a quiz for the current topic. The previous quiz stays
    /// on screen until the new one arrives.
    pub fn generate(&mut self, question: &str) -> Result<(), QuizError> {
        if question.trim().is_empty() {
            return Err(QuizError::NoQuestionForQuiz);
        }

        let questions = draw_questions(&self.bank, TOPICS[self.topic], self.count, &mut self.rng)?;
        self.pending_quiz = Some(Delayed::new(questions, self.clock.now(), GENERATE_LATENCY));
        Ok(())
    }

    /// Deliver whatever is due. Returns true when something arrived.
    pub fn poll(&mut self) -> bool {
        let now = self.clock.now();
        let mut arrived = false;

        if let Some(pending) = self.pending_reply.take() {
            match pending.take_if_ready(now) {
                Ok(reply) => {
                    self.reply = Some(reply);
                    arrived = true;
                }
                Err(pending) => self.pending_reply = Some(pending),
            }
        }

        if let Some(pending) = self.pending_quiz.take() {
            match pending.take_if_ready(now) {
                Ok(questions) => {
                    info!(topic = self.topic(), count = questions.len(), "Quiz generated");
                    self.quiz = Some(Quiz::new(questions));
                    arrived = true;
                }
                Err(pending) => self.pending_quiz = Some(pending),
            }
        }

        arrived
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use serde_json::{json, Value};

    fn mcq(question: &str, correct: &str) -> Mcq {
        Mcq {
            question: question.to_string(),
            options: ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect(),
            correct_option: correct.to_string(),
        }
    }

    fn valid_bank() -> Value {
        let mut bank = serde_json::Map::new();
        for topic in TOPICS {
            let questions: Vec<Value> = (0..MAX_QUESTIONS)
                .map(|i| {
                    json!({
                        "question": format!("{} question {}", topic, i),
                        "options": ["A", "B", "C", "D"],
                        "correct_option": "A"
                    })
                })
                .collect();
            bank.insert(topic.to_string(), Value::Array(questions));
        }
        Value::Object(bank)
    }

    fn session(clock: &ManualClock) -> TutorSession {
        TutorSession::new(Rc::new(clock.clone()), QuestionBank::bundled().unwrap(), 7)
    }

    #[test]
    fn bundled_bank_covers_every_topic() {
        let bank = QuestionBank::bundled().unwrap();
        for topic in TOPICS {
            assert!(bank.questions(topic).unwrap().len() >= MAX_QUESTIONS);
        }
        assert!(matches!(bank.questions("Astrology"), Err(QuizError::UnknownTopic(_))));
    }

    #[test]
    fn bank_validation_rejects_bad_entries() {
        assert!(QuestionBank::parse(&valid_bank().to_string()).is_ok());

        let mut missing = valid_bank();
        missing.as_object_mut().unwrap().remove("History");
        assert!(matches!(
            QuestionBank::parse(&missing.to_string()),
            Err(QuizError::TooFewQuestions { available: 0, .. })
        ));

        let mut wrong_answer = valid_bank();
        wrong_answer["Physics"][3]["correct_option"] = json!("E");
        assert!(matches!(
            QuestionBank::parse(&wrong_answer.to_string()),
            Err(QuizError::InvalidQuestion { .. })
        ));

        let mut three_options = valid_bank();
        three_options["Biology"][0]["options"] = json!(["A", "B", "C"]);
        assert!(matches!(
            QuestionBank::parse(&three_options.to_string()),
            Err(QuizError::InvalidQuestion { .. })
        ));

        assert!(matches!(QuestionBank::parse("[1, 2]"), Err(QuizError::Parse(_))));
    }

    #[test]
    fn drawn_questions_are_distinct_and_options_are_shuffled_copies() {
        let bank = QuestionBank::bundled().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let drawn = draw_questions(&bank, "Science", 5, &mut rng).unwrap();
        assert_eq!(drawn.len(), 5);

        let pool = bank.questions("Science").unwrap();
        let titles: HashSet<&str> = drawn.iter().map(|m| m.question.as_str()).collect();
        assert_eq!(titles.len(), 5);

        for question in &drawn {
            let original = pool.iter().find(|m| m.question == question.question).unwrap();
            let mut a = question.options.clone();
            let mut b = original.options.clone();
            a.sort();
            b.sort();
            assert_eq!(a, b);
            assert_eq!(question.correct_option, original.correct_option);
        }

        // Same seed, same quiz.
        let again = draw_questions(&bank, "Science", 5, &mut ChaCha8Rng::seed_from_u64(42)).unwrap();
        assert_eq!(again, drawn);
    }

    #[test]
    fn question_count_is_clamped() {
        let bank = QuestionBank::bundled().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(draw_questions(&bank, "History", 0, &mut rng).unwrap().len(), 1);
        assert_eq!(draw_questions(&bank, "History", 50, &mut rng).unwrap().len(), 10);
    }

    #[test]
    fn scoring_counts_unanswered_as_incorrect() {
        let mut quiz = Quiz::new(vec![mcq("one", "B"), mcq("two", "C"), mcq("three", "A")]);
        assert!(quiz.select(0, 1));
        assert!(quiz.select(1, 0));
        assert!(!quiz.select(5, 0));
        assert!(!quiz.select(2, 4));
        assert_eq!(quiz.answered(), 2);

        quiz.submit();
        assert!(!quiz.select(2, 0));

        let feedback = quiz.feedback();
        let correct: Vec<bool> = feedback.iter().map(|f| f.correct).collect();
        assert_eq!(correct, vec![true, false, false]);
        assert_eq!(feedback[1].answer, Some("A"));
        assert_eq!(feedback[2].answer, None);

        let score = quiz.score();
        assert_eq!(score, Score { correct: 1, total: 3 });
        assert_eq!(score.to_string(), "You got 1/3 correct!");
    }

    #[test]
    fn empty_quiz_scores_zero_of_zero() {
        let quiz = Quiz::new(Vec::new());
        assert_eq!(quiz.score().to_string(), "You got 0/0 correct!");
    }

    #[test]
    fn blank_questions_are_rejected() {
        let clock = ManualClock::new();
        let mut tutor = session(&clock);
        assert!(matches!(tutor.ask("   "), Err(QuizError::EmptyQuestion)));
        assert!(matches!(tutor.generate(""), Err(QuizError::NoQuestionForQuiz)));
        assert!(!tutor.is_thinking());
        assert!(!tutor.is_generating());
    }

    #[test]
    fn answers_and_quizzes_arrive_after_their_delays() {
        let clock = ManualClock::new();
        let mut tutor = session(&clock);
        tutor.next_topic();
        assert_eq!(tutor.topic(), "Science");

        tutor.ask("Why is the sky blue?").unwrap();
        tutor.generate("Why is the sky blue?").unwrap();
        assert!(!tutor.poll());

        clock.advance(ANSWER_LATENCY);
        assert!(tutor.poll());
        assert!(tutor.reply.as_deref().unwrap().contains("Science"));
        assert!(tutor.is_generating());

        clock.advance_ms(500);
        assert!(tutor.poll());
        let quiz = tutor.quiz.as_ref().unwrap();
        assert_eq!(quiz.len(), DEFAULT_QUESTIONS);
        assert!(!quiz.is_submitted());
    }

    #[test]
    fn topic_and_count_wrap_and_clamp() {
        let clock = ManualClock::new();
        let mut tutor = session(&clock);
        tutor.prev_topic();
        assert_eq!(tutor.topic(), "Biology");
        tutor.next_topic();
        assert_eq!(tutor.topic(), "Mathematics");

        for _ in 0..20 {
            tutor.more_questions();
        }
        assert_eq!(tutor.count(), MAX_QUESTIONS);
        for _ in 0..20 {
            tutor.fewer_questions();
        }
        assert_eq!(tutor.count(), MIN_QUESTIONS);

        tutor.next_topic();
        tutor.ask("What is a prime?").unwrap();
        tutor.reset();
        assert_eq!(tutor.topic(), "Mathematics");
        assert_eq!(tutor.count(), DEFAULT_QUESTIONS);
        assert!(!tutor.is_thinking());
    }
}
