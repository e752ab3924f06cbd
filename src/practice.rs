//! Conversation practice with a scripted partner and pretend voice input.

use std::rc::Rc;
use std::time::Duration;

use chrono::{DateTime, Local};
use tracing::debug;
use uuid::Uuid;

use crate::clock::{Clock, Delayed};

pub const REPLY_LATENCY: Duration = Duration::from_millis(1000);
pub const TRANSCRIBE_LATENCY: Duration = Duration::from_millis(1500);

const PARTNER_REPLY: &str = "I understood your message. Let's continue practicing!";
const MOCK_TRANSCRIPT: &[&str] = &["hello", "how", "are", "you", "today", "I", "am", "learning", "to", "speak", "better"];
const MOCK_CONFIDENCE: u8 = 92;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Partner,
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub id: Uuid,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Local>,
}

impl ChatMessage {
    fn new(text: String, sender: Sender) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            sender,
            timestamp: Local::now(),
        }
    }
}

/// A chat transcript where every message gets the same reply a second later.
pub struct ChatSession {
    clock: Rc<dyn Clock>,
    pub messages: Vec<ChatMessage>,
    pending_reply: Option<Delayed<ChatMessage>>,
}

impl ChatSession {
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self {
            clock,
            messages: Vec::new(),
            pending_reply: None,
        }
    }

    /// Returns false if the text was blank or a reply is still on its way.
    pub fn send(&mut self, text: &str) -> bool {
        if text.trim().is_empty() || self.is_processing() {
            return false;
        }

        let message = ChatMessage::new(text.to_string(), Sender::User);
        debug!(id = %message.id, "Chat message sent");
        self.messages.push(message);
        let reply = ChatMessage::new(PARTNER_REPLY.to_string(), Sender::Partner);
        self.pending_reply = Some(Delayed::new(reply, self.clock.now(), REPLY_LATENCY));
        true
    }

    pub fn is_processing(&self) -> bool {
        self.pending_reply.is_some()
    }

    /// Deliver the reply if it is due. Returns true when a message was added.
    pub fn poll(&mut self) -> bool {
        let Some(pending) = self.pending_reply.take() else {
            return false;
        };

        match pending.take_if_ready(self.clock.now()) {
            Ok(mut reply) => {
                reply.timestamp = Local::now();
                debug!(id = %reply.id, "Partner replied");
                self.messages.push(reply);
                true
            }
            Err(pending) => {
                self.pending_reply = Some(pending);
                false
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcription {
    pub text: String,
    /// Percent.
    pub confidence: u8,
}

#[derive(Debug, Clone)]
enum RecorderState {
    Idle,
    Recording,
    Processing(Delayed<Transcription>),
}

/// Microphone toggle: idle, recording, then a short processing delay.
pub struct VoiceRecorder {
    clock: Rc<dyn Clock>,
    state: RecorderState,
    pub last: Option<Transcription>,
}

impl VoiceRecorder {
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self {
            clock,
            state: RecorderState::Idle,
            last: None,
        }
    }

    pub fn is_recording(&self) -> bool {
        matches!(self.state, RecorderState::Recording)
    }

    pub fn is_processing(&self) -> bool {
        matches!(self.state, RecorderState::Processing(_))
    }

    /// Start or stop recording. Ignored while processing.
    pub fn toggle(&mut self) {
        match self.state {
            RecorderState::Idle => {
                self.last = None;
                self.state = RecorderState::Recording;
            }
            RecorderState::Recording => {
                let transcription = Transcription {
                    text: MOCK_TRANSCRIPT.join(" "),
                    confidence: MOCK_CONFIDENCE,
                };
                self.state = RecorderState::Processing(Delayed::new(
                    transcription,
                    self.clock.now(),
                    TRANSCRIBE_LATENCY,
                ));
            }
            RecorderState::Processing(_) => {}
        }
    }

    /// The finished transcription, once processing is over.
    pub fn poll(&mut self) -> Option<Transcription> {
        if !self.is_processing() {
            return None;
        }
        let RecorderState::Processing(pending) = std::mem::replace(&mut self.state, RecorderState::Idle) else {
            return None;
        };

        match pending.take_if_ready(self.clock.now()) {
            Ok(transcription) => {
                self.last = Some(transcription.clone());
                Some(transcription)
            }
            Err(pending) => {
                self.state = RecorderState::Processing(pending);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    #[test]
    fn reply_arrives_after_latency() {
        let clock = ManualClock::new();
        let mut chat = ChatSession::new(Rc::new(clock.clone()));

        assert!(chat.send("Hello there"));
        assert!(chat.is_processing());
        assert_eq!(chat.messages.len(), 1);
        assert_eq!(chat.messages[0].sender, Sender::User);

        clock.advance_ms(999);
        assert!(!chat.poll());

        clock.advance_ms(1);
        assert!(chat.poll());
        assert!(!chat.is_processing());
        assert_eq!(chat.messages[1].sender, Sender::Partner);
        assert_eq!(chat.messages[1].text, PARTNER_REPLY);
    }

    #[test]
    fn blank_or_overlapping_messages_are_refused() {
        let clock = ManualClock::new();
        let mut chat = ChatSession::new(Rc::new(clock.clone()));

        assert!(!chat.send("   "));
        assert!(chat.send("one"));
        assert!(!chat.send("two"));
        assert_eq!(chat.messages.len(), 1);

        clock.advance(REPLY_LATENCY);
        chat.poll();
        assert!(chat.send("two"));
    }

    #[test]
    fn recorder_cycles_through_processing() {
        let clock = ManualClock::new();
        let mut mic = VoiceRecorder::new(Rc::new(clock.clone()));

        mic.toggle();
        assert!(mic.is_recording());
        assert_eq!(mic.poll(), None);

        mic.toggle();
        assert!(mic.is_processing());

        // Toggling mid-processing does nothing.
        mic.toggle();
        assert!(mic.is_processing());

        clock.advance_ms(1499);
        assert_eq!(mic.poll(), None);
        clock.advance_ms(1);

        let transcription = mic.poll().unwrap();
        assert!(transcription.text.starts_with("hello how are you"));
        assert_eq!(transcription.confidence, 92);
        assert!(!mic.is_recording() && !mic.is_processing());
        assert_eq!(mic.last.as_ref(), Some(&transcription));

        // Starting again clears the old result.
        mic.toggle();
        assert!(mic.last.is_none());
    }
}
