//! Context-aware chat tutor
//!
//! Keeps the conversation transcript and builds each request from a
//! context-specific system prompt plus a sliding window of recent messages.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::DomainError;
use crate::infrastructure::traits::{ChatClient, ChatError, ChatMessage, ChatOptions};

/// Default number of prior messages sent with each request.
pub const DEFAULT_HISTORY_WINDOW: usize = 6;

const BASE_PROMPT: &str = "You are an expert computer science tutor helping students learn interactively.
Provide clear, concise explanations suitable for beginners to intermediate learners.
Use examples, analogies, and step-by-step reasoning where helpful.
Keep responses under 200 words unless the student asks for more detail.
Be encouraging and supportive.";

/// What the learner is looking at.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TutorContext {
    #[default]
    General,
    DataStructure {
        name: String,
        operation: Option<String>,
        state: Option<serde_json::Value>,
    },
    Algorithm {
        name: String,
        state: Option<serde_json::Value>,
    },
    Concept {
        name: String,
    },
}

impl TutorContext {
    pub fn data_structure(name: impl Into<String>) -> Self {
        TutorContext::DataStructure {
            name: name.into(),
            operation: None,
            state: None,
        }
    }

    pub fn algorithm(name: impl Into<String>) -> Self {
        TutorContext::Algorithm {
            name: name.into(),
            state: None,
        }
    }

    pub fn welcome(&self) -> String {
        match self {
            TutorContext::DataStructure { name, .. } => format!(
                "Hi! I'm your AI tutor. I see you're working with **{name}**. Ask me anything about operations, complexity, or use cases!"
            ),
            TutorContext::Algorithm { name, .. } => format!(
                "Hello! I can help you understand the **{name}** algorithm. Feel free to ask about how it works, its complexity, or when to use it!"
            ),
            TutorContext::Concept { name } => format!(
                "Hey there! Ready to explore **{name}**? Ask me anything to deepen your understanding!"
            ),
            TutorContext::General => "Hi! I'm your AI tutor. I'm here to help you understand data structures, algorithms, and programming concepts. What would you like to learn?".to_string(),
        }
    }

    pub fn system_prompt(&self) -> String {
        let mut prompt = BASE_PROMPT.to_string();
        match self {
            TutorContext::DataStructure {
                name,
                operation,
                state,
            } => {
                prompt.push_str(&format!(
                    "\n\nThe student is currently working with a {name}."
                ));
                if let Some(op) = operation {
                    prompt.push_str(&format!(
                        " They just performed or are trying to perform: {op}."
                    ));
                }
                if let Some(state) = state {
                    prompt.push_str(&format!(" Current state: {state}"));
                }
            }
            TutorContext::Algorithm { name, state } => {
                prompt.push_str(&format!(
                    "\n\nThe student is learning about the {name} algorithm."
                ));
                if let Some(state) = state {
                    prompt.push_str(&format!(" Current visualization state: {state}"));
                }
            }
            TutorContext::Concept { name } => {
                prompt.push_str(&format!("\n\nThe student is exploring the concept: {name}."));
            }
            TutorContext::General => {}
        }
        prompt
    }

    /// Suggested follow-up questions, at most four.
    pub fn quick_actions(&self) -> Vec<String> {
        let mut actions = match self {
            TutorContext::DataStructure {
                name, operation, ..
            } => {
                let mut v = vec![
                    format!("Explain {name} in simple terms"),
                    "What's the time complexity?".to_string(),
                    "Show me a real-world example".to_string(),
                    "Common mistakes to avoid?".to_string(),
                ];
                if let Some(op) = operation {
                    v.push(format!("Why did my {op} operation work this way?"));
                }
                v
            }
            TutorContext::Algorithm { name, .. } => vec![
                format!("How does {name} work?"),
                "What's the best/worst case?".to_string(),
                "Compare with other sorting algorithms".to_string(),
                "When should I use this?".to_string(),
            ],
            _ => Vec::new(),
        };
        actions.truncate(4);
        actions
    }
}

/// Difficulty of a generated practice problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        })
    }
}

impl FromStr for Difficulty {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(DomainError::InvalidInput(format!(
                "unknown difficulty '{other}'"
            ))),
        }
    }
}

pub struct TutorService {
    client: Arc<dyn ChatClient>,
    options: ChatOptions,
    history_window: usize,
    context: TutorContext,
    transcript: Vec<ChatMessage>,
}

impl TutorService {
    pub fn new(client: Arc<dyn ChatClient>, options: ChatOptions, history_window: usize) -> Self {
        let context = TutorContext::General;
        let transcript = vec![ChatMessage::assistant(context.welcome())];
        Self {
            client,
            options,
            history_window,
            context,
            transcript,
        }
    }

    /// Replace the context. An untouched transcript is re-seeded with the
    /// new welcome; an ongoing conversation is kept.
    pub fn set_context(&mut self, context: TutorContext) {
        let untouched = self.transcript.len() <= 1
            && self
                .transcript
                .first()
                .map_or(true, |m| m.content == self.context.welcome());
        self.context = context;
        if untouched {
            self.transcript = vec![ChatMessage::assistant(self.context.welcome())];
        }
    }

    pub fn context(&self) -> &TutorContext {
        &self.context
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Drop the conversation and start over with the welcome message.
    pub fn clear(&mut self) {
        self.transcript = vec![ChatMessage::assistant(self.context.welcome())];
    }

    /// Messages for a request carrying `input`: system prompt, the last
    /// `history_window` transcript entries, then the new user message.
    pub fn build_request(&self, input: &str) -> Vec<ChatMessage> {
        let start = self.transcript.len().saturating_sub(self.history_window);
        let mut messages = Vec::with_capacity(self.transcript.len() - start + 2);
        messages.push(ChatMessage::system(self.context.system_prompt()));
        messages.extend(self.transcript[start..].iter().cloned());
        messages.push(ChatMessage::user(input));
        messages
    }

    /// Send a user message and append the reply.
    ///
    /// On failure the error is returned and an apology is appended to the
    /// transcript so the next turn still sees what happened.
    #[instrument(level = "debug", skip(self))]
    pub async fn send(&mut self, input: &str) -> ApplicationResult<String> {
        let input = input.trim();
        if input.is_empty() {
            return Err(DomainError::InvalidInput("message required".into()).into());
        }
        if !self.client.is_configured() {
            return Err(ChatError::NotConfigured.into());
        }

        let request = self.build_request(input);
        self.transcript.push(ChatMessage::user(input));
        debug!("send: {} messages in request", request.len());

        match self.client.complete(&request, &self.options).await {
            Ok(reply) => {
                self.transcript.push(ChatMessage::assistant(reply.clone()));
                Ok(reply)
            }
            Err(e) => {
                warn!("send: chat service failed: {}", e);
                self.transcript.push(ChatMessage::assistant(format!(
                    "I'm sorry, I encountered an error: {e}. Please try again."
                )));
                Err(ApplicationError::ChatService(e))
            }
        }
    }

    pub async fn explain_operation(
        &self,
        structure: &str,
        operation: &str,
        context: Option<&str>,
    ) -> ApplicationResult<String> {
        let extra = context.map(|c| format!(" Context: {c}")).unwrap_or_default();
        self.one_shot(
            "You are an expert computer science tutor helping students learn data structures and algorithms.
Provide clear, concise explanations suitable for beginners. Use examples and analogies where helpful.
Keep responses under 150 words unless asked for more detail.",
            &format!("Explain the {operation} operation on a {structure}.{extra}"),
        )
        .await
    }

    pub async fn hint(&self, structure: &str, problem: &str) -> ApplicationResult<String> {
        self.one_shot(
            "You are a helpful tutor providing hints, not complete solutions.
Guide the student to discover the answer themselves through questions and small clues.",
            &format!("I'm working with {structure} and {problem}. Give me a hint to help me proceed."),
        )
        .await
    }

    pub async fn explain_complexity(
        &self,
        algorithm: &str,
        complexity: &str,
    ) -> ApplicationResult<String> {
        self.one_shot(
            "You are explaining Big O notation to beginners. Use real-world analogies and simple language.
Avoid jargon and make it intuitive.",
            &format!("Why is the time complexity of {algorithm} {complexity}? Explain it simply with an analogy."),
        )
        .await
    }

    pub async fn review_answer(&self, topic: &str, answer: &str) -> ApplicationResult<String> {
        self.one_shot(
            "You are a patient teacher reviewing student answers. Provide constructive feedback,
acknowledge what they got right, and gently correct misconceptions.",
            &format!("Topic: {topic}\nMy answer: {answer}\n\nIs this correct? Please review and provide feedback."),
        )
        .await
    }

    pub async fn practice_problem(
        &self,
        structure: &str,
        difficulty: Difficulty,
    ) -> ApplicationResult<String> {
        self.one_shot(
            "You are creating practice problems for data structures.
Make them practical and interesting, with clear problem statements.",
            &format!("Create a {difficulty} practice problem involving {structure}.
Include the problem statement and expected approach (not full solution)."),
        )
        .await
    }

    /// Stateless request outside the transcript.
    async fn one_shot(&self, system: &str, user: &str) -> ApplicationResult<String> {
        if !self.client.is_configured() {
            return Err(ChatError::NotConfigured.into());
        }
        let messages = [ChatMessage::system(system), ChatMessage::user(user)];
        Ok(self.client.complete(&messages, &self.options).await?)
    }
}
