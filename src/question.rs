//! State of the "ask about this article" dialog.
//!
//! At most one session exists. Transitions happen only through
//! [`QuestionDialog::open`], [`QuestionDialog::submit`],
//! [`QuestionDialog::resolve`] and [`QuestionDialog::close`].

use crate::api::{ApiError, Article, AskResponse};

/// Shown when the server answers without an `answer` field.
pub const NO_ANSWER_MESSAGE: &str = "답변을 찾을 수 없습니다.";
/// Shown for any failed question request.
pub const ASK_ERROR_MESSAGE: &str = "오류가 발생했습니다. 다시 시도해주세요.";

/// Upper bound on typed question length, in characters.
pub const MAX_QUESTION_CHARS: usize = 1000;

/// Why a submit did not produce a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitSkipped {
    NoSession,
    EmptyQuestion,
    AlreadyPending,
}

/// A question ready to be sent, tagged with the session it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AskRequest {
    pub article_id: String,
    pub question: String,
    pub token: u64,
}

#[derive(Debug, Clone)]
pub struct ActiveQuestion {
    pub article: Article,
    pub question: String,
    pub answer: Option<String>,
    pub pending: bool,
    token: u64,
}

impl ActiveQuestion {
    pub fn token(&self) -> u64 {
        self.token
    }
}

#[derive(Debug, Clone, Default)]
pub enum Session {
    #[default]
    Closed,
    Active(ActiveQuestion),
}

#[derive(Debug, Default)]
pub struct QuestionDialog {
    session: Session,
    next_token: u64,
}

impl QuestionDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn active(&self) -> Option<&ActiveQuestion> {
        match &self.session {
            Session::Active(active) => Some(active),
            Session::Closed => None,
        }
    }

    fn active_mut(&mut self) -> Option<&mut ActiveQuestion> {
        match &mut self.session {
            Session::Active(active) => Some(active),
            Session::Closed => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.session, Session::Active(_))
    }

    pub fn is_pending(&self) -> bool {
        self.active().is_some_and(|a| a.pending)
    }

    /// Start a fresh session for `article`, discarding any previous one.
    pub fn open(&mut self, article: Article) {
        self.next_token = self.next_token.wrapping_add(1);
        tracing::debug!(article_id = %article.id, token = self.next_token, "Opening question dialog");
        self.session = Session::Active(ActiveQuestion {
            article,
            question: String::new(),
            answer: None,
            pending: false,
            token: self.next_token,
        });
    }

    /// Drop the session. Article, question and answer go together.
    pub fn close(&mut self) {
        self.session = Session::Closed;
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(active) = self.active_mut() {
            if active.question.chars().count() < MAX_QUESTION_CHARS && (c == '\n' || !c.is_control()) {
                active.question.push(c);
            }
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(active) = self.active_mut() {
            active.question.pop();
        }
    }

    pub fn clear_question(&mut self) {
        if let Some(active) = self.active_mut() {
            active.question.clear();
        }
    }

    /// Validate the session and mark it pending.
    ///
    /// The question is sent as typed; only the blank check trims it.
    pub fn submit(&mut self) -> Result<AskRequest, SubmitSkipped> {
        let active = self.active_mut().ok_or(SubmitSkipped::NoSession)?;
        if active.question.trim().is_empty() {
            return Err(SubmitSkipped::EmptyQuestion);
        }
        if active.pending {
            return Err(SubmitSkipped::AlreadyPending);
        }
        active.pending = true;
        Ok(AskRequest {
            article_id: active.article.id.clone(),
            question: active.question.clone(),
            token: active.token,
        })
    }

    /// Store the outcome of `request`. Returns false if the session it was
    /// issued for is gone.
    pub fn resolve(&mut self, request: &AskRequest, result: Result<AskResponse, ApiError>) -> bool {
        let answer = match result {
            Ok(response) => response
                .answer
                .filter(|a| !a.is_empty())
                .unwrap_or_else(|| NO_ANSWER_MESSAGE.to_string()),
            Err(e) => {
                tracing::warn!(article_id = %request.article_id, error = %e, "Question request failed");
                ASK_ERROR_MESSAGE.to_string()
            }
        };
        self.apply(request, answer)
    }

    /// Resolve `request` with the generic apology, for requests that never
    /// produced a result.
    pub fn fail(&mut self, request: &AskRequest) -> bool {
        self.apply(request, ASK_ERROR_MESSAGE.to_string())
    }

    fn apply(&mut self, request: &AskRequest, answer: String) -> bool {
        let Some(active) = self.active_mut().filter(|a| a.token == request.token) else {
            tracing::debug!(
                article_id = %request.article_id,
                token = request.token,
                "Dropping answer for closed question session"
            );
            return false;
        };
        active.pending = false;
        active.answer = Some(answer);
        true
    }
}
