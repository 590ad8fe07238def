//! Assignments, daily vocab quizzes and completion streaks

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{AssignmentId, AvatarId};

/// Assignment code of the recurring daily vocab quiz
pub const DAILY_VOCAB_CODE: &str = "1005";

/// Default answer time per quiz question, in seconds
pub const QUESTION_SECS: i64 = 20;

/// An assignment given to one avatar
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: AssignmentId,
    pub name: String,
    /// Code grouping assignments of the same kind, e.g. the daily vocab quiz
    #[serde(rename = "assignmentId")]
    pub assignment_code: String,
    #[serde(rename = "userId")]
    pub avatar_id: AvatarId,
    /// Coins awarded on completion
    pub coins: i64,
    pub coins_received: i64,
    pub completed: bool,
    pub due_date: DateTime<Utc>,
    pub retake_count: u32,
    /// Assignment payload, e.g. the quiz question list
    pub data: Option<Value>,
}

/// One quiz question in an assignment payload. Field names match what the
/// quiz player reads.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub question: String,
    pub answer: String,
    pub correct: bool,
    pub coins_worth: i64,
    pub time_alloted: i64,
}

/// Random alphanumeric question id
pub fn random_question_id<R: Rng>(rng: &mut R, len: usize) -> String {
    const CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    (0..len)
        .map(|_| CHARS[rng.gen_range(0..CHARS.len())] as char)
        .collect()
}

/// Build the question list for a daily vocab quiz from (english, spanish)
/// word pairs
pub fn daily_vocab_questions<R: Rng>(
    words: &[(String, String)],
    worth: i64,
    rng: &mut R,
) -> Vec<QuizQuestion> {
    words
        .iter()
        .map(|(eng, spa)| QuizQuestion {
            id: random_question_id(rng, 8),
            kind: "input".to_string(),
            question: format!("How do you say '{eng}' in Spanish?"),
            answer: spa.clone(),
            correct: false,
            coins_worth: worth,
            time_alloted: QUESTION_SECS,
        })
        .collect()
}

/// Count an avatar's daily-vocab streak: consecutive completed quizzes
/// walking back from the most recent one. A single missed quiz breaks it.
pub fn streak(assignments: &[Assignment]) -> u32 {
    let mut daily: Vec<&Assignment> = assignments
        .iter()
        .filter(|a| a.assignment_code == DAILY_VOCAB_CODE)
        .collect();
    daily.sort_by(|a, b| b.due_date.cmp(&a.due_date));
    daily.iter().take_while(|a| a.completed).count() as u32
}
