use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::quiz::{error::QuizError, Answer, Explanations, QuizItem};

/// The reference question set on the converse of the Pythagorean theorem.
const REFERENCE_QUESTIONS: &str = include_str!("../../questions.json");

/// One question as it is written in a question file.
#[derive(Debug, Clone, serde::Deserialize)]
struct RawQuizItem {
    question: String,
    answer: String,
    explanations: HashMap<String, String>,
}

/// Fixed, ordered set of quiz items. Never empty.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    items: Vec<QuizItem>,
}

impl QuestionBank {
    pub fn new(items: Vec<QuizItem>) -> Result<Self, QuizError> {
        if items.is_empty() {
            return Err(QuizError::data_integrity("the question bank is empty"));
        }
        Ok(Self { items })
    }

    pub fn reference() -> Result<Self, QuizError> {
        Self::from_reader(REFERENCE_QUESTIONS.as_bytes())
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, QuizError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, QuizError> {
        let raw: Vec<RawQuizItem> = serde_json::from_reader(reader)?;
        let items = raw
            .into_iter()
            .enumerate()
            .map(|(position, raw)| validate(position + 1, raw))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(items)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&QuizItem> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuizItem> {
        self.items.iter()
    }
}

fn normalize(token: &str) -> String {
    token.trim().to_lowercase()
}

fn validate(number: usize, raw: RawQuizItem) -> Result<QuizItem, QuizError> {
    let prompt = raw.question.trim().to_string();
    if prompt.is_empty() {
        return Err(QuizError::data_integrity(format!(
            "question {number} has an empty prompt"
        )));
    }

    let correct_answer = Answer::from_token(&normalize(&raw.answer)).ok_or_else(|| {
        QuizError::data_integrity(format!(
            "question {number} has unknown answer {:?}",
            raw.answer
        ))
    })?;

    let mut yes = None;
    let mut no = None;
    for (key, text) in raw.explanations {
        let slot = match Answer::from_token(&normalize(&key)) {
            Some(Answer::Yes) => &mut yes,
            Some(Answer::No) => &mut no,
            None => {
                return Err(QuizError::data_integrity(format!(
                    "question {number} has an explanation for unknown answer {key:?}"
                )))
            }
        };
        if slot.replace(text).is_some() {
            return Err(QuizError::data_integrity(format!(
                "question {number} has more than one explanation for {key:?}"
            )));
        }
    }

    match (yes, no) {
        (Some(yes), Some(no)) => Ok(QuizItem::new(
            prompt,
            correct_answer,
            Explanations::new(yes, no),
        )),
        (None, _) => Err(QuizError::data_integrity(format!(
            "question {number} has no explanation for {:?}",
            Answer::Yes.token()
        ))),
        (_, None) => Err(QuizError::data_integrity(format!(
            "question {number} has no explanation for {:?}",
            Answer::No.token()
        ))),
    }
}
