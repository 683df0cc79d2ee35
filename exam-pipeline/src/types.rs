use serde::{Deserialize, Serialize};

/// Requested shape of one question category: how many questions and the
/// uniform per-question mark.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSpec {
    pub count: u32,
    pub mark: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPaperSchema {
    pub mcq: QuestionSpec,
    pub subjective: QuestionSpec,
    pub code: QuestionSpec,
    #[serde(default)]
    pub evaluation_instruction: String,
    #[serde(default)]
    pub difficulty_instruction: String,
}

/// One syllabus chapter with its target mark allocation and the
/// "important topics" blob produced at ingestion time. The blob is opaque
/// free text; it is only ever fed back into retrieval queries and prompts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyllabusChapter {
    pub chapter: String,
    pub marks: u32,
    #[serde(default)]
    pub important_topics: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamPaperRequest {
    pub question_paper_schema: QuestionPaperSchema,
    pub syllabus: Vec<SyllabusChapter>,
    pub marks: u32,
    pub duration: u32,
    pub subject: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McqQuestion {
    pub text: String,
    pub options: Vec<String>,
    /// Answer key, constrained to the closed set A-D by the validator.
    pub correct_option: String,
    pub marks: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WrittenQuestion {
    pub text: String,
    pub marks: u32,
}

/// The generation model's structured output. Validated against the
/// requested schema before it ever reaches a caller; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedExam {
    pub mcq_questions: Vec<McqQuestion>,
    pub subjective_questions: Vec<WrittenQuestion>,
    pub coding_questions: Vec<WrittenQuestion>,
}

/// One submitted answer; `marks` is the maximum awardable for the question.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAnswer {
    pub question_id: String,
    pub question: String,
    pub answer_text: String,
    pub marks: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRequest {
    #[serde(default)]
    pub subjective_answers: Vec<SubmittedAnswer>,
    #[serde(default)]
    pub code_answers: Vec<SubmittedAnswer>,
    #[serde(default)]
    pub evaluation_instructions: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionEvaluation {
    pub question_id: String,
    pub marks_awarded: u32,
    pub ai_feedback: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceCategory {
    Weak,
    Average,
    Topper,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallFeedback {
    pub feedback_summary: String,
    pub category: PerformanceCategory,
}

/// Per-question awarded marks plus the overall qualitative summary.
/// Transient per-request value object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub subjective: Vec<QuestionEvaluation>,
    pub code: Vec<QuestionEvaluation>,
    pub other: OverallFeedback,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_exam_request_deserializes_camel_case() {
        let payload = json!({
            "questionPaperSchema": {
                "mcq": { "count": 5, "mark": 2 },
                "subjective": { "count": 2, "mark": 10 },
                "code": { "count": 0, "mark": 0 },
                "evaluationInstruction": "be strict",
                "difficultyInstruction": "medium difficulty"
            },
            "syllabus": [
                { "chapter": "Cell Biology", "marks": 20, "importantTopics": "Mitosis\nMeiosis" }
            ],
            "marks": 40,
            "duration": 90,
            "subject": "Biology"
        });

        let request: ExamPaperRequest = serde_json::from_value(payload).unwrap();

        assert_eq!(request.question_paper_schema.mcq.count, 5);
        assert_eq!(request.question_paper_schema.difficulty_instruction, "medium difficulty");
        assert_eq!(request.syllabus[0].important_topics, "Mitosis\nMeiosis");
        assert_eq!(request.subject, "Biology");
    }

    #[test]
    fn test_unknown_request_fields_are_ignored() {
        // The original clients send extra chapter fields like url/publicId
        let payload = json!({
            "questionPaperSchema": {
                "mcq": { "count": 1, "mark": 1 },
                "subjective": { "count": 0, "mark": 0 },
                "code": { "count": 0, "mark": 0 }
            },
            "syllabus": [
                { "chapter": "Ch 1", "marks": 5, "importantTopics": "t", "url": "x", "publicId": "y" }
            ],
            "marks": 5,
            "duration": 30,
            "subject": "CS"
        });

        let request: ExamPaperRequest = serde_json::from_value(payload).unwrap();
        assert_eq!(request.syllabus.len(), 1);
    }

    #[test]
    fn test_generated_exam_wire_format() {
        let exam = GeneratedExam {
            mcq_questions: vec![McqQuestion {
                text: "2 + 2?".into(),
                options: vec!["3".into(), "4".into(), "5".into(), "6".into()],
                correct_option: "B".into(),
                marks: 1,
            }],
            subjective_questions: vec![],
            coding_questions: vec![],
        };

        let value = serde_json::to_value(&exam).unwrap();

        assert!(value.get("mcq_questions").is_some());
        assert_eq!(value["mcq_questions"][0]["correctOption"], "B");
    }

    #[test]
    fn test_evaluation_request_defaults_missing_lists() {
        let request: EvaluationRequest = serde_json::from_value(json!({})).unwrap();

        assert!(request.subjective_answers.is_empty());
        assert!(request.code_answers.is_empty());
        assert!(request.evaluation_instructions.is_empty());
    }

    #[test]
    fn test_performance_category_round_trip() {
        let other: OverallFeedback = serde_json::from_value(json!({
            "feedbackSummary": "Solid on coding, weaker on theory.",
            "category": "topper"
        }))
        .unwrap();

        assert_eq!(other.category, PerformanceCategory::Topper);
        assert_eq!(
            serde_json::to_value(other.category).unwrap(),
            json!("topper")
        );
    }

    #[test]
    fn test_unexpected_category_fails_closed() {
        let result: Result<OverallFeedback, _> = serde_json::from_value(json!({
            "feedbackSummary": "ok",
            "category": "excellent"
        }));

        assert!(result.is_err());
    }
}
