use common::error::AppError;

use crate::types::{ExamPaperRequest, GeneratedExam};

/// Closed set of accepted MCQ answer keys.
const MCQ_ANSWER_KEYS: [&str; 4] = ["A", "B", "C", "D"];

/// Checks a generated exam against the requested question-paper schema.
///
/// Pure structural/quantitative conformance: exact counts per category,
/// exact per-question marks, and the closed answer-key set for MCQs.
/// A category requested with `count == 0` must still come back empty.
/// Violations reject with a specific reason; output is never coerced.
pub fn validate_exam(exam: &GeneratedExam, req: &ExamPaperRequest) -> Result<(), AppError> {
    let schema = &req.question_paper_schema;

    if exam.mcq_questions.len() != schema.mcq.count as usize {
        return Err(AppError::SchemaViolation(format!(
            "Invalid MCQ count: expected {}, got {}",
            schema.mcq.count,
            exam.mcq_questions.len()
        )));
    }

    for (i, question) in exam.mcq_questions.iter().enumerate() {
        let position = i + 1;
        if question.marks != schema.mcq.mark {
            return Err(AppError::SchemaViolation(format!(
                "MCQ {position} has invalid marks"
            )));
        }
        if !MCQ_ANSWER_KEYS.contains(&question.correct_option.as_str()) {
            return Err(AppError::SchemaViolation(format!(
                "MCQ {position} has invalid correctOption"
            )));
        }
    }

    if exam.subjective_questions.len() != schema.subjective.count as usize {
        return Err(AppError::SchemaViolation(format!(
            "Invalid Subjective count: expected {}, got {}",
            schema.subjective.count,
            exam.subjective_questions.len()
        )));
    }

    for (i, question) in exam.subjective_questions.iter().enumerate() {
        if question.marks != schema.subjective.mark {
            return Err(AppError::SchemaViolation(format!(
                "Subjective {} has invalid marks",
                i + 1
            )));
        }
    }

    if exam.coding_questions.len() != schema.code.count as usize {
        return Err(AppError::SchemaViolation(format!(
            "Invalid Coding question count: expected {}, got {}",
            schema.code.count,
            exam.coding_questions.len()
        )));
    }

    for (i, question) in exam.coding_questions.iter().enumerate() {
        if question.marks != schema.code.mark {
            return Err(AppError::SchemaViolation(format!(
                "Coding {} has invalid marks",
                i + 1
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{McqQuestion, QuestionPaperSchema, QuestionSpec, WrittenQuestion};

    fn request(mcq: (u32, u32), subjective: (u32, u32), code: (u32, u32)) -> ExamPaperRequest {
        ExamPaperRequest {
            question_paper_schema: QuestionPaperSchema {
                mcq: QuestionSpec {
                    count: mcq.0,
                    mark: mcq.1,
                },
                subjective: QuestionSpec {
                    count: subjective.0,
                    mark: subjective.1,
                },
                code: QuestionSpec {
                    count: code.0,
                    mark: code.1,
                },
                evaluation_instruction: String::new(),
                difficulty_instruction: String::new(),
            },
            syllabus: vec![],
            marks: 0,
            duration: 60,
            subject: "Biology".into(),
        }
    }

    fn mcq(marks: u32, key: &str) -> McqQuestion {
        McqQuestion {
            text: "Which organelle produces ATP?".into(),
            options: vec![
                "Nucleus".into(),
                "Mitochondrion".into(),
                "Ribosome".into(),
                "Golgi".into(),
            ],
            correct_option: key.into(),
            marks,
        }
    }

    fn written(marks: u32) -> WrittenQuestion {
        WrittenQuestion {
            text: "Explain osmosis.".into(),
            marks,
        }
    }

    fn exam(
        mcqs: Vec<McqQuestion>,
        subjectives: Vec<WrittenQuestion>,
        coding: Vec<WrittenQuestion>,
    ) -> GeneratedExam {
        GeneratedExam {
            mcq_questions: mcqs,
            subjective_questions: subjectives,
            coding_questions: coding,
        }
    }

    #[test]
    fn test_conforming_exam_validates() {
        let req = request((5, 2), (2, 10), (0, 0));
        let generated = exam(
            vec![mcq(2, "A"), mcq(2, "B"), mcq(2, "C"), mcq(2, "D"), mcq(2, "A")],
            vec![written(10), written(10)],
            vec![],
        );

        assert!(validate_exam(&generated, &req).is_ok());
    }

    #[test]
    fn test_mcq_count_mismatch_names_mcq() {
        let req = request((5, 2), (2, 10), (0, 0));
        let generated = exam(
            vec![mcq(2, "A"), mcq(2, "B"), mcq(2, "C"), mcq(2, "D")],
            vec![written(10), written(10)],
            vec![],
        );

        let err = validate_exam(&generated, &req).unwrap_err();
        match err {
            AppError::SchemaViolation(reason) => {
                assert_eq!(reason, "Invalid MCQ count: expected 5, got 4");
            }
            other => panic!("Expected SchemaViolation, got {other:?}"),
        }
    }

    #[test]
    fn test_single_wrong_mcq_marks_rejects_with_position() {
        let req = request((3, 2), (0, 0), (0, 0));
        let generated = exam(vec![mcq(2, "A"), mcq(3, "B"), mcq(2, "C")], vec![], vec![]);

        let err = validate_exam(&generated, &req).unwrap_err();
        match err {
            AppError::SchemaViolation(reason) => {
                assert_eq!(reason, "MCQ 2 has invalid marks");
            }
            other => panic!("Expected SchemaViolation, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_answer_key_rejects_with_position() {
        let req = request((2, 1), (0, 0), (0, 0));
        let generated = exam(vec![mcq(1, "A"), mcq(1, "E")], vec![], vec![]);

        let err = validate_exam(&generated, &req).unwrap_err();
        match err {
            AppError::SchemaViolation(reason) => {
                assert_eq!(reason, "MCQ 2 has invalid correctOption");
            }
            other => panic!("Expected SchemaViolation, got {other:?}"),
        }
    }

    #[test]
    fn test_lowercase_answer_key_rejects() {
        let req = request((1, 1), (0, 0), (0, 0));
        let generated = exam(vec![mcq(1, "a")], vec![], vec![]);

        assert!(validate_exam(&generated, &req).is_err());
    }

    #[test]
    fn test_subjective_marks_mismatch() {
        let req = request((0, 0), (2, 10), (0, 0));
        let generated = exam(vec![], vec![written(10), written(5)], vec![]);

        let err = validate_exam(&generated, &req).unwrap_err();
        match err {
            AppError::SchemaViolation(reason) => {
                assert_eq!(reason, "Subjective 2 has invalid marks");
            }
            other => panic!("Expected SchemaViolation, got {other:?}"),
        }
    }

    #[test]
    fn test_coding_count_mismatch() {
        let req = request((0, 0), (0, 0), (1, 8));
        let generated = exam(vec![], vec![], vec![]);

        let err = validate_exam(&generated, &req).unwrap_err();
        match err {
            AppError::SchemaViolation(reason) => {
                assert_eq!(reason, "Invalid Coding question count: expected 1, got 0");
            }
            other => panic!("Expected SchemaViolation, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_count_category_requires_empty_list() {
        let req = request((0, 0), (0, 0), (0, 0));

        let empty = exam(vec![], vec![], vec![]);
        assert!(validate_exam(&empty, &req).is_ok());

        let extra = exam(vec![], vec![], vec![written(5)]);
        assert!(validate_exam(&extra, &req).is_err());
    }
}
