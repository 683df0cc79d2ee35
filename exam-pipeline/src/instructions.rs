use serde_json::{json, Value};

use crate::types::{EvaluationRequest, ExamPaperRequest, SubmittedAnswer};

pub static EXAM_GENERATION_SYSTEM_MESSAGE: &str = "You are an expert exam paper generator. \
Create a comprehensive exam paper from the provided syllabus context and requirements. \
Every question must be unique across repeated generations for the same syllabus; combine multiple \
topics in one question where it makes the question more demanding, and keep every question relevant \
to the subject and syllabus. Never repeat questions or options. \
Return only a JSON object matching the provided schema, with no additional text.";

pub static EXAM_EVALUATION_SYSTEM_MESSAGE: &str = "You are an expert and strict exam paper evaluator. \
Evaluate each submitted answer against the provided syllabus context and the instructor's instructions. \
Never award more than the stated maximum marks for a question. Award 0 marks for missing, irrelevant, \
wrong, or hallucinated answers. Subjective answers must be content-rich, conceptually relevant, and \
detailed in proportion to their marks. Coding answers must be syntactically correct and logically valid: \
valid logic with broken syntax earns partial marks (1-2), never full marks and never 0 purely for syntax; \
completely wrong code earns 0. Use only the provided context; do not assume missing information. \
The overall category must be exactly one of weak, average, or topper. \
Return only a JSON object matching the provided schema, with no additional text.";

pub fn get_exam_response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "mcq_questions": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "text": { "type": "string" },
                        "options": {
                            "type": "array",
                            "items": { "type": "string" }
                        },
                        "correctOption": {
                            "type": "string",
                            "enum": ["A", "B", "C", "D"]
                        },
                        "marks": { "type": "integer" }
                    },
                    "required": ["text", "options", "correctOption", "marks"],
                    "additionalProperties": false
                }
            },
            "subjective_questions": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "text": { "type": "string" },
                        "marks": { "type": "integer" }
                    },
                    "required": ["text", "marks"],
                    "additionalProperties": false
                }
            },
            "coding_questions": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "text": { "type": "string" },
                        "marks": { "type": "integer" }
                    },
                    "required": ["text", "marks"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["mcq_questions", "subjective_questions", "coding_questions"],
        "additionalProperties": false
    })
}

pub fn get_evaluation_response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "subjective": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "questionId": { "type": "string" },
                        "marksAwarded": { "type": "integer" },
                        "aiFeedback": { "type": "string" }
                    },
                    "required": ["questionId", "marksAwarded", "aiFeedback"],
                    "additionalProperties": false
                }
            },
            "code": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "questionId": { "type": "string" },
                        "marksAwarded": { "type": "integer" },
                        "aiFeedback": { "type": "string" }
                    },
                    "required": ["questionId", "marksAwarded", "aiFeedback"],
                    "additionalProperties": false
                }
            },
            "other": {
                "type": "object",
                "properties": {
                    "feedbackSummary": { "type": "string" },
                    "category": {
                        "type": "string",
                        "enum": ["weak", "average", "topper"]
                    }
                },
                "required": ["feedbackSummary", "category"],
                "additionalProperties": false
            }
        },
        "required": ["subjective", "code", "other"],
        "additionalProperties": false
    })
}

/// Assembles the generation user message: schema numbers, chapter mark
/// table, difficulty instruction, retrieved context, and the per-call
/// uniqueness nonce.
pub fn build_generation_user_message(
    req: &ExamPaperRequest,
    chapter_marks: &str,
    context: &str,
    nonce: &str,
) -> String {
    let schema = &req.question_paper_schema;

    format!(
        "The exam paper must include:\n\
        - Multiple Choice Questions (MCQs): {mcq_count} questions, each worth {mcq_marks} marks.\n\
        - Subjective Questions: {subjective_count} questions, each worth {subjective_marks} marks.\n\
        - Coding Questions: {code_count} questions, each worth {code_marks} marks.\n\n\
        Total Marks: {marks}. The final exam paper should sum up to the total marks specified.\n\
        Duration: {duration} minutes. Make the paper suitable for the given duration.\n\
        Subject: {subject}\n\n\
        Uniqueness nonce (use it only to vary your output, never mention it): {nonce}\n\n\
        Chapter-wise Mark Distribution:\n{chapter_marks}\n\n\
        Difficulty Instruction:\n{difficulty}\n\n\
        Context from the syllabus and important topics:\n{context}",
        mcq_count = schema.mcq.count,
        mcq_marks = schema.mcq.mark,
        subjective_count = schema.subjective.count,
        subjective_marks = schema.subjective.mark,
        code_count = schema.code.count,
        code_marks = schema.code.mark,
        marks = req.marks,
        duration = req.duration,
        subject = req.subject,
        difficulty = schema.difficulty_instruction,
    )
}

/// Assembles the grading user message: both context blocks, the instructor
/// instructions, and the (id, question, answer, max marks) tuples.
pub fn build_evaluation_user_message(
    req: &EvaluationRequest,
    code_context: &str,
    subjective_context: &str,
) -> String {
    format!(
        "Context retrieved for the coding questions:\n{code_context}\n\n\
        Context retrieved for the subjective questions:\n{subjective_context}\n\n\
        Additional evaluation instructions by the instructor:\n{instructions}\n\n\
        Coding questions and answers, with the maximum marks for each question:\n{code}\n\n\
        Subjective questions and answers, with the maximum marks for each question:\n{subjective}",
        instructions = req.evaluation_instructions,
        code = answers_json(&req.code_answers),
        subjective = answers_json(&req.subjective_answers),
    )
}

fn answers_json(answers: &[SubmittedAnswer]) -> Value {
    json!(answers
        .iter()
        .map(|answer| {
            json!({
                "questionId": answer.question_id,
                "question": answer.question,
                "answer": answer.answer_text,
                "marks": answer.marks,
            })
        })
        .collect::<Vec<_>>())
}
