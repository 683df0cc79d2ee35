pub mod pdf_text_extraction;
pub mod topic_extraction;
