pub mod exam;
pub mod liveness;
pub mod readiness;
pub mod vectorstore;
