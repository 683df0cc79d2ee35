pub mod evaluator;
pub mod generator;
mod instructions;
pub mod types;
pub mod validator;
