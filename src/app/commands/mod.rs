pub mod build_model;
pub mod job;
pub mod publish;
pub mod validate;
