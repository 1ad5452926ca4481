//! Coverage selection and evaluation.

pub mod evaluate;
pub mod pipeline;
pub mod ranking;
pub mod selector;
