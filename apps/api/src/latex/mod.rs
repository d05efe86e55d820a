// LaTeX rendering: per-section formatters, document assembly and the
// structural smoke test run before anything is published.

pub mod assembler;
pub mod escape;
pub mod sections;
pub mod validation;

pub use assembler::assemble_document;
pub use validation::validate_document;
