//! Structural smoke test for an assembled document.
//!
//! Only checks that the three mandatory markers occur somewhere in the text.
//! Order and nesting are deliberately not checked; callers rely on this
//! leniency and it is not a LaTeX parser.

const REQUIRED_MARKERS: [&str; 3] = ["\\documentclass", "\\begin{document}", "\\end{document}"];

/// Returns `Err(reason)` naming every missing marker, or `Ok(())`.
pub fn validate_document(latex: &str) -> Result<(), String> {
    if latex.is_empty() {
        return Err("LaTeX content is empty".to_string());
    }

    let missing: Vec<&str> = REQUIRED_MARKERS
        .iter()
        .copied()
        .filter(|marker| !latex.contains(marker))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(format!(
            "Missing required LaTeX structure: {}",
            missing.join(", ")
        ))
    }
}
