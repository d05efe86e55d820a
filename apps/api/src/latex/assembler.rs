use crate::latex::sections::{
    achievements_tex, education_tex, experience_tex, intro_tex, profiles_tex, projects_tex,
    skills_tex, FOOTER_TEX, HEADER_TEX,
};
use crate::models::resume::ResumeRecord;

/// Concatenates the fixed header, every section fragment in resume order and
/// the fixed footer. Missing sections arrive here already normalized to empty
/// defaults, so each formatter always receives a value.
pub fn assemble_document(resume: &ResumeRecord) -> String {
    let fragments = [
        intro_tex(&resume.intro),
        education_tex(&resume.edu),
        experience_tex(&resume.exp),
        projects_tex(&resume.projects),
        achievements_tex(&resume.ach),
        skills_tex(&resume.skills),
        profiles_tex(&resume.profiles),
    ];

    let body_len: usize = fragments.iter().map(String::len).sum();
    let mut doc = String::with_capacity(HEADER_TEX.len() + body_len + FOOTER_TEX.len());
    doc.push_str(HEADER_TEX);
    for fragment in &fragments {
        doc.push_str(fragment);
    }
    doc.push_str(FOOTER_TEX);
    doc
}
