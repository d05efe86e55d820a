//! Per-section LaTeX formatters.
//!
//! Every formatter is a pure function of its section data. An empty section
//! renders as the empty string so the assembled document never carries a
//! heading with nothing under it.

use crate::latex::escape::{escape_latex, escape_url};
use crate::models::resume::{
    Achievement, Education, Experience, Intro, Profile, Project, SkillGroup,
};

/// Preamble and `\begin{document}`.
pub const HEADER_TEX: &str = r"\documentclass[letterpaper,11pt]{article}

\usepackage{latexsym}
\usepackage[empty]{fullpage}
\usepackage{titlesec}
\usepackage[usenames,dvipsnames]{color}
\usepackage{enumitem}
\usepackage[hidelinks]{hyperref}
\usepackage{fancyhdr}
\usepackage[english]{babel}
\usepackage{tabularx}

\pagestyle{fancy}
\fancyhf{}
\fancyfoot{}
\renewcommand{\headrulewidth}{0pt}
\renewcommand{\footrulewidth}{0pt}

\addtolength{\oddsidemargin}{-0.5in}
\addtolength{\evensidemargin}{-0.5in}
\addtolength{\textwidth}{1in}
\addtolength{\topmargin}{-.5in}
\addtolength{\textheight}{1.0in}

\urlstyle{same}
\raggedbottom
\raggedright
\setlength{\tabcolsep}{0in}

\titleformat{\section}{
  \vspace{-4pt}\scshape\raggedright\large
}{}{0em}{}[\color{black}\titlerule \vspace{-5pt}]

\newcommand{\resumeItem}[1]{\item\small{#1 \vspace{-2pt}}}
\newcommand{\resumeSubheading}[4]{
  \vspace{-2pt}\item
    \begin{tabular*}{0.97\textwidth}[t]{l@{\extracolsep{\fill}}r}
      \textbf{#1} & #2 \\
      \textit{\small#3} & \textit{\small #4} \\
    \end{tabular*}\vspace{-7pt}
}
\newcommand{\resumeProjectHeading}[2]{
    \item
    \begin{tabular*}{0.97\textwidth}{l@{\extracolsep{\fill}}r}
      \small#1 & #2 \\
    \end{tabular*}\vspace{-7pt}
}
\renewcommand\labelitemii{$\vcenter{\hbox{\tiny$\bullet$}}$}
\newcommand{\resumeSubHeadingListStart}{\begin{itemize}[leftmargin=0.15in, label={}]}
\newcommand{\resumeSubHeadingListEnd}{\end{itemize}}
\newcommand{\resumeItemListStart}{\begin{itemize}}
\newcommand{\resumeItemListEnd}{\end{itemize}\vspace{-5pt}}

\begin{document}
";

/// Closes the document.
pub const FOOTER_TEX: &str = "\n\\end{document}\n";

pub fn intro_tex(intro: &Intro) -> String {
    if intro.is_empty() {
        return String::new();
    }

    let mut contacts = Vec::new();
    if let Some(phone) = non_blank(&intro.phone) {
        contacts.push(escape_latex(phone));
    }
    if let Some(email) = non_blank(&intro.email) {
        contacts.push(format!(
            "\\href{{mailto:{}}}{{\\underline{{{}}}}}",
            escape_url(email),
            escape_latex(email)
        ));
    }
    if let Some(location) = non_blank(&intro.location) {
        contacts.push(escape_latex(location));
    }
    for link in [&intro.linkedin, &intro.github, &intro.website] {
        if let Some(url) = non_blank(link) {
            contacts.push(href(url, &display_url(url)));
        }
    }

    let mut tex = String::from("\\begin{center}\n");
    tex.push_str(&format!(
        "    \\textbf{{\\Huge \\scshape {}}} \\\\ \\vspace{{1pt}}\n",
        escape_latex(intro.name.trim())
    ));
    if !contacts.is_empty() {
        tex.push_str(&format!("    \\small {}\n", contacts.join(" $|$ ")));
    }
    tex.push_str("\\end{center}\n\n");
    tex
}

pub fn education_tex(edu: &[Education]) -> String {
    if edu.is_empty() {
        return String::new();
    }

    let mut tex = section_open("Education");
    for e in edu {
        tex.push_str(&subheading(
            &e.institution,
            e.location.as_deref().unwrap_or(""),
            &degree_line(e),
            &date_range(&e.start, &e.end),
        ));
    }
    tex.push_str(SECTION_CLOSE);
    tex
}

pub fn experience_tex(exp: &[Experience]) -> String {
    if exp.is_empty() {
        return String::new();
    }

    let mut tex = section_open("Experience");
    for e in exp {
        tex.push_str(&subheading(
            &e.role,
            &date_range(&e.start, &e.end),
            &e.company,
            e.location.as_deref().unwrap_or(""),
        ));
        tex.push_str(&item_list(&e.points));
    }
    tex.push_str(SECTION_CLOSE);
    tex
}

pub fn projects_tex(projects: &[Project]) -> String {
    if projects.is_empty() {
        return String::new();
    }

    let mut tex = section_open("Projects");
    for p in projects {
        let mut heading = format!("\\textbf{{{}}}", escape_latex(&p.title));
        if !p.tech.is_empty() {
            let tech: Vec<String> = p.tech.iter().map(|t| escape_latex(t)).collect();
            heading.push_str(&format!(" $|$ \\emph{{{}}}", tech.join(", ")));
        }
        let link = non_blank(&p.link)
            .map(|url| href(url, "Link"))
            .unwrap_or_default();
        tex.push_str(&format!(
            "    \\resumeProjectHeading\n      {{{heading}}}{{{link}}}\n"
        ));
        tex.push_str(&item_list(&p.points));
    }
    tex.push_str(SECTION_CLOSE);
    tex
}

pub fn achievements_tex(ach: &[Achievement]) -> String {
    if ach.is_empty() {
        return String::new();
    }

    let mut tex = String::from("\\section{Achievements}\n \\resumeSubHeadingListStart\n");
    for a in ach {
        let mut line = format!("\\textbf{{{}}}", escape_latex(&a.title));
        if let Some(desc) = non_blank(&a.description) {
            line.push_str(&format!(": {}", escape_latex(desc)));
        }
        if let Some(date) = non_blank(&a.date) {
            line.push_str(&format!(" \\hfill \\textit{{{}}}", escape_latex(date)));
        }
        tex.push_str(&format!("    \\resumeItem{{{line}}}\n"));
    }
    tex.push_str(SECTION_CLOSE);
    tex
}

pub fn skills_tex(skills: &[SkillGroup]) -> String {
    if skills.is_empty() {
        return String::new();
    }

    let lines: Vec<String> = skills
        .iter()
        .map(|g| {
            let items: Vec<String> = g.items.iter().map(|i| escape_latex(i)).collect();
            format!(
                "     \\textbf{{{}}}{{: {}}}",
                escape_latex(&g.category),
                items.join(", ")
            )
        })
        .collect();

    format!(
        "\\section{{Technical Skills}}\n \\begin{{itemize}}[leftmargin=0.15in, label={{}}]\n    \\small{{\\item{{\n{}\n    }}}}\n \\end{{itemize}}\n\n",
        lines.join(" \\\\\n")
    )
}

pub fn profiles_tex(profiles: &[Profile]) -> String {
    if profiles.is_empty() {
        return String::new();
    }

    let mut tex = String::from("\\section{Profiles}\n \\resumeSubHeadingListStart\n");
    for p in profiles {
        let label = p
            .handle
            .as_deref()
            .filter(|h| !h.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| display_url(&p.url));
        tex.push_str(&format!(
            "    \\resumeItem{{\\textbf{{{}}}: {}}}\n",
            escape_latex(&p.platform),
            href(&p.url, &label)
        ));
    }
    tex.push_str(SECTION_CLOSE);
    tex
}

const SECTION_CLOSE: &str = " \\resumeSubHeadingListEnd\n\n";

fn section_open(title: &str) -> String {
    format!("\\section{{{title}}}\n  \\resumeSubHeadingListStart\n")
}

fn subheading(a: &str, b: &str, c: &str, d: &str) -> String {
    format!(
        "    \\resumeSubheading\n      {{{}}}{{{}}}\n      {{{}}}{{{}}}\n",
        escape_latex(a),
        escape_latex(b),
        escape_latex(c),
        escape_latex(d)
    )
}

fn item_list(points: &[String]) -> String {
    let points: Vec<&String> = points.iter().filter(|p| !p.trim().is_empty()).collect();
    if points.is_empty() {
        return String::new();
    }
    let mut tex = String::from("      \\resumeItemListStart\n");
    for p in points {
        tex.push_str(&format!("        \\resumeItem{{{}}}\n", escape_latex(p.trim())));
    }
    tex.push_str("      \\resumeItemListEnd\n");
    tex
}

fn degree_line(e: &Education) -> String {
    match non_blank(&e.grade) {
        Some(grade) => format!("{} ({})", e.degree, grade),
        None => e.degree.clone(),
    }
}

fn date_range(start: &Option<String>, end: &Option<String>) -> String {
    match (non_blank(start), non_blank(end)) {
        (Some(s), Some(e)) => format!("{s} -- {e}"),
        (Some(s), None) => format!("{s} -- Present"),
        (None, Some(e)) => e.to_string(),
        (None, None) => String::new(),
    }
}

fn href(url: &str, label: &str) -> String {
    format!(
        "\\href{{{}}}{{\\underline{{{}}}}}",
        escape_url(url),
        escape_latex(label)
    )
}

fn display_url(url: &str) -> String {
    url.trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_start_matches("www.")
        .trim_end_matches('/')
        .to_string()
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
