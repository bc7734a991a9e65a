//! Normalization of raw provider output into a complete LaTeX document

use crate::prompt::{DOCUMENT_END, DOCUMENT_START};

const BEGIN_DOCUMENT: &str = r"\begin{document}";

/// Title used when the model returned a fragment without a preamble
pub const FALLBACK_TITLE: &str = "数学练习题";

/// Strip code fences, wrap fragments in a default document, and trim.
///
/// Text that already contains `\documentclass` is only unfenced and trimmed.
/// The result always contains `\documentclass`, and applying `sanitize` to
/// its own output returns it unchanged.
pub fn sanitize(raw: &str) -> String {
    let text = strip_fences(raw);

    let text = if text.contains(DOCUMENT_START) {
        text
    } else {
        wrap_fragment(&text)
    };

    text.trim().to_string()
}

/// Textual removal of markdown fences: the `latex` opener, bare closers, and
/// any remaining triple backticks.
fn strip_fences(raw: &str) -> String {
    raw.replace("```latex\n", "")
        .replace("```\n", "")
        .replace("```", "")
}

fn wrap_fragment(fragment: &str) -> String {
    let body = fragment
        .lines()
        .filter(|line| {
            let line = line.trim();
            line != BEGIN_DOCUMENT && line != DOCUMENT_END
        })
        .collect::<Vec<_>>()
        .join("\n")
        .replace(BEGIN_DOCUMENT, "")
        .replace(DOCUMENT_END, "");

    format!(
        r"\documentclass[12pt, a4paper]{{article}}
\usepackage{{ctex}}
\usepackage{{amsmath, amssymb}}
\usepackage{{geometry}}
\geometry{{left=2.5cm, right=2.5cm, top=2.5cm, bottom=2.5cm}}

\title{{{FALLBACK_TITLE}}}
\author{{}}
\date{{}}

\begin{{document}}
\maketitle

{}

\end{{document}}",
        body.trim()
    )
}
