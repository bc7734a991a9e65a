//! Prompt construction for worked-problem generation
//!
//! The prompt is provider-agnostic: every adapter sends it verbatim as a
//! single user message.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MathgenError;

/// Number of problems requested when no count is configured
pub const DEFAULT_PROBLEM_COUNT: u32 = 10;

/// Marker every complete LaTeX document starts with
pub const DOCUMENT_START: &str = r"\documentclass";

/// Marker closing the document body
pub const DOCUMENT_END: &str = r"\end{document}";

/// Difficulty level of the generated problems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Simple,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Simple, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Simple => "simple",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Label embedded in the prompt text
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Simple => "简单",
            Difficulty::Medium => "中等",
            Difficulty::Hard => "困难",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = MathgenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Ok(Difficulty::Simple),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(MathgenError::Config(format!(
                "Unknown difficulty '{other}' (expected simple, medium or hard)"
            ))),
        }
    }
}

/// Builds the instruction text sent to the provider.
#[derive(Debug, Clone, Copy)]
pub struct PromptBuilder {
    problem_count: u32,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self {
            problem_count: DEFAULT_PROBLEM_COUNT,
        }
    }
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a different number of problems. Zero is raised to one.
    pub fn with_problem_count(mut self, count: u32) -> Self {
        self.problem_count = count.max(1);
        self
    }

    pub fn problem_count(&self) -> u32 {
        self.problem_count
    }

    pub fn build(&self, topic: &str, difficulty: Difficulty) -> String {
        let topic = topic.trim();
        let count = self.problem_count;
        let label = difficulty.label();

        format!(
            r#"请你作为一个数学教育专家，针对"{topic}"这个知识点，生成{count}道{label}难度的例题。

要求：
1. 题目应该循序渐进，从基础到略微提升
2. 每道题都要有完整的解答过程
3. 使用标准的LaTeX数学公式格式
4. 输出格式必须是可直接编译的完整LaTeX文档

请直接输出LaTeX代码，包含以下结构：
\documentclass[12pt, a4paper]{{article}}
\usepackage{{ctex}}
\usepackage{{amsmath, amssymb}}
\usepackage{{geometry}}
\geometry{{left=2.5cm, right=2.5cm, top=2.5cm, bottom=2.5cm}}

\title{{{topic} 练习题}}
\author{{}}
\date{{}}

\begin{{document}}
\maketitle

\section*{{例题练习}}

\begin{{enumerate}}
    \item 第一题题目
    \textbf{{解：}} 解答过程...

    \item 第二题题目
    \textbf{{解：}} 解答过程...

    % ... 继续到第{count}题
\end{{enumerate}}

\end{{document}}

请只输出LaTeX代码，不要有任何其他说明文字。"#
        )
    }
}

/// Build the prompt with the default problem count.
pub fn build_prompt(topic: &str, difficulty: Difficulty) -> String {
    PromptBuilder::default().build(topic, difficulty)
}
