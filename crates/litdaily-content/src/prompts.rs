//! Prompt catalog
//!
//! Each prompt asks for a JSON object; the field names it requests are the
//! ones [`crate::extraction`] validates.

use crate::model::PromptKind;

pub const REVIEW_PROMPT: &str = "请生成一篇关于某部经典文学作品的评论，要求：
- 评论标题
- 评论内容（500字左右）
- 评论作者（虚构名称）
- 可以包含标签（例如：#经典 #文学评论）
- 可以包含出处（例如：摘自《读书杂志》某年某期）
请以JSON格式返回，包含review_title, review_content, review_author, review_tag, review_source字段。";

pub const CONCEPT_PROMPT: &str = "请解释一个文学概念或术语，要求：
- 概念名称作为标题
- 简明扼要的解释（150字左右）
- 可以包含具体的文学例子
- 解释要准确且易于理解
请以JSON格式返回，包含title和content字段。";

pub const QUESTION_PROMPT: &str = "请生成一道文学考研题目，要求：
- 题目要符合考研难度
- 包含具体的分析要求
- 题目要有一定的深度和学术性
请以JSON格式返回，包含title和content字段。";

/// Instruction text for a prompt kind
#[must_use]
pub fn prompt_for(kind: PromptKind) -> &'static str {
    match kind {
        PromptKind::Review => REVIEW_PROMPT,
        PromptKind::Concept => CONCEPT_PROMPT,
        PromptKind::Question => QUESTION_PROMPT,
    }
}
