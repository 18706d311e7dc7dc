//! Pulls runnable code out of an agent reply.

use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    pub language: String,
    pub code: String,
}

fn language_hint_from_codeblock_kind(kind: &CodeBlockKind<'_>) -> String {
    match kind {
        CodeBlockKind::Indented => String::new(),
        CodeBlockKind::Fenced(info) => info.split_ascii_whitespace().next().unwrap_or("").into(),
    }
}

pub fn code_blocks(markdown: &str) -> Vec<CodeBlock> {
    let mut blocks = Vec::new();
    let mut current: Option<CodeBlock> = None;
    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                current = Some(CodeBlock {
                    language: language_hint_from_codeblock_kind(&kind),
                    code: String::new(),
                });
            }
            Event::Text(text) => {
                if let Some(block) = current.as_mut() {
                    block.code.push_str(&text);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(mut block) = current.take() {
                    let trimmed_len = block.code.trim_end().len();
                    block.code.truncate(trimmed_len);
                    blocks.push(block);
                }
            }
            _ => {}
        }
    }
    blocks
}

/// The code a reply asks to run: the first Python (or untagged) block, else
/// the first block of any language, else the whole reply.
pub fn extract_code(reply: &str) -> String {
    let blocks = code_blocks(reply);
    let preferred = blocks
        .iter()
        .find(|block| matches!(block.language.to_ascii_lowercase().as_str(), "" | "python" | "py" | "python3"))
        .or_else(|| blocks.first());
    match preferred {
        Some(block) => block.code.clone(),
        None => reply.trim().to_string(),
    }
}
