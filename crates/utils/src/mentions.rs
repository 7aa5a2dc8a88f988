//! Inline user mentions embedded in comment bodies.
//!
//! A mention is stored as `@[Display Name](user-id)`. The bracket/paren pair
//! keeps tokens distinct from plain `@word` text and keeps the user id
//! recoverable after the display name changes. Names containing `]` and ids
//! containing `)` cannot be encoded; such tokens simply fail to decode.

use std::{borrow::Cow, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

static MENTION_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@\[([^\]]+)\]\(([^)]+)\)").expect("valid mention regex"));

/// A decoded mention token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct Mention {
    pub name: String,
    pub user_id: String,
}

/// A display fragment of comment content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MentionFragment {
    Text { text: String },
    Mention { name: String, user_id: String },
}

impl MentionFragment {
    /// User-visible text of the fragment; mentions show as `@name`.
    pub fn display_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text { text } => Cow::Borrowed(text),
            Self::Mention { name, .. } => Cow::Owned(format!("@{name}")),
        }
    }
}

/// Encode a mention token for `name` / `user_id`.
pub fn encode(name: &str, user_id: &str) -> String {
    format!("@[{name}]({user_id})")
}

/// Extract the well-formed mention tokens from `content`, one entry per user in
/// order of first appearance. Partial tokens are ignored.
pub fn decode(content: &str) -> Vec<Mention> {
    let mut mentions: Vec<Mention> = Vec::new();
    for caps in MENTION_TOKEN.captures_iter(content) {
        let user_id = &caps[2];
        if mentions.iter().any(|m| m.user_id == user_id) {
            continue;
        }
        mentions.push(Mention {
            name: caps[1].to_string(),
            user_id: user_id.to_string(),
        });
    }
    mentions
}

/// Split `content` into literal text and mention fragments for display.
/// Content without tokens yields a single text fragment equal to the input.
pub fn render(content: &str) -> Vec<MentionFragment> {
    let mut fragments = Vec::new();
    let mut cursor = 0;

    for caps in MENTION_TOKEN.captures_iter(content) {
        let Some(token) = caps.get(0) else {
            continue;
        };
        if token.start() > cursor {
            fragments.push(MentionFragment::Text {
                text: content[cursor..token.start()].to_string(),
            });
        }
        fragments.push(MentionFragment::Mention {
            name: caps[1].to_string(),
            user_id: caps[2].to_string(),
        });
        cursor = token.end();
    }

    if fragments.is_empty() {
        return vec![MentionFragment::Text {
            text: content.to_string(),
        }];
    }
    if cursor < content.len() {
        fragments.push(MentionFragment::Text {
            text: content[cursor..].to_string(),
        });
    }
    fragments
}

/// Content as a reader sees it: tokens replaced by `@name`.
pub fn to_plain_text(content: &str) -> String {
    render(content)
        .iter()
        .map(|fragment| fragment.display_text())
        .collect()
}
