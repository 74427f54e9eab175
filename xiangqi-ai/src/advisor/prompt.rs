//! 顾问提示模板
//!
//! 三条消息：系统提示、请求本身（JSON）、本地建议。

use serde::Serialize;
use xiangqi_core::AdvisorRequest;

/// 对话消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant",
            content: content.into(),
        }
    }
}

/// 顾问提示模板
pub struct PromptTemplate;

impl PromptTemplate {
    /// 系统提示：设定角色与返回格式
    pub fn system_prompt() -> &'static str {
        concat!(
            "You are a Xiangqi (Chinese Chess) assistant. ",
            "You are given the full board and ALL legal candidate moves for the side to move. ",
            "Board: 10 rows separated by '/', 9 chars each, '.' empty, uppercase Red, lowercase Black, row 0 at Black's side. ",
            "Pick the SINGLE best move index from candidates considering tactics and simple strategy. ",
            "Never pick a move whose resulting position is listed in repetition.avoid_keys. ",
            "Return ONLY a compact JSON: {\"index\": <number>} with no extra text. ",
            "Prioritize: checkmate > safe capture > attack high-value piece > improve activity > avoid blunders."
        )
    }

    /// 请求正文（JSON）
    pub fn user_prompt(request: &AdvisorRequest) -> serde_json::Result<String> {
        serde_json::to_string(request)
    }

    /// 本地启发式的建议
    pub fn suggestion(index: usize) -> String {
        format!("Suggestion (you may override): {{\"index\": {}}}", index)
    }

    /// 组装完整的消息列表
    pub fn messages(request: &AdvisorRequest) -> serde_json::Result<Vec<ChatMessage>> {
        let mut messages = vec![
            ChatMessage::system(Self::system_prompt()),
            ChatMessage::user(Self::user_prompt(request)?),
        ];
        if let Some(index) = request.suggested_index {
            messages.push(ChatMessage::assistant(Self::suggestion(index)));
        }
        Ok(messages)
    }
}
