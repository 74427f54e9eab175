//! 顾问回答解析器
//!
//! 模型的输出常常夹带思考过程或 markdown 代码块，先清理再取出第一个完整的 JSON 对象。

use tracing::debug;
use xiangqi_core::AdvisorResponse;

use crate::error::AdvisorError;

/// 回答解析器
pub struct ResponseParser;

impl ResponseParser {
    /// 解析模型输出
    ///
    /// 只接受 `{"index": n}` 或 `{"from": [r, c], "to": [r, c]}`，其他形状都是 `InvalidResponse`。
    pub fn parse(response: &str) -> Result<AdvisorResponse, AdvisorError> {
        if let Ok(parsed) = serde_json::from_str::<AdvisorResponse>(response.trim()) {
            return Ok(parsed);
        }

        let fixed = Self::try_fix_response(response);
        let json = Self::extract_json(&fixed).ok_or_else(|| {
            let preview: String = response.chars().take(80).collect();
            AdvisorError::InvalidResponse(format!("no JSON object in: {}", preview))
        })?;

        debug!("Extracted advisor JSON: {}", json);

        serde_json::from_str(json).map_err(|e| AdvisorError::InvalidResponse(e.to_string()))
    }

    /// 去掉常见的包装
    pub fn try_fix_response(response: &str) -> String {
        let mut fixed = response;

        // 推理模型的 <think>...</think>
        if let Some(think_end) = fixed.find("</think>") {
            fixed = &fixed[think_end + "</think>".len()..];
        }

        let fixed = fixed.replace("```json", "").replace("```", "").replace('\'', "\"");

        fixed
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string()
    }

    /// 取出第一个括号配平的 JSON 对象
    fn extract_json(text: &str) -> Option<&str> {
        let start = text.find('{')?;
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;

        for (i, ch) in text[start..].char_indices() {
            if in_string {
                match ch {
                    _ if escaped => escaped = false,
                    '\\' => escaped = true,
                    '"' => in_string = false,
                    _ => {}
                }
                continue;
            }
            match ch {
                '"' => in_string = true,
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(&text[start..start + i + 1]);
                    }
                }
                _ => {}
            }
        }

        None
    }
}
