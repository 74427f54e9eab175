//! 联机走法记录
//!
//! 每局一条只追加的走法序列，按 `ply` 从 1 递增编号；
//! 坐标以 `"row,col"` 文本存储。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::moves::Move;
use crate::piece::Square;

/// 一条走法记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveLogEntry {
    /// 步数（第一步为 1）
    pub ply: u32,
    #[serde(with = "square_text")]
    pub from: Square,
    #[serde(with = "square_text")]
    pub to: Square,
    /// 落子时间
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub played_at: Option<DateTime<Utc>>,
}

impl MoveLogEntry {
    /// 创建记录，时间戳取当前时间
    pub fn new(ply: u32, mv: Move) -> Self {
        Self {
            ply,
            from: mv.from,
            to: mv.to,
            played_at: Some(Utc::now()),
        }
    }

    pub fn mv(&self) -> Move {
        Move::new(self.from, self.to)
    }
}

mod square_text {
    use serde::{de, Deserialize, Deserializer, Serializer};

    use crate::piece::Square;

    pub fn serialize<S: Serializer>(square: &Square, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{},{}", square.row, square.col))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Square, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_json_format() {
        let entry = MoveLogEntry {
            ply: 3,
            from: Square::new_unchecked(7, 1),
            to: Square::new_unchecked(7, 4),
            played_at: None,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"ply":3,"from":"7,1","to":"7,4"}"#);

        let parsed: MoveLogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, entry);
        assert_eq!(parsed.mv(), Move::new(entry.from, entry.to));
    }

    #[test]
    fn test_entry_with_timestamp() {
        let json = r#"{"ply":1,"from":"6,4","to":"5,4","played_at":"2024-05-01T08:30:00Z"}"#;
        let entry: MoveLogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.ply, 1);
        assert!(entry.played_at.is_some());
    }

    #[test]
    fn test_entry_rejects_bad_square() {
        let json = r#"{"ply":1,"from":"10,4","to":"5,4"}"#;
        assert!(serde_json::from_str::<MoveLogEntry>(json).is_err());
    }

    #[test]
    fn test_new_sets_timestamp() {
        let mv = Move::new(Square::new_unchecked(9, 1), Square::new_unchecked(7, 2));
        let entry = MoveLogEntry::new(1, mv);
        assert!(entry.played_at.is_some());
        assert_eq!(entry.mv(), mv);
    }
}
