use serde::{Deserialize, Deserializer};

/// 上游数据里的数字，可能是 JSON 数字，也可能是数字字符串
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LooseNumber {
    Int(i64),
    Float(f64),
    Text(String),
}

impl LooseNumber {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            LooseNumber::Int(i) => Some(*i),
            LooseNumber::Float(f) => whole_f64_to_i64(*f),
            LooseNumber::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(whole_f64_to_i64))
            }
        }
    }

    /// 非有限值（NaN、inf）视为无效
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            LooseNumber::Int(i) => *i as f64,
            LooseNumber::Float(f) => *f,
            LooseNumber::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }

    /// 空字符串表示“尚未发布”
    pub fn is_blank(&self) -> bool {
        matches!(self, LooseNumber::Text(s) if s.trim().is_empty())
    }
}

fn whole_f64_to_i64(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// 宽松解析 i64 字段
pub fn deserialize_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = LooseNumber::deserialize(deserializer)?;
    number
        .as_i64()
        .ok_or_else(|| serde::de::Error::custom(format!("expected an integer, got {:?}", number)))
}

/// 宽松解析 f64 字段
pub fn deserialize_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = LooseNumber::deserialize(deserializer)?;
    number
        .as_f64()
        .ok_or_else(|| serde::de::Error::custom(format!("expected a number, got {:?}", number)))
}
