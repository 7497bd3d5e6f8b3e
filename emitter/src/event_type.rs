//! 事件类型键（EventType）
//!
//! 应用侧的事件键是开放的（字符串、枚举等任意可比较的值），
//! 另保留一个通配符键，用于订阅全部事件。
//!
use std::fmt;

/// 事件类型键
///
/// - `Named(K)`：应用定义的事件类型；
/// - `Wildcard`：保留的“全部事件”标记，与任何 `Named` 值都不相等。
///
/// 任意 `K` 都可以通过 `From` 转换为 `Named`，因此各操作可以直接传入原始键：
///
/// ```
/// use emitter::EventType;
///
/// let ty: EventType<&str> = "order.placed".into();
/// assert_eq!(ty, EventType::Named("order.placed"));
/// assert!(EventType::<&str>::Wildcard.is_wildcard());
/// assert_eq!(EventType::<&str>::Wildcard.to_string(), "*");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventType<K> {
    Named(K),
    Wildcard,
}

impl<K> EventType<K> {
    /// 通配符在文本形式中的表示
    pub const WILDCARD: &'static str = "*";

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Wildcard)
    }

    /// 返回应用键；通配符返回 `None`
    pub fn name(&self) -> Option<&K> {
        match self {
            Self::Named(key) => Some(key),
            Self::Wildcard => None,
        }
    }
}

impl<K> From<K> for EventType<K> {
    fn from(key: K) -> Self {
        Self::Named(key)
    }
}

impl<K: fmt::Display> fmt::Display for EventType<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(key) => key.fmt(f),
            Self::Wildcard => f.write_str(Self::WILDCARD),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Topic {
        Opened,
    }

    #[test]
    fn wildcard_is_distinct_from_named_star() {
        let star: EventType<&str> = "*".into();
        assert_ne!(star, EventType::Wildcard);
        assert!(!star.is_wildcard());
        assert_eq!(star.name(), Some(&"*"));
    }

    #[test]
    fn enum_keys_convert_into_named() {
        let ty: EventType<Topic> = Topic::Opened.into();
        assert_eq!(ty, EventType::Named(Topic::Opened));
        assert_eq!(EventType::<Topic>::Wildcard.name(), None);
    }
}
