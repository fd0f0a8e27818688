use crate::models::{AlertState, Reading};

/// 通知类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// 首次达到阈值，附带“持续提醒直到回落”的说明
    Rising,
    /// 仍在阈值之上
    Sustained,
    /// 回落到阈值以下，附带“不再提醒”的说明
    Falling,
}

/// 需要发送的一条通知
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub psi: f64,
    /// 该 PSI 值对应的时间
    pub measured_at: i64,
    pub threshold: f64,
}

/// 一次运行的决策结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    /// 时间戳未变化：不通知，也不写状态
    Unchanged,
    Proceed {
        notification: Option<Notification>,
        new_state: AlertState,
        /// 当前小时还没有读数，沿用了上一次的值
        using_last: bool,
    },
}

/// 阈值判定
///
/// 纯函数，不做 I/O。阈值比较在上升和回落两侧都是包含的（`>=`）。
#[derive(Debug, Clone, Copy)]
pub struct NotificationEngine {
    threshold: f64,
}

impl NotificationEngine {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn decide(&self, previous: &AlertState, current: &Reading) -> Decision {
        if current.timestamp == previous.last_timestamp {
            return Decision::Unchanged;
        }

        // 当前小时尚未发布读数时，按上一次的值判定，不可能构成穿越
        let (value, measured_at, using_last) = match current.value {
            Some(value) => (value, current.timestamp, false),
            None => (previous.last_value, previous.last_timestamp, true),
        };

        let was_alerting = previous.last_value >= self.threshold;
        let kind = if value >= self.threshold {
            Some(if was_alerting {
                NotificationKind::Sustained
            } else {
                NotificationKind::Rising
            })
        } else if was_alerting {
            Some(NotificationKind::Falling)
        } else {
            None
        };

        Decision::Proceed {
            notification: kind.map(|kind| Notification {
                kind,
                psi: value,
                measured_at,
                threshold: self.threshold,
            }),
            new_state: AlertState::new(current.timestamp, value),
            using_last,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: f64 = 100.0;

    fn decide(previous: (i64, f64), current: (i64, Option<f64>)) -> Decision {
        NotificationEngine::new(THRESHOLD).decide(
            &AlertState::new(previous.0, previous.1),
            &Reading::new(current.0, current.1),
        )
    }

    fn notification_of(decision: &Decision) -> Option<Notification> {
        match decision {
            Decision::Proceed { notification, .. } => *notification,
            Decision::Unchanged => None,
        }
    }

    fn state_of(decision: &Decision) -> Option<AlertState> {
        match decision {
            Decision::Proceed { new_state, .. } => Some(*new_state),
            Decision::Unchanged => None,
        }
    }

    fn kind_of(decision: &Decision) -> Option<NotificationKind> {
        notification_of(decision).map(|n| n.kind)
    }

    #[test]
    fn test_same_timestamp_is_unchanged() {
        assert_eq!(decide((3000, 90.0), (3000, None)), Decision::Unchanged);
        assert_eq!(decide((3000, 90.0), (3000, Some(150.0))), Decision::Unchanged);
    }

    #[test]
    fn test_rising_edge() {
        let decision = decide((1000, 80.0), (2000, Some(120.0)));
        assert_eq!(kind_of(&decision), Some(NotificationKind::Rising));
        assert_eq!(state_of(&decision), Some(AlertState::new(2000, 120.0)));

        let notification = notification_of(&decision).unwrap();
        assert_eq!(notification.psi, 120.0);
        assert_eq!(notification.measured_at, 2000);
        assert_eq!(notification.threshold, THRESHOLD);
    }

    #[test]
    fn test_falling_edge() {
        let decision = decide((2000, 120.0), (3000, Some(90.0)));
        assert_eq!(kind_of(&decision), Some(NotificationKind::Falling));
        assert_eq!(state_of(&decision), Some(AlertState::new(3000, 90.0)));
    }

    #[test]
    fn test_steady_above() {
        let decision = decide((2000, 120.0), (3000, Some(130.0)));
        assert_eq!(kind_of(&decision), Some(NotificationKind::Sustained));
    }

    #[test]
    fn test_steady_below_still_updates_state() {
        let decision = decide((1000, 50.0), (2000, Some(60.0)));
        assert_eq!(notification_of(&decision), None);
        assert_eq!(state_of(&decision), Some(AlertState::new(2000, 60.0)));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        assert_eq!(kind_of(&decide((1000, 99.9), (2000, Some(100.0)))), Some(NotificationKind::Rising));
        assert_eq!(kind_of(&decide((1000, 100.0), (2000, Some(100.0)))), Some(NotificationKind::Sustained));
        assert_eq!(kind_of(&decide((1000, 100.0), (2000, Some(99.9)))), Some(NotificationKind::Falling));
    }

    #[test]
    fn test_absent_value_below_threshold() {
        let decision = decide((1000, 90.0), (2000, None));
        assert_eq!(
            decision,
            Decision::Proceed {
                notification: None,
                new_state: AlertState::new(2000, 90.0),
                using_last: true,
            }
        );
    }

    #[test]
    fn test_absent_value_above_threshold_never_crosses() {
        let decision = decide((1000, 120.0), (2000, None));
        let notification = notification_of(&decision).unwrap();
        assert_eq!(notification.kind, NotificationKind::Sustained);
        assert_eq!(notification.psi, 120.0);
        assert_eq!(notification.measured_at, 1000);
        assert_eq!(state_of(&decision), Some(AlertState::new(2000, 120.0)));
    }

    #[test]
    fn test_stale_timestamp_is_processed() {
        let decision = decide((5000, 80.0), (4000, Some(120.0)));
        assert_eq!(kind_of(&decision), Some(NotificationKind::Rising));
        assert_eq!(state_of(&decision), Some(AlertState::new(4000, 120.0)));
    }

    #[test]
    fn test_first_run_from_zero_state() {
        let decision = decide((0, 0.0), (2000, Some(120.0)));
        assert_eq!(kind_of(&decision), Some(NotificationKind::Rising));
    }
}
