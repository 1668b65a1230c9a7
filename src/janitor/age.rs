use std::time::{Duration, SystemTime};

/// Judges every file of a cycle against the same reference instant.
#[derive(Debug, Clone, Copy)]
pub struct AgeClassifier {
    now: SystemTime,
    max_age: Duration,
}

impl AgeClassifier {
    pub fn new(now: SystemTime, max_age: Duration) -> Self {
        AgeClassifier { now, max_age }
    }

    pub fn is_eligible(&self, modified: SystemTime) -> bool {
        is_eligible(modified, self.now, self.max_age)
    }

    /// Elapsed time since `modified`, zero if it lies in the future.
    pub fn age_of(&self, modified: SystemTime) -> Duration {
        self.now.duration_since(modified).unwrap_or_default()
    }
}

pub fn is_eligible(modified: SystemTime, now: SystemTime, max_age: Duration) -> bool {
    match now.duration_since(modified) {
        Ok(age) => age >= max_age,
        // 修改时间在未来，可能是系统时间问题，保守起见不删除
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: Duration = Duration::from_secs(86_400);

    #[test]
    fn test_threshold_is_inclusive() {
        let now = SystemTime::now();
        let max_age = DAY * 30;

        assert!(is_eligible(now - DAY * 30, now, max_age));
        assert!(is_eligible(now - DAY * 40, now, max_age));
        assert!(!is_eligible(now - DAY * 5, now, max_age));
        assert!(!is_eligible(
            now - DAY * 30 + Duration::from_millis(1),
            now,
            max_age
        ));
    }

    #[test]
    fn test_elapsed_not_calendar_days() {
        let now = SystemTime::now();
        let max_age = Duration::from_secs_f64(0.5 * 86_400.0);

        assert!(is_eligible(now - Duration::from_secs(12 * 3600), now, max_age));
        assert!(!is_eligible(now - Duration::from_secs(11 * 3600), now, max_age));
    }

    #[test]
    fn test_future_mtime_is_never_eligible() {
        let now = SystemTime::now();
        let classifier = AgeClassifier::new(now, Duration::ZERO);
        let future = now + DAY;

        assert!(!classifier.is_eligible(future));
        assert_eq!(classifier.age_of(future), Duration::ZERO);
    }
}
