//! Skill query parameters.

use chrono::{DateTime, TimeDelta, Utc};

use crate::error::SkillError;

/// What to summarise: one model over a trailing window ending at `end`.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillQuery {
    model: String,
    end: DateTime<Utc>,
    lookback: TimeDelta,
    group_by_threshold: bool,
}

impl SkillQuery {
    /// Trailing window used when none is set.
    pub const DEFAULT_LOOKBACK_DAYS: u32 = 30;

    /// Creates a query over the default 30-day window, grouped by threshold.
    pub fn new(model: impl Into<String>, end: DateTime<Utc>) -> Self {
        Self {
            model: model.into(),
            end,
            lookback: TimeDelta::days(i64::from(Self::DEFAULT_LOOKBACK_DAYS)),
            group_by_threshold: true,
        }
    }

    pub fn with_lookback(mut self, lookback: TimeDelta) -> Self {
        self.lookback = lookback;
        self
    }

    pub fn with_lookback_days(self, days: u32) -> Self {
        self.with_lookback(TimeDelta::days(i64::from(days)))
    }

    /// When false, groups stop at lead time and carry no decision scores.
    pub fn with_group_by_threshold(mut self, group_by_threshold: bool) -> Self {
        self.group_by_threshold = group_by_threshold;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// First instant inside the window, clamped to the earliest representable time.
    pub fn start(&self) -> DateTime<Utc> {
        self.end
            .checked_sub_signed(self.lookback)
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    pub fn lookback(&self) -> TimeDelta {
        self.lookback
    }

    pub fn group_by_threshold(&self) -> bool {
        self.group_by_threshold
    }

    /// # Errors
    ///
    /// Returns [`SkillError::InvalidQuery`] for an empty model name, or
    /// [`SkillError::InvalidLookback`] for a window that is not positive or
    /// reaches before the earliest representable time.
    pub fn validate(&self) -> Result<(), SkillError> {
        if self.model.trim().is_empty() {
            return Err(SkillError::InvalidQuery {
                reason: "model name must not be empty".to_string(),
            });
        }
        if self.lookback <= TimeDelta::zero() || self.end.checked_sub_signed(self.lookback).is_none()
        {
            return Err(SkillError::InvalidLookback {
                hours: self.lookback.num_hours(),
            });
        }
        Ok(())
    }
}
