//! Digest configuration models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// When notifications under a digest tag are released
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DigestSchedule {
    /// No batching, send right away
    Immediate,
    /// Collect and release every `every_minutes`
    Batched { every_minutes: u32 },
}

/// Throttling/aggregation rule for a free-text tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestConfiguration {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Unique tag, matched exactly and case-sensitively
    pub tag: String,
    pub schedule: DigestSchedule,
    /// Reference to the template used when the digest is flushed
    #[serde(default)]
    pub template: String,
}

impl DigestConfiguration {
    pub fn new(tag: impl Into<String>, schedule: DigestSchedule, template: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tag: tag.into(),
            schedule,
            template: template.into(),
        }
    }

    /// Malformed configurations are treated as if no configuration existed
    pub fn is_usable(&self) -> bool {
        match self.schedule {
            DigestSchedule::Immediate => true,
            DigestSchedule::Batched { every_minutes } => {
                every_minutes > 0 && !self.template.trim().is_empty()
            }
        }
    }

    /// True when messages under this configuration should be batched
    pub fn defers_delivery(&self) -> bool {
        self.is_usable() && matches!(self.schedule, DigestSchedule::Batched { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_immediate_never_defers() {
        let config = DigestConfiguration::new("alerts", DigestSchedule::Immediate, "");
        assert!(config.is_usable());
        assert!(!config.defers_delivery());
    }

    #[test]
    fn test_batched_defers() {
        let config = DigestConfiguration::new(
            "requisition-approved",
            DigestSchedule::Batched { every_minutes: 60 },
            "digest/requisitions",
        );
        assert!(config.defers_delivery());
    }

    #[test]
    fn test_malformed_batched_is_unusable() {
        let zero = DigestConfiguration::new(
            "tag",
            DigestSchedule::Batched { every_minutes: 0 },
            "digest/tag",
        );
        assert!(!zero.is_usable());
        assert!(!zero.defers_delivery());

        let no_template =
            DigestConfiguration::new("tag", DigestSchedule::Batched { every_minutes: 5 }, " ");
        assert!(!no_template.is_usable());
    }

    #[test]
    fn test_schedule_serde() {
        let json = r#"{"tag":"t","schedule":{"type":"batched","every_minutes":15},"template":"x"}"#;
        let config: DigestConfiguration = serde_json::from_str(json).unwrap();
        assert_eq!(config.schedule, DigestSchedule::Batched { every_minutes: 15 });
    }
}
