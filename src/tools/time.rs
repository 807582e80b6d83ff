//! Current UTC time tool.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use super::{Tool, ToolError};

/// Wall-clock format returned to the model: second precision, literal `Z`.
const UTC_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Source of wall-clock time.
pub trait Clock: Send + Sync {
    /// Time elapsed since the Unix epoch.
    fn since_epoch(&self) -> Result<Duration, ToolError>;
}

/// Reads the operating system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn since_epoch(&self) -> Result<Duration, ToolError> {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| ToolError::ClockUnavailable(format!("clock is before the Unix epoch: {}", e)))
    }
}

/// Return the current UTC time, e.g. `{"utc": "2025-05-21T06:42:00Z"}`.
pub struct GetCurrentTime {
    clock: Arc<dyn Clock>,
}

impl GetCurrentTime {
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Current time formatted as `YYYY-MM-DDTHH:MM:SSZ`.
    pub fn now_utc(&self) -> Result<String, ToolError> {
        let elapsed = self.clock.since_epoch()?;
        let secs = i64::try_from(elapsed.as_secs())
            .map_err(|_| ToolError::ClockUnavailable("timestamp out of range".to_string()))?;
        let now: DateTime<Utc> = DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| ToolError::ClockUnavailable("timestamp out of range".to_string()))?;
        Ok(now.format(UTC_FORMAT).to_string())
    }
}

impl Default for GetCurrentTime {
    fn default() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }
}

#[async_trait]
impl Tool for GetCurrentTime {
    fn name(&self) -> &str {
        "get_current_time"
    }

    fn description(&self) -> &str {
        "Return the current UTC time in ISO-8601 format. Example: {\"utc\": \"2025-05-21T06:42:00Z\"}"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }

    async fn execute(&self, _args: Value) -> Result<Value, ToolError> {
        let utc = self.now_utc()?;
        tracing::debug!("Current UTC time: {}", utc);
        Ok(json!({ "utc": utc }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedClock(Duration);

    impl Clock for FixedClock {
        fn since_epoch(&self) -> Result<Duration, ToolError> {
            Ok(self.0)
        }
    }

    struct BrokenClock;

    impl Clock for BrokenClock {
        fn since_epoch(&self) -> Result<Duration, ToolError> {
            Err(ToolError::ClockUnavailable("no clock".to_string()))
        }
    }

    #[tokio::test]
    async fn formats_with_second_precision_and_z_suffix() {
        // 2025-05-21T06:42:00.750Z
        let tool = GetCurrentTime::with_clock(Arc::new(FixedClock(Duration::from_millis(
            1_747_809_720_750,
        ))));
        let out = tool.execute(json!({})).await.expect("clock works");
        assert_eq!(out, json!({ "utc": "2025-05-21T06:42:00Z" }));
    }

    #[tokio::test]
    async fn broken_clock_surfaces_clock_unavailable() {
        let tool = GetCurrentTime::with_clock(Arc::new(BrokenClock));
        let err = tool.execute(json!({})).await.expect_err("clock is broken");
        assert_eq!(err.kind(), "clock_unavailable");
    }

    #[test]
    fn out_of_range_clock_is_unavailable() {
        let tool = GetCurrentTime::with_clock(Arc::new(FixedClock(Duration::from_secs(u64::MAX))));
        assert!(matches!(tool.now_utc(), Err(ToolError::ClockUnavailable(_))));
    }

    #[test]
    fn system_clock_is_close_to_now() {
        let tool = GetCurrentTime::default();
        let formatted = tool.now_utc().expect("system clock");
        let parsed = DateTime::parse_from_rfc3339(&formatted).expect("rfc3339");
        let drift = (Utc::now() - parsed.with_timezone(&Utc)).num_seconds().abs();
        assert!(drift <= 2, "drift of {}s", drift);
    }
}
