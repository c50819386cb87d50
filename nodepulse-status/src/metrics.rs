use serde::{Deserialize, Serialize};

use crate::error::StatusError;

/// Dernier relevé système d'un worker (format heartbeat, tailles en GB)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemMetricsSnapshot {
    pub cpu_load: f64,
    pub cpu_processors: u32,
    pub jvm_memory_usage: f64,      // fraction [0, 1]
    pub jvm_used_memory: f64,
    pub jvm_max_memory: f64,
    pub disk_usage: f64,            // fraction [0, 1]
    pub disk_used: f64,
    pub disk_total: f64,
}

impl SystemMetricsSnapshot {
    /// Rejette un relevé qui produirait un statut trompeur
    pub fn validate(&self, address: &str) -> Result<(), StatusError> {
        if self.cpu_processors == 0 {
            return Err(StatusError::NoProcessors { address: address.to_string() });
        }

        let figures = [
            ("cpuLoad", self.cpu_load),
            ("jvmUsedMemory", self.jvm_used_memory),
            ("jvmMaxMemory", self.jvm_max_memory),
            ("diskUsed", self.disk_used),
            ("diskTotal", self.disk_total),
        ];
        for (field, value) in figures {
            if !value.is_finite() || value < 0.0 {
                return Err(StatusError::InvalidFigure { address: address.to_string(), field, value });
            }
        }

        let fractions = [
            ("jvmMemoryUsage", self.jvm_memory_usage),
            ("diskUsage", self.disk_usage),
        ];
        for (field, value) in fractions {
            // NaN échoue aussi sur contains()
            if !(0.0..=1.0).contains(&value) {
                return Err(StatusError::FractionOutOfRange { address: address.to_string(), field, value });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn sample_metrics() -> SystemMetricsSnapshot {
    SystemMetricsSnapshot {
        cpu_load: 1.0,
        cpu_processors: 4,
        jvm_memory_usage: 0.5,
        jvm_used_memory: 4.0,
        jvm_max_memory: 8.0,
        disk_usage: 0.5,
        disk_used: 100.0,
        disk_total: 200.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_snapshot_passes() {
        assert!(sample_metrics().validate("w1").is_ok());

        let edges = SystemMetricsSnapshot {
            cpu_load: 0.0,
            jvm_memory_usage: 1.0,
            disk_usage: 0.0,
            ..sample_metrics()
        };
        assert!(edges.validate("w1").is_ok());
    }

    #[test]
    fn test_zero_processors_rejected() {
        let m = SystemMetricsSnapshot { cpu_processors: 0, ..sample_metrics() };
        assert_eq!(m.validate("w1"), Err(StatusError::NoProcessors { address: "w1".into() }));
    }

    #[test]
    fn test_fraction_out_of_range_rejected() {
        let m = SystemMetricsSnapshot { disk_usage: 1.2, ..sample_metrics() };
        assert!(matches!(
            m.validate("w1"),
            Err(StatusError::FractionOutOfRange { field: "diskUsage", .. })
        ));

        let m = SystemMetricsSnapshot { jvm_memory_usage: f64::NAN, ..sample_metrics() };
        assert!(matches!(
            m.validate("w1"),
            Err(StatusError::FractionOutOfRange { field: "jvmMemoryUsage", .. })
        ));
    }

    #[test]
    fn test_negative_or_infinite_figures_rejected() {
        let m = SystemMetricsSnapshot { cpu_load: -0.5, ..sample_metrics() };
        assert!(matches!(m.validate("w1"), Err(StatusError::InvalidFigure { field: "cpuLoad", .. })));

        let m = SystemMetricsSnapshot { disk_total: f64::INFINITY, ..sample_metrics() };
        assert!(matches!(m.validate("w1"), Err(StatusError::InvalidFigure { field: "diskTotal", .. })));
    }

    #[test]
    fn test_deserializes_heartbeat_field_names() {
        let json = r#"{
            "cpuLoad": 3.2, "cpuProcessors": 4,
            "jvmMemoryUsage": 0.277, "jvmUsedMemory": 2.9, "jvmMaxMemory": 8.0,
            "diskUsage": 0.4, "diskUsed": 40.0, "diskTotal": 100.0
        }"#;
        let m: SystemMetricsSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(m.cpu_processors, 4);
        assert_eq!(m.jvm_memory_usage, 0.277);
    }
}
