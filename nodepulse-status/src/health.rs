/**
 * HEALTH - Calcul du code santé d'un worker
 *
 * RÔLE : Liste ordonnée de règles appliquées sur un statut courant.
 * Les trois règles de pression (cpu, mémoire, disque) montent d'un cran
 * chacune, puis la surcharge force `Critical` et le timeout force `Offline`.
 *
 * PRÉCÉDENCE : timeout > surcharge > score additif.
 */

use serde::{Deserialize, Serialize};

use crate::metrics::SystemMetricsSnapshot;

/// Seuil de pression commun aux axes cpu, mémoire et disque
pub const LOAD_THRESHOLD: f64 = 0.8;

/// Code santé exposé aux dashboards (sérialisé en entier brut)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub enum HealthStatus {
    Healthy = 1,
    Warning = 2,
    Critical = 3,
    Saturated = 4,
    Offline = 9999,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown health status code {0}")]
pub struct UnknownHealthCode(pub u32);

impl HealthStatus {
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Un cran de plus sur l'échelle additive ; Saturated et Offline restent en place
    pub fn escalate(self) -> Self {
        match self {
            HealthStatus::Healthy => HealthStatus::Warning,
            HealthStatus::Warning => HealthStatus::Critical,
            HealthStatus::Critical => HealthStatus::Saturated,
            other => other,
        }
    }
}

impl From<HealthStatus> for u32 {
    fn from(status: HealthStatus) -> Self {
        status.code()
    }
}

impl TryFrom<u32> for HealthStatus {
    type Error = UnknownHealthCode;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(HealthStatus::Healthy),
            2 => Ok(HealthStatus::Warning),
            3 => Ok(HealthStatus::Critical),
            4 => Ok(HealthStatus::Saturated),
            9999 => Ok(HealthStatus::Offline),
            other => Err(UnknownHealthCode(other)),
        }
    }
}

/// Faits booléens évalués par les règles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HealthSignals {
    pub cpu_hot: bool,
    pub memory_hot: bool,
    pub disk_hot: bool,
    pub overload: bool,
    pub timeout: bool,
}

impl HealthSignals {
    pub fn from_snapshot(metrics: &SystemMetricsSnapshot, overload: bool, timeout: bool) -> Self {
        Self {
            cpu_hot: metrics.cpu_load > f64::from(metrics.cpu_processors) * LOAD_THRESHOLD,
            memory_hot: metrics.jvm_memory_usage > LOAD_THRESHOLD,
            disk_hot: metrics.disk_usage > LOAD_THRESHOLD,
            overload,
            timeout,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthRule {
    CpuPressure,
    MemoryPressure,
    DiskPressure,
    Overload,
    Timeout,
}

/// L'ordre compte : les forçages passent en dernier
pub const HEALTH_RULES: [HealthRule; 5] = [
    HealthRule::CpuPressure,
    HealthRule::MemoryPressure,
    HealthRule::DiskPressure,
    HealthRule::Overload,
    HealthRule::Timeout,
];

impl HealthRule {
    pub fn apply(self, status: HealthStatus, signals: &HealthSignals) -> HealthStatus {
        match self {
            HealthRule::CpuPressure if signals.cpu_hot => status.escalate(),
            HealthRule::MemoryPressure if signals.memory_hot => status.escalate(),
            HealthRule::DiskPressure if signals.disk_hot => status.escalate(),
            HealthRule::Overload if signals.overload => HealthStatus::Critical,
            HealthRule::Timeout if signals.timeout => HealthStatus::Offline,
            _ => status,
        }
    }
}

pub fn score(signals: &HealthSignals) -> HealthStatus {
    HEALTH_RULES
        .iter()
        .fold(HealthStatus::Healthy, |status, rule| rule.apply(status, signals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::sample_metrics;

    fn hot(cpu: bool, memory: bool, disk: bool) -> HealthSignals {
        HealthSignals { cpu_hot: cpu, memory_hot: memory, disk_hot: disk, ..Default::default() }
    }

    #[test]
    fn test_all_cool_is_healthy() {
        assert_eq!(score(&HealthSignals::default()), HealthStatus::Healthy);
    }

    #[test]
    fn test_each_axis_adds_one() {
        assert_eq!(score(&hot(true, false, false)).code(), 2);
        assert_eq!(score(&hot(false, true, false)).code(), 2);
        assert_eq!(score(&hot(false, false, true)).code(), 2);
        assert_eq!(score(&hot(true, true, false)).code(), 3);
        assert_eq!(score(&hot(true, true, true)), HealthStatus::Saturated);
    }

    #[test]
    fn test_overload_forces_critical() {
        let cool = HealthSignals { overload: true, ..Default::default() };
        assert_eq!(score(&cool), HealthStatus::Critical);

        let all_hot = HealthSignals { overload: true, ..hot(true, true, true) };
        assert_eq!(score(&all_hot), HealthStatus::Critical);
    }

    #[test]
    fn test_timeout_dominates_everything() {
        let signals = HealthSignals { overload: true, timeout: true, ..hot(true, true, true) };
        assert_eq!(score(&signals), HealthStatus::Offline);

        let only_timeout = HealthSignals { timeout: true, ..Default::default() };
        assert_eq!(score(&only_timeout).code(), 9999);
    }

    #[test]
    fn test_rules_individually() {
        let signals = hot(true, false, false);
        assert_eq!(HealthRule::CpuPressure.apply(HealthStatus::Healthy, &signals), HealthStatus::Warning);
        assert_eq!(HealthRule::MemoryPressure.apply(HealthStatus::Healthy, &signals), HealthStatus::Healthy);
        assert_eq!(HealthRule::Overload.apply(HealthStatus::Saturated, &signals), HealthStatus::Saturated);

        let signals = HealthSignals { overload: true, ..Default::default() };
        assert_eq!(HealthRule::Overload.apply(HealthStatus::Saturated, &signals), HealthStatus::Critical);
        assert_eq!(HealthRule::Timeout.apply(HealthStatus::Critical, &signals), HealthStatus::Critical);
    }

    #[test]
    fn test_threshold_is_strict() {
        let m = SystemMetricsSnapshot {
            cpu_load: 3.2,
            cpu_processors: 4,
            jvm_memory_usage: 0.8,
            disk_usage: 0.8,
            ..sample_metrics()
        };
        assert_eq!(HealthSignals::from_snapshot(&m, false, false), HealthSignals::default());

        let m = SystemMetricsSnapshot { cpu_load: 3.3, jvm_memory_usage: 0.81, disk_usage: 0.9, ..m };
        assert_eq!(HealthSignals::from_snapshot(&m, false, false), hot(true, true, true));
    }

    #[test]
    fn test_status_serializes_as_code() {
        assert_eq!(serde_json::to_string(&HealthStatus::Offline).unwrap(), "9999");
        let parsed: HealthStatus = serde_json::from_str("2").unwrap();
        assert_eq!(parsed, HealthStatus::Warning);
        assert!(serde_json::from_str::<HealthStatus>("5").is_err());
    }
}
