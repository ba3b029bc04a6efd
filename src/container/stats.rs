//! 容器统计信息

use std::sync::atomic::{AtomicU64, Ordering};

/// 内部统计（原子计数器）
#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    lookups: AtomicU64,
    local_hits: AtomicU64,
    interface_hits: AtomicU64,
    parent_hits: AtomicU64,
    misses: AtomicU64,
    ambiguities: AtomicU64,
}

/// 解析结果分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    LocalHit,
    InterfaceHit,
    ParentHit,
    Miss,
    Ambiguous,
}

impl StatsCounters {
    pub(crate) fn record_lookup(&self) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record(&self, outcome: Outcome) {
        let counter = match outcome {
            Outcome::LocalHit => &self.local_hits,
            Outcome::InterfaceHit => &self.interface_hits,
            Outcome::ParentHit => &self.parent_hits,
            Outcome::Miss => &self.misses,
            Outcome::Ambiguous => &self.ambiguities,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> InjectorStats {
        InjectorStats {
            lookups: self.lookups.load(Ordering::Relaxed),
            local_hits: self.local_hits.load(Ordering::Relaxed),
            interface_hits: self.interface_hits.load(Ordering::Relaxed),
            parent_hits: self.parent_hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            ambiguities: self.ambiguities.load(Ordering::Relaxed),
        }
    }

    pub(crate) fn reset(&self) {
        for counter in [
            &self.lookups,
            &self.local_hits,
            &self.interface_hits,
            &self.parent_hits,
            &self.misses,
            &self.ambiguities,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

/// 统计快照
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InjectorStats {
    /// 本容器上的查找次数（含来自子容器的委托）
    pub lookups: u64,
    /// 精确命中
    pub local_hits: u64,
    /// 接口扫描命中
    pub interface_hits: u64,
    /// 由父容器命中
    pub parent_hits: u64,
    /// 整条链都未找到
    pub misses: u64,
    /// 接口歧义
    pub ambiguities: u64,
}

impl InjectorStats {
    /// 命中总数
    pub fn hits(&self) -> u64 {
        self.local_hits + self.interface_hits + self.parent_hits
    }

    /// 命中率（小数形式）
    pub fn hit_rate(&self) -> f64 {
        if self.lookups == 0 {
            0.0
        } else {
            self.hits() as f64 / self.lookups as f64
        }
    }

    /// 性能指标摘要
    pub fn summary(&self) -> String {
        format!(
            "Injector: {} lookups, {:.1}% hit rate ({} local, {} interface, {} parent), {} misses, {} ambiguous",
            self.lookups,
            self.hit_rate() * 100.0,
            self.local_hits,
            self.interface_hits,
            self.parent_hits,
            self.misses,
            self.ambiguities
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_and_reset() {
        let counters = StatsCounters::default();
        for outcome in [Outcome::LocalHit, Outcome::ParentHit, Outcome::Miss, Outcome::Miss] {
            counters.record_lookup();
            counters.record(outcome);
        }

        let stats = counters.snapshot();
        assert_eq!(stats.lookups, 4);
        assert_eq!(stats.hits(), 2);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.hit_rate(), 0.5);
        assert!(stats.summary().contains("50.0% hit rate"));

        counters.reset();
        assert_eq!(counters.snapshot(), InjectorStats::default());
    }

    #[test]
    fn test_empty_hit_rate() {
        assert_eq!(InjectorStats::default().hit_rate(), 0.0);
    }
}
