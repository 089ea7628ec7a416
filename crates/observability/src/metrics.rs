//! 表输出指标模块
//!
//! 通过 `metrics` facade 记录各 sink 的写入、刷新、关闭情况。
//! 未安装 recorder 时所有调用均为空操作。

use metrics::{counter, histogram};

/// Sink 操作类型 (用于失败计数标签)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkOp {
    Write,
    Flush,
    Close,
}

impl SinkOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Write => "write",
            Self::Flush => "flush",
            Self::Close => "close",
        }
    }
}

/// 记录成功写入一行
pub fn record_row_written(sink_name: &str) {
    counter!(
        "tablemux_rows_written_total",
        "sink" => sink_name.to_string()
    )
    .increment(1);
}

/// 记录 sink 操作失败
pub fn record_sink_failure(sink_name: &str, op: SinkOp) {
    counter!(
        "tablemux_write_failures_total",
        "sink" => sink_name.to_string(),
        "op" => op.as_str()
    )
    .increment(1);
}

/// 记录一次刷新
pub fn record_flush(sink_name: &str) {
    counter!(
        "tablemux_flushes_total",
        "sink" => sink_name.to_string()
    )
    .increment(1);
}

/// 记录 sink 关闭结果
pub fn record_sink_closed(sink_name: &str, success: bool) {
    let outcome = if success { "success" } else { "failure" };
    counter!(
        "tablemux_sinks_closed_total",
        "sink" => sink_name.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// 记录单行写入耗时 (微秒)
pub fn record_write_latency_us(sink_name: &str, latency_us: f64) {
    histogram!(
        "tablemux_write_latency_us",
        "sink" => sink_name.to_string()
    )
    .record(latency_us);
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// 样本数量
    pub fn count(&self) -> u64 {
        self.count
    }

    /// 均值
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
