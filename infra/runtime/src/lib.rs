//! # Runtime
//!
//! Tokio runtime profiles shared by the server and the indexer.
//!
//! * [`Profile::HighPerformance`]: request serving; larger stacks, long keep-alive.
//! * [`Profile::MemoryEfficient`]: batch tooling; half the workers, short keep-alive.
//!
//! Worker count comes from `PDL_WORKER_THREADS`, then `TOKIO_WORKER_THREADS`, then the
//! available parallelism.
//!
//! ```rust,ignore
//! #[pdl_runtime::main(high_performance, thread_name = "pdl-http")]
//! async fn main() -> anyhow::Result<()> {
//!     Ok(())
//! }
//! ```

pub use anyhow::Result;
pub use pdl_derive::main;

use anyhow::Context;
use std::sync::OnceLock;
use std::thread::available_parallelism;
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

const FALLBACK_WORKERS: usize = 4;
const MAX_WORKERS: usize = 1024;
const MIB: usize = 1024 * 1024;
const STACK_RANGE: (usize, usize) = (MIB, 16 * MIB);
const DEFAULT_THREAD_NAME: &str = "pdl-worker";
const WORKER_VARS: [&str; 2] = ["PDL_WORKER_THREADS", "TOKIO_WORKER_THREADS"];

/// Worker threads from the environment or the machine, computed once.
fn available_workers() -> usize {
    static WORKERS: OnceLock<usize> = OnceLock::new();
    *WORKERS.get_or_init(|| {
        WORKER_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find_map(|value| value.trim().parse::<usize>().ok().filter(|n| (1..=MAX_WORKERS).contains(n)))
            .or_else(|| available_parallelism().ok().map(std::num::NonZero::get))
            .unwrap_or(FALLBACK_WORKERS)
    })
}

/// Named runtime shapes selectable from `#[pdl_runtime::main(...)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Profile {
    #[default]
    Default,
    HighPerformance,
    MemoryEfficient,
}

impl Profile {
    #[must_use]
    pub fn config(self) -> RuntimeConfig {
        let workers = available_workers();
        match self {
            Self::Default => RuntimeConfig {
                worker_threads: workers,
                stack_size: 3 * MIB,
                thread_name: DEFAULT_THREAD_NAME.to_owned(),
                thread_keep_alive: Duration::from_secs(60),
            },
            Self::HighPerformance => RuntimeConfig {
                worker_threads: workers,
                stack_size: 4 * MIB,
                thread_name: "pdl-http".to_owned(),
                thread_keep_alive: Duration::from_secs(300),
            },
            Self::MemoryEfficient => RuntimeConfig {
                worker_threads: (workers / 2).max(1),
                stack_size: 2 * MIB,
                thread_name: "pdl-batch".to_owned(),
                thread_keep_alive: Duration::from_secs(30),
            },
        }
    }
}

/// Multi-threaded Tokio runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub worker_threads: usize,
    pub stack_size: usize,
    pub thread_name: String,
    pub thread_keep_alive: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Profile::Default.config()
    }
}

impl RuntimeConfig {
    #[must_use]
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    #[must_use]
    pub const fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = threads;
        self
    }

    /// Clamps workers and stack size into range and replaces a blank thread name.
    #[must_use]
    pub fn normalized(self) -> Self {
        let thread_name = if self.thread_name.trim().is_empty() {
            DEFAULT_THREAD_NAME.to_owned()
        } else {
            self.thread_name
        };
        Self {
            worker_threads: self.worker_threads.clamp(1, MAX_WORKERS),
            stack_size: self.stack_size.clamp(STACK_RANGE.0, STACK_RANGE.1),
            thread_name,
            thread_keep_alive: self.thread_keep_alive,
        }
    }

    /// Builds a multi-threaded runtime with I/O and timers enabled, after [`Self::normalized`].
    ///
    /// # Errors
    /// Fails when the OS refuses to spawn the worker threads.
    pub fn build(self) -> Result<Runtime> {
        let config = self.normalized();
        debug!(?config, "Building tokio runtime");

        Builder::new_multi_thread()
            .worker_threads(config.worker_threads)
            .thread_name(config.thread_name)
            .thread_stack_size(config.stack_size)
            .thread_keep_alive(config.thread_keep_alive)
            .enable_all()
            .build()
            .context("Failed to initialize runtime")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_clamps_out_of_range_values() {
        let config = RuntimeConfig {
            worker_threads: 0,
            stack_size: 0,
            thread_name: "  ".to_owned(),
            thread_keep_alive: Duration::from_secs(1),
        }
        .normalized();
        assert_eq!(config.worker_threads, 1);
        assert_eq!(config.stack_size, MIB);
        assert_eq!(config.thread_name, DEFAULT_THREAD_NAME);

        let config = RuntimeConfig::default().with_worker_threads(5000).normalized();
        assert_eq!(config.worker_threads, MAX_WORKERS);
    }

    #[test]
    fn memory_efficient_uses_fewer_workers() {
        let fast = Profile::HighPerformance.config();
        let lean = Profile::MemoryEfficient.config();
        assert!(lean.worker_threads <= fast.worker_threads);
        assert!(lean.worker_threads >= 1);
        assert!(lean.stack_size < fast.stack_size);
    }

    #[test]
    fn thread_name_overrides_the_profile() {
        let config = Profile::HighPerformance.config().with_thread_name("pdl-test");
        assert_eq!(config.thread_name, "pdl-test");
    }

    #[test]
    fn runtime_executes_tasks() {
        let runtime = RuntimeConfig::default().with_worker_threads(1).build().expect("runtime");
        assert_eq!(runtime.block_on(async { 21 * 2 }), 42);
    }
}
