//! Logging for tests.
//!
//! Public keys are long hex strings. Tests register short nicknames for the
//! keys they generate ("alice", "bob") and every formatted log line has them
//! substituted before it reaches the test writer.

use std::{
    collections::BTreeMap,
    fmt,
    sync::{Arc, RwLock},
};
use tracing::{Event, Subscriber};
use tracing_subscriber::{
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields},
    registry::LookupSpan,
    EnvFilter,
};

lazy_static::lazy_static! {
    static ref GLOBAL_REWRITER: LogRewriter = LogRewriter::new();
}

/// Install a test-writer subscriber filtered by `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs anything.
/// Nicknames from earlier tests are cleared.
pub fn init_logging() {
    GLOBAL_REWRITER.clear_rewrites();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .map_event_format(|inner| Rewriting { inner })
        .try_init();
}

/// Show `to` instead of `from` in log output.
pub fn add_rewrite<S1: ToString, S2: AsRef<str>>(from: S1, to: S2) {
    GLOBAL_REWRITER.add_rewrite(from, to);
}

#[derive(Debug, Clone, Default)]
pub struct LogRewriter {
    rewrites: Arc<RwLock<BTreeMap<String, String>>>,
}

impl LogRewriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rewrite(&self, value: &str) -> String {
        let rewrites = self.rewrites.read().unwrap();
        rewrites
            .iter()
            .fold(value.to_string(), |acc, (from, to)| acc.replace(from, to))
    }

    pub fn add_rewrite<S: ToString, To: AsRef<str>>(&self, from: S, to: To) {
        self.rewrites
            .write()
            .unwrap()
            .insert(from.to_string(), to.as_ref().to_string());
    }

    pub fn clear_rewrites(&self) {
        self.rewrites.write().unwrap().clear();
    }
}

/// Formats with `inner`, then applies the global rewrites to the whole line.
struct Rewriting<F> {
    inner: F,
}

impl<S, N, F> FormatEvent<S, N> for Rewriting<F>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
    F: FormatEvent<S, N>,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut line = String::new();
        self.inner.format_event(ctx, Writer::new(&mut line), event)?;
        writer.write_str(&GLOBAL_REWRITER.rewrite(&line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_every_occurrence() {
        let rewriter = LogRewriter::new();
        rewriter.add_rewrite("0xabcd", "alice");
        rewriter.add_rewrite("0x1234", "bob");

        assert_eq!(
            rewriter.rewrite("0xabcd added 0x1234 to 0xabcd/friends"),
            "alice added bob to alice/friends"
        );

        rewriter.clear_rewrites();
        assert_eq!(rewriter.rewrite("0xabcd"), "0xabcd");
    }
}
