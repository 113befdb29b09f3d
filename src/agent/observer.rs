//! Observation hooks for tool invocation and tool result events.
//!
//! Subscribers are held in an explicit list on the agent and notified
//! synchronously, once when the reasoning process requests a tool and once
//! when the tool's result is available.

use console::style;
use tracing::info;

/// Subscriber for tool lifecycle events.
pub trait ToolObserver: Send + Sync {
    /// Called when the reasoning process requests a tool invocation.
    fn on_tool_call(&self, name: &str, arguments: &str);

    /// Called when a tool invocation has produced its result.
    fn on_tool_result(&self, name: &str, result: &str);
}

/// Observer that emits tracing events.
pub struct TracingObserver;

impl ToolObserver for TracingObserver {
    fn on_tool_call(&self, name: &str, arguments: &str) {
        info!("Agent calling tool: {} with args: {}", name, arguments);
    }

    fn on_tool_result(&self, name: &str, result: &str) {
        info!("Tool {} returned {} chars", name, result.len());
    }
}

/// Observer that prints tool events to the console.
pub struct ConsoleObserver;

impl ToolObserver for ConsoleObserver {
    fn on_tool_call(&self, name: &str, arguments: &str) {
        println!(
            "  {} {}({})",
            style("tool").cyan().bold(),
            name,
            truncate(arguments, 80)
        );
    }

    fn on_tool_result(&self, name: &str, result: &str) {
        println!(
            "  {} {} -> {}",
            style("result").green().bold(),
            name,
            truncate(result, 80)
        );
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    let flat = s.replace('\n', " ");
    if flat.chars().count() <= max_len {
        flat
    } else {
        let cut: String = flat.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    pub(crate) struct RecordingObserver {
        pub events: Mutex<Vec<String>>,
    }

    impl ToolObserver for RecordingObserver {
        fn on_tool_call(&self, name: &str, arguments: &str) {
            self.events
                .lock()
                .unwrap()
                .push(format!("call:{}:{}", name, arguments));
        }

        fn on_tool_result(&self, name: &str, result: &str) {
            self.events
                .lock()
                .unwrap()
                .push(format!("result:{}:{}", name, result));
        }
    }

    #[test]
    fn test_recording_observer_sees_both_events() {
        let observer = RecordingObserver {
            events: Mutex::new(Vec::new()),
        };
        observer.on_tool_call("add", r#"{"a":1,"b":2}"#);
        observer.on_tool_result("add", "3");

        let events = observer.events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert!(events[0].starts_with("call:add:"));
        assert_eq!(events[1], "result:add:3");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("multi\nline", 20), "multi line");
        assert_eq!(truncate("abcdefghij", 8), "abcde...");
    }
}
