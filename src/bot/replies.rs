pub struct Replies;

impl Replies {
    /// Shown for any handler failure; never carries the failure itself.
    pub const GENERIC_FAILURE: &'static str = "Sorry, something went wrong...";

    pub fn pong(latency_ms: i64) -> String {
        format!("🏓 Pong! ({latency_ms} ms)")
    }

    pub fn missing_option(name: &str) -> String {
        format!("❌ Missing required option `{name}`")
    }
}
