//! Shared fakes for integration tests: a canned HTTP transport, a scripted
//! broker collector, and a store whose writes always fail.

mod collectors;
mod http_stub;
mod stores;

pub use collectors::{fallback, measured, Script, ScriptedCollector};
pub use http_stub::{StubResponse, StubTransport};
pub use stores::FailingStore;
