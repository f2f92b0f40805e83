//! # brokerscope-adapters
//!
//! One [`IBrokerCollector`] per broker kind. Each adapter walks its own
//! primary→fallback chain sequentially and reports degraded states as data
//! (`connected=false`, `dataSource`, per-field quality) instead of errors.
//!
//! [`IBrokerCollector`]: brokerscope_core::traits::IBrokerCollector

pub mod amqp;
pub mod http;
pub mod log_stream;
pub mod pubsub;
pub mod uptime;

pub use amqp::AmqpCollector;
pub use http::{BasicAuth, IHttpTransport, ReqwestTransport};
pub use log_stream::{default_admin_client, ILogAdminClient, LogStreamCollector, TopicInfo};
pub use pubsub::PubSubCollector;
