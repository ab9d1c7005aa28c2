pub mod tracing_subscriber_setup;

pub use tracing_subscriber_setup::init_tracing;
