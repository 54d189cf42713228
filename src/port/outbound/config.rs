//! Configuration source port.

use std::sync::Arc;

use futures_util::stream::BoxStream;

use crate::domain::ConfigData;

/// Source of parsed, validated configuration values.
pub trait ConfigProvider: Send + Sync {
    /// Stream starting with the current configuration (if any) followed by
    /// every later update, in arrival order.
    fn current_config(&self) -> BoxStream<'static, Arc<ConfigData>>;
}
