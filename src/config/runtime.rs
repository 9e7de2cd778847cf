// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::app::App;
use crate::backends::ModuleFactory;
use crate::config::Config;
use crate::errors::LifecycleError;
use crate::traits::Scheduler;

/// App builder driven by configuration.
///
/// Registers every configured module, applies the lifecycle options and
/// exposes the config and its settings to modules through the app.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use the_appwood::config::{parse_config, ConfigFormat, RuntimeBuilder};
/// use the_appwood::engine::ManualScheduler;
///
/// let config = parse_config(
///     r#"
/// lifecycle:
///   sync_batch_limit: 16
/// modules:
///   - name: config
///   - name: server
///     deps: [config]
/// "#,
///     ConfigFormat::Yaml,
/// )
/// .unwrap();
///
/// let app = RuntimeBuilder::from_config(&config, Arc::new(ManualScheduler::new())).unwrap();
/// assert_eq!(app.registered_names(), vec!["config", "server"]);
/// ```
pub struct RuntimeBuilder;

impl RuntimeBuilder {
    /// Build an app from configuration, scheduling deferred work on `scheduler`.
    pub fn from_config(cfg: &Config, scheduler: Arc<dyn Scheduler>) -> Result<App, LifecycleError> {
        let mut builder = App::builder()
            .scheduler(scheduler)
            .config(Arc::new(cfg.clone()))
            .modules(ModuleFactory::create_all(cfg));

        if let Some(limit) = cfg.lifecycle.sync_batch_limit {
            builder = builder.sync_batch_limit(limit);
        }
        builder.build()
    }
}
