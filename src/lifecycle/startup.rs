//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the logger from resolved configuration
//! - Bind and start the level-control endpoint on the logger's gate
//! - Apply the configured policy when the endpoint cannot bind

use std::io;

use thiserror::Error;

use crate::admin::{AdminError, AdminHandle, AdminServer, AdminState};
use crate::config::LogConfig;
use crate::logger::{LogError, Logger};

/// What to do when the level-control endpoint cannot bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BindPolicy {
    /// Abort startup.
    #[default]
    Required,
    /// Log a warning and keep running at the configured level.
    BestEffort,
}

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to open log file: {0}")]
    Sink(#[from] io::Error),

    #[error(transparent)]
    Admin(#[from] AdminError),
}

/// A running logging facility: the logger plus its control endpoint.
pub struct LoggingService {
    pub config: LogConfig,
    pub logger: Logger,
    /// `None` when the endpoint could not bind under [`BindPolicy::BestEffort`].
    pub admin: Option<AdminHandle>,
}

impl LoggingService {
    /// Write the startup records. Sink failures are reported through
    /// `tracing` and never stop the service.
    pub fn announce(&self) {
        if let Err(e) = self
            .logger
            .info("service started", "pid", &std::process::id().to_string())
        {
            tracing::warn!(error = %e, "Failed to write startup record");
        }

        let fields = [
            ("logFile", self.config.log_file.display().to_string()),
            ("logPort", self.config.log_port.clone()),
            ("logLevel", self.config.log_level.to_string()),
        ];
        if let Err(e) = self.logger.debug_with_fields("effective configuration", fields) {
            tracing::warn!(error = %e, "Failed to write configuration record");
        }
    }

    /// Stop the endpoint (if running) and flush the logger.
    pub async fn shutdown(self) -> Result<(), LogError> {
        if let Some(admin) = self.admin {
            if let Err(e) = admin.shutdown().await {
                tracing::warn!(error = %e, "Level-control endpoint did not stop cleanly");
            }
        }
        self.logger.sync()
    }
}

/// Build the logger and start the level-control endpoint.
pub async fn start(config: LogConfig, policy: BindPolicy) -> Result<LoggingService, StartupError> {
    let logger = Logger::from_config(&config)?;

    let state = AdminState::for_logger(logger.clone());
    let admin = match AdminServer::bind(&config.bind_address(), state).await {
        Ok(server) => Some(server.spawn()),
        Err(e) if policy == BindPolicy::BestEffort => {
            tracing::warn!(
                error = %e,
                level = %config.log_level,
                "Continuing without runtime log level control"
            );
            None
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(
        log_file = %config.log_file.display(),
        level = %config.log_level,
        console = config.console_output,
        "Logging started"
    );

    Ok(LoggingService {
        config,
        logger,
        admin,
    })
}
