//! Service construction and dependency injection setup

use anyhow::Result;
use std::sync::Arc;

use automator_config::{AutomatorConfig, LoggingConfig};
use automator_core::{Clock, MonotonicClock};
use automator_rest_api::AppContext;
use automator_runtime::{AutomationProcess, AutomationTask, ProcessRegistry, TaskRegistry};

/// Service container holding all application services
#[derive(Debug, Clone)]
pub struct ServiceContainer {
    pub processes: Arc<ProcessRegistry>,
    pub tasks: Arc<TaskRegistry>,
    pub clock: Arc<dyn Clock>,
}

impl ServiceContainer {
    /// Build the registries described by the automation config.
    ///
    /// All entities share one clock. Processes are started here when
    /// `autostart_processes` is set.
    pub async fn new(config: &AutomatorConfig) -> Result<Self> {
        let clock: Arc<dyn Clock> = Arc::new(MonotonicClock::new());

        let processes = config
            .automation
            .processes
            .iter()
            .map(|p| AutomationProcess::with_clock(&p.name, p.cycle_time, Arc::clone(&clock)))
            .collect::<Result<Vec<_>, _>>()?;
        let processes = Arc::new(ProcessRegistry::new(processes)?);

        let tasks = config
            .automation
            .tasks
            .iter()
            .map(|t| AutomationTask::with_clock(&t.name, t.duration, Arc::clone(&clock)))
            .collect::<Result<Vec<_>, _>>()?;
        let tasks = Arc::new(TaskRegistry::new(tasks)?);

        tracing::info!(
            processes = ?processes.names(),
            tasks = ?tasks.names(),
            "Registries created"
        );

        if config.automation.autostart_processes {
            processes.start_all().await;
        }

        Ok(Self {
            processes,
            tasks,
            clock,
        })
    }

    /// Context handed to the REST handlers
    pub fn rest_context(&self) -> AppContext {
        AppContext::new(
            Arc::clone(&self.processes),
            Arc::clone(&self.tasks),
            Arc::clone(&self.clock),
        )
    }
}

/// Initialize logging from the logging domain
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    automator_logging::init_logging_from_config(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use automator_config::{ProcessDefinition, TaskDefinition};
    use automator_core::ProcessStatus;

    #[tokio::test]
    async fn test_default_registries() {
        let services = ServiceContainer::new(&AutomatorConfig::default()).await.unwrap();

        assert_eq!(services.processes.names(), vec!["process1", "process2"]);
        assert_eq!(services.tasks.names(), vec!["task1", "task2"]);
        assert!(services
            .processes
            .list()
            .await
            .iter()
            .all(|p| p.status == ProcessStatus::Init));
    }

    #[tokio::test]
    async fn test_rest_context_shares_clock() {
        let services = ServiceContainer::new(&AutomatorConfig::default()).await.unwrap();
        let context = services.rest_context();

        assert!(Arc::ptr_eq(&context.clock, &services.clock));
        assert!(Arc::ptr_eq(&context.processes, &services.processes));
        assert!(context.started_at <= services.clock.now());
    }

    #[tokio::test]
    async fn test_autostart_processes() {
        let mut config = AutomatorConfig::default();
        config.automation.autostart_processes = true;
        config.automation.processes = vec![ProcessDefinition::new("ingest", 30)];

        let services = ServiceContainer::new(&config).await.unwrap();
        let snapshot = services.processes.snapshot_of("ingest").await.unwrap();
        assert_eq!(snapshot.status, ProcessStatus::Running);

        services.processes.stop_all().await;
    }

    #[tokio::test]
    async fn test_invalid_definitions_rejected() {
        let mut config = AutomatorConfig::default();
        config.automation.tasks = vec![TaskDefinition::new("t", 1), TaskDefinition::new("t", 1)];
        assert!(ServiceContainer::new(&config).await.is_err());

        let mut config = AutomatorConfig::default();
        config.automation.processes = vec![ProcessDefinition::new("p", 0)];
        assert!(ServiceContainer::new(&config).await.is_err());
    }
}
