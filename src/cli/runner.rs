//! CLI runner - performs the conversion

use crate::cli::commands::Cli;
use crate::error::{Result, ResultExt};
use crate::session::{get_session, EngineConfiguration, ExecutionMode, Session, SessionRequest};
use std::time::Instant;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Extra configuration from `--conf-file` followed by `--conf`
    pub fn extra_config(&self) -> Result<EngineConfiguration> {
        let mut config = match &self.cli.conf_file {
            Some(path) => EngineConfiguration::from_yaml_file(path).with_context(|| {
                format!("Failed to load configuration file {}", path.display())
            })?,
            None => EngineConfiguration::new(),
        };
        config.extend(self.cli.conf.iter().cloned());
        Ok(config)
    }

    /// Session request for the current process
    pub fn session_request(&self, mode: ExecutionMode) -> Result<SessionRequest> {
        Ok(SessionRequest::new(mode)
            .with_app_name(&self.cli.app_name)
            .with_profile_location(self.cli.oci_config.clone())
            .with_profile_name(self.cli.profile_name.clone())
            .with_extra_config(self.extra_config()?))
    }

    /// Run the conversion and print the summary line
    pub async fn run(&self) -> Result<()> {
        let mode = ExecutionMode::detect();
        debug!("Execution mode: {:?}", mode);

        let session = get_session(&self.session_request(mode)?)?;
        let rows = convert(&session, &self.cli.input_path, &self.cli.output_path).await?;

        println!("{}", summary_line(rows, &self.cli.output_path));
        Ok(())
    }
}

/// Read JSON from `input`, overwrite `output` with Parquet, return the row count
pub async fn convert(session: &Session, input: &str, output: &str) -> Result<usize> {
    let start = Instant::now();

    let dataset = session.read_json(input).await?;
    info!(
        "Reading {} file(s) from {} with {} column(s)",
        dataset.files().len(),
        input,
        dataset.schema().fields().len()
    );

    dataset.write_parquet(output).await?;
    let rows = dataset.count().await?;

    info!("Converted {} rows in {:.2?}", rows, start.elapsed());
    Ok(rows)
}

/// Message printed after a successful conversion
pub fn summary_line(rows: usize, output: &str) -> String {
    format!("Successfully converted {rows} rows to Parquet and wrote to {output}.")
}
