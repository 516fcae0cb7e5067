use crate::config::RunnerSettings;
use crate::core::preview::preview_file;
use crate::core::venv::PythonEnv;
use crate::domain::model::{Invocation, PreviewOutcome, Step, DEPENDENCIES};
use crate::domain::ports::CommandRunner;
use crate::utils::error::{Result, RunnerError};
use chrono::{DateTime, Utc};
use std::io::Write;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
    pub completed: Vec<Step>,
    pub preview: PreviewOutcome,
}

/// Runs the fixed setup sequence: create and activate the environment,
/// upgrade pip, install the dependencies, run the scraper, preview the
/// output file. The first failing step aborts the run.
pub struct Orchestrator<R: CommandRunner> {
    runner: R,
    settings: RunnerSettings,
}

impl<R: CommandRunner> Orchestrator<R> {
    pub fn new(runner: R, settings: RunnerSettings) -> Self {
        Self { runner, settings }
    }

    pub async fn run<W: Write>(&self, out: &mut W) -> Result<RunReport> {
        let started_at = Utc::now();
        let clock = Instant::now();
        let mut completed = Vec::new();

        let settings = self.resolved_settings()?;
        let workdir = settings.working_dir.clone();
        let env = PythonEnv::layout(settings.venv_path());
        tracing::info!("🚀 Preparing environment in {}", env.root().display());

        let create = Invocation::new(&settings.python, &workdir)
            .args(["-m", "venv"])
            .arg(env.root().to_string_lossy());
        self.execute(Step::CreateEnvironment, &create).await?;
        completed.push(Step::CreateEnvironment);

        env.activate()?;
        let envs = env.command_env()?;
        tracing::info!("✅ {}: {}", Step::ActivateEnvironment, env.interpreter().display());
        completed.push(Step::ActivateEnvironment);

        let upgrade = Invocation::new(env.interpreter(), &workdir)
            .args(["-m", "pip", "install", "--upgrade", "pip"])
            .envs(envs.clone());
        self.execute(Step::UpgradeInstaller, &upgrade).await?;
        completed.push(Step::UpgradeInstaller);

        let install = Invocation::new(env.interpreter(), &workdir)
            .args(["-m", "pip", "install"])
            .args(DEPENDENCIES)
            .envs(envs.clone());
        self.execute(Step::InstallDependencies, &install).await?;
        completed.push(Step::InstallDependencies);

        let scrape = Invocation::new(env.interpreter(), &workdir)
            .arg(settings.scraper_script.to_string_lossy())
            .envs(envs);
        self.execute(Step::RunScraper, &scrape).await?;
        completed.push(Step::RunScraper);

        let preview = Self::preview(&settings, out);
        completed.push(Step::PreviewOutput);

        Ok(RunReport {
            started_at,
            elapsed: clock.elapsed(),
            completed,
            preview,
        })
    }

    async fn execute(&self, step: Step, invocation: &Invocation) -> Result<()> {
        tracing::info!("▶ {}: {}", step, invocation.display_line());

        let status = self
            .runner
            .run(invocation)
            .await
            .map_err(|e| match e {
                RunnerError::IoError(source) => RunnerError::SpawnError {
                    step: step.label().to_string(),
                    program: invocation.program.display().to_string(),
                    source,
                },
                other => other,
            })?;

        if !status.success() {
            tracing::error!("❌ {} failed with exit code {:?}", step, status.code);
            return Err(RunnerError::StepFailed {
                step: step.label().to_string(),
                code: status.code,
            });
        }

        tracing::debug!("{} completed", step);
        Ok(())
    }

    /// Never fails: a missing or unreadable output file is reported, not
    /// raised.
    fn preview<W: Write>(settings: &RunnerSettings, out: &mut W) -> PreviewOutcome {
        let path = settings.output_path();
        let max_lines = settings.preview_lines;
        let outcome = preview_file(&path, max_lines);

        match &outcome {
            PreviewOutcome::Shown { lines } => {
                tracing::info!("📄 {} found, showing {} lines", path.display(), lines.len())
            }
            PreviewOutcome::Missing => tracing::warn!("{} was not produced", path.display()),
            PreviewOutcome::Unreadable { reason } => {
                tracing::warn!("Could not read {}: {}", path.display(), reason)
            }
        }

        let file_name = settings.output_file.to_string_lossy();
        let diagnostic = format!(
            "python {} --test",
            settings.scraper_script.to_string_lossy()
        );
        if let Err(e) = outcome.render(out, &file_name, max_lines, &diagnostic) {
            tracing::warn!("Could not print preview: {}", e);
        }

        outcome
    }

    /// The configured settings with `working_dir` made absolute, so child
    /// processes resolve the environment paths the same way.
    fn resolved_settings(&self) -> Result<RunnerSettings> {
        let mut settings = self.settings.clone();
        if !settings.working_dir.is_absolute() {
            settings.working_dir = std::env::current_dir()?.join(&settings.working_dir);
        }
        Ok(settings)
    }
}
