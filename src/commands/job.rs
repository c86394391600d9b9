use crate::domain::models::{JobConfig, RunReport};
use crate::services::config::with_window;
use crate::services::mailer::CommandMailer;
use crate::services::output::{print_err, print_one};
use crate::services::pipeline::JobRunner;
use crate::services::reporter::CommandReporter;

pub fn handle_run(
    json: bool,
    config: JobConfig,
    start_time: Option<String>,
    end_time: Option<String>,
) -> anyhow::Result<u8> {
    let config = with_window(config, start_time, end_time)?;
    let reporter = CommandReporter;
    let mailer = CommandMailer::from_config(&config.mail);

    let report = JobRunner::new(&config, &reporter, &mailer).run();
    emit(json, &report)?;
    Ok(report.exit_code())
}

fn emit(json: bool, report: &RunReport) -> anyhow::Result<()> {
    let Some(f) = &report.failure else {
        // Silent on success unless asked for JSON: cron mails any output it sees.
        return if json {
            print_one(true, report, |_| String::new())
        } else {
            Ok(())
        };
    };
    let message = if json {
        f.message.clone()
    } else {
        format!("{} at step {}: {}", f.kind, f.step.as_str(), f.message)
    };
    print_err(json, &f.code, &message);
    Ok(())
}
