use crate::cli::ConfigCommands;
use crate::domain::models::JobConfig;
use crate::services::config::redacted;
use crate::services::doctor;
use crate::services::output::print_one;

pub fn handle_check(json: bool, config: &JobConfig) -> anyhow::Result<u8> {
    let report = doctor::check(config);
    let ok = report.overall == "ok";
    print_one(json, report, |r| {
        let mut lines = vec![format!("overall: {}", r.overall)];
        for c in &r.checks {
            match &c.detail {
                Some(d) => lines.push(format!("{}\t{}\t{}", c.name, c.status, d)),
                None => lines.push(format!("{}\t{}", c.name, c.status)),
            }
        }
        lines.join("\n")
    })?;
    Ok(if ok { 0 } else { 1 })
}

pub fn handle_config_commands(
    json: bool,
    command: &ConfigCommands,
    config: &JobConfig,
) -> anyhow::Result<u8> {
    match command {
        ConfigCommands::Show => {
            let shown = redacted(config);
            if json {
                print_one(true, shown, |_| String::new())?;
            } else {
                print!("{}", toml::to_string_pretty(&shown)?);
            }
        }
    }
    Ok(0)
}
