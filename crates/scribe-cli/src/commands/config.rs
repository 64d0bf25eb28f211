use anyhow::{Result, bail};

use scribe_core::config::ScribeConfig;
use scribe_core::history::DecayPolicy;
use scribe_infrastructure::ConfigService;

pub fn parse_decay_policy(value: &str) -> Result<DecayPolicy, String> {
    match value.to_ascii_lowercase().as_str() {
        "forget" => Ok(DecayPolicy::Forget),
        "requeue" => Ok(DecayPolicy::Requeue),
        other => Err(format!("unknown decay policy '{}' (expected forget or requeue)", other)),
    }
}

fn policy_name(policy: DecayPolicy) -> &'static str {
    match policy {
        DecayPolicy::Forget => "forget",
        DecayPolicy::Requeue => "requeue",
    }
}

fn render(config: &ScribeConfig) -> String {
    format!(
        "extensions     = {}\nexcluded_files = {}\ndecay_hours    = {}\ndecay_policy   = {}",
        config.prompts.extensions.join(", "),
        config.prompts.excluded_files.join(", "),
        config.history.decay_hours,
        policy_name(config.history.decay_policy)
    )
}

pub fn show(service: &ConfigService) -> Result<()> {
    println!("{}", render(&service.get_config()));
    Ok(())
}

pub fn set(
    service: &ConfigService,
    decay_hours: Option<u64>,
    decay_policy: Option<DecayPolicy>,
) -> Result<()> {
    if decay_hours.is_none() && decay_policy.is_none() {
        bail!("Nothing to change: pass --decay-hours and/or --decay-policy");
    }

    let updated = service.update(|config| {
        if let Some(hours) = decay_hours {
            config.history.decay_hours = hours;
        }
        if let Some(policy) = decay_policy {
            config.history.decay_policy = policy;
        }
    })?;

    tracing::info!("[Config] Updated history settings");
    println!("{}", render(&updated));
    Ok(())
}
