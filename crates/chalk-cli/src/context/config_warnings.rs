use chalk_config::ChalkConfig;

pub fn warn_unconfigured(config: &ChalkConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

/// `CHALK_ANALYZER_API_KEY` (one underscore) is silently ignored by the env
/// provider; catch the likely typo.
fn collect_unconfigured_warnings<I>(config: &ChalkConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    if !config.analyzer.is_configured() && has_single_underscore(&env_keys, "CHALK_ANALYZER") {
        warnings.push(
            "Analyzer config appears default while CHALK_ANALYZER* env vars exist. Use double underscores (example: CHALK_ANALYZER__API_KEY)."
                .to_string(),
        );
    }

    if !config.auth.has_custom_token() && has_single_underscore(&env_keys, "CHALK_AUTH") {
        warnings.push(
            "Auth config appears default while CHALK_AUTH* env vars exist. Use double underscores (example: CHALK_AUTH__CUSTOM_TOKEN)."
                .to_string(),
        );
    }

    warnings
}

fn has_single_underscore(keys: &[String], prefix: &str) -> bool {
    let nested = format!("{prefix}__");
    keys.iter()
        .any(|key| key.starts_with(prefix) && !key.starts_with(&nested))
}
