use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::{AnalysisArgs, BatchOptions};
use crate::error::{CliError, Result};
use crate::utils::parser;
use kappa::engine::config as core_config;
use kappa::engine::symbols::{OverflowPolicy, SymbolAlphabet};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::str::FromStr;

/// Merges CLI flags, the optional config file and the defaults, in that order of
/// precedence.
pub fn build_config(args: &AnalysisArgs, batch: Option<&BatchOptions>) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let binning_file = file_config.binning.take().unwrap_or_default();
    let nbins = args.nbins.or(binning_file.nbins).unwrap_or(defaults.nbins);
    let explicit_box = args.box_size.or(binning_file.box_size);
    let alphabet = args
        .alphabet
        .map(SymbolAlphabet::from)
        .or(binning_file.alphabet)
        .unwrap_or(defaults.alphabet);
    let overflow = if args.clip {
        OverflowPolicy::Clip
    } else {
        binning_file.overflow.unwrap_or(defaults.overflow)
    };

    let normalization_file = file_config.normalization.take().unwrap_or_default();
    let n_shuffles = args
        .n_shuffles
        .or(normalization_file.n_shuffles)
        .unwrap_or(defaults.n_shuffles);
    let seed = args
        .seed
        .or(normalization_file.seed)
        .unwrap_or(defaults.seed);

    let atom_types = match &args.types {
        Some(list) => {
            Some(parser::parse_type_list(list).map_err(|e| CliError::Argument(e.to_string()))?)
        }
        None => file_config
            .selection
            .take()
            .and_then(|selection| selection.atom_types),
    };

    let batch_file = file_config.batch.take().unwrap_or_default();
    let pattern = batch
        .and_then(|b| b.pattern.clone())
        .or(batch_file.pattern)
        .unwrap_or(defaults.pattern);
    let max_in_flight = batch
        .and_then(|b| b.max_in_flight)
        .or(batch_file.max_in_flight);

    let mut builder = core_config::AnalysisConfigBuilder::new()
        .nbins(nbins)
        .box_size(explicit_box.unwrap_or(defaults.box_size))
        .alphabet(alphabet)
        .overflow(overflow)
        .n_shuffles(n_shuffles)
        .seed(seed);
    if let Some(types) = atom_types {
        builder = builder.atom_types(types);
    }
    let core_config = builder.build()?;

    Ok(AppConfig {
        core_config,
        format: args.format,
        box_size_explicit: explicit_box.is_some(),
        pattern,
        max_in_flight,
    })
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value.parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value))
    })
}

/// Parses a kebab-case enum value the same way the config file would.
fn parse_enum<T: DeserializeOwned>(key: &str, value: &str) -> Result<T> {
    #[derive(Deserialize)]
    struct Wrapper<T> {
        value: T,
    }

    let unquoted = value.trim_matches('"');
    toml::from_str::<Wrapper<T>>(&format!("value = \"{unquoted}\""))
        .map(|w| w.value)
        .map_err(|_| CliError::Config(format!("Invalid value for {}: {}", key, value)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let (key, value_str) =
            parser::parse_key_value(kv_pair).map_err(|e| CliError::Config(e.to_string()))?;

        match key {
            "binning.nbins" => {
                config.binning.get_or_insert_with(Default::default).nbins =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "binning.box-size" => {
                config.binning.get_or_insert_with(Default::default).box_size =
                    Some(parse_value(key, value_str, "float")?);
            }
            "binning.alphabet" => {
                config.binning.get_or_insert_with(Default::default).alphabet =
                    Some(parse_enum(key, value_str)?);
            }
            "binning.overflow" => {
                config.binning.get_or_insert_with(Default::default).overflow =
                    Some(parse_enum(key, value_str)?);
            }
            "normalization.n-shuffles" => {
                config
                    .normalization
                    .get_or_insert_with(Default::default)
                    .n_shuffles = Some(parse_value(key, value_str, "integer")?);
            }
            "normalization.seed" => {
                config.normalization.get_or_insert_with(Default::default).seed =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "selection.atom-types" => {
                config
                    .selection
                    .get_or_insert_with(Default::default)
                    .atom_types = Some(
                    parser::parse_type_list(value_str)
                        .map_err(|e| CliError::Config(format!("{}: {}", key, e)))?,
                );
            }
            "batch.pattern" => {
                config.batch.get_or_insert_with(Default::default).pattern =
                    Some(value_str.trim_matches('"').to_string());
            }
            "batch.max-in-flight" => {
                config
                    .batch
                    .get_or_insert_with(Default::default)
                    .max_in_flight = Some(parse_value(key, value_str, "integer")?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
