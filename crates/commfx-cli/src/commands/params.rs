//! Params command implementation
//!
//! Prints the default parameters of an effect as accepted in a chain file.

use anyhow::Result;
use colored::Colorize;
use std::process::ExitCode;

use commfx_effects::{EffectSpec, ParamSnapshot, ParamValue};

use super::json_output::ParamsOutput;

/// Run the params command
///
/// # Returns
/// Exit code: 0 on success, 1 on error
pub fn run(effect: &str, json_output: bool) -> Result<ExitCode> {
    let spec = EffectSpec::with_defaults(effect)?;
    let params = spec.build().params();

    if json_output {
        let output = ParamsOutput {
            effect: spec.type_name().to_string(),
            params,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{} {}", "Defaults for".cyan().bold(), spec.type_name().bold());
    for line in format_params(&params) {
        println!("  {}", line);
    }

    Ok(ExitCode::SUCCESS)
}

fn format_params(params: &ParamSnapshot) -> Vec<String> {
    let width = params.keys().map(String::len).max().unwrap_or(0);
    params
        .iter()
        .map(|(name, value)| format!("{:<width$}  {}", name, format_value(value), width = width))
        .collect()
}

fn format_value(value: &ParamValue) -> String {
    match value {
        ParamValue::Bool(b) => b.to_string(),
        ParamValue::Number(v) => v.to_string(),
        ParamValue::Range(lo, hi) => format!("[{}, {}]", lo, hi),
        ParamValue::Text(s) => s.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_params_lists_defaults() {
        let spec = EffectSpec::with_defaults("doppler").unwrap();
        let lines = format_params(&spec.build().params());

        assert!(lines.iter().any(|l| l.starts_with("velocity ") && l.ends_with("30")));
        assert!(lines.iter().any(|l| l.ends_with("[20, 15000]")));
    }

    #[test]
    fn test_peer_effect_names_resolve() {
        let spec = EffectSpec::with_defaults("convolution-reverb").unwrap();
        assert_eq!(spec.type_name(), "convolution_reverb");
        let lines = format_params(&spec.build().params());
        assert!(lines.iter().any(|l| l.starts_with("ir_type ") && l.ends_with("spring")));

        assert!(run("pcm", true).is_ok());
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&ParamValue::Text("ssb".into())), "ssb");
        assert_eq!(format_value(&ParamValue::Bool(true)), "true");
        assert_eq!(format_value(&ParamValue::Number(0.7)), "0.7");
    }

    #[test]
    fn test_unknown_effect_is_an_error() {
        let err = run("chorus", true).unwrap_err();
        assert!(err.to_string().contains("chorus"));
    }
}
