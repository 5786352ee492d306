//! CLI arguments

use crate::session::DEFAULT_APP_NAME;
use clap::Parser;
use std::path::PathBuf;

/// Convert JSON data to a Parquet dataset, locally or in OCI Data Flow
#[derive(Parser, Debug)]
#[command(name = "json2parquet")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// OCI config profile name (local runs only)
    #[arg(short = 'p', long = "profile_name")]
    pub profile_name: Option<String>,

    /// Input path for the JSON data (file, directory or object-store URI)
    #[arg(short = 'i', long = "input-path")]
    pub input_path: String,

    /// Output path for the Parquet dataset (directory or object-store URI)
    #[arg(short = 'o', long = "output-path")]
    pub output_path: String,

    /// OCI config file (default ~/.oci/config)
    #[arg(long = "oci-config")]
    pub oci_config: Option<PathBuf>,

    /// Extra engine configuration, applied in order after everything else
    #[arg(long = "conf", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub conf: Vec<(String, String)>,

    /// YAML file of extra engine configuration, applied before --conf
    #[arg(long = "conf-file")]
    pub conf_file: Option<PathBuf>,

    /// Session application name
    #[arg(long = "app-name", default_value = DEFAULT_APP_NAME)]
    pub app_name: String,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Split `KEY=VALUE`; the value may itself contain `=`
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("parquet.compression=zstd").unwrap(),
            ("parquet.compression".to_string(), "zstd".to_string())
        );
        assert_eq!(
            parse_key_val("a=b=c").unwrap(),
            ("a".to_string(), "b=c".to_string())
        );
        assert!(parse_key_val("novalue").is_err());
        assert!(parse_key_val("=x").is_err());
    }

    #[test]
    fn test_required_flags() {
        assert!(Cli::try_parse_from(["json2parquet", "-i", "in.json"]).is_err());
        assert!(Cli::try_parse_from(["json2parquet", "-o", "out"]).is_err());
    }

    #[test]
    fn test_parse_full() {
        let cli = Cli::try_parse_from([
            "json2parquet",
            "-p",
            "DEV",
            "-i",
            "in.json",
            "-o",
            "out",
            "--conf",
            "json.multiline=true",
            "--conf",
            "parquet.compression=gzip",
            "-v",
        ])
        .unwrap();

        assert_eq!(cli.profile_name.as_deref(), Some("DEV"));
        assert_eq!(cli.input_path, "in.json");
        assert_eq!(cli.output_path, "out");
        assert_eq!(cli.conf.len(), 2);
        assert_eq!(cli.conf[1].1, "gzip");
        assert_eq!(cli.app_name, DEFAULT_APP_NAME);
        assert!(cli.verbose);
        assert!(cli.oci_config.is_none());
    }

    #[test]
    fn test_long_profile_flag_uses_underscore() {
        let cli = Cli::try_parse_from([
            "json2parquet",
            "--profile_name",
            "PROD",
            "--input-path",
            "a",
            "--output-path",
            "b",
        ])
        .unwrap();
        assert_eq!(cli.profile_name.as_deref(), Some("PROD"));
    }
}
