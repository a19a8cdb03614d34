//! XML configuration support.
//! - Loads settings from config.xml (quick_xml) and layers them onto a Config.
//! - Unknown XML fields are rejected so misconfigurations surface at startup.
//!
//! Notes:
//! - This module only reads the config file; directory validation happens elsewhere.
//! - CLI flags and environment variables are applied afterwards and win.

use anyhow::{Context, Result, bail};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use super::paths::resolve_config_path;
use crate::config::types::{Config, LogLevel};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Default, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    source_dir: Option<String>,
    dest_dir: Option<String>,
    filename_prefix: Option<String>,
    #[serde(default, deserialize_with = "de_u64_trimmed_opt")]
    quiet_period_seconds: Option<u64>,
    #[serde(default, deserialize_with = "de_u64_trimmed_opt")]
    poll_interval_seconds: Option<u64>,
    log_level: Option<String>,
    log_file: Option<String>,
    print_locally: Option<bool>,
    printer: Option<String>,
    print_test_page: Option<bool>,
    cups_host: Option<String>,
    #[serde(default, deserialize_with = "de_u64_trimmed_opt")]
    cups_port: Option<u64>,
}

// Custom deserializer that trims surrounding whitespace for optional u64
fn de_u64_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<u64>().map(Some).map_err(D::Error::custom),
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// Overlay parsed XML values onto `cfg`. Absent fields leave `cfg` unchanged.
fn apply_xml(parsed: XmlConfig, cfg: &mut Config) -> Result<()> {
    if let Some(s) = non_empty(parsed.source_dir.as_deref()) {
        cfg.source_dir = Some(PathBuf::from(s));
    }
    if let Some(s) = non_empty(parsed.dest_dir.as_deref()) {
        cfg.dest_dir = Some(PathBuf::from(s));
    }
    if let Some(s) = non_empty(parsed.filename_prefix.as_deref()) {
        cfg.filename_prefix = s.to_string();
    }
    if let Some(secs) = parsed.quiet_period_seconds {
        cfg.quiet_period = Duration::from_secs(secs);
    }
    if let Some(secs) = parsed.poll_interval_seconds {
        cfg.poll_interval = Duration::from_secs(secs);
    }
    if let Some(s) = non_empty(parsed.log_level.as_deref()) {
        cfg.log_level = s.parse::<LogLevel>().map_err(anyhow::Error::msg)?;
    }
    if let Some(s) = non_empty(parsed.log_file.as_deref()) {
        cfg.log_file = Some(PathBuf::from(s));
    }
    if let Some(b) = parsed.print_locally {
        cfg.print.enabled = b;
    }
    if let Some(s) = non_empty(parsed.printer.as_deref()) {
        cfg.print.printer = Some(s.to_string());
    }
    if let Some(b) = parsed.print_test_page {
        cfg.print.test_page = b;
    }
    if let Some(s) = non_empty(parsed.cups_host.as_deref()) {
        cfg.print.host = s.to_string();
    }
    if let Some(port) = parsed.cups_port {
        cfg.print.port = u16::try_from(port).with_context(|| format!("cups_port {port} out of range"))?;
    }
    Ok(())
}

/// Load a Config from a specific XML file path; unset fields keep their defaults.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let mut cfg = Config::default();
    overlay_xml_file(path, &mut cfg)?;
    Ok(cfg)
}

fn overlay_xml_file(path: &Path, cfg: &mut Config) -> Result<()> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    apply_xml(parsed, cfg)
}

/// Build the XML layer of the configuration.
///
/// Returns the config (defaults overlaid with the file, if any) and the path that was read.
/// A missing default file yields plain defaults; a missing explicit file is an error.
pub fn load_config_layer(explicit: Option<&Path>) -> Result<(Config, Option<PathBuf>)> {
    let mut cfg = Config::default();
    let Some((path, is_explicit)) = resolve_config_path(explicit) else {
        return Ok((cfg, None));
    };
    if !path.exists() {
        if is_explicit {
            bail!("config file '{}' does not exist", path.display());
        }
        debug!(path = %path.display(), "No config file at default location; using defaults");
        return Ok((cfg, None));
    }
    overlay_xml_file(&path, &mut cfg)?;
    Ok((cfg, Some(path)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn unknown_field_is_an_error() {
        let td = tempdir().unwrap();
        let p = td.path().join("config.xml");
        fs::write(&p, "<config><bogus>1</bogus></config>").unwrap();
        let err = load_config_from_xml_path(&p).unwrap_err();
        assert!(format!("{err:#}").contains("bogus"), "{err:#}");
    }

    #[test]
    fn bad_log_level_is_an_error() {
        let td = tempdir().unwrap();
        let p = td.path().join("config.xml");
        fs::write(&p, "<config><log_level>loud</log_level></config>").unwrap();
        assert!(load_config_from_xml_path(&p).is_err());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let td = tempdir().unwrap();
        let p = td.path().join("nope.xml");
        assert!(load_config_layer(Some(&p)).is_err());
    }
}
