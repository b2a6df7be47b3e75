use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use toml::Value;

use crate::al_config::{
    AlConfig, AuthMode, Band, EncrMode, MultiApRoles, RegistrarBssConfig,
};

const EXPECTED_CONFIG_VERSION: &str = "1";

/// Patch an `AlConfig` (already seeded from required CLI fields) with the
/// optional TOML document's registrar/timing knobs.
pub fn patch_from_toml_str(cfg: &mut AlConfig, toml_str: &str) -> Result<(), String> {
    let root: TomlConfigRoot = toml::from_str(toml_str).map_err(|e| e.to_string())?;

    if root.config_version != EXPECTED_CONFIG_VERSION {
        return Err(format!(
            "unrecognized config_version: {}, expected {}",
            root.config_version, EXPECTED_CONFIG_VERSION
        ));
    }
    if !root.extra.is_empty() {
        return Err(format!("unrecognized top-level fields: {:?}", sorted_keys(&root.extra)));
    }

    for bss in root.registrar_bsses {
        if !bss.extra.is_empty() {
            return Err(format!(
                "unrecognized fields in registrar_bsses entry: {:?}",
                sorted_keys(&bss.extra)
            ));
        }
        cfg.registrar_bsses.push(RegistrarBssConfig {
            band: bss.band.into(),
            ssid: bss.ssid,
            auth_mode: bss.auth_mode.into(),
            encr_mode: bss.encr_mode.into(),
            network_key: bss.network_key,
            multi_ap: MultiApRoles {
                fronthaul: bss.fronthaul.unwrap_or(false),
                backhaul_bss: bss.backhaul_bss.unwrap_or(false),
                backhaul_sta: bss.backhaul_sta.unwrap_or(false),
                backhaul_only: bss.backhaul_only.unwrap_or(false),
            },
        });
    }

    if let Some(pb) = root.push_button {
        if let Some(v) = pb.window_ms {
            cfg.timings.push_button_window_ms = v;
        }
        if let Some(v) = pb.backoff_cap_ms {
            cfg.timings.enrollee_backoff_cap_ms = v;
        }
        if let Some(v) = pb.retry_cap {
            cfg.timings.retry_cap = v;
        }
    }

    if let Some(dw) = root.duplicate_window {
        if let Some(v) = dw.max_entries {
            cfg.duplicate_window.max_entries = v;
        }
        if let Some(v) = dw.window_secs {
            cfg.duplicate_window.window_secs = v;
        }
    }

    if let Some(v) = root.discovery_period_secs {
        cfg.discovery_period_secs = v;
    }
    if let Some(v) = root.device_timeout_secs {
        cfg.device_timeout_secs = v;
    }

    Ok(())
}

pub fn patch_from_reader<R: Read>(cfg: &mut AlConfig, reader: R) -> Result<(), String> {
    let mut contents = String::new();
    BufReader::new(reader)
        .read_to_string(&mut contents)
        .map_err(|e| e.to_string())?;
    patch_from_toml_str(cfg, &contents)
}

pub fn patch_from_file<P: AsRef<Path>>(cfg: &mut AlConfig, path: P) -> Result<(), String> {
    let f = File::open(path).map_err(|e| e.to_string())?;
    patch_from_reader(cfg, BufReader::new(f))
}

fn sorted_keys(map: &HashMap<String, Value>) -> Vec<&str> {
    let mut v: Vec<&str> = map.keys().map(|s| s.as_str()).collect();
    v.sort_unstable();
    v
}

// ----------------------- DTOs for input shape -----------------------

#[derive(Deserialize)]
struct TomlConfigRoot {
    config_version: String,

    #[serde(default)]
    registrar_bsses: Vec<RegistrarBssDto>,

    #[serde(default)]
    push_button: Option<PushButtonDto>,

    #[serde(default)]
    duplicate_window: Option<DuplicateWindowDto>,

    #[serde(default)]
    discovery_period_secs: Option<u64>,
    #[serde(default)]
    device_timeout_secs: Option<u64>,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[derive(Deserialize, Clone, Copy, PartialEq, Eq)]
enum BandDto {
    #[serde(rename = "2.4GHz")]
    TwoPointFourGhz,
    #[serde(rename = "5GHz")]
    FiveGhz,
    #[serde(rename = "60GHz")]
    SixtyGhz,
}

impl From<BandDto> for Band {
    fn from(b: BandDto) -> Self {
        match b {
            BandDto::TwoPointFourGhz => Band::TwoPointFourGhz,
            BandDto::FiveGhz => Band::FiveGhz,
            BandDto::SixtyGhz => Band::SixtyGhz,
        }
    }
}

#[derive(Deserialize, Clone, Copy)]
#[serde(rename_all = "PascalCase")]
enum AuthModeDto {
    Open,
    Wpa2Psk,
}

impl From<AuthModeDto> for AuthMode {
    fn from(a: AuthModeDto) -> Self {
        match a {
            AuthModeDto::Open => AuthMode::Open,
            AuthModeDto::Wpa2Psk => AuthMode::Wpa2Psk,
        }
    }
}

#[derive(Deserialize, Clone, Copy)]
#[serde(rename_all = "PascalCase")]
enum EncrModeDto {
    None,
    Aes,
}

impl From<EncrModeDto> for EncrMode {
    fn from(e: EncrModeDto) -> Self {
        match e {
            EncrModeDto::None => EncrMode::None,
            EncrModeDto::Aes => EncrMode::Aes,
        }
    }
}

#[derive(Deserialize)]
struct RegistrarBssDto {
    band: BandDto,
    ssid: String,
    auth_mode: AuthModeDto,
    encr_mode: EncrModeDto,
    network_key: String,

    #[serde(default)]
    fronthaul: Option<bool>,
    #[serde(default)]
    backhaul_bss: Option<bool>,
    #[serde(default)]
    backhaul_sta: Option<bool>,
    #[serde(default)]
    backhaul_only: Option<bool>,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[derive(Deserialize, Default)]
struct PushButtonDto {
    window_ms: Option<u64>,
    backoff_cap_ms: Option<u64>,
    retry_cap: Option<u8>,
}

#[derive(Deserialize, Default)]
struct DuplicateWindowDto {
    max_entries: Option<usize>,
    window_secs: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use al_core::MacAddr;

    #[test]
    fn patches_registrar_and_timings() {
        let toml_str = r#"
            config_version = "1"
            discovery_period_secs = 30

            [[registrar_bsses]]
            band = "5GHz"
            ssid = "HomeNet"
            auth_mode = "Wpa2Psk"
            encr_mode = "Aes"
            network_key = "correcthorsebatterystaple"
            fronthaul = true

            [push_button]
            window_ms = 60000
        "#;
        let mut cfg = AlConfig::new(MacAddr::ZERO, vec!["eth0".into()]);
        patch_from_toml_str(&mut cfg, toml_str).expect("parse ok");
        assert_eq!(cfg.registrar_bsses.len(), 1);
        assert_eq!(cfg.registrar_bsses[0].ssid, "HomeNet");
        assert!(cfg.registrar_bsses[0].multi_ap.fronthaul);
        assert_eq!(cfg.timings.push_button_window_ms, 60_000);
        assert_eq!(cfg.discovery_period_secs, 30);
        cfg.validate().expect("valid");
    }

    #[test]
    fn rejects_unknown_top_level_field() {
        let toml_str = r#"
            config_version = "1"
            bogus_field = true
        "#;
        let mut cfg = AlConfig::new(MacAddr::ZERO, vec!["eth0".into()]);
        assert!(patch_from_toml_str(&mut cfg, toml_str).is_err());
    }

    #[test]
    fn rejects_wrong_config_version() {
        let toml_str = r#"config_version = "999""#;
        let mut cfg = AlConfig::new(MacAddr::ZERO, vec!["eth0".into()]);
        assert!(patch_from_toml_str(&mut cfg, toml_str).is_err());
    }
}
