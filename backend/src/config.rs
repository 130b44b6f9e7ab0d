use anyhow::{anyhow, Context};
use chrono_tz::Tz;
use std::{env, net::SocketAddr};

use crate::services::edit_window::{EditWindow, DEFAULT_EDIT_WINDOW_DAYS};

#[derive(Debug, Clone)]
pub struct FrappeConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub checkin_doctype: String,
    pub attendance_doctype: String,
    pub wfh_doctype: String,
    pub od_doctype: String,
}

impl Default for FrappeConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 15,
            checkin_doctype: "Employee Checkin".to_string(),
            attendance_doctype: "Attendance".to_string(),
            wfh_doctype: "Work From Home Request".to_string(),
            od_doctype: "On Duty Request".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub frappe: FrappeConfig,
    pub time_zone: Tz,
    pub bind_addr: SocketAddr,
    pub edit_window_days: u32,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = FrappeConfig::default();
        let or_default = |key: &str, default: String| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or(default)
        };

        let base_url = lookup("FRAPPE_BASE_URL")
            .map(|value| value.trim().trim_end_matches('/').to_string())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| anyhow!("FRAPPE_BASE_URL must be set"))?;
        url::Url::parse(&base_url)
            .with_context(|| format!("Invalid FRAPPE_BASE_URL value: {}", base_url))?;

        let timeout_secs = or_default("FRAPPE_TIMEOUT_SECS", defaults.timeout_secs.to_string())
            .parse()
            .unwrap_or(defaults.timeout_secs);

        let frappe = FrappeConfig {
            base_url,
            timeout_secs,
            checkin_doctype: or_default("FRAPPE_CHECKIN_DOCTYPE", defaults.checkin_doctype),
            attendance_doctype: or_default(
                "FRAPPE_ATTENDANCE_DOCTYPE",
                defaults.attendance_doctype,
            ),
            wfh_doctype: or_default("FRAPPE_WFH_DOCTYPE", defaults.wfh_doctype),
            od_doctype: or_default("FRAPPE_OD_DOCTYPE", defaults.od_doctype),
        };

        let time_zone_name = or_default("APP_TIMEZONE", "UTC".to_string());
        let time_zone: Tz = time_zone_name
            .parse()
            .map_err(|_| anyhow!("Invalid APP_TIMEZONE value: {}", time_zone_name))?;

        let bind_addr_raw = or_default("BIND_ADDR", "0.0.0.0:3000".to_string());
        let bind_addr: SocketAddr = bind_addr_raw
            .parse()
            .with_context(|| format!("Invalid BIND_ADDR value: {}", bind_addr_raw))?;

        let edit_window_days = or_default("EDIT_WINDOW_DAYS", DEFAULT_EDIT_WINDOW_DAYS.to_string())
            .parse::<u32>()
            .ok()
            .filter(|days| *days >= 1)
            .unwrap_or(DEFAULT_EDIT_WINDOW_DAYS);

        Ok(Config {
            frappe,
            time_zone,
            bind_addr,
            edit_window_days,
        })
    }

    pub fn edit_window(&self) -> EditWindow {
        EditWindow::new(self.edit_window_days)
    }
}
