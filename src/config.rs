use std::io::ErrorKind;
use std::path::PathBuf;
use std::str::FromStr;
use std::{env, fs, io};

use chrono::NaiveDate;
use serde::Deserialize;

/// TOML has a native date type; serde needs a wrapper to land it in a
/// chrono date.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct TomlDate(pub NaiveDate);

impl<'de> Deserialize<'de> for TomlDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;
        let value = toml::value::Datetime::deserialize(deserializer)?;
        let date = NaiveDate::from_str(&value.to_string()).map_err(Error::custom)?;
        Ok(TomlDate(date))
    }
}

#[derive(Deserialize)]
pub struct Paths {
    pub template_dir: PathBuf,
    pub public_dir: PathBuf,
    pub db_path: PathBuf,
}

#[derive(Deserialize)]
pub struct ArchiveInfo {
    /// The only author whose posts the archive serves.
    pub author: String,
    /// Sane calendar window for scraped dates; anything outside displays
    /// as undated and is excluded from date aggregates.
    pub min_date: TomlDate,
    pub max_date: TomlDate,
}

impl ArchiveInfo {
    pub fn min_date_iso(&self) -> String {
        self.min_date.0.format("%Y-%m-%d").to_string()
    }

    pub fn max_date_iso(&self) -> String {
        self.max_date.0.format("%Y-%m-%d").to_string()
    }
}

#[derive(Deserialize)]
pub struct Defaults {
    pub page_size: u32,
}

#[derive(Deserialize)]
pub struct Server {
    pub address: String,
    pub port: u16,
}

#[derive(Deserialize)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Copy, Clone)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize)]
pub struct Config {
    pub archive: ArchiveInfo,
    pub paths: Paths,
    pub defaults: Defaults,
    pub server: Server,
    pub log: Option<Log>,
}

fn parse_path(path: PathBuf) -> PathBuf {
    if path.starts_with("${exe_dir}") {
        let cur_exe = env::current_exe().unwrap();
        let exe_dir = cur_exe.parent().unwrap().to_str().unwrap();
        let str_path = path.to_str().unwrap();
        PathBuf::from(str_path.replace("${exe_dir}", exe_dir))
    } else {
        path
    }
}

pub fn read_config(cfg_path: &PathBuf) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => {
            return Err(io::Error::new(
                e.kind(),
                format!(
                    "Error opening configuration file {}: {}",
                    cfg_path.to_str().unwrap(),
                    e
                ),
            ))
        }
    };

    let mut cfg: Config = match toml::from_str::<Config>(cfg_content.as_str()) {
        Ok(cfg) => cfg,
        Err(e) => {
            return Err(io::Error::new(
                ErrorKind::InvalidData,
                format!("Error parsing configuration file: {}", e),
            ))
        }
    };

    cfg.paths = Paths {
        template_dir: parse_path(cfg.paths.template_dir),
        public_dir: parse_path(cfg.paths.public_dir),
        db_path: parse_path(cfg.paths.db_path),
    };

    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_src = r#"
[archive]
author = "Jared Carrabis"
min_date = 2010-01-01
max_date = 2025-12-31

[paths]
template_dir = "templates"
public_dir = "public"
db_path = "archive/blogs_deploy.db"

[defaults]
page_size = 50

[server]
address = "127.0.0.1"
port = 8080

[log]
level = "Info"
log_to_console = true
"#;
        let cfg: Config = toml::from_str(toml_src).unwrap();
        assert_eq!(cfg.archive.author, "Jared Carrabis");
        assert_eq!(cfg.archive.min_date_iso(), "2010-01-01");
        assert_eq!(cfg.archive.max_date_iso(), "2025-12-31");
        assert_eq!(cfg.defaults.page_size, 50);
        assert_eq!(cfg.server.port, 8080);
        assert!(cfg.log.is_some());
    }

    #[test]
    fn test_log_section_optional() {
        let toml_src = r#"
[archive]
author = "Jared Carrabis"
min_date = 2010-01-01
max_date = 2025-12-31

[paths]
template_dir = "templates"
public_dir = "public"
db_path = "archive.db"

[defaults]
page_size = 25

[server]
address = "0.0.0.0"
port = 8080
"#;
        let cfg: Config = toml::from_str(toml_src).unwrap();
        assert!(cfg.log.is_none());
    }
}
