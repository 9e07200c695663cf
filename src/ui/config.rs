use serde::Deserialize;
use std::path::PathBuf;
use std::sync::OnceLock;
use strum_macros::{Display, EnumString, IntoStaticStr};

/// Pointer width of the debugged target. Drives the register display padding
/// and the function table slot stride.
#[derive(Copy, Clone, PartialEq, Debug, EnumString, Display, IntoStaticStr, Deserialize)]
pub enum WordWidth {
    #[strum(serialize = "32")]
    #[serde(rename = "32")]
    Bits32,
    #[strum(serialize = "64")]
    #[serde(rename = "64")]
    Bits64,
}

impl WordWidth {
    /// Zero padding of register values, in hex digits.
    pub fn hex_digits(self) -> usize {
        match self {
            WordWidth::Bits32 => 8,
            WordWidth::Bits64 => 16,
        }
    }

    /// Pointer size in bytes.
    pub fn pointer_bytes(self) -> usize {
        match self {
            WordWidth::Bits32 => 4,
            WordWidth::Bits64 => 8,
        }
    }
}

/// Application user interface config.
#[derive(Debug)]
pub struct UIConfig {
    pub word_width: WordWidth,
    /// Render panels with ANSI colors.
    pub colors: bool,
}

/// Read-only ui configuration (set only once, at session start).
static CONFIG: OnceLock<UIConfig> = OnceLock::new();

/// Set initial configuration.
pub fn set(config: UIConfig) {
    CONFIG.set(config).expect("should called once");
}

/// Return application ui config.
pub fn current() -> &'static UIConfig {
    CONFIG.get().expect("should already be set")
}

/// Colors are off until a configuration is installed, which keeps everything
/// rendered inside unit tests plain.
pub fn colors_enabled() -> bool {
    CONFIG.get().map(|c| c.colors).unwrap_or(false)
}

/// Optional settings file, `~/.config/jns/config.toml`. Command line flags win
/// over it.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub gdb: Option<String>,
    pub word_width: Option<WordWidth>,
    pub colors: Option<bool>,
}

impl FileConfig {
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };
        let Ok(raw) = std::fs::read_to_string(&path) else {
            return Self::default();
        };
        match toml::from_str(&raw) {
            Ok(config) => config,
            Err(e) => {
                log::warn!(target: "jns", "ignore malformed config {}: {e}", path.display());
                Self::default()
            }
        }
    }

    fn path() -> Option<PathBuf> {
        Some(home::home_dir()?.join(".config").join("jns").join("config.toml"))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_word_width_geometry() {
        assert_eq!(WordWidth::Bits32.hex_digits(), 8);
        assert_eq!(WordWidth::Bits32.pointer_bytes(), 4);
        assert_eq!(WordWidth::Bits64.hex_digits(), 16);
        assert_eq!(WordWidth::Bits64.pointer_bytes(), 8);
    }

    #[test]
    fn test_word_width_parsing() {
        use std::str::FromStr;
        assert_eq!(WordWidth::from_str("32").unwrap(), WordWidth::Bits32);
        assert_eq!(WordWidth::from_str("64").unwrap(), WordWidth::Bits64);
        assert!(WordWidth::from_str("16").is_err());
    }

    #[test]
    fn test_file_config_parsing() {
        let config: FileConfig =
            toml::from_str("gdb = \"arm-none-eabi-gdb\"\nword_width = \"32\"\ncolors = false")
                .unwrap();
        assert_eq!(
            config,
            FileConfig {
                gdb: Some("arm-none-eabi-gdb".to_string()),
                word_width: Some(WordWidth::Bits32),
                colors: Some(false),
            }
        );

        let empty: FileConfig = toml::from_str("").unwrap();
        assert_eq!(empty, FileConfig::default());

        assert!(toml::from_str::<FileConfig>("no_such_key = 1").is_err());
    }
}
