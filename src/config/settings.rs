//! Runtime settings

use crate::config::CliArgs;

const DEFAULT_SOCKET_MODE: u32 = 0o660;

/// Runtime configuration settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub interface: String,
    pub socket_path: String,
    pub socket_mode: u32,
}

impl From<CliArgs> for Settings {
    fn from(args: CliArgs) -> Self {
        // Parse octal socket mode
        let socket_mode =
            u32::from_str_radix(&args.socket_mode, 8).unwrap_or(DEFAULT_SOCKET_MODE);

        Settings {
            interface: args.interface,
            socket_path: args.socket_path,
            socket_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_settings_parse_octal_mode() {
        let args = CliArgs::parse_from(["wifi-association", "--socket-mode", "600"]);
        let settings = Settings::from(args);
        assert_eq!(settings.socket_mode, 0o600);
    }

    #[test]
    fn test_settings_invalid_mode_falls_back() {
        let args = CliArgs::parse_from(["wifi-association", "--socket-mode", "rw-rw----"]);
        let settings = Settings::from(args);
        assert_eq!(settings.socket_mode, DEFAULT_SOCKET_MODE);
    }
}
