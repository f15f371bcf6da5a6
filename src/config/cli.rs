//! Command-line argument parsing

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[clap(name = "wifi-association", version, author)]
#[clap(about = "WiFi association service with a Unix socket interface")]
pub struct CliArgs {
    /// Wireless network interface name
    #[clap(short, long, default_value = "wlan0")]
    pub interface: String,

    /// Path for Unix socket
    #[clap(long, default_value = "/run/wifi-association.sock")]
    pub socket_path: String,

    /// Socket file permissions (octal, e.g., 660)
    #[clap(long, default_value = "660")]
    pub socket_mode: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let args = CliArgs::parse_from(["wifi-association"]);
        assert_eq!(args.interface, "wlan0");
        assert_eq!(args.socket_path, "/run/wifi-association.sock");
        assert_eq!(args.socket_mode, "660");
    }

    #[test]
    fn test_cli_overrides() {
        let args = CliArgs::parse_from([
            "wifi-association",
            "-i",
            "wlp2s0",
            "--socket-path",
            "/tmp/assoc.sock",
            "--socket-mode",
            "600",
        ]);
        assert_eq!(args.interface, "wlp2s0");
        assert_eq!(args.socket_path, "/tmp/assoc.sock");
        assert_eq!(args.socket_mode, "600");
    }
}
