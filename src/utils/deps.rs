use std::process::{Command, Stdio};

/// Check if the ffprobe executable can be run
pub fn ffprobe_available(ffprobe_path: &str) -> bool {
    check_command(ffprobe_path, &["-version"])
}

/// Check if a command is available
fn check_command(cmd: &str, args: &[&str]) -> bool {
    Command::new(cmd)
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_command() {
        assert!(!ffprobe_available("flightmeta-no-such-ffprobe"));
    }
}
