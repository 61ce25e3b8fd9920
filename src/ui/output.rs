//! Output verbosity.

use std::time::Duration;

/// Output verbosity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Everything in Normal plus the command line of each external command.
    Verbose,
    /// Status lines and external command output.
    #[default]
    Normal,
    /// Status lines only; command output still goes to the install log.
    Quiet,
}

impl OutputMode {
    /// Check if this mode echoes external command output.
    pub fn shows_command_output(&self) -> bool {
        matches!(self, Self::Verbose | Self::Normal)
    }

    /// Check if this mode echoes external command lines.
    pub fn shows_commands(&self) -> bool {
        matches!(self, Self::Verbose)
    }
}

/// Format a duration for display.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 1.0 {
        format!("{}ms", d.as_millis())
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = secs / 60.0;
        format!("{:.1}m", mins)
    }
}
