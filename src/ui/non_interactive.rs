//! Non-interactive UI for CI/headless environments.

use super::theme::EnvkitTheme;
use super::{OutputMode, SpinnerHandle, UserInterface};

/// UI implementation for non-interactive mode.
///
/// Output is plain text on stdout, one line per call, so error lines stay
/// inside the section they belong to when the output is piped. Spinners are
/// replaced by a single line announcing the operation.
pub struct NonInteractiveUI {
    mode: OutputMode,
    theme: EnvkitTheme,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            theme: EnvkitTheme::plain(),
        }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        println!("{}", msg);
    }

    fn success(&mut self, msg: &str) {
        println!("{}", self.theme.format_success(msg));
    }

    fn warning(&mut self, msg: &str) {
        println!("{}", self.theme.format_warning(msg));
    }

    fn error(&mut self, msg: &str) {
        println!("{}", self.theme.format_error(msg));
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if !crate::shell::is_ci() {
            println!("  {}", message);
        }
        Box::new(NoopSpinner)
    }

    fn show_header(&mut self, title: &str) {
        println!("\n{}", self.theme.format_header(title));
    }

    fn show_hint(&mut self, hint: &str) {
        println!("  {}", self.theme.format_hint(hint));
    }
}

/// Spinner that does nothing (for non-interactive mode).
struct NoopSpinner;

impl SpinnerHandle for NoopSpinner {
    fn clear(&mut self) {}
}
