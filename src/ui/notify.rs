/// User-facing message presentation. Domain warnings and generic failures go
/// through here; they are outcomes, not errors, and never unwind.
pub trait Notifier {
    fn warn(&mut self, msg: &str);
    fn error(&mut self, msg: &str);
}

/// Prints to stderr, outside the alternate screen.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn warn(&mut self, msg: &str) {
        eprintln!("\x1b[33m{}\x1b[0m", msg);
    }

    fn error(&mut self, msg: &str) {
        eprintln!("\x1b[31mError: {}\x1b[0m", msg);
    }
}
