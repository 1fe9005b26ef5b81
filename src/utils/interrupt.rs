// Sun Oct 18 2026 - Alex

//! Bridges SIGINT/SIGTERM to a `CancellationToken`.
//!
//! The signal handler only stores to a static flag; a watcher thread moves the
//! flag onto the token. After the first signal the default disposition is
//! restored, so a second Ctrl-C terminates immediately.

use crate::engine::cancel::CancellationToken;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

const WATCH_INTERVAL: Duration = Duration::from_millis(50);

#[cfg(unix)]
extern "C" fn on_signal(_signum: libc::c_int) {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

#[cfg(unix)]
fn set_handlers() -> io::Result<()> {
    for signal in [libc::SIGINT, libc::SIGTERM] {
        let handler = on_signal as extern "C" fn(libc::c_int) as libc::sighandler_t;
        // SAFETY: the handler only performs an atomic store
        let previous = unsafe { libc::signal(signal, handler) };
        if previous == libc::SIG_ERR {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(())
}

#[cfg(unix)]
fn restore_default_handlers() {
    for signal in [libc::SIGINT, libc::SIGTERM] {
        // SAFETY: resetting to SIG_DFL has no preconditions
        unsafe {
            libc::signal(signal, libc::SIG_DFL);
        }
    }
}

#[cfg(not(unix))]
fn set_handlers() -> io::Result<()> {
    log::debug!(
        "Signal handling not supported on this platform, interrupts will not cancel cleanly"
    );
    Ok(())
}

#[cfg(not(unix))]
fn restore_default_handlers() {}

/// Installs the handlers and a watcher that cancels `token` on the first signal.
/// The watcher exits on its own once `token` is cancelled by anything else.
pub fn install(token: &CancellationToken) -> io::Result<()> {
    set_handlers()?;

    let token = token.clone();
    thread::Builder::new()
        .name("interrupt-watch".to_string())
        .spawn(move || {
            while !INTERRUPTED.load(Ordering::SeqCst) {
                if token.is_cancelled() {
                    return;
                }
                thread::sleep(WATCH_INTERVAL);
            }

            log::warn!("Interrupt received, cancelling run");
            restore_default_handlers();
            token.cancel();
        })?;

    Ok(())
}

pub fn was_interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watcher_stops_when_token_cancelled_elsewhere() {
        let token = CancellationToken::new();
        install(&token).unwrap();

        token.cancel();
        thread::sleep(WATCH_INTERVAL * 2);

        assert!(!was_interrupted());
        restore_default_handlers();
    }
}
