// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Routes OS signals to the line editor while a console read can be outstanding.
//!
//! The signals in [`ROUTED_SIGNALS`] are registered once per process, on the first
//! [`SignalRouter::install()`], and are received by a single background thread from then
//! on. While a router is installed, none of the disruptive signals stop the process.
//! Instead the partially typed line is thrown away and the terminal is left in a clean
//! state. While no router is installed, that thread gives each signal its default action
//! (terminate, stop, ignore) as if it had never been registered.

use std::{ffi::c_int,
          io::{self, Write}};

use strum_macros::Display;

use super::SafePromptState;
use crate::{OutputDevice, SharedLineEditorControl, lock_output_device_as_mut, ok};

/// How the console reacts to a signal.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Display)]
pub enum SignalClass {
    /// Discard the partial line and restore the terminal.
    Disruptive,
    /// The terminal changed size.
    Informational,
}

impl SignalClass {
    /// Signals that are not routed return `None`.
    #[cfg(unix)]
    #[must_use]
    pub fn classify(signal: c_int) -> Option<Self> {
        use signal_hook::consts::signal::{SIGALRM, SIGHUP, SIGINT, SIGQUIT, SIGTERM, SIGTSTP,
                                          SIGTTIN, SIGTTOU, SIGWINCH};
        match signal {
            SIGINT | SIGQUIT | SIGTERM | SIGALRM | SIGTSTP | SIGTTIN | SIGTTOU | SIGHUP => {
                Some(Self::Disruptive)
            }
            SIGWINCH => Some(Self::Informational),
            _ => None,
        }
    }

    #[cfg(not(unix))]
    #[must_use]
    pub fn classify(_signal: c_int) -> Option<Self> { None }
}

/// Every signal the router listens for.
#[cfg(unix)]
pub const ROUTED_SIGNALS: [c_int; 9] = {
    use signal_hook::consts::signal::{SIGALRM, SIGHUP, SIGINT, SIGQUIT, SIGTERM, SIGTSTP,
                                      SIGTTIN, SIGTTOU, SIGWINCH};
    [
        SIGINT, SIGQUIT, SIGTERM, SIGALRM, SIGTSTP, SIGTTIN, SIGTTOU, SIGHUP, SIGWINCH,
    ]
};

/// Applies one signal to the line editor, holding the [`OutputDevice`] lock throughout.
///
/// # Errors
///
/// If writing to the terminal fails.
///
/// # Panics
///
/// If the prompt state lock is poisoned.
#[allow(clippy::unwrap_in_result)] /* This is for lock.unwrap() */
pub fn route_signal(
    signal_class: SignalClass,
    controls: &SharedLineEditorControl,
    output_device: &OutputDevice,
    prompt_state: &SafePromptState,
) -> io::Result<()> {
    let term = lock_output_device_as_mut!(output_device);
    match signal_class {
        SignalClass::Disruptive => {
            let visible = prompt_state.lock().unwrap().visible;
            // Erases every row of the prompt and line before dropping the text.
            controls.discard_current_line(term)?;
            if visible {
                controls.redraw(term)?;
            }
        }
        SignalClass::Informational => controls.recompute_geometry(term)?,
    }
    term.flush()?;
    ok!()
}

#[cfg(unix)]
mod signal_thread {
    use std::{ffi::c_int,
              io,
              sync::atomic::{AtomicU64, Ordering}};

    use super::{SafePromptState, SignalClass, route_signal};
    use crate::{OutputDevice, SharedLineEditorControl, StdMutex};

    /// Where the signal thread sends what it receives.
    pub struct RouteTarget {
        pub controls: SharedLineEditorControl,
        pub output_device: OutputDevice,
        pub prompt_state: SafePromptState,
    }

    /// The installed router's id and target. Empty when no router is installed.
    static ROUTE_TARGET: StdMutex<Option<(u64, RouteTarget)>> = StdMutex::new(None);

    static NEXT_ROUTER_ID: AtomicU64 = AtomicU64::new(0);

    static IS_THREAD_STARTED: StdMutex<bool> = StdMutex::new(false);

    /// Registers [`super::ROUTED_SIGNALS`] and starts the thread that receives them, unless
    /// that already happened.
    ///
    /// # Panics
    ///
    /// If the started flag lock is poisoned.
    #[allow(clippy::unwrap_in_result)] /* This is for lock.unwrap() */
    pub fn ensure_started() -> io::Result<()> {
        let mut is_started = IS_THREAD_STARTED.lock().unwrap();
        if *is_started {
            return Ok(());
        }

        let mut signals = signal_hook::iterator::Signals::new(super::ROUTED_SIGNALS)?;
        std::thread::Builder::new()
            .name("console-signal-router".into())
            .spawn(move || {
                for signal in signals.forever() {
                    dispatch(signal);
                }
            })?;

        *is_started = true;
        Ok(())
    }

    /// # Panics
    ///
    /// If the route target lock is poisoned.
    pub fn set_target(target: RouteTarget) -> u64 {
        let id = NEXT_ROUTER_ID.fetch_add(1, Ordering::SeqCst);
        *ROUTE_TARGET.lock().unwrap() = Some((id, target));
        id
    }

    /// Clears the target, unless another router has replaced it since `id` was set.
    ///
    /// # Panics
    ///
    /// If the route target lock is poisoned.
    pub fn clear_target(id: u64) {
        let mut route_target = ROUTE_TARGET.lock().unwrap();
        if matches!(route_target.as_ref(), Some((current_id, _)) if *current_id == id) {
            *route_target = None;
        }
    }

    /// Routes `signal` to the installed router, or gives it its default action when none is
    /// installed. The target stays locked while routing, so nothing is routed once
    /// [`clear_target()`] has returned.
    ///
    /// # Panics
    ///
    /// If the route target lock is poisoned.
    fn dispatch(signal: c_int) {
        let Some(signal_class) = SignalClass::classify(signal) else {
            return;
        };

        let maybe_result = {
            let route_target = ROUTE_TARGET.lock().unwrap();
            route_target.as_ref().map(|(_, target)| {
                route_signal(
                    signal_class,
                    &target.controls,
                    &target.output_device,
                    &target.prompt_state,
                )
            })
        };

        // Log only once the terminal lock is released.
        match maybe_result {
            Some(result) => {
                tracing::debug!(
                    message = "signal router: routed",
                    signal,
                    %signal_class,
                    ?result
                );
            }
            None => {
                tracing::debug!(
                    message = "signal router: not installed, default action",
                    signal,
                    %signal_class
                );
                if let Err(error) = signal_hook::low_level::emulate_default_handler(signal) {
                    tracing::warn!(
                        message = "signal router: default action failed",
                        signal,
                        ?error
                    );
                }
            }
        }
    }
}

/// Hands the signals in [`ROUTED_SIGNALS`] to [`route_signal()`] for as long as it is
/// installed. At most one router is installed at a time, installing a new one replaces
/// the previous one.
///
/// [`SignalRouter::uninstall()`] (or dropping the router) stops the routing. From then on
/// every routed signal gets its default action again, so SIGINT and SIGTERM terminate
/// the process and SIGTSTP stops it.
#[cfg(unix)]
#[derive(Debug)]
pub struct SignalRouter {
    id: u64,
}

#[cfg(unix)]
impl SignalRouter {
    /// # Errors
    ///
    /// If the signal handlers can't be registered or the thread can't be spawned.
    pub fn install(
        controls: SharedLineEditorControl,
        output_device: OutputDevice,
        prompt_state: SafePromptState,
    ) -> io::Result<Self> {
        signal_thread::ensure_started()?;
        let id = signal_thread::set_target(signal_thread::RouteTarget {
            controls,
            output_device,
            prompt_state,
        });
        Ok(Self { id })
    }

    /// Stops routing. No signal is routed to this router once this returns.
    pub fn uninstall(self) { drop(self); }
}

#[cfg(unix)]
impl Drop for SignalRouter {
    fn drop(&mut self) { signal_thread::clear_target(self.id); }
}

/// Signals are not routed on this platform.
#[cfg(not(unix))]
#[derive(Debug)]
pub struct SignalRouter;

#[cfg(not(unix))]
impl SignalRouter {
    /// # Errors
    ///
    /// Never.
    pub fn install(
        _controls: SharedLineEditorControl,
        _output_device: OutputDevice,
        _prompt_state: SafePromptState,
    ) -> io::Result<Self> {
        Ok(Self)
    }

    pub fn uninstall(self) {}
}
