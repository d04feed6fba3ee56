// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{io, thread, time::Duration};

use tokio::sync::{mpsc, oneshot};

use super::SafePromptState;
use crate::{LineEditor, OutputDevice, ReadLineOutcome, SharedLineEditorControl,
            TerminationFlag, lock_output_device_as_mut};

/// How long [`LineReaderHandle::shutdown()`] waits for the reader thread. A read from a
/// pipe can't be interrupted, in that case the thread is left behind.
pub const READER_SHUTDOWN_TIMEOUT: Duration = Duration::from_millis(500);

/// What the reader thread hands to the console loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineDelivery {
    /// A trimmed line. It may be empty.
    Line(String),
    EndOfInput,
}

/// The console loop's side of the reader thread. Deliveries arrive on `line_receiver`
/// one at a time, and the next read only starts after [`LineReaderHandle::acknowledge()`].
#[allow(missing_debug_implementations)]
pub struct LineReaderHandle {
    pub line_receiver: mpsc::Receiver<LineDelivery>,
    ack_sender: mpsc::Sender<()>,
    controls: SharedLineEditorControl,
    finished_receiver: oneshot::Receiver<()>,
}

/// The parts of the console the reader thread needs.
#[allow(missing_debug_implementations)]
pub struct LineReaderArgs {
    pub editor: Box<dyn LineEditor>,
    pub prompt: String,
    pub output_device: OutputDevice,
    pub prompt_state: SafePromptState,
    pub termination_flag: TerminationFlag,
}

/// Starts the thread that performs every blocking read for the console.
///
/// # Errors
///
/// If the thread can't be spawned.
pub fn spawn_line_reader(args: LineReaderArgs) -> io::Result<LineReaderHandle> {
    let (line_sender, line_receiver) = mpsc::channel::<LineDelivery>(1);
    let (ack_sender, ack_receiver) = mpsc::channel::<()>(1);
    let (finished_sender, finished_receiver) = oneshot::channel::<()>();
    let controls = args.editor.controls();

    thread::Builder::new()
        .name("console-line-reader".into())
        .spawn(move || {
            run_line_reader(args, &line_sender, ack_receiver);
            let _ = finished_sender.send(());
        })?;

    Ok(LineReaderHandle {
        line_receiver,
        ack_sender,
        controls,
        finished_receiver,
    })
}

fn run_line_reader(
    args: LineReaderArgs,
    line_sender: &mpsc::Sender<LineDelivery>,
    mut ack_receiver: mpsc::Receiver<()>,
) {
    let LineReaderArgs {
        mut editor,
        prompt,
        output_device,
        prompt_state,
        termination_flag,
    } = args;
    let controls = editor.controls();

    let set_visible = |visible: bool| {
        let _term = lock_output_device_as_mut!(output_device);
        if let Ok(mut prompt_state) = prompt_state.lock() {
            prompt_state.visible = visible;
        }
    };

    loop {
        // The prompt counts as visible before the termination flag is looked at.
        set_visible(true);
        if termination_flag.is_set() {
            break;
        }

        let outcome = editor.read_line(&prompt);
        set_visible(false);

        match outcome {
            ReadLineOutcome::Line(line) => {
                let line = line.trim().to_string();
                if !line.is_empty() {
                    controls.add_history(&line);
                }
                if line_sender.blocking_send(LineDelivery::Line(line)).is_err() {
                    break;
                }
                // The console loop is gone when this is None.
                if ack_receiver.blocking_recv().is_none() {
                    break;
                }
            }
            ReadLineOutcome::EndOfInput => {
                let _ = line_sender.blocking_send(LineDelivery::EndOfInput);
                break;
            }
            ReadLineOutcome::Cancelled => break,
        }
    }

    set_visible(false);
    tracing::debug!(message = "line reader: exit");
}

impl LineReaderHandle {
    /// Lets the reader start its next read.
    pub fn acknowledge(&self) {
        // The reader consumes each ack before it delivers again, so there is always room.
        let _ = self.ack_sender.try_send(());
    }

    /// Makes the read in progress give up.
    pub fn cancel(&self) { self.controls.cancel(); }

    /// Cancels the reader and waits, up to [`READER_SHUTDOWN_TIMEOUT`], for its thread to
    /// exit. Returns `false` if it did not.
    pub async fn shutdown(self) -> bool {
        let Self {
            mut line_receiver,
            ack_sender,
            controls,
            finished_receiver,
        } = self;
        controls.cancel();
        line_receiver.close();
        drop(ack_sender);
        tokio::time::timeout(READER_SHUTDOWN_TIMEOUT, finished_receiver)
            .await
            .is_ok()
    }
}
