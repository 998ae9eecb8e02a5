//! Backend process management
//!
//! The backend bridge is a child process that reads one request per line on
//! stdin and answers one response per line on stdout.

use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, oneshot, Notify};

use super::commands::{CommandSender, RequestTracker};
use super::protocol::{log_backend_event, parse_backend_message, BackendMessage};
use psidb_core::prelude::*;

/// How long `shutdown()` waits for the backend to exit after stdin closes
const GRACEFUL_EXIT_WAIT: Duration = Duration::from_secs(2);

/// Manages a psidb backend child process.
///
/// The `Child` handle is moved into a dedicated `wait_for_exit` task. When the
/// child exits, every request still waiting for an answer is cancelled so no
/// caller blocks on a dead backend.
pub struct BackendProcess {
    /// Sender for stdin lines; dropped on shutdown to close the pipe
    stdin_tx: Option<mpsc::Sender<String>>,
    /// Tracker shared with the stdout reader
    tracker: Arc<RequestTracker>,
    /// Process ID for logging
    pid: Option<u32>,
    /// One-shot sender that tells the wait task to force-kill the process.
    kill_tx: Option<oneshot::Sender<()>>,
    /// Set to `true` by the wait task once the child has exited.
    exited: Arc<AtomicBool>,
    /// Notified by the wait task immediately after the child exits.
    exit_notify: Arc<Notify>,
}

impl BackendProcess {
    /// Spawn the backend executable with the given arguments
    pub fn spawn(program: &str, args: &[String]) -> Result<Self> {
        let resolved =
            which::which(program).map_err(|_| Error::backend_not_found(program.to_string()))?;

        info!("Spawning psidb backend: {} {}", resolved.display(), args.join(" "));

        let mut child = Command::new(&resolved)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::backend_not_found(program.to_string())
                } else {
                    Error::ProcessSpawn {
                        reason: e.to_string(),
                    }
                }
            })?;

        let pid = child.id();
        info!("psidb backend started with PID: {:?}", pid);

        let missing = |stream: &str| Error::ProcessSpawn {
            reason: format!("{} was not captured", stream),
        };
        let stdin = child.stdin.take().ok_or_else(|| missing("stdin"))?;
        let stdout = child.stdout.take().ok_or_else(|| missing("stdout"))?;
        let stderr = child.stderr.take().ok_or_else(|| missing("stderr"))?;

        let tracker = Arc::new(RequestTracker::new());

        let (stdin_tx, stdin_rx) = mpsc::channel::<String>(32);
        tokio::spawn(Self::stdin_writer(stdin, stdin_rx));
        tokio::spawn(Self::stdout_reader(stdout, Arc::clone(&tracker)));
        tokio::spawn(Self::stderr_reader(stderr));

        let exited = Arc::new(AtomicBool::new(false));
        let exit_notify = Arc::new(Notify::new());
        let (kill_tx, kill_rx) = oneshot::channel::<()>();

        tokio::spawn(Self::wait_for_exit(
            child,
            kill_rx,
            Arc::clone(&tracker),
            Arc::clone(&exited),
            Arc::clone(&exit_notify),
        ));

        Ok(Self {
            stdin_tx: Some(stdin_tx),
            tracker,
            pid,
            kill_tx: Some(kill_tx),
            exited,
            exit_notify,
        })
    }

    /// Background task: owns `child`, waits for it to exit, cancels pending requests.
    async fn wait_for_exit(
        mut child: Child,
        kill_rx: oneshot::Receiver<()>,
        tracker: Arc<RequestTracker>,
        exited: Arc<AtomicBool>,
        exit_notify: Arc<Notify>,
    ) {
        tokio::select! {
            result = child.wait() => {
                match result {
                    Ok(status) => info!("psidb backend exited with status: {:?}", status),
                    Err(e) => error!("Error waiting for psidb backend: {}", e),
                }
            }
            _ = kill_rx => {
                info!("Kill signal received, force-killing psidb backend");
                if let Err(e) = child.kill().await {
                    error!("Failed to kill psidb backend: {}", e);
                }
                if let Err(e) = child.wait().await {
                    error!("Error waiting after kill: {}", e);
                }
            }
        }

        // Close the tracker first so `has_exited()` implies new requests fail
        tracker.cancel_all().await;
        exited.store(true, Ordering::Release);
        exit_notify.notify_waiters();
    }

    /// Read stdout lines and route responses to waiting callers
    async fn stdout_reader(stdout: tokio::process::ChildStdout, tracker: Arc<RequestTracker>) {
        let mut reader = BufReader::new(stdout).lines();

        while let Ok(Some(line)) = reader.next_line().await {
            trace!("stdout: {}", line);
            route_stdout_line(&tracker, &line).await;
        }

        info!("stdout reader finished, backend likely exiting");
    }

    /// Read stderr lines into the log
    async fn stderr_reader(stderr: tokio::process::ChildStderr) {
        let mut reader = BufReader::new(stderr).lines();

        while let Ok(Some(line)) = reader.next_line().await {
            warn!("backend stderr: {}", line);
        }

        debug!("stderr reader finished");
    }

    /// Write request lines to stdin
    async fn stdin_writer(mut stdin: tokio::process::ChildStdin, mut rx: mpsc::Receiver<String>) {
        while let Some(line) = rx.recv().await {
            debug!("Sending to backend: {}", line);

            if let Err(e) = stdin.write_all(line.as_bytes()).await {
                error!("Failed to write to stdin: {}", e);
                break;
            }
            if let Err(e) = stdin.write_all(b"\n").await {
                error!("Failed to write newline: {}", e);
                break;
            }
            if let Err(e) = stdin.flush().await {
                error!("Failed to flush stdin: {}", e);
                break;
            }
        }

        debug!("stdin writer finished");
    }

    /// Create a command sender for this process
    pub fn command_sender(&self) -> Result<CommandSender> {
        let stdin_tx = self.stdin_tx.clone().ok_or(Error::ChannelClosed)?;
        Ok(CommandSender::new(stdin_tx, Arc::clone(&self.tracker)))
    }

    /// Gracefully shut the backend down.
    ///
    /// Closes stdin (the bridge exits at EOF), waits briefly, then kills.
    /// Senders cloned from this process keep the pipe open until dropped.
    pub async fn shutdown(&mut self) -> Result<()> {
        if self.has_exited() {
            info!("psidb backend already exited, skipping shutdown");
            return Ok(());
        }

        info!("Shutting down psidb backend");
        self.stdin_tx = None;

        let notified = self.exit_notify.notified();
        if self.has_exited() {
            return Ok(());
        }

        match tokio::time::timeout(GRACEFUL_EXIT_WAIT, notified).await {
            Ok(()) => {
                info!("psidb backend exited gracefully");
                Ok(())
            }
            Err(_) => {
                warn!("Timeout waiting for graceful exit, force killing");
                self.force_kill();
                Ok(())
            }
        }
    }

    fn force_kill(&mut self) {
        if let Some(tx) = self.kill_tx.take() {
            let _ = tx.send(());
        }
    }

    /// Check if the process has already exited.
    pub fn has_exited(&self) -> bool {
        self.exited.load(Ordering::Acquire)
    }
}

impl Drop for BackendProcess {
    fn drop(&mut self) {
        if !self.has_exited() {
            debug!(
                "BackendProcess (PID {:?}) dropped while process may still be running",
                self.pid
            );
            self.force_kill();
        }
    }
}

/// Route one stdout line: responses go to the tracker, events to the log
pub async fn route_stdout_line(tracker: &RequestTracker, line: &str) {
    let Some(message) = parse_backend_message(line) else {
        debug!("Ignoring non-protocol backend output: {}", line);
        return;
    };
    trace!("backend {}", message.summary());

    match message {
        BackendMessage::Response { id, result, error } => {
            if !tracker.handle_response(id, result, error).await {
                warn!("Response #{} did not match any pending request", id);
            }
        }
        BackendMessage::Event { name, params } => log_backend_event(&name, &params),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_missing_executable() {
        let result = BackendProcess::spawn("psidb-backend-that-does-not-exist", &[]);
        assert!(matches!(result, Err(Error::BackendNotFound { .. })));
    }

    #[tokio::test]
    async fn test_route_response_line() {
        let tracker = RequestTracker::new();
        let (id, rx) = tracker.register("test").await.unwrap();

        route_stdout_line(&tracker, &format!("[{{\"id\":{},\"result\":false}}]", id)).await;

        let response = rx.await.unwrap();
        assert_eq!(response.as_bool(), Some(false));
    }

    #[tokio::test]
    async fn test_route_ignores_events_and_noise() {
        let tracker = RequestTracker::new();
        let (_id, _rx) = tracker.register("test").await.unwrap();

        route_stdout_line(&tracker, r#"{"event":"log","params":{"message":"hi"}}"#).await;
        route_stdout_line(&tracker, "plain text output").await;

        assert_eq!(tracker.pending_count().await, 1);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_live_process_routes_echoed_line() {
        // `cat` echoes the request back; it carries an id but no result
        let mut process = BackendProcess::spawn("cat", &[]).unwrap();
        let sender = process.command_sender().unwrap();

        let response = sender
            .send(&crate::commands::BackendCommand::IsDbLoaded)
            .await
            .unwrap();
        assert!(response.success);
        assert_eq!(response.as_bool(), None);

        drop(sender);
        process.shutdown().await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exit_cancels_pending_requests() {
        let mut process = BackendProcess::spawn("sleep", &["5".to_string()]).unwrap();
        let sender = process.command_sender().unwrap();

        let pending = tokio::spawn(async move {
            sender
                .send(&crate::commands::BackendCommand::IsDbLoaded)
                .await
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        process.force_kill();

        let response = pending.await.unwrap().unwrap();
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("Request cancelled"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_send_after_exit_fails_fast() {
        let mut process = BackendProcess::spawn("true", &[]).unwrap();
        let sender = process.command_sender().unwrap();

        tokio::time::timeout(Duration::from_secs(3), async {
            while !process.has_exited() {
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
        })
        .await
        .expect("`true` should exit immediately");

        let result = tokio::time::timeout(
            Duration::from_secs(3),
            sender.send(&crate::commands::BackendCommand::IsDbLoaded),
        )
        .await
        .expect("send to an exited backend must not hang");

        assert!(matches!(result, Err(Error::BackendExited)));
    }
}
