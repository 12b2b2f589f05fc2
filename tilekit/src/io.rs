//! Managed thread for the Tokio runtime.
//!
//! Callers of this crate are typically GUI applications without an async
//! runtime of their own, so all network transfers run on one background
//! thread owning a current-thread Tokio runtime. `fetch` calls only hand a
//! task over to it and return immediately.

pub use reqwest::header::HeaderValue;

use crate::error::Error;

/// Controls how the fetchers use the HTTP protocol.
pub struct HttpOptions {
    /// User agent to be sent to the tile servers. Most public providers
    /// require a meaningful one.
    pub user_agent: Option<HeaderValue>,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            user_agent: Some(HeaderValue::from_static(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION"),
            ))),
        }
    }
}

pub(crate) struct Runtime {
    handle: tokio::runtime::Handle,
    join_handle: Option<std::thread::JoinHandle<()>>,
    quit_tx: tokio::sync::mpsc::UnboundedSender<()>,
}

impl Runtime {
    pub fn new() -> Result<Self, Error> {
        let (quit_tx, mut quit_rx) = tokio::sync::mpsc::unbounded_channel();
        let (handle_tx, handle_rx) = std::sync::mpsc::channel();

        let join_handle = std::thread::spawn(move || {
            match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => {
                    // If the parent is gone, so is the quit channel; exit.
                    let _ = handle_tx.send(Ok(runtime.handle().clone()));
                    runtime.block_on(quit_rx.recv());
                }
                Err(error) => {
                    let _ = handle_tx.send(Err(error));
                }
            }
        });

        let handle = match handle_rx.recv() {
            Ok(Ok(handle)) => handle,
            Ok(Err(error)) => {
                let _ = join_handle.join();
                return Err(Error::Communication(format!(
                    "could not start the transfer runtime: {error}"
                )));
            }
            Err(_) => {
                let _ = join_handle.join();
                return Err(Error::Communication(
                    "could not start the transfer runtime".to_owned(),
                ));
            }
        };

        Ok(Self {
            handle,
            join_handle: Some(join_handle),
            quit_tx,
        })
    }

    /// Hand a transfer task over to the runtime thread. Never blocks.
    pub fn spawn<F>(&self, future: F)
    where
        F: std::future::Future + Send + 'static,
        F::Output: Send,
    {
        self.handle.spawn(future);
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        // Tokio thread might be dead, nothing to do in this case.
        let _ = self.quit_tx.send(());

        if let Some(join_handle) = self.join_handle.take() {
            log::debug!("Waiting for the Tokio thread to exit.");
            // Again, Tokio thread might be already dead, nothing to do in this case.
            let _ = join_handle.join();
        }

        log::debug!("Tokio thread is down.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_starts_and_runs_spawned_tasks() {
        let runtime = Runtime::new().unwrap();

        let (tx, rx) = std::sync::mpsc::channel();
        runtime.spawn(async move {
            let _ = tx.send(());
        });

        rx.recv_timeout(std::time::Duration::from_secs(5)).unwrap();
    }
}
