use std::sync::{Arc, Mutex, MutexGuard};

/// Where a runtime's printed text goes.
///
/// Outside a capture, lines go to the application log. While an
/// [`OutputCapture`] is alive they accumulate in its buffer instead.
#[derive(Debug, Clone, Default)]
pub struct OutputChannel {
    buffer: Arc<Mutex<Option<String>>>,
}

impl OutputChannel {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<String>> {
        // A panic while holding the lock only ever leaves a partial buffer
        self.buffer.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Write one printed line
    pub fn write_line(&self, text: &str) {
        let mut buffer = self.lock();
        match buffer.as_mut() {
            Some(buf) => {
                buf.push_str(text);
                buf.push('\n');
            }
            None => tracing::info!(target: "scratch::script", "{}", text),
        }
    }

    /// Redirect output into a fresh buffer until the returned guard drops
    pub fn capture(&self) -> OutputCapture<'_> {
        let previous = self.lock().replace(String::new());
        OutputCapture {
            channel: self,
            previous,
        }
    }

    #[cfg(test)]
    pub fn is_capturing(&self) -> bool {
        self.lock().is_some()
    }
}

/// Scoped redirection of an [`OutputChannel`].
///
/// Dropping the guard restores whatever the channel was doing before,
/// whether the run finished, failed or panicked.
pub struct OutputCapture<'a> {
    channel: &'a OutputChannel,
    previous: Option<String>,
}

impl OutputCapture<'_> {
    /// Text printed since the capture began
    pub fn contents(&self) -> String {
        self.channel.lock().clone().unwrap_or_default()
    }
}

impl Drop for OutputCapture<'_> {
    fn drop(&mut self) {
        *self.channel.lock() = self.previous.take();
    }
}
