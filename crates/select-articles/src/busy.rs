use shared::render::GENERATING_SUMMARIES;
use shared::{render, SummariesPanel, UiState};
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

const FRAMES: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];
const FRAME_INTERVAL: Duration = Duration::from_millis(100);
const CLEAR_LINE: &str = "\r\x1b[2K";

fn is_busy(state: &UiState) -> bool {
    render(state).summaries == SummariesPanel::Busy
}

/// The spinner line and whether it is currently on screen
struct Canvas<W> {
    out: W,
    frame: usize,
    drawn: bool,
}

impl<W: Write> Canvas<W> {
    fn tick(&mut self, busy: bool) {
        if !busy {
            self.clear();
            return;
        }
        let _ = write!(
            self.out,
            "\r{} {}",
            FRAMES[self.frame % FRAMES.len()],
            GENERATING_SUMMARIES
        );
        let _ = self.out.flush();
        self.frame += 1;
        self.drawn = true;
    }

    fn clear(&mut self) {
        if self.drawn {
            let _ = write!(self.out, "{}", CLEAR_LINE);
            let _ = self.out.flush();
            self.drawn = false;
        }
    }
}

/// Animated spinner shown while the rendered page has a busy summaries panel.
///
/// Frames are drawn under the same lock `clear` takes, and the busy check is
/// made while holding it, so once the state has left the busy phase and
/// `clear` returned, no frame is left on screen.
pub struct BusyIndicator<W> {
    canvas: Arc<Mutex<Canvas<W>>>,
}

impl<W> Clone for BusyIndicator<W> {
    fn clone(&self) -> Self {
        Self {
            canvas: Arc::clone(&self.canvas),
        }
    }
}

impl<W: Write + Send + 'static> BusyIndicator<W> {
    pub fn new(out: W) -> Self {
        Self {
            canvas: Arc::new(Mutex::new(Canvas {
                out,
                frame: 0,
                drawn: false,
            })),
        }
    }

    /// Animate for as long as `states` is busy. Exits when the client is dropped.
    pub fn spawn(&self, mut states: watch::Receiver<UiState>) -> JoinHandle<()> {
        let indicator = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(FRAME_INTERVAL);

            loop {
                tokio::select! {
                    changed = states.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                    _ = ticker.tick() => {}
                }

                {
                    let mut canvas = indicator.lock();
                    let busy = is_busy(&states.borrow_and_update());
                    canvas.tick(busy);
                }
            }

            indicator.clear();
        })
    }

    /// Erase the spinner line if a frame is showing. Call before printing
    /// anything else to the terminal.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Canvas<W>> {
        self.canvas.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Article, SelectionForm};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn form() -> SelectionForm {
        SelectionForm::new(vec![Article::new("1", "One")])
    }

    // ==================== Canvas Tests ====================

    #[test]
    fn test_tick_draws_then_clears_once() {
        let buffer = SharedBuffer::default();
        let mut canvas = Canvas {
            out: buffer.clone(),
            frame: 0,
            drawn: false,
        };

        canvas.tick(true);
        assert_eq!(buffer.contents(), format!("\r⠋ {}", GENERATING_SUMMARIES));

        canvas.tick(false);
        assert!(buffer.contents().ends_with(CLEAR_LINE));

        let before = buffer.contents();
        canvas.tick(false);
        canvas.clear();
        assert_eq!(buffer.contents(), before);
    }

    #[test]
    fn test_idle_state_draws_nothing() {
        let buffer = SharedBuffer::default();
        let mut canvas = Canvas {
            out: buffer.clone(),
            frame: 0,
            drawn: false,
        };

        canvas.tick(is_busy(&UiState::SummariesReady {
            form: form(),
            results: vec![],
        }));
        assert_eq!(buffer.contents(), "");
    }

    // ==================== Indicator Tests ====================

    #[tokio::test]
    async fn test_clear_after_leaving_loading_removes_spinner() {
        let buffer = SharedBuffer::default();
        let indicator = BusyIndicator::new(buffer.clone());
        let (states, receiver) = watch::channel(UiState::Idle);
        let handle = indicator.spawn(receiver);

        states.send_replace(UiState::SummariesLoading(form()));
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(buffer.contents().contains(GENERATING_SUMMARIES));

        states.send_replace(UiState::SummariesError {
            form: form(),
            reason: "boom".into(),
        });
        indicator.clear();
        let after_clear = buffer.contents();
        assert!(after_clear.ends_with(CLEAR_LINE));

        // The spinner task must not draw again once the state is settled
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(buffer.contents(), after_clear);

        drop(states);
        handle.await.unwrap();
        assert_eq!(buffer.contents(), after_clear);
    }

    #[tokio::test]
    async fn test_task_exits_when_client_is_dropped() {
        let buffer = SharedBuffer::default();
        let indicator = BusyIndicator::new(buffer.clone());
        let (states, receiver) = watch::channel(UiState::SummariesLoading(form()));
        let handle = indicator.spawn(receiver);

        tokio::time::sleep(Duration::from_millis(150)).await;
        drop(states);
        handle.await.unwrap();

        assert!(buffer.contents().ends_with(CLEAR_LINE));
    }
}
