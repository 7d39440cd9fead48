//! Mount API - Application lifecycle and render effect.
//!
//! Mounting wires the reactive pipeline:
//!
//! ```text
//! terminal size ─┐
//! page kind ─────┼─► frame derived (layout + paint) ─► render effect ─► terminal
//! component text ┘
//! ```
//!
//! The frame derived reads the terminal size signals, the current page and,
//! while painting, the page's component signals. Any of them changing
//! re-runs it; the one effect pushes the new frame through the renderer.
//!
//! The event loop is single-threaded: it polls input with a timeout equal
//! to the time until the next animation deadline, then advances the timer
//! queue by the wall-clock time that actually passed.
//!
//! ```ignore
//! let mut handle = mount(config, MountOptions::default())?;
//! run(&mut handle)?;
//! handle.unmount();
//! ```

use std::cell::{Cell, RefCell};
use std::io;
use std::rc::Rc;
use std::time::{Duration, Instant};

use spark_signals::{Signal, derived, effect, signal};

use super::input::{self, Action};
use super::terminal::{
    RenderMode, detect_terminal_size, set_terminal_size, terminal_height_signal,
    terminal_width_signal,
};
use crate::config::SiteConfig;
use crate::error::{FolioError, Result};
use crate::pages::{Page, PageKind, create_page, render_page};
use crate::renderer::{DiffRenderer, FrameBuffer, InlineRenderer, Renderer};
use crate::timer::TimerQueue;

/// Longest input wait when no animation is pending.
const IDLE_POLL: Duration = Duration::from_millis(250);

type FrameResult = std::result::Result<FrameBuffer, String>;

#[derive(Debug, Clone, Copy, Default)]
pub struct MountOptions {
    pub mode: RenderMode,
    pub page: PageKind,
}

// =============================================================================
// Mount Handle
// =============================================================================

/// A mounted app. Dropping it tears the terminal back down.
pub struct MountHandle {
    config: SiteConfig,
    timers: TimerQueue,
    page: Rc<RefCell<Box<dyn Page>>>,
    page_kind: Signal<PageKind>,
    renderer: Rc<RefCell<Box<dyn Renderer>>>,
    running: Rc<Cell<bool>>,
    failure: Rc<RefCell<Option<FolioError>>>,
    last_frame: Rc<RefCell<Option<FrameBuffer>>>,
    frames: Rc<Cell<usize>>,
    stop_effect: Option<Box<dyn FnOnce()>>,
    last_advance: Instant,
    raw_mode: bool,
}

impl MountHandle {
    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Ask the loop to exit.
    pub fn stop(&self) {
        self.running.set(false);
    }

    /// The animation clock driving the current page.
    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    pub fn current_page(&self) -> PageKind {
        self.page_kind.get()
    }

    /// Most recently rendered frame.
    pub fn last_frame(&self) -> Option<FrameBuffer> {
        self.last_frame.borrow().clone()
    }

    /// Number of frames pushed to the renderer so far.
    pub fn frames_rendered(&self) -> usize {
        self.frames.get()
    }

    /// Swap to another page. The old page's animations are cancelled and
    /// the new page starts fresh.
    pub fn show_page(&self, kind: PageKind) -> Result<()> {
        if self.page_kind.get() == kind {
            return Ok(());
        }

        let next = create_page(kind, &self.config, &self.timers);
        let title = next.title().to_string();
        let previous = self.page.replace(next);
        previous.unmount();
        drop(previous);

        self.renderer.borrow_mut().set_title(&title)?;
        tracing::info!(?kind, "page shown");
        self.page_kind.set(kind);
        self.check_failure()
    }

    /// Apply one input action.
    pub fn apply(&self, action: Action) -> Result<()> {
        match action {
            Action::Quit => {
                tracing::info!("quit requested");
                self.stop();
            }
            Action::ShowPage(kind) => self.show_page(kind)?,
            Action::Resize(width, height) => {
                tracing::debug!(width, height, "terminal resized");
                self.renderer.borrow_mut().resized()?;
                set_terminal_size(width, height);
            }
        }
        self.check_failure()
    }

    /// Advance the animation clock by wall-clock time since the last call.
    pub fn advance_clock(&mut self) -> usize {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_advance);
        self.last_advance = now;
        self.timers.advance(elapsed)
    }

    /// Surface an error raised inside the render effect.
    fn check_failure(&self) -> Result<()> {
        match self.failure.borrow_mut().take() {
            Some(err) => {
                self.stop();
                Err(err)
            }
            None => Ok(()),
        }
    }

    /// Stop rendering and restore the terminal.
    pub fn unmount(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        let Some(stop) = self.stop_effect.take() else {
            return;
        };
        self.running.set(false);
        stop();

        self.page.borrow().unmount();
        self.timers.clear();

        if let Err(err) = self.renderer.borrow_mut().exit() {
            tracing::warn!(%err, "failed to restore terminal");
        }
        if self.raw_mode {
            if let Err(err) = crossterm::terminal::disable_raw_mode() {
                tracing::warn!(%err, "failed to leave raw mode");
            }
        }
        tracing::debug!(frames = self.frames.get(), "unmounted");
    }
}

impl Drop for MountHandle {
    fn drop(&mut self) {
        self.teardown();
    }
}

// =============================================================================
// Mount Function
// =============================================================================

/// Mount on the real terminal: raw mode, size detection, stdout renderer.
pub fn mount(config: SiteConfig, options: MountOptions) -> Result<MountHandle> {
    crossterm::terminal::enable_raw_mode()?;
    detect_terminal_size();

    let renderer: Box<dyn Renderer> = match options.mode {
        RenderMode::Fullscreen => Box::new(DiffRenderer::new(io::stdout())),
        RenderMode::Inline => Box::new(InlineRenderer::new(io::stdout())),
    };

    match mount_with(renderer, config, options) {
        Ok(mut handle) => {
            handle.raw_mode = true;
            Ok(handle)
        }
        Err(err) => {
            let _ = crossterm::terminal::disable_raw_mode();
            Err(err)
        }
    }
}

/// Mount onto any renderer, sized by the terminal size signals.
///
/// Renders the first frame before returning.
pub fn mount_with(
    renderer: Box<dyn Renderer>,
    config: SiteConfig,
    options: MountOptions,
) -> Result<MountHandle> {
    let timers = TimerQueue::new();
    let theme = config.resolved_theme();

    let page = create_page(options.page, &config, &timers);
    let renderer = Rc::new(RefCell::new(renderer));
    renderer.borrow_mut().enter(page.title())?;

    let page = Rc::new(RefCell::new(page));
    let page_kind = signal(options.page);
    let running = Rc::new(Cell::new(true));
    let failure: Rc<RefCell<Option<FolioError>>> = Rc::new(RefCell::new(None));
    let last_frame = Rc::new(RefCell::new(None));
    let frames = Rc::new(Cell::new(0usize));

    let frame_derived = {
        let width = terminal_width_signal();
        let height = terminal_height_signal();
        let page = page.clone();
        let page_kind = page_kind.clone();
        let fullscreen = options.mode.is_fullscreen();

        derived(move || -> FrameResult {
            let width = width.get();
            let height = height.get();
            let _kind = page_kind.get();

            let page = page.borrow();
            render_page(page.as_ref(), width, height, fullscreen, &theme)
                .map_err(|err| err.to_string())
        })
    };

    let stop = {
        let renderer = renderer.clone();
        let running = running.clone();
        let failure = failure.clone();
        let last_frame = last_frame.clone();
        let frames = frames.clone();

        effect(move || {
            if !running.get() {
                return;
            }

            let error = match frame_derived.get() {
                Ok(frame) => {
                    let rendered = renderer.borrow_mut().render(&frame);
                    frames.set(frames.get() + 1);
                    *last_frame.borrow_mut() = Some(frame);
                    rendered.err().map(FolioError::from)
                }
                Err(message) => Some(FolioError::Layout(message)),
            };

            if let Some(err) = error {
                tracing::error!(%err, "render failed");
                running.set(false);
                *failure.borrow_mut() = Some(err);
            }
        })
    };

    tracing::info!(mode = ?options.mode, page = ?options.page, "mounted");

    let handle = MountHandle {
        config,
        timers,
        page,
        page_kind,
        renderer,
        running,
        failure,
        last_frame,
        frames,
        stop_effect: Some(Box::new(stop)),
        last_advance: Instant::now(),
        raw_mode: false,
    };
    handle.check_failure()?;
    Ok(handle)
}

// =============================================================================
// Event Loop
// =============================================================================

/// One loop iteration: wait for input or the next deadline, then fire due
/// timers. Returns `Ok(false)` once the app should exit.
pub fn tick(handle: &mut MountHandle) -> Result<bool> {
    if !handle.is_running() {
        return Ok(false);
    }

    let timeout = handle
        .timers()
        .time_until_next()
        .map_or(IDLE_POLL, |due| due.min(IDLE_POLL));

    if let Some(action) = input::poll_action(timeout)? {
        handle.apply(action)?;
    }

    handle.advance_clock();
    handle.check_failure()?;
    Ok(handle.is_running())
}

/// Run until quit.
pub fn run(handle: &mut MountHandle) -> Result<()> {
    while tick(handle)? {}
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// A writer the test can read back after handing it to a renderer.
    #[derive(Clone, Default)]
    struct SharedOutput(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedOutput {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedOutput {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.borrow()).into_owned()
        }
    }

    fn headless(page: PageKind) -> (MountHandle, SharedOutput) {
        set_terminal_size(100, 30);
        let output = SharedOutput::default();
        let renderer = Box::new(DiffRenderer::new(output.clone()));
        let options = MountOptions {
            mode: RenderMode::Fullscreen,
            page,
        };
        let handle = mount_with(renderer, SiteConfig::default(), options).unwrap();
        (handle, output)
    }

    #[test]
    fn test_mount_renders_first_frame() {
        let (handle, output) = headless(PageKind::Home);

        assert_eq!(handle.frames_rendered(), 1);
        assert!(output.text().contains("\x1b]0;AJClifton\x07"));
        let frame = handle.last_frame().unwrap();
        assert!(frame.find_text("AJClifton").is_some());
    }

    #[test]
    fn test_timer_ticks_rerender() {
        let (handle, _output) = headless(PageKind::Home);

        handle.timers().advance(Duration::from_millis(100));
        let frame = handle.last_frame().unwrap();
        assert!(frame.find_text("W").is_some());
        assert!(handle.frames_rendered() > 1);
    }

    #[test]
    fn test_page_switch_cancels_and_recreates() {
        let (handle, _output) = headless(PageKind::Home);
        handle.timers().advance(Duration::from_millis(500));

        handle.apply(Action::ShowPage(PageKind::List)).unwrap();
        assert_eq!(handle.current_page(), PageKind::List);
        assert!(handle.timers().is_idle());
        assert!(handle.last_frame().unwrap().find_text("• 9").is_some());

        handle.apply(Action::ShowPage(PageKind::Home)).unwrap();
        assert_eq!(handle.timers().pending_count(), 2);
        // Fresh components: nothing typed yet
        assert!(handle.last_frame().unwrap().find_text("Welcome").is_none());
    }

    #[test]
    fn test_resize_relays_out() {
        let (handle, _output) = headless(PageKind::List);
        handle.apply(Action::Resize(50, 20)).unwrap();

        let frame = handle.last_frame().unwrap();
        assert_eq!((frame.width(), frame.height()), (50, 20));
    }

    #[test]
    fn test_quit_stops_and_unmount_restores() {
        let (mut handle, output) = headless(PageKind::Home);
        handle.apply(Action::Quit).unwrap();
        assert!(!handle.is_running());
        assert!(!tick(&mut handle).unwrap());

        handle.unmount();
        assert!(output.text().ends_with("\x1b[?25h\x1b[?1049l"));
    }

    #[test]
    fn test_drop_cancels_timers() {
        let (handle, _output) = headless(PageKind::Home);
        let timers = handle.timers().clone();
        drop(handle);
        assert!(timers.is_idle());
    }
}
