//! Headless rendering: settle a page on the virtual clock and return the
//! final frame as plain text.

use crate::config::SiteConfig;
use crate::error::Result;
use crate::pages::{PageKind, create_page, render_page};
use crate::renderer::FrameBuffer;
use crate::timer::TimerQueue;

/// Upper bound on timer callbacks while settling. Every animation is
/// finite, so this only guards against misconfiguration.
const MAX_SETTLE_STEPS: usize = 100_000;

/// Render `kind` at `width` x `height` once all its animations finished.
pub fn snapshot_frame(
    config: &SiteConfig,
    kind: PageKind,
    width: u16,
    height: u16,
) -> Result<FrameBuffer> {
    let timers = TimerQueue::new();
    let page = create_page(kind, config, &timers);

    let fired = timers.run_until_idle(MAX_SETTLE_STEPS);
    tracing::debug!(fired, elapsed = ?timers.now(), settled = page.is_settled(), "snapshot settled");

    render_page(page.as_ref(), width, height, true, &config.resolved_theme())
}

/// [`snapshot_frame`] as plain text.
pub fn snapshot(config: &SiteConfig, kind: PageKind, width: u16, height: u16) -> Result<String> {
    Ok(snapshot_frame(config, kind, width, height)?.to_plain_text())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_snapshot_is_settled() {
        let text = snapshot(&SiteConfig::default(), PageKind::Home, 80, 24).unwrap();

        assert!(text.contains("Welcome to AJClifton.co.uk"));
        assert!(!text.contains('|'));
        assert!(text.contains("LinkedIn"));
    }

    #[test]
    fn test_list_snapshot() {
        let text = snapshot(&SiteConfig::default(), PageKind::List, 20, 12).unwrap();
        assert!(text.contains("• 0"));
        assert!(text.contains("• 9"));
    }
}
