/// Full-viewport warning overlay injected into a tab's page.
///
/// The page mutation itself runs in the tab's isolated world (see
/// `applyOverlay` in bridge.js); this side only decides what to ask for.
/// The routine is idempotent: it looks the node up by `marker_id` before
/// creating or removing it, so repeated commands converge.
use std::rc::Rc;

use serde::Serialize;

use crate::error::MonitorResult;
use crate::host::ScriptInjector;
use crate::tab_data::TabId;

pub const OVERLAY_TEXT: &str = "This site is on your distraction list. Do you really want to be here?";

/// Fixed, click-through, red-tinted layer covering the viewport
pub const OVERLAY_STYLE: &str = "position: fixed; inset: 0; z-index: 2147483647; pointer-events: none; \
background-color: rgba(220, 20, 20, 0.35); display: flex; align-items: center; justify-content: center; \
color: #fff; font: bold 28px sans-serif; text-align: center; text-shadow: 0 2px 6px rgba(0, 0, 0, 0.6);";

/// Arguments for the page routine
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayCommand {
    pub marker_id: String,
    pub show: bool,
    pub text: String,
    pub style: String,
}

pub struct OverlayController {
    injector: Rc<dyn ScriptInjector>,
    marker_id: String,
}

impl OverlayController {
    pub fn new(injector: Rc<dyn ScriptInjector>, marker_id: &str) -> Self {
        OverlayController {
            injector,
            marker_id: marker_id.to_string(),
        }
    }

    pub fn command(&self, show: bool) -> OverlayCommand {
        OverlayCommand {
            marker_id: self.marker_id.clone(),
            show,
            text: OVERLAY_TEXT.to_string(),
            style: OVERLAY_STYLE.to_string(),
        }
    }

    pub async fn apply_overlay(&self, tab_id: TabId, should_show: bool) -> MonitorResult<()> {
        log::debug!(
            "{} overlay on tab {}",
            if should_show { "Showing" } else { "Hiding" },
            tab_id
        );
        self.injector.inject(tab_id, &self.command(should_show)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MonitorError;
    use crate::testing::{run, FakeHost};

    const MARKER: &str = "mindful-browse-overlay";

    #[test]
    fn test_show_twice_leaves_one_marker() {
        let host = Rc::new(FakeHost::new());
        let overlay = OverlayController::new(host.clone(), MARKER);

        run(overlay.apply_overlay(1, true)).unwrap();
        run(overlay.apply_overlay(1, true)).unwrap();

        assert_eq!(host.overlay_nodes(1), vec![MARKER.to_string()]);
    }

    #[test]
    fn test_hide_when_absent_is_noop() {
        let host = Rc::new(FakeHost::new());
        let overlay = OverlayController::new(host.clone(), MARKER);

        run(overlay.apply_overlay(1, false)).unwrap();

        assert!(host.overlay_nodes(1).is_empty());
    }

    #[test]
    fn test_show_then_hide() {
        let host = Rc::new(FakeHost::new());
        let overlay = OverlayController::new(host.clone(), MARKER);

        run(overlay.apply_overlay(1, true)).unwrap();
        run(overlay.apply_overlay(1, false)).unwrap();

        assert!(host.overlay_nodes(1).is_empty());
    }

    #[test]
    fn test_overlays_are_per_tab() {
        let host = Rc::new(FakeHost::new());
        let overlay = OverlayController::new(host.clone(), MARKER);

        run(overlay.apply_overlay(1, true)).unwrap();
        run(overlay.apply_overlay(2, false)).unwrap();

        assert_eq!(host.overlay_nodes(1).len(), 1);
        assert!(host.overlay_nodes(2).is_empty());
    }

    #[test]
    fn test_command_is_click_through() {
        let host = Rc::new(FakeHost::new());
        let overlay = OverlayController::new(host, MARKER);

        let command = overlay.command(true);
        let json = serde_json::to_value(&command).unwrap();

        assert_eq!(json["markerId"], MARKER);
        assert_eq!(json["show"], true);
        assert!(command.style.contains("pointer-events: none"));
        assert!(command.style.contains("position: fixed"));
    }

    #[test]
    fn test_injection_failure_propagates() {
        let host = Rc::new(FakeHost::new());
        host.fail_injection();
        let overlay = OverlayController::new(host.clone(), MARKER);

        let result = run(overlay.apply_overlay(5, true));

        assert!(matches!(result, Err(MonitorError::Injection { tab_id: 5, .. })));
    }
}
