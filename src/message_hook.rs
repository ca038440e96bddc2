/*
 * The per-window dispatch entry point. The host translates native messages into
 * `ChromeEvent`s and calls `dispatch` on the UI thread; the returned outcome
 * tells it whether default (native) processing must be suppressed.
 *
 * The hook owns the window's geometry state and drag session, so both live
 * exactly as long as the window. Theme state is never cached: every theme
 * related event re-resolves it through the application context.
 */

use crate::app_context::AppContext;
use crate::drag_gesture::{DragGestureTracker, DragSession};
use crate::platform::{PlatformGeometryProvider, ThemeableChrome, WindowHost};
use crate::pseudo_maximize::{PseudoMaximizeController, WindowGeometryState};
use crate::system_menu::SystemMenuAdapter;
use crate::theme::{ChromeAffordance, Theme};
use crate::types::{CaptionButton, ChromeEvent, EventOutcome, ScreenPoint, WindowKind};

/// Everything a dispatch may touch, borrowed for the duration of one event.
pub struct ChromeEnvironment<'a> {
    pub host: &'a mut dyn WindowHost,
    pub geometry: &'a dyn PlatformGeometryProvider,
    pub app: &'a AppContext,
    pub chrome: &'a mut dyn ThemeableChrome,
}

#[derive(Debug)]
pub struct WindowMessageHook {
    kind: WindowKind,
    maximize: PseudoMaximizeController,
    drag: DragGestureTracker,
    menu: SystemMenuAdapter,
    activated: bool,
    layout_pass_pending: bool,
}

impl WindowMessageHook {
    pub fn new(kind: WindowKind) -> Self {
        Self {
            kind,
            maximize: PseudoMaximizeController::new(),
            drag: DragGestureTracker::new(),
            menu: SystemMenuAdapter::new(kind.into()),
            activated: true,
            layout_pass_pending: false,
        }
    }

    pub fn kind(&self) -> WindowKind {
        self.kind
    }

    pub fn geometry_state(&self) -> WindowGeometryState {
        self.maximize.state()
    }

    pub fn is_pseudo_maximized(&self) -> bool {
        self.maximize.is_pseudo_maximized()
    }

    pub fn drag_session(&self) -> DragSession {
        self.drag.session()
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }

    pub fn affordance(&self, theme: Theme) -> ChromeAffordance {
        ChromeAffordance::derive(self.is_pseudo_maximized(), self.activated, theme)
    }

    /// First theme application, plus an optional start-maximized transition for the main window.
    pub fn initialize(&mut self, env: &mut ChromeEnvironment<'_>, start_maximized: bool) {
        log::debug!(
            "WindowMessageHook: Initializing {:?} window {:?}",
            self.kind,
            env.host.handle()
        );
        self.apply_theme(env);
        if start_maximized && self.kind == WindowKind::Main && !self.is_pseudo_maximized() {
            self.toggle_maximize(env);
        }
    }

    pub fn dispatch(
        &mut self,
        event: ChromeEvent,
        env: &mut ChromeEnvironment<'_>,
    ) -> EventOutcome {
        match event {
            ChromeEvent::AppActivated { active } => {
                if active {
                    self.on_app_activated(env);
                }
                EventOutcome::Unhandled
            }
            ChromeEvent::ActivationChanged { active } => {
                self.activated = active;
                self.apply_theme(env);
                EventOutcome::Unhandled
            }
            ChromeEvent::MenuPopupOpening { menu } => {
                self.menu.sync(&mut *env.host, menu, self.is_pseudo_maximized());
                EventOutcome::Unhandled
            }
            ChromeEvent::SystemCommandMaximize => self.on_system_maximize(env),
            ChromeEvent::SystemCommandRestore => self.on_system_restore(env),
            ChromeEvent::SystemSettingsOrThemeChanged => {
                self.apply_theme(env);
                EventOutcome::Unhandled
            }
            ChromeEvent::PointerPressed { point, click_count } => {
                self.on_pointer_pressed(point, click_count, env)
            }
            ChromeEvent::PointerMoved {
                point,
                primary_down,
            } => match self.kind {
                WindowKind::Main => {
                    self.drag
                        .on_move(point, primary_down, &mut self.maximize, env.host, env.geometry)
                }
                WindowKind::SettingsDialog => EventOutcome::Unhandled,
            },
            ChromeEvent::PointerReleased { .. } => self.drag.on_release(env.host),
            ChromeEvent::CaptionButton(button) => self.on_caption_button(button, env),
            ChromeEvent::SizeChanged { width, height } => {
                if self.kind == WindowKind::Main && !self.layout_pass_pending {
                    log::trace!(
                        "WindowMessageHook: Size changed to {width}x{height}; deferring scroll."
                    );
                    self.layout_pass_pending = true;
                    env.host.schedule_deferred_layout_pass();
                }
                EventOutcome::Unhandled
            }
            ChromeEvent::DeferredLayoutPass => {
                if !self.layout_pass_pending {
                    return EventOutcome::Unhandled;
                }
                self.layout_pass_pending = false;
                // Measured sizes are final only after the layout pass.
                let visible = env.host.content_scrollable_width() > 0.0;
                env.host.set_scroll_buttons_visible(visible);
                EventOutcome::Handled
            }
        }
    }

    fn apply_theme(&self, env: &mut ChromeEnvironment<'_>) {
        env.app
            .theme()
            .apply_to(env.chrome, env.app.appearance(), self.activated);
    }

    /*
     * Taskbar clicks and Alt+Tab do not always restore and refocus a minimized
     * window. Only the window-manager state is restored here; a pseudo-maximized
     * window comes back pseudo-maximized.
     */
    fn on_app_activated(&mut self, env: &mut ChromeEnvironment<'_>) {
        if env.host.is_minimized() {
            log::debug!(
                "WindowMessageHook: Restoring minimized window {:?} on activation",
                env.host.handle()
            );
            env.host.restore_from_minimized();
        }
        env.host.bring_to_front_and_focus();
    }

    fn on_system_maximize(&mut self, env: &mut ChromeEnvironment<'_>) -> EventOutcome {
        if self.kind == WindowKind::SettingsDialog {
            log::debug!("WindowMessageHook: Ignoring maximize command on dialog.");
            return EventOutcome::Handled;
        }
        if env.host.is_minimized() {
            env.host.restore_from_minimized();
        }
        if !self.is_pseudo_maximized() {
            self.toggle_maximize(env);
        }
        EventOutcome::Handled
    }

    fn on_system_restore(&mut self, env: &mut ChromeEnvironment<'_>) -> EventOutcome {
        if self.kind == WindowKind::Main && self.is_pseudo_maximized() && !env.host.is_minimized() {
            self.toggle_maximize(env);
            EventOutcome::Handled
        } else {
            // Restoring from minimized is left to the window manager.
            EventOutcome::Unhandled
        }
    }

    /// Toggle from outside the drag tracker. An armed press never outlives the state it armed in.
    fn toggle_maximize(&mut self, env: &mut ChromeEnvironment<'_>) {
        self.drag.cancel(env.host);
        self.maximize.toggle(env.host, env.geometry);
    }

    fn on_pointer_pressed(
        &mut self,
        point: ScreenPoint,
        click_count: u32,
        env: &mut ChromeEnvironment<'_>,
    ) -> EventOutcome {
        match self.kind {
            WindowKind::Main => {
                self.drag
                    .on_press(point, click_count, &mut self.maximize, env.host, env.geometry)
            }
            WindowKind::SettingsDialog => match click_count {
                0 => EventOutcome::Unhandled,
                1 => {
                    env.host.begin_native_move();
                    EventOutcome::Handled
                }
                _ => EventOutcome::Handled,
            },
        }
    }

    fn on_caption_button(
        &mut self,
        button: CaptionButton,
        env: &mut ChromeEnvironment<'_>,
    ) -> EventOutcome {
        log::debug!("WindowMessageHook: Caption button {button:?}");
        match button {
            CaptionButton::Close => {
                env.host.close();
                EventOutcome::Handled
            }
            CaptionButton::Minimize => {
                env.host.minimize();
                EventOutcome::Handled
            }
            CaptionButton::Maximize => {
                if self.kind == WindowKind::Main {
                    self.toggle_maximize(env);
                }
                EventOutcome::Handled
            }
            CaptionButton::Settings => EventOutcome::Unhandled,
        }
    }
}
