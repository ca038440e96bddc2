mod common;

use common::{QueueNotifier, TestGeometry, TestWindow, app_with_system_theme};
use micachrome::{
    AppearanceMode, ButtonStyle, CaptionButton, ChromeEvent, Color, DpiScale, EventOutcome,
    MaximizeGlyph, MenuHandle, Rect, ScreenPoint, SystemMenuEntry, Theme, WindowKind,
};

fn full_hd() -> TestGeometry {
    TestGeometry {
        work_area: Rect::new(0.0, 0.0, 1920.0, 1080.0),
        scale: DpiScale::IDENTITY,
    }
}

#[test]
fn maximize_then_restore_on_full_hd_monitor() {
    let app = app_with_system_theme(Theme::Light);
    let geometry = full_hd();
    let mut main = TestWindow::new(WindowKind::Main, 1, Rect::new(100.0, 100.0, 800.0, 600.0));
    main.initialize(&app, &geometry, false);

    let outcome = main.dispatch(&app, &geometry, ChromeEvent::SystemCommandMaximize);

    assert_eq!(outcome, EventOutcome::Handled);
    assert_eq!(main.host.bounds, Some(Rect::new(-8.0, -8.0, 1936.0, 1096.0)));
    assert_eq!(main.host.content_inset, 8.0);
    assert_eq!(main.host.glyph, MaximizeGlyph::Restore);

    main.dispatch(&app, &geometry, ChromeEvent::MenuPopupOpening { menu: MenuHandle(7) });
    assert_eq!(main.host.menu.get(&SystemMenuEntry::Restore), Some(&true));
    assert_eq!(main.host.menu.get(&SystemMenuEntry::Move), Some(&false));

    let outcome = main.dispatch(&app, &geometry, ChromeEvent::SystemCommandRestore);

    assert_eq!(outcome, EventOutcome::Handled);
    assert_eq!(main.host.bounds, Some(Rect::new(100.0, 100.0, 800.0, 600.0)));
    assert_eq!(main.host.content_inset, 0.0);
    assert_eq!(main.host.glyph, MaximizeGlyph::Maximize);
}

#[test]
fn drag_on_maximized_title_bar_restores_and_hands_off_to_native_move() {
    let app = app_with_system_theme(Theme::Dark);
    let geometry = full_hd();
    let mut main = TestWindow::new(WindowKind::Main, 1, Rect::new(100.0, 100.0, 800.0, 600.0));
    main.initialize(&app, &geometry, true);
    assert!(main.hook.is_pseudo_maximized());

    main.dispatch(
        &app,
        &geometry,
        ChromeEvent::PointerPressed { point: ScreenPoint::new(400.0, 12.0), click_count: 1 },
    );
    assert_eq!(main.host.native_moves, 0);

    main.dispatch(
        &app,
        &geometry,
        ChromeEvent::PointerMoved { point: ScreenPoint::new(450.0, 30.0), primary_down: true },
    );
    let released = ChromeEvent::PointerReleased { point: ScreenPoint::new(450.0, 30.0) };
    main.dispatch(&app, &geometry, released);

    assert!(!main.hook.is_pseudo_maximized());
    assert_eq!(main.host.bounds, Some(Rect::new(50.0, 15.0, 800.0, 600.0)));
    assert_eq!(main.host.native_moves, 1);
}

#[test]
fn click_without_drag_leaves_window_maximized() {
    let app = app_with_system_theme(Theme::Dark);
    let geometry = full_hd();
    let mut main = TestWindow::new(WindowKind::Main, 1, Rect::new(100.0, 100.0, 800.0, 600.0));
    main.initialize(&app, &geometry, true);
    let maximized_bounds = main.host.bounds;

    main.dispatch(
        &app,
        &geometry,
        ChromeEvent::PointerPressed { point: ScreenPoint::new(400.0, 12.0), click_count: 1 },
    );
    let released = ChromeEvent::PointerReleased { point: ScreenPoint::new(400.0, 12.0) };
    main.dispatch(&app, &geometry, released);

    assert!(main.hook.is_pseudo_maximized());
    assert_eq!(main.host.bounds, maximized_bounds);
}

#[test]
fn appearance_change_reaches_main_window_and_open_dialog() {
    let mut app = app_with_system_theme(Theme::Dark);
    let geometry = full_hd();
    let mut main = TestWindow::new(WindowKind::Main, 1, Rect::new(100.0, 100.0, 800.0, 600.0));
    let dialog_bounds = Rect::new(300.0, 200.0, 400.0, 300.0);
    let mut dialog = TestWindow::new(WindowKind::SettingsDialog, 2, dialog_bounds);
    app.register_window(main.host.handle);
    app.register_window(dialog.host.handle);
    main.initialize(&app, &geometry, false);
    dialog.initialize(&app, &geometry, false);
    main.dispatch(&app, &geometry, ChromeEvent::ActivationChanged { active: false });
    assert_eq!(main.chrome.last.map(|a| a.button_style), Some(ButtonStyle::DarkDeactivated));

    let notifier = QueueNotifier::default();
    app.set_appearance(AppearanceMode::Light, &notifier);

    // Deliver the queued notifications the way the host's message loop would.
    let queued: Vec<_> = notifier.queued.borrow().clone();
    assert_eq!(queued, vec![main.host.handle, dialog.host.handle]);
    for handle in queued {
        let window = if handle == main.host.handle { &mut main } else { &mut dialog };
        window.dispatch(&app, &geometry, ChromeEvent::SystemSettingsOrThemeChanged);
    }

    let main_look = main.chrome.last.expect("main window themed");
    let dialog_look = dialog.chrome.last.expect("dialog themed");
    assert_eq!(main_look.button_style, ButtonStyle::LightDeactivated);
    assert_eq!(main_look.title_text, Color::SILVER);
    assert_eq!(dialog_look.button_style, ButtonStyle::LightActivated);
    assert_eq!(dialog_look.primary_text, Color::BLACK);
    assert_eq!(dialog_look.secondary_text, Color::rgb(0x66, 0x66, 0x66));
}

#[test]
fn minimize_from_maximized_and_reactivate_keeps_state() {
    let app = app_with_system_theme(Theme::Light);
    let geometry = full_hd();
    let mut main = TestWindow::new(WindowKind::Main, 1, Rect::new(100.0, 100.0, 800.0, 600.0));
    main.initialize(&app, &geometry, true);
    let maximized_bounds = main.host.bounds;

    main.dispatch(&app, &geometry, ChromeEvent::CaptionButton(CaptionButton::Minimize));
    main.dispatch(&app, &geometry, ChromeEvent::AppActivated { active: true });

    assert!(!main.host.minimized);
    assert!(main.hook.is_pseudo_maximized());
    assert_eq!(main.host.bounds, maximized_bounds);
}
