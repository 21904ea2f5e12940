use std::time::Duration;

use webview_config::{BrowserConfig, WindowConfig};
use webview_sys::fake::{FakeCall, FakeLibrary, FakeWebview};
use webview_sys::ffi;

use super::*;
use crate::test_support::{context_with, fake_context, fake_of, open_window, WAIT};

#[test]
fn create_window_applies_config_in_order() {
    let ctx = fake_context();
    let config = WindowConfig {
        title: "Bun App".into(),
        width: 500,
        height: 400,
        size_hint: SizeHint::Fixed,
        frame: false,
        opacity: 0.9,
        pixel_transparency: true,
        init_scripts: vec!["window.a = 1".into()],
        html: Some("<h1>hi</h1>".into()),
        ..Default::default()
    };
    let window = ctx.create_window(&config).unwrap();
    let fake = fake_of(&window);

    assert_eq!(
        fake.calls(),
        vec![
            FakeCall::SetTitle("Bun App".into()),
            FakeCall::SetSize {
                width: 500,
                height: 400,
                hint: 3
            },
            FakeCall::SetFrame(false),
            FakeCall::SetOpacity(0.9),
            FakeCall::SetPixelTransparency(true),
            FakeCall::SetAlwaysOnTop(false),
            FakeCall::SetClickThrough(false),
            FakeCall::Init("window.a = 1".into()),
            FakeCall::SetHtml("<h1>hi</h1>".into()),
        ]
    );
}

#[test]
fn url_is_navigated() {
    let ctx = fake_context();
    let window = ctx
        .create_window(&WindowConfig::with_url("https://example.com"))
        .unwrap();
    let calls = fake_of(&window).calls();
    assert_eq!(
        calls.last(),
        Some(&FakeCall::Navigate("https://example.com".into()))
    );
}

#[test]
fn setters_forward_to_native() {
    let ctx = fake_context();
    let window = open_window(&ctx);
    let fake = fake_of(&window);
    let before = fake.calls().len();

    window.set_always_on_top(true).unwrap();
    window.set_click_through(true).unwrap();
    window.set_size(320, 240, SizeHint::Min).unwrap();
    window.eval("document.title").unwrap();

    assert_eq!(
        fake.calls()[before..].to_vec(),
        vec![
            FakeCall::SetAlwaysOnTop(true),
            FakeCall::SetClickThrough(true),
            FakeCall::SetSize {
                width: 320,
                height: 240,
                hint: 1
            },
            FakeCall::Eval("document.title".into()),
        ]
    );
}

#[test]
fn browser_flags_degrade_when_unsupported() {
    let ctx = context_with(FakeLibrary::new().without(ffi::WEBVIEW_SET_BROWSER_FLAGS));
    let window = open_window(&ctx);
    let fake = fake_of(&window);

    let flags = BrowserConfig {
        enable_autoplay: true,
        ..Default::default()
    };
    assert!(!window.set_browser_flags(&flags).unwrap());
    assert!(!window.supports(OptionalFeature::BrowserFlags).unwrap());
    assert!(!fake
        .calls()
        .iter()
        .any(|c| matches!(c, FakeCall::BrowserFlags { .. })));
}

#[test]
fn browser_flags_applied_when_supported() {
    let ctx = fake_context();
    let window = open_window(&ctx);
    let fake = fake_of(&window);

    let flags = BrowserConfig {
        enable_autoplay: true,
        mute_autoplay: false,
        custom_flags: vec!["--disable-gpu".into(), "--mute".into()],
    };
    assert!(window.set_browser_flags(&flags).unwrap());
    assert_eq!(
        fake.calls().last(),
        Some(&FakeCall::BrowserFlags {
            enable_autoplay: true,
            mute_autoplay: false,
            custom_flags: "--disable-gpu --mute".into(),
        })
    );
}

#[test]
fn context_browser_flags_applied_before_content() {
    let ctx = fake_context().with_browser_flags(BrowserConfig {
        enable_autoplay: true,
        ..Default::default()
    });
    let window = ctx
        .create_window(&WindowConfig::with_html("<p>x</p>"))
        .unwrap();
    let calls = fake_of(&window).calls();
    assert!(matches!(
        calls.first(),
        Some(FakeCall::BrowserFlags {
            enable_autoplay: true,
            mute_autoplay: true,
            ..
        })
    ));
}

#[test]
fn run_step_reports_continue_until_terminated() {
    let ctx = fake_context();
    let window = open_window(&ctx);
    assert!(window.run_step(false).unwrap());
    window.terminate().unwrap();
    assert!(!window.run_step(true).unwrap());
}

#[test]
fn run_blocks_until_terminate() {
    let ctx = fake_context();
    let window = open_window(&ctx);
    let fake = fake_of(&window);

    let runner = window.clone();
    let loop_thread = std::thread::spawn(move || runner.run());
    assert!(fake.wait_until_running(WAIT));
    assert!(!loop_thread.is_finished());

    window.terminate().unwrap();
    loop_thread.join().unwrap().unwrap();
    assert!(window.is_alive());
}

#[test]
fn native_window_is_the_engine_window() {
    let ctx = fake_context();
    let window = open_window(&ctx);
    let native = window.native_window().unwrap();
    assert!(!native.is_null());
    assert!(FakeWebview::from_window(native).is_some());
}

#[tokio::test]
async fn run_pumped_stops_when_loop_terminates() {
    let ctx = fake_context();
    let window = open_window(&ctx);
    let fake = fake_of(&window);

    let stopper = window.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        stopper.terminate().unwrap();
    });

    window.run_pumped(Duration::from_millis(5)).await.unwrap();
    assert!(fake.pump_count() > 1);
    assert!(fake.is_terminated());
}

#[tokio::test]
async fn run_pumped_stops_when_window_destroyed() {
    let ctx = fake_context();
    let window = open_window(&ctx);

    let closer = window.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(30)).await;
        closer.destroy();
    });

    window.run_pumped(Duration::from_millis(5)).await.unwrap();
    assert!(!window.is_alive());
}

#[tokio::test]
async fn bound_functions_progress_while_pumping() {
    let ctx = fake_context();
    let window = open_window(&ctx);
    let fake = fake_of(&window);

    let stopper = window.clone();
    window
        .bind("quit", move |_args| {
            let stopper = stopper.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                stopper.terminate().map_err(|e| e.to_string())?;
                Ok::<_, String>("bye")
            }
        })
        .unwrap();

    assert!(fake.simulate_invoke("quit", "r1", "[]"));
    window.run_pumped(Duration::from_millis(5)).await.unwrap();

    let returns = fake.returns();
    assert_eq!(returns.len(), 1);
    assert_eq!(returns[0].result, r#""bye""#);
}
