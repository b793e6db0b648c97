//! Integration tests for QR images and AR sessions.

mod common;

use std::time::{Duration, Instant};

use common::{APP_BASE_URL, TestBackend, unreachable_base_url};
use lib_armenu::ErrorCode;
use lib_armenu::hooks::{FetchState, UseArSession, UseQr};
use lib_armenu::menu::{MenuApi, ModelFormat, Platform, QrFormat, QrOptions};

// ---------------------------------------------------------------------------
// Test: QR PNG with its deep link
// ---------------------------------------------------------------------------

#[tokio::test]
async fn qr_code_is_a_png_linking_to_the_ar_page() {
    let backend = TestBackend::start().await;
    let code = backend.api().qr.fetch_png(2, QrOptions::default()).await.unwrap();

    assert_eq!(code.item_id, 2);
    assert_eq!(code.target_url, format!("{}/ar/2", APP_BASE_URL));
    assert!(code.png.starts_with(&[0x89, b'P', b'N', b'G']));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("item-2.png");
    code.save(&path).unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), code.png.to_vec());
}

#[tokio::test]
async fn qr_for_unknown_item_is_not_found() {
    let backend = TestBackend::start().await;
    let err = backend.api().qr.fetch_png(404, QrOptions::default()).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn svg_qr_is_not_requested() {
    let backend = TestBackend::start().await;
    let options = QrOptions {
        size: 512,
        format: QrFormat::Svg,
    };
    let err = backend.api().qr.fetch_png(2, options).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidInput);
}

// ---------------------------------------------------------------------------
// Test: QR hook follows its target
// ---------------------------------------------------------------------------

#[tokio::test]
async fn qr_hook_refetches_when_item_changes() {
    let backend = TestBackend::start().await;
    let hook = UseQr::new(backend.api().qr, 1, QrOptions::default());
    assert_eq!(hook.state(), FetchState::Idle);

    let first = hook.fetch().await;
    assert_eq!(first.data().unwrap().item_id, 1);

    let same = hook.set_target(1, QrOptions::default()).await;
    assert_eq!(same, first);

    let second = hook.set_target(3, QrOptions::default()).await;
    assert_eq!(second.data().unwrap().target_url, format!("{}/ar/3", APP_BASE_URL));
}

// ---------------------------------------------------------------------------
// Test: platform specific model choice and launch links
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ios_session_uses_usdz_and_records_a_view() {
    let backend = TestBackend::start().await;
    let api = backend.api();
    let hook = UseArSession::new(api.items.clone(), api.ar.clone(), 2, Platform::Ios);

    let session = hook.start().await.into_result().unwrap().unwrap();
    assert_eq!(session.model.format, ModelFormat::Usdz);
    assert_eq!(session.model.url, format!("{}models/adana.usdz", backend.base_url()));
    assert_eq!(session.launch_url, session.model.url);

    hook.flush_tracking().await;
    let views = backend.state.ar_views().await;
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].item_id, 2);
    assert_eq!(views[0].platform, "ios");
}

#[tokio::test]
async fn android_session_opens_scene_viewer() {
    let backend = TestBackend::start().await;
    let api = backend.api();
    let hook = UseArSession::new(api.items.clone(), api.ar.clone(), 3, Platform::Android);

    let session = hook.start().await.into_result().unwrap().unwrap();
    assert_eq!(session.model.format, ModelFormat::Glb);
    assert!(session.launch_url.starts_with("https://arvr.google.com/scene-viewer/1.0?"));
    assert!(session.launch_url.contains("mode=ar_preferred"));
}

#[tokio::test]
async fn ios_falls_back_to_glb_and_web_to_usdz() {
    let backend = TestBackend::start().await;
    let api = backend.api();

    // Item 3 only has GLB, item 4 only USDZ
    let karniyarik = api.items.get_by_id(3).await.unwrap().item;
    let model = api.ar.resolve_model(&karniyarik, Platform::Ios).unwrap();
    assert_eq!(model.format, ModelFormat::Glb);

    let kunefe = api.items.get_by_id(4).await.unwrap().item;
    let model = api.ar.resolve_model(&kunefe, Platform::Web).unwrap();
    assert_eq!(model.format, ModelFormat::Usdz);
}

#[tokio::test]
async fn item_without_model_is_ar_not_available() {
    let backend = TestBackend::start().await;
    let api = backend.api();
    let hook = UseArSession::new(api.items.clone(), api.ar.clone(), 5, Platform::Web);

    let state = hook.start().await;
    assert_eq!(state.error().unwrap().code(), ErrorCode::ArNotAvailable);
    hook.flush_tracking().await;
    assert!(backend.state.ar_views().await.is_empty());
}

#[tokio::test]
async fn session_for_unknown_item_is_not_found() {
    let backend = TestBackend::start().await;
    let api = backend.api();
    let hook = UseArSession::new(api.items.clone(), api.ar.clone(), 77, Platform::Android);
    assert!(hook.start().await.is_not_found());
}

#[tokio::test]
async fn slow_view_tracking_does_not_delay_the_session() {
    let backend = TestBackend::start().await;
    backend.state.delay_ar_views(Duration::from_secs(3));
    let api = backend.api();
    let hook = UseArSession::new(api.items.clone(), api.ar.clone(), 2, Platform::Web);

    let started = Instant::now();
    let state = hook.start().await;
    assert!(state.data().is_some());
    assert!(started.elapsed() < Duration::from_secs(1), "took {:?}", started.elapsed());
    assert!(backend.state.ar_views().await.is_empty());

    hook.flush_tracking().await;
    assert_eq!(backend.state.ar_views().await.len(), 1);
}

#[tokio::test]
async fn view_tracking_failure_is_swallowed() {
    let mut config = TestBackend::start().await.config();
    config.api_base_url = unreachable_base_url().await;
    let api = MenuApi::new(&config).unwrap();

    // Returns normally even though nothing is listening
    api.ar.track_view(2, Platform::Web).await;
}
