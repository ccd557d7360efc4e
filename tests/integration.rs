use actix_web::body::{BodySize, MessageBody};
use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use look::api::{download_image, list_images, upload_image};
use look::app_state::AppState;
use look::config::AppConfig;
use look::service::{ImageCollection, ImageLink};
use look::storage::ImageStore;

fn local_state(dir: &std::path::Path) -> AppState {
    AppState::with_store(ImageStore::new(dir), AppConfig::default())
}

macro_rules! image_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .service(list_images)
                .service(upload_image)
                .service(download_image),
        )
        .await
    };
}

#[actix_web::test]
async fn test_upload_then_download_png() {
    let dir = tempfile::tempdir().unwrap();
    let app = image_app!(local_state(dir.path()));
    let payload = vec![b'A'; 10_000];

    let req = test::TestRequest::post()
        .uri("/images")
        .insert_header((header::CONTENT_TYPE, "image/png"))
        .set_payload(payload.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let location = resp
        .headers()
        .get(header::LOCATION)
        .expect("Location header")
        .to_str()
        .unwrap()
        .to_string();
    assert!(location.starts_with("/images/"));
    assert!(location.ends_with(".png"));

    // The file lands flat in the storage root
    let name = location.trim_start_matches("/images/");
    assert_eq!(std::fs::metadata(dir.path().join(name)).unwrap().len(), 10_000);

    let req = test::TestRequest::get().uri(&location).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "image/png");
    assert_eq!(resp.response().body().size(), BodySize::Sized(10_000));

    let body = test::read_body(resp).await;
    assert_eq!(body.len(), 10_000);
    assert!(body.iter().all(|&b| b == b'A'));
}

#[actix_web::test]
async fn test_download_content_type_follows_extension() {
    let app = image_app!(AppState::new_for_testing());

    let req = test::TestRequest::post()
        .uri("/images")
        .insert_header((header::CONTENT_TYPE, "image/jpeg"))
        .set_payload(&b"\xff\xd8\xff\xe0 jpeg"[..])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let location = resp.headers().get(header::LOCATION).unwrap().to_str().unwrap().to_string();
    assert!(location.ends_with(".jpg"));

    let resp = test::call_service(&app, test::TestRequest::get().uri(&location).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "image/jpeg");
    assert_eq!(test::read_body(resp).await.as_ref(), b"\xff\xd8\xff\xe0 jpeg");
}

#[actix_web::test]
async fn test_upload_without_content_type_uses_fallback() {
    let app = image_app!(AppState::new_for_testing());

    let req = test::TestRequest::post()
        .uri("/images")
        .set_payload(&b"raw bytes"[..])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let location = resp.headers().get(header::LOCATION).unwrap().to_str().unwrap().to_string();
    assert!(location.ends_with(".bin"));

    let resp = test::call_service(&app, test::TestRequest::get().uri(&location).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/octet-stream"
    );
}

#[actix_web::test]
async fn test_invalid_and_missing_names_are_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let app = image_app!(local_state(dir.path()));

    for uri in [
        "/images/not-a-valid-name.png",
        "/images/..%2F..%2Fetc%2Fpasswd",
        "/images/8ee7480f-8de7-4ae5-a784-dfff7e57e611.PNG",
        "/images/8ee7480f-8de7-4ae5-a784-dfff7e57e611.png",
    ] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
        let body = test::read_body(resp).await;
        assert_eq!(body.as_ref(), b"File not found", "{}", uri);
    }
}

#[actix_web::test]
async fn test_list_images_placeholder() {
    let app = image_app!(AppState::new_for_testing());

    let req = test::TestRequest::get().uri("/images").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/msgpack"
    );

    let body = test::read_body(resp).await;
    let doc: ImageCollection = rmp_serde::from_slice(&body).unwrap();
    assert_eq!(
        doc,
        ImageCollection {
            images: vec![ImageLink {
                href: "/images/8ee7480f-8de7-4ae5-a784-dfff7e57e611.png".to_string(),
            }],
        }
    );
}

#[actix_web::test]
async fn test_uploads_get_distinct_names() {
    let app = image_app!(AppState::new_for_testing());
    let mut locations = Vec::new();

    for payload in [&b"first image"[..], &b"second image"[..]] {
        let req = test::TestRequest::post()
            .uri("/images")
            .insert_header((header::CONTENT_TYPE, "image/gif"))
            .set_payload(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        locations.push(resp.headers().get(header::LOCATION).unwrap().to_str().unwrap().to_string());
    }
    assert_ne!(locations[0], locations[1]);

    let first = test::call_service(&app, test::TestRequest::get().uri(&locations[0]).to_request()).await;
    assert_eq!(test::read_body(first).await.as_ref(), b"first image");
    let second = test::call_service(&app, test::TestRequest::get().uri(&locations[1]).to_request()).await;
    assert_eq!(test::read_body(second).await.as_ref(), b"second image");
}
