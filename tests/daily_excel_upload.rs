mod common;

use campaign_uploader::upload::{SubmissionPhase, UploadKind};
use common::TestCtx;
use std::fs;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ARCHIVE: &[u8] = b"PK\x03\x04doctor-files";

#[tokio::test]
async fn binary_response_is_saved_as_doctor_archive() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(body_string_contains(
            "name=\"file\"; filename=\"report.xlsx\"",
        ))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/zip")
                .set_body_bytes(ARCHIVE),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let ctx = TestCtx::new(&mock_server.uri());
    let profile = UploadKind::DailyExcel.profile();
    let file = ctx.local_file("report.xlsx", b"patients");

    let update = ctx
        .controller
        .submit(&profile, Some(&file), &ctx.sender)
        .await
        .unwrap();

    assert_eq!(update.phase, SubmissionPhase::Success);
    assert_eq!(update.text, "✅ Emails generated & ZIP downloaded");

    let expected = ctx.downloads.path().join("doctor_email_files.zip");
    assert_eq!(update.artifact.as_deref(), Some(expected.as_path()));
    assert_eq!(fs::read(&expected).unwrap(), ARCHIVE);

    // Exactly one download, and no temporary file left behind.
    assert_eq!(ctx.downloaded_files(), vec![expected]);
}

#[tokio::test]
async fn pending_is_reported_before_the_outcome() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(ARCHIVE))
        .mount(&mock_server)
        .await;

    let ctx = TestCtx::new(&mock_server.uri());
    let profile = UploadKind::DailyExcel.profile();
    let file = ctx.local_file("report.xlsx", b"patients");

    ctx.controller
        .submit(&profile, Some(&file), &ctx.sender)
        .await
        .unwrap();

    let phases: Vec<_> = ctx.sent_updates().into_iter().map(|u| u.phase).collect();
    assert_eq!(
        phases,
        vec![SubmissionPhase::Pending, SubmissionPhase::Success]
    );
}

#[tokio::test]
async fn request_is_multipart_with_the_spreadsheet() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(ARCHIVE))
        .mount(&mock_server)
        .await;

    let ctx = TestCtx::new(&mock_server.uri());
    let profile = UploadKind::DailyExcel.profile();
    let file = ctx.local_file("report.xlsx", b"row-1;row-2");

    ctx.controller
        .submit(&profile, Some(&file), &ctx.sender)
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let content_type = requests[0]
        .headers
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.starts_with("multipart/form-data; boundary="));

    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("row-1;row-2"));
    assert!(body.contains(
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    ));
}

#[tokio::test]
async fn repeated_uploads_keep_earlier_archives() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(ARCHIVE))
        .expect(2)
        .mount(&mock_server)
        .await;

    let ctx = TestCtx::new(&mock_server.uri());
    let profile = UploadKind::DailyExcel.profile();
    let file = ctx.local_file("report.xlsx", b"patients");

    for _ in 0..2 {
        let update = ctx
            .controller
            .submit(&profile, Some(&file), &ctx.sender)
            .await
            .unwrap();
        assert_eq!(update.phase, SubmissionPhase::Success);
    }

    assert_eq!(
        ctx.downloaded_files(),
        vec![
            ctx.downloads.path().join("doctor_email_files (1).zip"),
            ctx.downloads.path().join("doctor_email_files.zip"),
        ]
    );
}
