//! Attachment upload workflow against in-memory stores.

mod helpers;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use helpers::fixtures::{leave_request, pdf_upload, PDF_BYTES};
use helpers::storage::ReadOnlyStore;
use helpers::TestApp;
use leavedesk_core::models::AttachmentUpload;
use leavedesk_core::{AttachmentConfig, ErrorMetadata};
use leavedesk_db::{LeaveRequestStore, MemoryRecordStore};
use leavedesk_services::{AttachmentError, AttachmentUploadService};
use regex::Regex;

#[tokio::test]
async fn upload_records_key_and_status() {
    let app = TestApp::new();
    app.records.add_request(leave_request(42)).unwrap();

    let updated = app
        .uploads
        .upload(42, "emp001", pdf_upload("certificate.pdf"))
        .await
        .unwrap();

    let key = updated.ref_pdf.clone().unwrap();
    let pattern = Regex::new(r"^emp001_42_\d+\.pdf$").unwrap();
    assert!(pattern.is_match(&key), "unexpected key {key}");
    assert_eq!(updated.status, "On process");

    assert_eq!(app.stored_keys().await, vec![key.clone()]);
    assert_eq!(app.store.get(&key).as_deref(), Some(PDF_BYTES));

    let stored = app.records.get(42).await.unwrap().unwrap();
    assert_eq!(stored, updated);
}

#[tokio::test]
async fn original_extension_is_kept() {
    let app = TestApp::new();
    app.records.add_request(leave_request(5)).unwrap();

    let updated = app
        .uploads
        .upload(5, "emp001", pdf_upload("scan.PDF"))
        .await
        .unwrap();

    assert!(updated.ref_pdf.unwrap().ends_with(".PDF"));
}

#[tokio::test]
async fn missing_extension_defaults_to_pdf() {
    let app = TestApp::new();
    app.records.add_request(leave_request(5)).unwrap();

    let updated = app
        .uploads
        .upload(5, "emp001", pdf_upload("scan"))
        .await
        .unwrap();

    assert!(updated.ref_pdf.unwrap().ends_with(".pdf"));
}

#[tokio::test]
async fn oversized_file_never_reaches_the_store() {
    let app = TestApp::new();
    app.records.add_request(leave_request(42)).unwrap();

    let twelve_mib = vec![0u8; 12 * 1024 * 1024];
    let file = AttachmentUpload::new("big.pdf", "application/pdf", twelve_mib);

    let err = app.uploads.upload(42, "emp001", file).await.unwrap_err();

    assert!(matches!(
        err,
        AttachmentError::FileTooLarge { size_bytes, max_bytes }
            if size_bytes == 12 * 1024 * 1024 && max_bytes == 10 * 1024 * 1024
    ));
    assert!(app.store.is_empty());
    let untouched = app.records.get(42).await.unwrap().unwrap();
    assert_eq!(untouched, leave_request(42));
}

#[tokio::test]
async fn understated_size_is_still_rejected() {
    let app = TestApp::new();
    let mut file = AttachmentUpload::new("big.pdf", "application/pdf", vec![0u8; 11 * 1024 * 1024]);
    file.size_bytes = 10;

    let err = app.uploads.upload(42, "emp001", file).await.unwrap_err();
    assert!(matches!(err, AttachmentError::FileTooLarge { .. }));
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn non_pdf_is_rejected_before_storage() {
    let app = TestApp::new();
    app.records.add_request(leave_request(42)).unwrap();

    let file = AttachmentUpload::new("photo.png", "image/png", vec![0x89, 0x50, 0x4e, 0x47]);
    let err = app.uploads.upload(42, "emp001", file).await.unwrap_err();

    match err {
        AttachmentError::InvalidFileType { expected, actual } => {
            assert_eq!(expected, "application/pdf");
            assert_eq!(actual, "image/png");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn content_type_comparison_ignores_case_and_padding() {
    let app = TestApp::new();
    app.records.add_request(leave_request(42)).unwrap();

    let file = AttachmentUpload::new("a.pdf", " Application/PDF ", PDF_BYTES.to_vec());
    assert!(app.uploads.upload(42, "emp001", file).await.is_ok());
}

#[tokio::test]
async fn missing_request_keeps_the_stored_object() {
    let app = TestApp::new();

    let err = app
        .uploads
        .upload(77, "emp001", pdf_upload("certificate.pdf"))
        .await
        .unwrap_err();

    let key = match err {
        AttachmentError::RecordNotFound { request_id, ref key } => {
            assert_eq!(request_id, 77);
            key.clone()
        }
        ref other => panic!("unexpected error: {other:?}"),
    };
    assert_eq!(err.error_code(), "RECORD_NOT_FOUND");
    assert_eq!(app.stored_keys().await, vec![key]);
}

#[tokio::test]
async fn refused_write_is_permission_denied_and_leaves_record_alone() {
    let store = Arc::new(ReadOnlyStore::default());
    let records = MemoryRecordStore::new();
    records.add_request(leave_request(42)).unwrap();
    let service = AttachmentUploadService::new(
        store.clone(),
        Arc::new(records.clone()),
        AttachmentConfig::default(),
    );

    let err = service
        .upload(42, "emp001", pdf_upload("certificate.pdf"))
        .await
        .unwrap_err();

    assert!(matches!(err, AttachmentError::PermissionDenied(_)));
    assert_eq!(store.put_calls.load(Ordering::SeqCst), 1);
    assert_eq!(records.get(42).await.unwrap().unwrap().ref_pdf, None);
}

#[tokio::test]
async fn repeated_uploads_supersede_each_other() {
    let app = TestApp::new();
    app.records.add_request(leave_request(42)).unwrap();

    let first = app
        .uploads
        .upload(42, "emp001", pdf_upload("a.pdf"))
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = app
        .uploads
        .upload(42, "emp001", pdf_upload("b.pdf"))
        .await
        .unwrap();

    assert_ne!(first.ref_pdf, second.ref_pdf);
    assert_eq!(app.stored_keys().await.len(), 2);
    assert_eq!(
        app.records.get(42).await.unwrap().unwrap().ref_pdf,
        second.ref_pdf
    );
}
