//! S3 store integration tests.

use el_loader::results::read_event_details;
use el_loader::store::{clear_prefix, ObjectStore, S3Store};

use crate::common::LocalStackTestContext;

const BUCKET: &str = "el-loader-integration";

async fn context_or_skip() -> Option<LocalStackTestContext> {
    let ctx = LocalStackTestContext::new().await;
    if !ctx.is_available().await {
        eprintln!(
            "Skipping integration test: LocalStack not available at {}",
            ctx.endpoint
        );
        return None;
    }
    ctx.create_bucket(BUCKET).await.expect("create bucket");
    Some(ctx)
}

#[tokio::test]
async fn clear_prefix_removes_only_the_prefix() {
    let Some(ctx) = context_or_skip().await else {
        return;
    };

    ctx.upload_text(BUCKET, "events/run-a/part-0.csv", "a,b\n1,2\n")
        .await
        .unwrap();
    ctx.upload_text(BUCKET, "events/run-a/part-1.csv", "a,b\n3,4\n")
        .await
        .unwrap();
    ctx.upload_text(BUCKET, "dau/run-a/part-0.csv", "c,d\n5,6\n")
        .await
        .unwrap();

    let store = S3Store::new(ctx.s3.clone(), BUCKET);
    let removed = clear_prefix(&store, "events/run-a/").await.unwrap();
    assert_eq!(removed, 2);

    assert!(ctx.list_keys(BUCKET, "events/run-a/").await.unwrap().is_empty());
    assert_eq!(ctx.list_keys(BUCKET, "dau/run-a/").await.unwrap().len(), 1);
}

#[tokio::test]
async fn clear_never_written_prefix_is_noop() {
    let Some(ctx) = context_or_skip().await else {
        return;
    };

    let store = S3Store::new(ctx.s3.clone(), BUCKET);
    let removed = clear_prefix(&store, "events/never-written/").await.unwrap();
    assert_eq!(removed, 0);
}

#[tokio::test]
async fn get_roundtrips_object_bytes() {
    let Some(ctx) = context_or_skip().await else {
        return;
    };

    ctx.upload_text(BUCKET, "roundtrip/object.txt", "payload")
        .await
        .unwrap();

    let store = S3Store::new(ctx.s3.clone(), BUCKET);
    let bytes = store.get("roundtrip/object.txt").await.unwrap();
    assert_eq!(bytes, b"payload");
}

#[tokio::test]
async fn read_event_details_from_store() {
    let Some(ctx) = context_or_skip().await else {
        return;
    };

    let csv = "device_id,event_time,country,longitude,latitude,user_id\n\
               dev-1,2020-01-01 10:00:00,TR,29.01,41.02,u-1\n\
               dev-2,2020-01-01 10:05:00,DE,13.40,52.52,u-2\n";
    ctx.upload_text(BUCKET, "event_details/run-b/result.csv", csv)
        .await
        .unwrap();

    let store = S3Store::new(ctx.s3.clone(), BUCKET);
    let table = read_event_details(&store, "event_details/run-b/result.csv", 10)
        .await
        .unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table.for_country("TR").len(), 1);
    assert!(table.records()[0].has_location());
}
