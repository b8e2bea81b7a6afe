use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;

/// One archived resume per owner; a new upload overwrites the previous object.
pub fn resume_archive_key(owner_id: Uuid) -> String {
    format!("resumes/{owner_id}.pdf")
}

/// Uploads the original resume PDF to the archive bucket and returns its key.
pub async fn archive_resume(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    owner_id: Uuid,
    document: Bytes,
) -> Result<String, AppError> {
    let key = resume_archive_key(owner_id);
    s3.put_object()
        .bucket(bucket)
        .key(&key)
        .body(ByteStream::from(document))
        .content_type("application/pdf")
        .send()
        .await
        .map_err(|e| AppError::S3(format!("Resume upload failed: {e}")))?;

    info!("Archived resume to s3://{}/{}", bucket, key);
    Ok(key)
}
