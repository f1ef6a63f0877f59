use crate::error::AppError;

/// bcrypt is CPU bound, so hashing runs on the blocking pool.
pub async fn hash_password(raw: String, cost: u32) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(raw, cost))
        .await
        .map_err(|e| AppError::Internal(format!("hash task: {}", e)))?
        .map_err(|e| AppError::Internal(format!("hash password: {}", e)))
}

/// A malformed stored hash counts as a mismatch.
pub async fn verify_password(raw: String, hash: String) -> Result<bool, AppError> {
    let verified = tokio::task::spawn_blocking(move || bcrypt::verify(raw, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("verify task: {}", e)))?;
    match verified {
        Ok(ok) => Ok(ok),
        Err(e) => {
            tracing::warn!(error = %e, "stored password hash is unreadable");
            Ok(false)
        }
    }
}
