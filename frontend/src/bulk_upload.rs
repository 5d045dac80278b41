use std::fmt;
use std::future::Future;

use crate::error::ApiError;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub successful: usize,
    pub failed: Vec<String>,
    /// Set when the session expired mid-batch; the remaining files were not
    /// attempted.
    pub interrupted: bool,
}

impl BatchSummary {
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Bulk upload finished. Successful: {}, Failed: {}.",
            self.successful,
            self.failed_count()
        )?;
        if !self.failed.is_empty() {
            write!(f, " Failed files: {}.", self.failed.join(", "))?;
        }
        Ok(())
    }
}

pub fn progress_message(index: usize, total: usize, name: &str) -> String {
    format!("Processing file {} of {}: {}", index + 1, total, name)
}

/// Uploads `files` one at a time. A failed file is recorded and the batch
/// moves on; only an expired session or cancellation stops it.
pub async fn upload_batch<F, N, U, Fut, P>(
    files: Vec<F>,
    name_of: N,
    mut upload_one: U,
    mut on_progress: P,
) -> BatchSummary
where
    N: Fn(&F) -> String,
    U: FnMut(F) -> Fut,
    Fut: Future<Output = Result<(), ApiError>>,
    P: FnMut(String),
{
    let total = files.len();
    let mut summary = BatchSummary::default();

    for (index, file) in files.into_iter().enumerate() {
        let name = name_of(&file);
        on_progress(progress_message(index, total, &name));
        match upload_one(file).await {
            Ok(()) => summary.successful += 1,
            Err(err) if err.is_terminal() => {
                log::warn!("bulk upload stopped at {}: {}", name, err);
                summary.interrupted = true;
                break;
            }
            Err(err) => {
                log::error!("upload of {} failed: {}", name, err);
                summary.failed.push(name);
            }
        }
    }

    log::info!(
        "bulk upload done: {} ok, {} failed",
        summary.successful,
        summary.failed_count()
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::cell::RefCell;

    fn files() -> Vec<String> {
        vec![
            "2023-01.041".to_string(),
            "2023-02.041".to_string(),
            "2023-03.041".to_string(),
        ]
    }

    #[test]
    fn failure_in_the_middle_does_not_stop_the_batch() {
        let attempted = RefCell::new(Vec::new());
        let progress = RefCell::new(Vec::new());

        let summary = block_on(upload_batch(
            files(),
            |f| f.clone(),
            |f| {
                attempted.borrow_mut().push(f.clone());
                let outcome = if f == "2023-02.041" {
                    Err(ApiError::Rejected(
                        "POST /files/upload failed: 500 Internal Server Error".to_string(),
                    ))
                } else {
                    Ok(())
                };
                async move { outcome }
            },
            |msg| progress.borrow_mut().push(msg),
        ));

        assert_eq!(attempted.borrow().len(), 3);
        assert_eq!(summary.successful, 2);
        assert_eq!(summary.failed_count(), 1);
        assert!(summary
            .to_string()
            .starts_with("Bulk upload finished. Successful: 2, Failed: 1."));
        assert!(summary.to_string().ends_with("Failed files: 2023-02.041."));
        assert_eq!(
            progress.borrow()[2],
            "Processing file 3 of 3: 2023-03.041"
        );
    }

    #[test]
    fn network_failures_count_as_failed() {
        let summary = block_on(upload_batch(
            files(),
            |f| f.clone(),
            |_| async { Err::<(), _>(ApiError::Network) },
            |_| {},
        ));
        assert_eq!(summary.successful, 0);
        assert_eq!(summary.failed_count(), 3);
        assert!(!summary.interrupted);
    }

    #[test]
    fn expired_session_stops_the_batch() {
        let attempted = RefCell::new(0);
        let summary = block_on(upload_batch(
            files(),
            |f| f.clone(),
            |_| {
                *attempted.borrow_mut() += 1;
                async { Err::<(), _>(ApiError::AuthExpired) }
            },
            |_| {},
        ));
        assert_eq!(*attempted.borrow(), 1);
        assert!(summary.interrupted);
        assert_eq!(summary.failed_count(), 0);
    }

    #[test]
    fn clean_batch_has_no_failure_list() {
        let summary = block_on(upload_batch(files(), |f| f.clone(), |_| async { Ok::<(), ApiError>(()) }, |_| {}));
        assert_eq!(
            summary.to_string(),
            "Bulk upload finished. Successful: 3, Failed: 0."
        );
    }
}
