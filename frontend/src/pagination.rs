//! Offset/limit collection of list endpoints.

use std::future::Future;

/// Requests `page_size` rows at a time, starting at offset 0, until a page
/// comes back shorter than requested. Pages are awaited one after another so
/// rows keep the backend's order. The first failing page aborts the whole
/// collection and its error is returned; nothing partial escapes.
///
/// When the total is an exact multiple of `page_size` the loop costs one
/// extra round that returns an empty page.
pub async fn collect_all<T, E, F, Fut>(page_size: usize, mut fetch_page: F) -> Result<Vec<T>, E>
where
    F: FnMut(usize, usize) -> Fut,
    Fut: Future<Output = Result<Vec<T>, E>>,
{
    let mut collected = Vec::new();
    if page_size == 0 {
        return Ok(collected);
    }

    let mut offset = 0;
    loop {
        let page = fetch_page(offset, page_size).await?;
        let short = page.len() < page_size;
        log::debug!("page at offset {} returned {} rows", offset, page.len());
        collected.extend(page);
        if short {
            return Ok(collected);
        }
        offset += page_size;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::cell::RefCell;

    fn source(total: usize) -> Vec<usize> {
        (0..total).collect()
    }

    /// Serves `rows` like `?skip=&limit=` would and records every request.
    fn run(rows: Vec<usize>, page_size: usize) -> (Vec<usize>, Vec<(usize, usize)>) {
        let calls = RefCell::new(Vec::new());
        let result = block_on(collect_all(page_size, |offset, limit| {
            calls.borrow_mut().push((offset, limit));
            let page: Vec<usize> = rows.iter().skip(offset).take(limit).copied().collect();
            async move { Ok::<_, String>(page) }
        }))
        .unwrap();
        (result, calls.into_inner())
    }

    #[test]
    fn stops_on_short_page() {
        let (rows, calls) = run(source(250), 100);
        assert_eq!(calls, vec![(0, 100), (100, 100), (200, 100)]);
        assert_eq!(rows, source(250));
    }

    #[test]
    fn exact_multiple_needs_one_empty_round() {
        let (rows, calls) = run(source(200), 100);
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[2], (200, 100));
        assert_eq!(rows.len(), 200);
    }

    #[test]
    fn empty_source_is_one_request() {
        let (rows, calls) = run(Vec::new(), 10);
        assert!(rows.is_empty());
        assert_eq!(calls, vec![(0, 10)]);
    }

    #[test]
    fn keeps_duplicates_and_order() {
        let (rows, _) = run(vec![3, 3, 1, 2, 1], 2);
        assert_eq!(rows, vec![3, 3, 1, 2, 1]);
    }

    #[test]
    fn failing_page_aborts_collection() {
        let calls = RefCell::new(0);
        let result: Result<Vec<u32>, String> = block_on(collect_all(10, |offset, _| {
            *calls.borrow_mut() += 1;
            let outcome = if offset == 10 {
                Err("Failed on page 1. Status: 500".to_string())
            } else {
                Ok(vec![1; 10])
            };
            async move { outcome }
        }));
        assert_eq!(result, Err("Failed on page 1. Status: 500".to_string()));
        assert_eq!(*calls.borrow(), 2);
    }

    #[test]
    fn zero_page_size_makes_no_requests() {
        let (rows, calls) = run(source(5), 0);
        assert!(rows.is_empty());
        assert!(calls.is_empty());
    }
}
