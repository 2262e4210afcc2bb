//! Canned job search for tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{JobSearch, JobSearchError, SearchQuery};

pub enum Canned {
    Postings(Vec<String>),
    QuotaExhausted,
}

pub struct StubJobSearch {
    canned: Canned,
    calls: AtomicUsize,
}

impl StubJobSearch {
    pub fn postings<I, S>(postings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            canned: Canned::Postings(postings.into_iter().map(Into::into).collect()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn quota_exhausted() -> Self {
        Self {
            canned: Canned::QuotaExhausted,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JobSearch for StubJobSearch {
    async fn search(&self, _query: &SearchQuery) -> Result<Vec<String>, JobSearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.canned {
            Canned::Postings(p) => Ok(p.clone()),
            Canned::QuotaExhausted => Err(JobSearchError::QuotaExhausted),
        }
    }
}
