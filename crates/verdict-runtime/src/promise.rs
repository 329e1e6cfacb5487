//! Awaitable results handed out by asynchronous mocks

use crate::error::TestError;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// A cloneable future that settles once with `Ok(T)` or `Err(TestError)`.
///
/// Every clone observes the same outcome. The wrapped future does not run
/// until the promise (or one of its clones) is awaited.
pub struct Promise<T: Clone> {
    inner: Shared<BoxFuture<'static, Result<T, TestError>>>,
}

impl<T> Promise<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = Result<T, TestError>> + Send + 'static,
    {
        Self {
            inner: future.boxed().shared(),
        }
    }

    /// A promise that settles successfully with `value`.
    pub fn resolved(value: T) -> Self {
        Self::new(async move { Ok(value) })
    }

    /// A promise that settles with `error`.
    pub fn rejected(error: impl Into<TestError>) -> Self {
        let error = error.into();
        Self::new(async move { Err(error) })
    }

    /// The outcome, if the promise has already been driven to completion.
    pub fn peek(&self) -> Option<&Result<T, TestError>> {
        self.inner.peek()
    }

    pub fn is_settled(&self) -> bool {
        self.peek().is_some()
    }
}

impl<T: Clone> Clone for Promise<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Default for Promise<T>
where
    T: Clone + Default + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::resolved(T::default())
    }
}

impl<T> Future for Promise<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Output = Result<T, TestError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.get_mut().inner.poll_unpin(cx)
    }
}

impl<T> fmt::Debug for Promise<T>
where
    T: Clone + fmt::Debug + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.peek() {
            Some(outcome) => f.debug_tuple("Promise").field(outcome).finish(),
            None => f.write_str("Promise(<pending>)"),
        }
    }
}
