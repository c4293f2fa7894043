//! Mutation Plumbing
//!
//! Error classification, the in-flight guard that keeps a control from
//! submitting twice, and the timeout applied to every backend mutation.

use serde::Deserialize;
use std::future::Future;
use std::task::Poll;

/// Failure of a user-triggered mutation, shown as one toast message
#[derive(Debug, Clone, PartialEq)]
pub enum MutationError {
    /// The request was rejected as malformed (e.g. not a permutation)
    Validation(String),
    /// Transport, storage or server-side failure, including timeouts
    Remote(String),
}

impl std::fmt::Display for MutationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MutationError::Validation(msg) => write!(f, "输入无效: {}", msg),
            MutationError::Remote(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for MutationError {}

/// Error payload of a rejected backend command
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CommandError {
    pub kind: String,
    pub message: String,
}

impl From<CommandError> for MutationError {
    fn from(e: CommandError) -> Self {
        match e.kind.as_str() {
            "Validation" => MutationError::Validation(e.message),
            _ => MutationError::Remote(e.message),
        }
    }
}

/// In-flight state of one mutation control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InFlight {
    #[default]
    Idle,
    Pending,
}

impl InFlight {
    /// Claim the control. Returns false if a request is already pending.
    pub fn begin(&mut self) -> bool {
        if *self == InFlight::Pending {
            return false;
        }
        *self = InFlight::Pending;
        true
    }

    /// Release after the response (success or error) arrived
    pub fn finish(&mut self) {
        *self = InFlight::Idle;
    }

    pub fn is_pending(&self) -> bool {
        *self == InFlight::Pending
    }
}

pub fn timeout_message(timeout_ms: u64) -> String {
    if timeout_ms % 1000 == 0 {
        format!("请求超时 ({} s)", timeout_ms / 1000)
    } else {
        format!("请求超时 ({} ms)", timeout_ms)
    }
}

/// Resolve with `request`, or with `Remote` once `timer` fires first
pub async fn race_timeout<F, T, D>(request: F, timer: D, timeout_ms: u64) -> Result<T, MutationError>
where
    F: Future<Output = Result<T, MutationError>>,
    D: Future<Output = ()>,
{
    let mut request = std::pin::pin!(request);
    let mut timer = std::pin::pin!(timer);

    std::future::poll_fn(|cx| {
        if let Poll::Ready(result) = request.as_mut().poll(cx) {
            return Poll::Ready(result);
        }
        if timer.as_mut().poll(cx).is_ready() {
            return Poll::Ready(Err(MutationError::Remote(timeout_message(timeout_ms))));
        }
        Poll::Pending
    })
    .await
}

/// Run `request` with a browser timer as the deadline
pub async fn with_timeout<F, T>(request: F, timeout_ms: u64) -> Result<T, MutationError>
where
    F: Future<Output = Result<T, MutationError>>,
{
    let millis = u32::try_from(timeout_ms).unwrap_or(u32::MAX);
    race_timeout(request, gloo_timers::future::TimeoutFuture::new(millis), timeout_ms).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::{pending, ready};
    use std::task::{Context, Waker};

    fn poll_once<F: Future>(fut: F) -> Poll<F::Output> {
        let mut fut = std::pin::pin!(fut);
        let mut cx = Context::from_waker(Waker::noop());
        fut.as_mut().poll(&mut cx)
    }

    #[test]
    fn test_command_error_classification() {
        let validation = CommandError { kind: "Validation".into(), message: "client 3 is missing".into() };
        assert_eq!(MutationError::from(validation), MutationError::Validation("client 3 is missing".into()));

        let storage = CommandError { kind: "Storage".into(), message: "disk I/O error".into() };
        assert_eq!(MutationError::from(storage), MutationError::Remote("disk I/O error".into()));

        let missing = CommandError { kind: "NotFound".into(), message: "Node 4 not found".into() };
        assert!(matches!(MutationError::from(missing), MutationError::Remote(_)));
    }

    #[test]
    fn test_in_flight_refuses_second_submit() {
        let mut state = InFlight::default();
        assert!(state.begin());
        assert!(state.is_pending());
        assert!(!state.begin());
        state.finish();
        assert!(state.begin());
    }

    #[test]
    fn test_request_wins_race() {
        let result = poll_once(race_timeout(ready(Ok::<_, MutationError>(5)), pending::<()>(), 1000));
        assert_eq!(result, Poll::Ready(Ok(5)));
    }

    #[test]
    fn test_timer_wins_race() {
        let result = poll_once(race_timeout(pending::<Result<u32, MutationError>>(), ready(()), 15_000));
        assert_eq!(result, Poll::Ready(Err(MutationError::Remote("请求超时 (15 s)".into()))));
    }

    #[test]
    fn test_still_pending() {
        let result = poll_once(race_timeout(pending::<Result<u32, MutationError>>(), pending::<()>(), 1));
        assert!(result.is_pending());
    }

    #[test]
    fn test_timeout_message_units() {
        assert_eq!(timeout_message(2500), "请求超时 (2500 ms)");
    }
}
