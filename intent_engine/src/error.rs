use thiserror::Error;

/// Failure surfaced to the caller. Only two cases are fatal by design:
/// an unknown intent tag and a route that stays unresolved after the
/// fallback provider. Everything else is absorbed by the named default
/// policies (alias pass-through, 18-decimal default).
#[derive(Debug, Error)]
pub enum IntentError {
    #[error("unknown intent type: {0}")]
    UnknownIntentType(String),

    #[error("invalid intent: {0}")]
    InvalidIntent(String),

    #[error("no route available for the requested transfer")]
    RouteUnavailable(#[source] anyhow::Error),

    #[error("routing provider error: {0}")]
    Provider(#[source] anyhow::Error),
}

/// Quote-stage failure, classified so the aggregator can decide whether the
/// fallback provider applies.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// The primary provider reported "no available route"; the fallback
    /// swap provider applies.
    #[error("no available quotes for the requested transfer")]
    NoRoute,

    /// Both the primary and the fallback failed to produce a route.
    #[error("route quoting exhausted: {0}")]
    Exhausted(#[source] anyhow::Error),

    /// Transport/provider fault; propagates without fallback.
    #[error("provider error: {0}")]
    Provider(#[source] anyhow::Error),
}

impl From<QuoteError> for IntentError {
    fn from(err: QuoteError) -> Self {
        match err {
            QuoteError::NoRoute => IntentError::RouteUnavailable(anyhow::anyhow!(
                "no available quotes for the requested transfer"
            )),
            QuoteError::Exhausted(source) => IntentError::RouteUnavailable(source),
            QuoteError::Provider(source) => IntentError::Provider(source),
        }
    }
}
