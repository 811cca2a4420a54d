//! Consent signals gating resolution and persistence.
//!
//! A [`Consent`] is a cloneable, awaitable handle that settles at most once.
//! There is no timeout: a consent whose [`ConsentGrant`] is never settled
//! (or is dropped unsettled) stays pending forever, and so does anything
//! awaiting it. Bounding that wait is the caller's responsibility.

use tokio::sync::watch;

/// Awaitable consent signal.
#[derive(Debug, Clone)]
pub struct Consent {
    state: State,
}

#[derive(Debug, Clone)]
enum State {
    Settled,
    Pending(watch::Receiver<bool>),
}

/// The settling side of a pending [`Consent`].
#[derive(Debug)]
pub struct ConsentGrant {
    tx: watch::Sender<bool>,
}

impl Consent {
    /// A consent that has already settled.
    #[must_use]
    pub fn granted() -> Self {
        Self { state: State::Settled }
    }

    /// A consent that settles when the returned grant is settled.
    #[must_use]
    pub fn pending() -> (ConsentGrant, Self) {
        let (tx, rx) = watch::channel(false);
        (ConsentGrant { tx }, Self { state: State::Pending(rx) })
    }

    /// Returns `true` if awaiting [`Consent::settled`] would complete immediately.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        match &self.state {
            State::Settled => true,
            State::Pending(rx) => *rx.borrow(),
        }
    }

    /// Waits until the consent settles.
    pub async fn settled(&self) {
        let State::Pending(rx) = &self.state else {
            return;
        };
        let mut rx = rx.clone();
        let abandoned = rx.wait_for(|settled| *settled).await.is_err();
        if abandoned {
            std::future::pending::<()>().await;
        }
    }
}

impl ConsentGrant {
    /// Settles the consent, waking every waiter.
    pub fn settle(self) {
        self.tx.send_replace(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn granted_is_immediately_settled() {
        let consent = Consent::granted();
        assert!(consent.is_settled());
        consent.settled().await;
    }

    #[tokio::test]
    async fn pending_settles_all_clones() {
        let (grant, consent) = Consent::pending();
        let other = consent.clone();
        assert!(!consent.is_settled());

        let waiter = tokio::spawn(async move { other.settled().await });
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        grant.settle();
        waiter.await.unwrap();
        assert!(consent.is_settled());
    }

    #[tokio::test]
    async fn dropped_grant_never_settles() {
        let (grant, consent) = Consent::pending();
        drop(grant);
        let waiter = tokio::spawn(async move { consent.settled().await });
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
        assert!(!waiter.is_finished());
        waiter.abort();
    }
}
