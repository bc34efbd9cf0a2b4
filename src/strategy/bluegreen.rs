// ABOUTME: Blue/green slot resolution against the target's current-slot endpoint.
// ABOUTME: Strict two-value alternation; anything else the target reports is a hard failure.

use bytes::Bytes;
use snafu::ResultExt;

use crate::deploy::{DeployError, SlotQuerySnafu};
use crate::target::{Endpoint, Transport};
use crate::types::Slot;

/// Query the live slot and return the other one.
///
/// Issues exactly one call. The body is trimmed before matching; empty or
/// unrecognized content fails instead of falling back to a default.
pub async fn resolve_slot<T: Transport + ?Sized>(target: &T) -> Result<Slot, DeployError> {
    let resp = target
        .call(Endpoint::CurrentSlot, "text/plain", Bytes::new())
        .await
        .context(SlotQuerySnafu)?;

    if !(200..300).contains(&resp.status) {
        return Err(DeployError::SlotQueryStatus {
            status: resp.status,
        });
    }

    let reported = resp.text();
    let current: Slot = reported
        .parse()
        .map_err(|_| DeployError::UnknownSlot { reported })?;

    let next = current.next();
    tracing::debug!(current = %current, next = %next, "resolved slot");
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deploy::DeployErrorKind;
    use crate::target::{TargetResponse, TransportError};
    use async_trait::async_trait;
    use proptest::prelude::*;

    struct Reports(u16, String);

    fn reports(status: u16, body: &str) -> Reports {
        Reports(status, body.to_string())
    }

    #[async_trait]
    impl Transport for Reports {
        async fn call(
            &self,
            endpoint: Endpoint<'_>,
            _content_type: &str,
            _body: Bytes,
        ) -> Result<TargetResponse, TransportError> {
            assert_eq!(endpoint.path(), "/deploy");
            Ok(TargetResponse {
                status: self.0,
                body: Bytes::from(self.1.clone()),
            })
        }
    }

    #[tokio::test]
    async fn alternates_between_blue_and_green() {
        assert_eq!(resolve_slot(&reports(200, "blue")).await.unwrap(), Slot::Green);
        assert_eq!(resolve_slot(&reports(200, "green\n")).await.unwrap(), Slot::Blue);
    }

    #[tokio::test]
    async fn empty_body_is_unknown() {
        let err = resolve_slot(&reports(200, "")).await.unwrap_err();
        assert_eq!(err.kind(), DeployErrorKind::UnknownSlot);
    }

    #[tokio::test]
    async fn error_status_is_a_query_failure() {
        let err = resolve_slot(&reports(503, "blue")).await.unwrap_err();
        assert_eq!(err.kind(), DeployErrorKind::SlotQuery);
        assert_eq!(err.status(), Some(503));
    }

    proptest! {
        #[test]
        fn anything_but_the_two_slots_is_rejected(reported in "[a-zA-Z0-9 _-]{0,12}") {
            prop_assume!(!matches!(reported.trim(), "blue" | "green"));

            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let err = rt.block_on(resolve_slot(&Reports(200, reported))).unwrap_err();
            prop_assert_eq!(err.kind(), DeployErrorKind::UnknownSlot);
        }
    }
}
