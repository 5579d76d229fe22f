#[cfg(test)]
mod tests {
    use serde_json::{json, Value};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use upipay_config::{CollectMode, RazorpayConfig};

    use crate::client::{BoxFuture, GatewayClient, GatewayEndpoint, GatewayError};
    use crate::error::RazorpayError;
    use crate::logic::{ContactDetails, Deadline, GatewaySession};
    use crate::payout::{upi_payout, PayoutRequest, SANDBOX_PAYOUT_ID};

    /// Replays scripted responses in order and records every call made.
    struct RecordingGateway {
        responses: Mutex<VecDeque<Result<Value, GatewayError>>>,
        calls: Mutex<Vec<(GatewayEndpoint, Value, Duration)>>,
        latency: Duration,
    }

    impl RecordingGateway {
        fn new(responses: Vec<Result<Value, GatewayError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: Mutex::new(Vec::new()),
                latency: Duration::ZERO,
            }
        }

        /// Each call answers only after `latency` has elapsed.
        fn with_latency(self, latency: Duration) -> Self {
            Self { latency, ..self }
        }

        fn replying(responses: Vec<Value>) -> Self {
            Self::new(responses.into_iter().map(Ok).collect())
        }

        fn endpoints(&self) -> Vec<GatewayEndpoint> {
            self.calls.lock().unwrap().iter().map(|c| c.0).collect()
        }

        fn payload(&self, index: usize) -> Value {
            self.calls.lock().unwrap()[index].1.clone()
        }

        fn timeout(&self, index: usize) -> Duration {
            self.calls.lock().unwrap()[index].2
        }
    }

    impl GatewayClient for RecordingGateway {
        fn call(
            &self,
            endpoint: GatewayEndpoint,
            payload: Value,
            timeout: Duration,
        ) -> BoxFuture<'_, Value, GatewayError> {
            self.calls.lock().unwrap().push((endpoint, payload, timeout));
            let next = self.responses.lock().unwrap().pop_front();
            let latency = self.latency;
            Box::pin(async move {
                tokio::time::sleep(latency).await;
                next.unwrap_or_else(|| {
                    Err(GatewayError::Transport {
                        endpoint,
                        message: "no scripted response".to_string(),
                        timed_out: false,
                    })
                })
            })
        }
    }

    fn transport_failure(endpoint: GatewayEndpoint) -> GatewayError {
        GatewayError::Transport {
            endpoint,
            message: "connection reset by peer".to_string(),
            timed_out: false,
        }
    }

    fn test_config() -> RazorpayConfig {
        RazorpayConfig {
            key_id: "rzp_test_key".to_string(),
            key_secret: "rzp_test_secret".to_string(),
            account_number: Some("7878780080316316".to_string()),
            ..RazorpayConfig::default()
        }
    }

    fn payout_request<'r>(amount: &'r str, user_id: &'r str, upi_id: &'r str) -> PayoutRequest<'r> {
        PayoutRequest {
            amount_major_units: Some(amount),
            user_id: Some(user_id),
            upi_id: Some(upi_id),
        }
    }

    // --- Collect ---

    #[tokio::test]
    async fn test_collect_rejects_non_numeric_amount_without_calling_gateway() {
        let gateway = RecordingGateway::replying(vec![json!({ "id": "order_1" })]);
        let config = test_config();
        let session = GatewaySession::new(&gateway, &config);

        let err = session.collect("12.50", "u1").await.unwrap_err();

        assert!(matches!(err, RazorpayError::InvalidAmount(_)));
        assert!(gateway.endpoints().is_empty());
    }

    #[tokio::test]
    async fn test_collect_missing_parameters_without_calling_gateway() {
        let gateway = RecordingGateway::replying(vec![]);
        let config = test_config();
        let session = GatewaySession::new(&gateway, &config);

        let err = session.collect("500", "").await.unwrap_err();
        assert!(matches!(err, RazorpayError::MissingParameters));

        let err = session.collect("", "u1").await.unwrap_err();
        assert!(matches!(err, RazorpayError::MissingParameters));

        assert!(gateway.endpoints().is_empty());
    }

    #[tokio::test]
    async fn test_collect_creates_order_and_relays_response() {
        let order = json!({ "id": "order_1", "amount": 50000, "status": "created" });
        let gateway = RecordingGateway::replying(vec![order.clone()]);
        let config = test_config();
        let session = GatewaySession::new(&gateway, &config);

        let response = session.collect("500", "u1").await.unwrap();

        assert_eq!(response, order);
        assert_eq!(gateway.endpoints(), vec![GatewayEndpoint::Orders]);
        assert_eq!(
            gateway.payload(0),
            json!({
                "amount": 50000,
                "currency": "INR",
                "payment_capture": 1,
                "notes": { "user_id": "u1" },
            })
        );
    }

    #[tokio::test]
    async fn test_collect_payment_link_mode() {
        let gateway = RecordingGateway::replying(vec![json!({ "id": "plink_1" })]);
        let config = RazorpayConfig {
            collect_mode: CollectMode::PaymentLink,
            ..test_config()
        };
        let session = GatewaySession::new(&gateway, &config);

        let response = session.collect("20", "u7").await.unwrap();

        assert_eq!(response["id"], "plink_1");
        assert_eq!(gateway.endpoints(), vec![GatewayEndpoint::PaymentLinks]);
        let payload = gateway.payload(0);
        assert_eq!(payload["amount"], 2000);
        assert_eq!(payload["upi_link"], true);
        assert_eq!(payload["notes"]["user_id"], "u7");
        assert!(payload["description"].as_str().unwrap().contains("u7"));
    }

    #[tokio::test]
    async fn test_identical_collects_make_independent_calls() {
        let gateway = RecordingGateway::replying(vec![
            json!({ "id": "order_1" }),
            json!({ "id": "order_2" }),
        ]);
        let config = test_config();
        let session = GatewaySession::new(&gateway, &config);

        let first = session.collect("100", "u1").await.unwrap();
        let second = session.collect("100", "u1").await.unwrap();

        assert_eq!(first["id"], "order_1");
        assert_eq!(second["id"], "order_2");
        assert_eq!(gateway.endpoints().len(), 2);
        assert_eq!(gateway.payload(0), gateway.payload(1));
    }

    #[tokio::test]
    async fn test_collect_relays_gateway_error_document() {
        let rejection = json!({ "error": { "code": "BAD_REQUEST_ERROR", "description": "amount too low" } });
        let gateway = RecordingGateway::replying(vec![rejection.clone()]);
        let config = test_config();
        let session = GatewaySession::new(&gateway, &config);

        assert_eq!(session.collect("0", "u1").await.unwrap(), rejection);
    }

    #[tokio::test]
    async fn test_collect_transport_failure() {
        let gateway = RecordingGateway::new(vec![Err(transport_failure(GatewayEndpoint::Orders))]);
        let config = test_config();
        let session = GatewaySession::new(&gateway, &config);

        let err = session.collect("500", "u1").await.unwrap_err();

        assert!(matches!(err, RazorpayError::CollectionRequestFailed(_)));
        assert_eq!(err.to_string(), "Failed to initiate UPI Collect request");
    }

    // --- Contacts and fund accounts ---

    #[tokio::test]
    async fn test_create_contact_sends_given_details() {
        let gateway = RecordingGateway::replying(vec![json!({ "id": "cont_9" })]);
        let config = test_config();
        let session = GatewaySession::new(&gateway, &config);
        let contact = ContactDetails {
            name: "Asha".to_string(),
            email: "asha@example.in".to_string(),
            phone: "9876543210".to_string(),
        };

        let id = session.create_contact(&contact).await.unwrap();

        assert_eq!(id, "cont_9");
        assert_eq!(
            gateway.payload(0),
            json!({
                "name": "Asha",
                "email": "asha@example.in",
                "contact": "9876543210",
                "type": "customer",
            })
        );
    }

    #[tokio::test]
    async fn test_create_fund_account_requires_string_id() {
        let gateway = RecordingGateway::replying(vec![json!({ "id": 42 })]);
        let config = test_config();
        let session = GatewaySession::new(&gateway, &config);

        let err = session
            .create_fund_account("cont_1", "asha@upi")
            .await
            .unwrap_err();

        assert!(matches!(err, RazorpayError::FundAccountIdMissing));
        assert_eq!(
            gateway.payload(0),
            json!({
                "contact_id": "cont_1",
                "account_type": "vpa",
                "vpa": { "address": "asha@upi" },
            })
        );
    }

    // --- Payouts ---

    #[tokio::test]
    async fn test_payout_runs_three_steps_in_order() {
        let gateway = RecordingGateway::replying(vec![
            json!({ "id": "cont_1" }),
            json!({ "id": "fa_1" }),
            json!({ "id": "pout_1", "status": "processed" }),
        ]);
        let config = test_config();
        let session = GatewaySession::new(&gateway, &config);

        let response = upi_payout(&session, payout_request("500", "u1", "asha@upi"))
            .await
            .unwrap();

        assert_eq!(response["id"], "pout_1");
        assert_eq!(
            gateway.endpoints(),
            vec![
                GatewayEndpoint::Contacts,
                GatewayEndpoint::FundAccounts,
                GatewayEndpoint::Payouts,
            ]
        );

        let contact = gateway.payload(0);
        assert_eq!(contact["name"], "User u1");
        assert_eq!(contact["email"], "user@example.com");
        assert_eq!(contact["contact"], "9999999999");

        assert_eq!(gateway.payload(1)["contact_id"], "cont_1");

        assert_eq!(
            gateway.payload(2),
            json!({
                "account_number": "7878780080316316",
                "fund_account_id": "fa_1",
                "amount": 50000,
                "currency": "INR",
                "mode": "UPI",
                "purpose": "refund",
                "queue_if_low_balance": true,
                "notes": { "user_id": "u1" },
            })
        );
    }

    #[tokio::test]
    async fn test_payout_stops_when_contact_has_no_id() {
        let gateway = RecordingGateway::replying(vec![
            json!({ "error": { "description": "invalid contact" } }),
            json!({ "id": "fa_1" }),
            json!({ "id": "pout_1" }),
        ]);
        let config = test_config();
        let session = GatewaySession::new(&gateway, &config);

        let err = upi_payout(&session, payout_request("500", "u1", "asha@upi"))
            .await
            .unwrap_err();

        assert!(matches!(err, RazorpayError::ContactIdMissing));
        assert_eq!(gateway.endpoints(), vec![GatewayEndpoint::Contacts]);
    }

    #[tokio::test]
    async fn test_payout_stops_when_fund_account_fails() {
        let gateway = RecordingGateway::new(vec![
            Ok(json!({ "id": "cont_1" })),
            Err(transport_failure(GatewayEndpoint::FundAccounts)),
        ]);
        let config = test_config();
        let session = GatewaySession::new(&gateway, &config);

        let err = upi_payout(&session, payout_request("500", "u1", "asha@upi"))
            .await
            .unwrap_err();

        assert!(matches!(err, RazorpayError::FundAccountCreationFailed(_)));
        assert_eq!(gateway.endpoints().len(), 2);
    }

    #[tokio::test]
    async fn test_payout_stops_when_fund_account_has_no_id() {
        let gateway = RecordingGateway::replying(vec![
            json!({ "id": "cont_1" }),
            json!({ "entity": "fund_account", "active": true }),
            json!({ "id": "pout_1" }),
        ]);
        let config = test_config();
        let session = GatewaySession::new(&gateway, &config);

        let err = upi_payout(&session, payout_request("500", "u1", "asha@upi"))
            .await
            .unwrap_err();

        assert!(matches!(err, RazorpayError::FundAccountIdMissing));
        assert_eq!(
            gateway.endpoints(),
            vec![GatewayEndpoint::Contacts, GatewayEndpoint::FundAccounts]
        );
    }

    #[tokio::test]
    async fn test_payout_transport_failure_on_final_step() {
        let gateway = RecordingGateway::new(vec![
            Ok(json!({ "id": "cont_1" })),
            Ok(json!({ "id": "fa_1" })),
            Err(transport_failure(GatewayEndpoint::Payouts)),
        ]);
        let config = test_config();
        let session = GatewaySession::new(&gateway, &config);

        let err = upi_payout(&session, payout_request("500", "u1", "asha@upi"))
            .await
            .unwrap_err();

        assert!(matches!(err, RazorpayError::PayoutCreationFailed(_)));
        assert_eq!(err.to_string(), "Failed to process UPI PayOut");
    }

    #[tokio::test]
    async fn test_payout_forwards_rejected_payout_response() {
        let rejection = json!({ "error": { "code": "BAD_REQUEST_ERROR", "description": "insufficient balance" } });
        let gateway = RecordingGateway::replying(vec![
            json!({ "id": "cont_1" }),
            json!({ "id": "fa_1" }),
            rejection.clone(),
        ]);
        let config = test_config();
        let session = GatewaySession::new(&gateway, &config);

        let response = upi_payout(&session, payout_request("500", "u1", "asha@upi"))
            .await
            .unwrap();

        assert_eq!(response, rejection);
    }

    #[tokio::test]
    async fn test_sandbox_payout_skips_payout_endpoint() {
        let gateway = RecordingGateway::replying(vec![
            json!({ "id": "cont_1" }),
            json!({ "id": "fa_1" }),
        ]);
        let config = RazorpayConfig {
            sandbox_mode: true,
            account_number: None,
            ..test_config()
        };
        let session = GatewaySession::new(&gateway, &config);

        let response = upi_payout(&session, payout_request("500", "u1", "asha@upi"))
            .await
            .unwrap();

        assert_eq!(response["id"], SANDBOX_PAYOUT_ID);
        assert_eq!(response["status"], "processed");
        assert_eq!(response["amount"], 50000);
        assert_eq!(response["fund_account_id"], "fa_1");
        assert!(!gateway.endpoints().contains(&GatewayEndpoint::Payouts));
    }

    #[tokio::test]
    async fn test_payout_without_source_account_fails_before_any_call() {
        let gateway = RecordingGateway::replying(vec![json!({ "id": "cont_1" })]);
        let config = RazorpayConfig {
            account_number: None,
            ..test_config()
        };
        let session = GatewaySession::new(&gateway, &config);

        let err = upi_payout(&session, payout_request("500", "u1", "asha@upi"))
            .await
            .unwrap_err();

        assert!(matches!(err, RazorpayError::ConfigError(_)));
        assert!(gateway.endpoints().is_empty());
    }

    #[tokio::test]
    async fn test_payout_validates_input_before_any_call() {
        let gateway = RecordingGateway::replying(vec![json!({ "id": "cont_1" })]);
        let config = test_config();
        let session = GatewaySession::new(&gateway, &config);

        let err = upi_payout(&session, payout_request("five", "u1", "asha@upi"))
            .await
            .unwrap_err();
        assert!(matches!(err, RazorpayError::InvalidAmount(_)));

        let missing_upi = PayoutRequest {
            upi_id: None,
            ..payout_request("500", "u1", "")
        };
        let err = upi_payout(&session, missing_upi).await.unwrap_err();
        assert!(matches!(err, RazorpayError::MissingParameters));

        assert!(gateway.endpoints().is_empty());
    }

    // --- Deadlines ---

    #[test]
    fn test_deadline_remaining() {
        assert!(Deadline::after(Duration::ZERO).remaining().is_none());
        let left = Deadline::after(Duration::from_secs(30)).remaining().unwrap();
        assert!(left <= Duration::from_secs(30));
        assert!(left > Duration::from_secs(29));
    }

    #[tokio::test]
    async fn test_expired_deadline_stops_before_calling_gateway() {
        let gateway = RecordingGateway::replying(vec![json!({ "id": "cont_1" })]);
        let config = test_config();
        let session =
            GatewaySession::new(&gateway, &config).with_deadline(Deadline::after(Duration::ZERO));

        let err = upi_payout(&session, payout_request("500", "u1", "asha@upi"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RazorpayError::DeadlineExceeded {
                endpoint: GatewayEndpoint::Contacts
            }
        ));
        assert!(gateway.endpoints().is_empty());
    }

    #[test]
    fn test_unrepresentable_deadline_never_expires() {
        let deadline = Deadline::after(Duration::MAX);
        assert_eq!(deadline.remaining(), Some(Duration::MAX));
    }

    #[tokio::test]
    async fn test_deadline_expiring_between_steps_stops_payout() {
        let gateway = RecordingGateway::replying(vec![
            json!({ "id": "cont_1" }),
            json!({ "id": "fa_1" }),
            json!({ "id": "pout_1" }),
        ])
        .with_latency(Duration::from_millis(150));
        let config = test_config();
        let session = GatewaySession::new(&gateway, &config)
            .with_deadline(Deadline::after(Duration::from_millis(50)));

        let err = upi_payout(&session, payout_request("500", "u1", "asha@upi"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RazorpayError::DeadlineExceeded {
                endpoint: GatewayEndpoint::FundAccounts
            }
        ));
        assert_eq!(gateway.endpoints(), vec![GatewayEndpoint::Contacts]);
    }

    #[tokio::test]
    async fn test_huge_deadline_keeps_configured_call_timeout() {
        let gateway = RecordingGateway::replying(vec![json!({ "id": "order_1" })]);
        let config = test_config();
        let session =
            GatewaySession::new(&gateway, &config).with_deadline(Deadline::after(Duration::MAX));

        session.collect("1", "u1").await.unwrap();

        assert_eq!(gateway.timeout(0), Duration::from_secs(15));
    }

    #[tokio::test]
    async fn test_call_timeout_is_capped_by_remaining_deadline() {
        let gateway = RecordingGateway::replying(vec![
            json!({ "id": "order_1" }),
            json!({ "id": "order_2" }),
        ]);
        let config = test_config();

        let session = GatewaySession::new(&gateway, &config);
        session.collect("1", "u1").await.unwrap();
        assert_eq!(gateway.timeout(0), Duration::from_secs(15));

        let session =
            GatewaySession::new(&gateway, &config).with_deadline(Deadline::after(Duration::from_secs(2)));
        session.collect("1", "u1").await.unwrap();
        assert!(gateway.timeout(1) <= Duration::from_secs(2));
    }
}
