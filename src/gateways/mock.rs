use crate::gateways::{GatewayError, IntentHandle, IntentSnapshot, IntentStatus, PaymentGateway};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// In-memory gateway for tests. `behavior` drives what `retrieve_intent`
/// reports for intents this instance created.
pub struct MockGateway {
    pub behavior: String,
    created: Mutex<HashMap<String, (i64, String)>>,
}

impl MockGateway {
    pub fn new(behavior: &str) -> Self {
        Self {
            behavior: behavior.to_string(),
            created: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait::async_trait]
impl PaymentGateway for MockGateway {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn create_intent(
        &self,
        amount_minor: i64,
        currency: &str,
        _metadata: &serde_json::Value,
    ) -> Result<IntentHandle, GatewayError> {
        if self.behavior == "ALWAYS_UNAVAILABLE" {
            return Err(GatewayError::Unavailable("mock outage".to_string()));
        }
        if amount_minor <= 0 {
            return Err(GatewayError::InvalidRequest("amount must be > 0".to_string()));
        }

        let intent_id = format!("pi_mock_{}", Uuid::new_v4().simple());
        self.created
            .lock()
            .expect("mock gateway lock poisoned")
            .insert(intent_id.clone(), (amount_minor, currency.to_uppercase()));

        Ok(IntentHandle {
            client_secret: format!("{intent_id}_secret"),
            intent_id,
        })
    }

    async fn retrieve_intent(&self, intent_id: &str) -> Result<IntentSnapshot, GatewayError> {
        let created = self.created.lock().expect("mock gateway lock poisoned");
        let (amount_minor, currency) = created
            .get(intent_id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(intent_id.to_string()))?;

        let status = match self.behavior.as_str() {
            "SETTLE_SUCCEEDED" => IntentStatus::Succeeded,
            "SETTLE_CANCELED" => IntentStatus::Canceled,
            "SETTLE_PROCESSING" => IntentStatus::Processing,
            _ => IntentStatus::RequiresPayment,
        };

        Ok(IntentSnapshot {
            intent_id: intent_id.to_string(),
            status,
            amount_minor,
            currency,
        })
    }

    async fn refund_intent(&self, intent_id: &str) -> Result<(), GatewayError> {
        let created = self.created.lock().expect("mock gateway lock poisoned");
        if created.contains_key(intent_id) {
            Ok(())
        } else {
            Err(GatewayError::NotFound(intent_id.to_string()))
        }
    }

    async fn cancel_intent(&self, intent_id: &str) -> Result<(), GatewayError> {
        let created = self.created.lock().expect("mock gateway lock poisoned");
        if created.contains_key(intent_id) {
            Ok(())
        } else {
            Err(GatewayError::NotFound(intent_id.to_string()))
        }
    }
}
