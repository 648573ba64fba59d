use crate::gateways::{GatewayError, IntentHandle, IntentSnapshot, IntentStatus, PaymentGateway};
use reqwest::StatusCode;

pub struct StripeGateway {
    pub base_url: String,
    pub secret_key: String,
    pub timeout_ms: u64,
    pub client: reqwest::Client,
}

impl StripeGateway {
    fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_ms)
    }

    async fn check(resp: reqwest::Response) -> Result<serde_json::Value, GatewayError> {
        let status = resp.status();
        if status.is_success() {
            return resp
                .json::<serde_json::Value>()
                .await
                .map_err(|e| GatewayError::Decode(e.to_string()));
        }

        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| {
                v.get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(|m| m.as_str())
                    .map(ToString::to_string)
            })
            .unwrap_or_else(|| body.chars().take(200).collect());

        if status == StatusCode::NOT_FOUND {
            Err(GatewayError::NotFound(message))
        } else if status.is_server_error() {
            Err(GatewayError::Unavailable(format!("HTTP_{}: {}", status.as_u16(), message)))
        } else {
            Err(GatewayError::InvalidRequest(format!("HTTP_{}: {}", status.as_u16(), message)))
        }
    }

    fn network(e: reqwest::Error) -> GatewayError {
        if e.is_timeout() {
            GatewayError::Unavailable("gateway timeout".to_string())
        } else {
            GatewayError::Unavailable(e.to_string())
        }
    }
}

fn parse_intent_status(s: &str) -> IntentStatus {
    match s {
        "succeeded" => IntentStatus::Succeeded,
        "canceled" => IntentStatus::Canceled,
        "processing" => IntentStatus::Processing,
        _ => IntentStatus::RequiresPayment,
    }
}

#[async_trait::async_trait]
impl PaymentGateway for StripeGateway {
    fn name(&self) -> &'static str {
        "stripe"
    }

    async fn create_intent(
        &self,
        amount_minor: i64,
        currency: &str,
        metadata: &serde_json::Value,
    ) -> Result<IntentHandle, GatewayError> {
        if amount_minor <= 0 {
            return Err(GatewayError::InvalidRequest("amount must be > 0".to_string()));
        }
        if currency.len() != 3 {
            return Err(GatewayError::InvalidRequest("currency must be an ISO 4217 code".to_string()));
        }

        let mut params = vec![
            ("amount".to_string(), amount_minor.to_string()),
            ("currency".to_string(), currency.to_lowercase()),
            ("automatic_payment_methods[enabled]".to_string(), "true".to_string()),
        ];
        if let Some(map) = metadata.as_object() {
            for (key, value) in map {
                let rendered = match value.as_str() {
                    Some(s) => s.to_string(),
                    None => value.to_string(),
                };
                params.push((format!("metadata[{key}]"), rendered));
            }
        }

        let resp = self
            .client
            .post(format!("{}/v1/payment_intents", self.base_url))
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&params)
            .timeout(self.timeout())
            .send()
            .await
            .map_err(Self::network)?;

        let v = Self::check(resp).await?;
        let intent_id = v
            .get("id")
            .and_then(|id| id.as_str())
            .ok_or_else(|| GatewayError::Decode("missing intent id".to_string()))?
            .to_string();
        let client_secret = v
            .get("client_secret")
            .and_then(|s| s.as_str())
            .ok_or_else(|| GatewayError::Decode("missing client_secret".to_string()))?
            .to_string();

        Ok(IntentHandle { intent_id, client_secret })
    }

    async fn retrieve_intent(&self, intent_id: &str) -> Result<IntentSnapshot, GatewayError> {
        let resp = self
            .client
            .get(format!("{}/v1/payment_intents/{}", self.base_url, intent_id))
            .basic_auth(&self.secret_key, None::<&str>)
            .timeout(self.timeout())
            .send()
            .await
            .map_err(Self::network)?;

        let v = Self::check(resp).await?;
        Ok(IntentSnapshot {
            intent_id: intent_id.to_string(),
            status: parse_intent_status(v.get("status").and_then(|s| s.as_str()).unwrap_or_default()),
            amount_minor: v.get("amount").and_then(|a| a.as_i64()).unwrap_or(0),
            currency: v
                .get("currency")
                .and_then(|c| c.as_str())
                .unwrap_or_default()
                .to_uppercase(),
        })
    }

    async fn refund_intent(&self, intent_id: &str) -> Result<(), GatewayError> {
        let params = [("payment_intent", intent_id)];
        let resp = self
            .client
            .post(format!("{}/v1/refunds", self.base_url))
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&params)
            .timeout(self.timeout())
            .send()
            .await
            .map_err(Self::network)?;

        Self::check(resp).await.map(|_| ())
    }

    async fn cancel_intent(&self, intent_id: &str) -> Result<(), GatewayError> {
        let resp = self
            .client
            .post(format!("{}/v1/payment_intents/{}/cancel", self.base_url, intent_id))
            .basic_auth(&self.secret_key, None::<&str>)
            .timeout(self.timeout())
            .send()
            .await
            .map_err(Self::network)?;

        Self::check(resp).await.map(|_| ())
    }
}
