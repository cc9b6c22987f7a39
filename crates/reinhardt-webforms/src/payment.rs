//! Payment gateway integration for forms that accept payments.

use crate::error::{WebFormError, WebFormResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

/// Details sent to a payment gateway for one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentDetails {
	pub amount: Decimal,
	pub title: String,
	pub description: String,
	pub reference_doctype: String,
	pub reference_docname: String,
	pub payer_email: String,
	pub payer_name: String,
	pub order_id: String,
	pub currency: String,
	/// Where the gateway sends the payer back to
	pub redirect_to: String,
}

/// A payment provider able to start a hosted payment.
pub trait PaymentGateway: Send + Sync {
	/// URL the payer is redirected to.
	fn payment_url(&self, details: &PaymentDetails) -> WebFormResult<String>;
}

/// Gateway that hands every detail to a hosted checkout page as query
/// parameters.
#[derive(Debug, Clone)]
pub struct HostedCheckoutGateway {
	checkout_url: Url,
}

impl HostedCheckoutGateway {
	/// # Errors
	///
	/// Returns [`WebFormError::Config`] if `checkout_url` is not an absolute URL.
	pub fn new(checkout_url: &str) -> WebFormResult<Self> {
		let checkout_url = Url::parse(checkout_url)
			.map_err(|e| WebFormError::Config(format!("Invalid checkout URL: {}", e)))?;
		Ok(Self { checkout_url })
	}
}

impl PaymentGateway for HostedCheckoutGateway {
	fn payment_url(&self, details: &PaymentDetails) -> WebFormResult<String> {
		let mut url = self.checkout_url.clone();
		url.query_pairs_mut()
			.append_pair("amount", &details.amount.to_string())
			.append_pair("title", &details.title)
			.append_pair("description", &details.description)
			.append_pair("reference_doctype", &details.reference_doctype)
			.append_pair("reference_docname", &details.reference_docname)
			.append_pair("payer_email", &details.payer_email)
			.append_pair("payer_name", &details.payer_name)
			.append_pair("order_id", &details.order_id)
			.append_pair("currency", &details.currency)
			.append_pair("redirect_to", &details.redirect_to);
		Ok(url.into())
	}
}

/// Payment gateways by name.
#[derive(Clone, Default)]
pub struct PaymentGatewayRegistry {
	gateways: HashMap<String, Arc<dyn PaymentGateway>>,
}

impl PaymentGatewayRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register(&mut self, name: impl Into<String>, gateway: Arc<dyn PaymentGateway>) {
		self.gateways.insert(name.into(), gateway);
	}

	/// # Errors
	///
	/// Returns [`WebFormError::Payment`] if no gateway is registered under `name`.
	pub fn resolve(&self, name: &str) -> WebFormResult<Arc<dyn PaymentGateway>> {
		self.gateways
			.get(name)
			.cloned()
			.ok_or_else(|| WebFormError::Payment(format!("Unknown payment gateway: {}", name)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::str::FromStr;

	fn details() -> PaymentDetails {
		PaymentDetails {
			amount: Decimal::from_str("25.50").unwrap(),
			title: "Payment for Event EV-0001".to_string(),
			description: "Payment for Event EV-0001".to_string(),
			reference_doctype: "Event".to_string(),
			reference_docname: "EV-0001".to_string(),
			payer_email: "ada@example.com".to_string(),
			payer_name: "Ada".to_string(),
			order_id: "EV-0001".to_string(),
			currency: "EUR".to_string(),
			redirect_to: "https://example.com/events".to_string(),
		}
	}

	#[test]
	fn test_hosted_checkout_carries_details() {
		let gateway = HostedCheckoutGateway::new("https://pay.example.com/checkout").unwrap();
		let url = Url::parse(&gateway.payment_url(&details()).unwrap()).unwrap();
		let pairs: HashMap<String, String> = url.query_pairs().into_owned().collect();

		assert_eq!(url.path(), "/checkout");
		assert_eq!(pairs["amount"], "25.50");
		assert_eq!(pairs["currency"], "EUR");
		assert_eq!(pairs["payer_email"], "ada@example.com");
		assert_eq!(pairs["redirect_to"], "https://example.com/events");
	}

	#[test]
	fn test_invalid_checkout_url() {
		assert!(matches!(
			HostedCheckoutGateway::new("not a url"),
			Err(WebFormError::Config(_))
		));
	}

	#[test]
	fn test_unknown_gateway() {
		let registry = PaymentGatewayRegistry::new();
		assert!(matches!(
			registry.resolve("stripe"),
			Err(WebFormError::Payment(_))
		));
	}
}
