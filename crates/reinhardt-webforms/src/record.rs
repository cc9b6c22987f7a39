//! Records and record-type schemas as seen by web forms.
//!
//! The record store owns persistence. This module only needs field access by
//! name, the record name and its owner.

use crate::field::SchemaField;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Schema of a record type (the target a web form collects data for).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordType {
	/// Record type name, e.g. "Event"
	pub name: String,
	/// Module the record type is declared in
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub module: Option<String>,
	/// Field whose value is used as a record's display title
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title_field: Option<String>,
	#[serde(default)]
	pub fields: Vec<SchemaField>,
}

impl RecordType {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			module: None,
			title_field: None,
			fields: Vec::new(),
		}
	}

	pub fn with_module(mut self, module: impl Into<String>) -> Self {
		self.module = Some(module.into());
		self
	}

	pub fn with_title_field(mut self, fieldname: impl Into<String>) -> Self {
		self.title_field = Some(fieldname.into());
		self
	}

	pub fn with_field(mut self, field: SchemaField) -> Self {
		self.fields.push(field);
		self
	}

	pub fn get_field(&self, fieldname: &str) -> Option<&SchemaField> {
		self.fields.iter().find(|f| f.fieldname == fieldname)
	}

	pub fn has_field(&self, fieldname: &str) -> bool {
		self.get_field(fieldname).is_some()
	}

	/// Field used for record titles, falling back to `title` when the schema
	/// declares one.
	pub fn title_field(&self) -> Option<&str> {
		self.title_field
			.as_deref()
			.or_else(|| self.has_field("title").then_some("title"))
	}
}

/// A record instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
	pub doctype: String,
	/// Record identifier; `None` until inserted
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Identity that created the record
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub owner: Option<String>,
	#[serde(flatten)]
	values: Map<String, Value>,
}

impl Record {
	/// Create an unsaved record of the given type.
	pub fn new(doctype: impl Into<String>) -> Self {
		Self {
			doctype: doctype.into(),
			..Default::default()
		}
	}

	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
		self.owner = Some(owner.into());
		self
	}

	pub fn with_value(mut self, fieldname: impl Into<String>, value: impl Into<Value>) -> Self {
		self.set(fieldname, value);
		self
	}

	pub fn get(&self, fieldname: &str) -> Option<&Value> {
		self.values.get(fieldname)
	}

	/// String value of a field; `None` when unset, null or empty.
	pub fn get_str(&self, fieldname: &str) -> Option<&str> {
		self.values
			.get(fieldname)
			.and_then(Value::as_str)
			.filter(|s| !s.is_empty())
	}

	pub fn set(&mut self, fieldname: impl Into<String>, value: impl Into<Value>) {
		self.values.insert(fieldname.into(), value.into());
	}

	pub fn values(&self) -> &Map<String, Value> {
		&self.values
	}

	pub fn is_new(&self) -> bool {
		self.name.is_none()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::field::FieldType;
	use serde_json::json;

	#[test]
	fn test_record_serializes_values_inline() {
		let record = Record::new("Event")
			.with_name("EV-0001")
			.with_owner("ada@example.com")
			.with_value("title", "Launch");

		let json = serde_json::to_value(&record).unwrap();
		assert_eq!(
			json,
			json!({
				"doctype": "Event",
				"name": "EV-0001",
				"owner": "ada@example.com",
				"title": "Launch"
			})
		);
	}

	#[test]
	fn test_get_str_ignores_empty_values() {
		let record = Record::new("Event")
			.with_value("venue", "")
			.with_value("capacity", 40);

		assert_eq!(record.get_str("venue"), None);
		assert_eq!(record.get_str("capacity"), None);
		assert_eq!(record.get("capacity"), Some(&json!(40)));
	}

	#[test]
	fn test_title_field_falls_back_to_title() {
		let meta = RecordType::new("Event").with_field(SchemaField::new("title", FieldType::Data));
		assert_eq!(meta.title_field(), Some("title"));

		let meta = RecordType::new("Task").with_title_field("subject");
		assert_eq!(meta.title_field(), Some("subject"));

		assert_eq!(RecordType::new("Note").title_field(), None);
	}
}
