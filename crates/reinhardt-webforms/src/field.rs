//! Field descriptors for web forms and record-type schemas.

use serde::{Deserialize, Serialize};

/// Type of a form or schema field.
///
/// Besides value-bearing inputs this includes the structural markers
/// [`FieldType::PageBreak`], [`FieldType::SectionBreak`] and
/// [`FieldType::ColumnBreak`] that drive the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FieldType {
	#[default]
	Data,
	#[serde(rename = "Small Text")]
	SmallText,
	Text,
	#[serde(rename = "Text Editor")]
	TextEditor,
	Int,
	Float,
	Currency,
	Percent,
	Check,
	Select,
	Link,
	Date,
	Datetime,
	Time,
	Attach,
	#[serde(rename = "Attach Image")]
	AttachImage,
	Table,
	#[serde(rename = "HTML")]
	Html,
	Heading,
	Button,
	Image,
	Fold,
	#[serde(rename = "Page Break")]
	PageBreak,
	#[serde(rename = "Section Break")]
	SectionBreak,
	#[serde(rename = "Column Break")]
	ColumnBreak,
}

impl FieldType {
	/// Whether this type marks a page, section or column boundary.
	pub fn is_break(self) -> bool {
		matches!(
			self,
			FieldType::PageBreak | FieldType::SectionBreak | FieldType::ColumnBreak
		)
	}

	/// Whether a field of this type stores a value on the record.
	pub fn has_value(self) -> bool {
		!matches!(
			self,
			FieldType::PageBreak
				| FieldType::SectionBreak
				| FieldType::ColumnBreak
				| FieldType::Html
				| FieldType::Table
				| FieldType::Button
				| FieldType::Image
				| FieldType::Fold
				| FieldType::Heading
		)
	}

	/// Whether the field value is a file reference.
	pub fn is_attachment(self) -> bool {
		matches!(self, FieldType::Attach | FieldType::AttachImage)
	}
}

/// Display properties owned by the record-type schema.
///
/// For standard forms these are refreshed from the live schema on load, see
/// [`reconcile_field`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayProperties {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub precision: Option<u8>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub length: Option<u32>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub width: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub columns: Option<u8>,
	pub bold: bool,
	pub collapsible: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub collapsible_depends_on: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub depends_on: Option<String>,
	pub unique: bool,
	pub no_copy: bool,
	pub in_list_view: bool,
	pub print_hide: bool,
}

/// An ordered field on a web form.
///
/// Order within the owning form is significant: it defines the layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebFormField {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub fieldname: Option<String>,
	pub fieldtype: FieldType,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub options: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub default: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	pub idx: u32,
	pub reqd: bool,
	pub hidden: bool,
	pub read_only: bool,
	#[serde(flatten)]
	pub display: DisplayProperties,
}

impl WebFormField {
	/// Create a value-bearing field.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_webforms::{FieldType, WebFormField};
	///
	/// let field = WebFormField::new("title", FieldType::Data).with_label("Title");
	/// assert_eq!(field.fieldname.as_deref(), Some("title"));
	/// assert_eq!(field.label.as_deref(), Some("Title"));
	/// ```
	pub fn new(fieldname: impl Into<String>, fieldtype: FieldType) -> Self {
		Self {
			fieldname: Some(fieldname.into()),
			fieldtype,
			..Default::default()
		}
	}

	/// Create a structural marker without a fieldname.
	pub fn marker(fieldtype: FieldType) -> Self {
		Self {
			fieldtype,
			..Default::default()
		}
	}

	pub fn page_break() -> Self {
		Self::marker(FieldType::PageBreak)
	}

	pub fn section_break() -> Self {
		Self::marker(FieldType::SectionBreak)
	}

	pub fn column_break() -> Self {
		Self::marker(FieldType::ColumnBreak)
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	pub fn with_options(mut self, options: impl Into<String>) -> Self {
		self.options = Some(options.into());
		self
	}

	pub fn with_default(mut self, default: impl Into<String>) -> Self {
		self.default = Some(default.into());
		self
	}

	pub fn required(mut self) -> Self {
		self.reqd = true;
		self
	}

	pub fn hidden(mut self) -> Self {
		self.hidden = true;
		self
	}

	pub fn read_only(mut self) -> Self {
		self.read_only = true;
		self
	}

	/// Fieldname, or an empty string for unnamed markers.
	pub fn name(&self) -> &str {
		self.fieldname.as_deref().unwrap_or_default()
	}
}

/// A field declared on a record-type schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaField {
	pub fieldname: String,
	pub fieldtype: FieldType,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub options: Option<String>,
	#[serde(default)]
	pub reqd: bool,
	#[serde(flatten)]
	pub display: DisplayProperties,
}

impl SchemaField {
	pub fn new(fieldname: impl Into<String>, fieldtype: FieldType) -> Self {
		Self {
			fieldname: fieldname.into(),
			fieldtype,
			label: None,
			options: None,
			reqd: false,
			display: DisplayProperties::default(),
		}
	}

	pub fn with_display(mut self, display: DisplayProperties) -> Self {
		self.display = display;
		self
	}
}

/// Merge live schema properties onto a form field.
///
/// Only applies when both sides share the same field type; otherwise the
/// form field is returned as is. The form author keeps ownership of the
/// ordering index, required flag, default, description, options, hidden
/// flag, read-only flag and label. Everything in [`DisplayProperties`] is
/// taken from the schema.
///
/// # Examples
///
/// ```
/// use reinhardt_webforms::{DisplayProperties, FieldType, SchemaField, WebFormField};
/// use reinhardt_webforms::field::reconcile_field;
///
/// let form = WebFormField::new("fee", FieldType::Currency).with_label("Entry fee");
/// let schema = SchemaField::new("fee", FieldType::Currency).with_display(DisplayProperties {
///     precision: Some(2),
///     ..Default::default()
/// });
///
/// let merged = reconcile_field(&form, &schema);
/// assert_eq!(merged.display.precision, Some(2));
/// assert_eq!(merged.label.as_deref(), Some("Entry fee"));
/// ```
pub fn reconcile_field(form: &WebFormField, schema: &SchemaField) -> WebFormField {
	if form.fieldtype != schema.fieldtype {
		return form.clone();
	}

	WebFormField {
		fieldtype: schema.fieldtype,
		display: schema.display.clone(),
		..form.clone()
	}
}
