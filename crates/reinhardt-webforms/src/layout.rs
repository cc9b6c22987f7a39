//! Page, section and column layout for web form rendering.
//!
//! The layout is derived from the flat, ordered field list of a form in a
//! single forward pass. Break markers open new containers; every other field
//! lands in the current column, with a page, section and column synthesized
//! when none is open yet. Markers never appear inside a column.

use crate::field::{FieldType, WebFormField};
use serde::Serialize;

/// One page of a rendered form.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayoutPage {
	/// The page break that opened this page, absent for implicit pages
	#[serde(rename = "break", skip_serializing_if = "Option::is_none")]
	pub break_field: Option<WebFormField>,
	pub sections: Vec<LayoutSection>,
}

/// A section within a page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayoutSection {
	/// The section break that opened this section, absent for implicit sections
	#[serde(rename = "break", skip_serializing_if = "Option::is_none")]
	pub break_field: Option<WebFormField>,
	pub columns: Vec<LayoutColumn>,
}

/// A column holding input fields in form order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayoutColumn {
	pub fields: Vec<WebFormField>,
}

/// Build the page/section/column tree for an ordered field list.
///
/// # Examples
///
/// ```
/// use reinhardt_webforms::{FieldType, WebFormField};
/// use reinhardt_webforms::layout::build_layout;
///
/// let fields = vec![
///     WebFormField::new("title", FieldType::Data),
///     WebFormField::column_break(),
///     WebFormField::new("starts_on", FieldType::Date),
/// ];
///
/// let layout = build_layout(&fields);
/// assert_eq!(layout.len(), 1);
/// assert_eq!(layout[0].sections[0].columns.len(), 2);
/// ```
pub fn build_layout(fields: &[WebFormField]) -> Vec<LayoutPage> {
	let mut builder = LayoutBuilder::default();
	for field in fields {
		builder.push(field);
	}
	builder.pages
}

#[derive(Default)]
struct LayoutBuilder {
	pages: Vec<LayoutPage>,
	section_open: bool,
	column_open: bool,
}

impl LayoutBuilder {
	fn push(&mut self, field: &WebFormField) {
		match field.fieldtype {
			FieldType::PageBreak => {
				self.pages.push(LayoutPage {
					break_field: Some(field.clone()),
					sections: Vec::new(),
				});
				self.section_open = false;
				self.column_open = false;
			}
			FieldType::SectionBreak => {
				self.current_page().sections.push(LayoutSection {
					break_field: Some(field.clone()),
					columns: Vec::new(),
				});
				self.section_open = true;
				self.column_open = false;
			}
			FieldType::ColumnBreak => {
				self.current_section().columns.push(LayoutColumn::default());
				self.column_open = true;
			}
			_ => self.current_column().fields.push(field.clone()),
		}
	}

	fn current_page(&mut self) -> &mut LayoutPage {
		if self.pages.is_empty() {
			self.pages.push(LayoutPage::default());
			self.section_open = false;
			self.column_open = false;
		}
		let last = self.pages.len() - 1;
		&mut self.pages[last]
	}

	fn current_section(&mut self) -> &mut LayoutSection {
		let open = self.section_open;
		let page = self.current_page();
		if !open || page.sections.is_empty() {
			page.sections.push(LayoutSection::default());
			self.section_open = true;
			self.column_open = false;
		}
		let page = self.current_page();
		let last = page.sections.len() - 1;
		&mut page.sections[last]
	}

	fn current_column(&mut self) -> &mut LayoutColumn {
		let open = self.column_open;
		let section = self.current_section();
		if !open || section.columns.is_empty() {
			section.columns.push(LayoutColumn::default());
			self.column_open = true;
		}
		let section = self.current_section();
		let last = section.columns.len() - 1;
		&mut section.columns[last]
	}
}
